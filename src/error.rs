//! Error types for trie construction and query options.
//!
//! Lookups never fail: a missing key is `None`. Errors only come from
//! configuration that cannot be honoured or from option values that do not
//! parse as the trie's value type.

use thiserror::Error;

use crate::config::ValueKind;

/// Result type for trie configuration.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring a trie or a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An option name that the builder does not recognise.
    #[error("unknown option `{name}`, only [value_type, default, burst_threshold] are allowed")]
    UnknownOption {
        /// The rejected option name.
        name: String,
    },

    /// A value kind other than `int64` or `object`.
    #[error("unsupported value kind `{name}`")]
    UnsupportedValueKind {
        /// The rejected kind name.
        name: String,
    },

    /// The requested value kind disagrees with the trie's value type.
    #[error("value kind {requested} requested, but the value type is {actual}")]
    ValueKindMismatch {
        /// Kind named in the configuration.
        requested: ValueKind,
        /// Kind implied by the value type parameter.
        actual: ValueKind,
    },

    /// A search limit below zero.
    #[error("limit should be >= 0, got {limit}")]
    NegativeLimit {
        /// The rejected limit.
        limit: i64,
    },

    /// A burst threshold that could never hold an entry.
    #[error("burst threshold must be at least 1")]
    InvalidBurstThreshold,

    /// A change-all mode other than `prefix`, `suffix` or `substring`.
    #[error("unknown change mode `{name}`, expected prefix, suffix or substring")]
    UnknownChangeMode {
        /// The rejected mode name.
        name: String,
    },

    /// A raw option value that does not parse as the expected type.
    #[error("expected {expected} value, got `{raw}`")]
    InvalidValue {
        /// Kind the value had to parse as.
        expected: ValueKind,
        /// The raw text that failed to parse.
        raw: String,
    },
}

impl Error {
    /// Whether this is a configuration error (bad option name or setting).
    pub fn is_configuration(&self) -> bool {
        !self.is_type_error()
    }

    /// Whether this is a type error (a value of the wrong shape).
    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::InvalidValue { .. })
    }
}
