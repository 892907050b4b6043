//! Construction and query configuration.

use std::any::{Any, TypeId};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::Trie;

/// Bucket entry count above which a bucket is burst into a container.
pub const DEFAULT_BURST_THRESHOLD: usize = 256;

/// The kind of value stored in a trie's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Fixed-width signed 64-bit integers, copied by value.
    Int64,
    /// Arbitrary owned values.
    Object,
}

impl ValueKind {
    /// The kind implied by the value type `V`: `i64` is `Int64`, anything
    /// else is `Object`.
    pub fn of<V: 'static>() -> Self {
        if TypeId::of::<V>() == TypeId::of::<i64>() {
            ValueKind::Int64
        } else {
            ValueKind::Object
        }
    }

    /// Name used by the `value_type` option.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int64 => "int64",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int64" => Ok(ValueKind::Int64),
            "object" => Ok(ValueKind::Object),
            other => Err(Error::UnsupportedValueKind { name: other.into() }),
        }
    }
}

/// Zero for `Int64` tries, absent for everything else.
pub(crate) fn implicit_default<V: 'static>() -> Option<V> {
    let zero: Box<dyn Any> = Box::new(0i64);
    zero.downcast::<V>().ok().map(|v| *v)
}

/// Builder for [`Trie`].
///
/// ```rust
/// use triez::{Trie, ValueKind};
///
/// let t: Trie<i64> = Trie::builder()
///     .value_kind(ValueKind::Int64)
///     .default_value(10)
///     .build()
///     .unwrap();
/// assert_eq!(t.default_value(), Some(&10));
/// ```
#[derive(Debug, Clone)]
pub struct TrieBuilder<V> {
    kind: Option<ValueKind>,
    default: Option<V>,
    burst_threshold: usize,
}

impl<V: 'static> TrieBuilder<V> {
    /// A builder with no default and the default burst threshold.
    pub fn new() -> Self {
        Self {
            kind: None,
            default: None,
            burst_threshold: DEFAULT_BURST_THRESHOLD,
        }
    }

    /// Require a value kind. `build` fails if `V` is of a different kind.
    pub fn value_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Value handed to `change_all` and `append` for keys that are absent.
    pub fn default_value(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    /// Bucket size above which a bucket bursts.
    pub fn burst_threshold(mut self, entries: usize) -> Self {
        self.burst_threshold = entries;
        self
    }

    /// Apply a string-keyed option, as a binding layer would pass them.
    ///
    /// Recognised names are `value_type`, `default` and `burst_threshold`.
    pub fn option(mut self, name: &str, raw: &str) -> Result<Self>
    where
        V: FromStr,
    {
        match name {
            "value_type" => self.kind = Some(raw.parse()?),
            "default" => {
                let value = raw.parse::<V>().map_err(|_| Error::InvalidValue {
                    expected: ValueKind::of::<V>(),
                    raw: raw.into(),
                })?;
                self.default = Some(value);
            }
            "burst_threshold" => {
                self.burst_threshold = raw.parse().map_err(|_| Error::InvalidBurstThreshold)?;
            }
            other => return Err(Error::UnknownOption { name: other.into() }),
        }
        Ok(self)
    }

    /// Validate the configuration and create an empty trie.
    pub fn build(self) -> Result<Trie<V>> {
        let actual = ValueKind::of::<V>();
        if let Some(requested) = self.kind {
            if requested != actual {
                return Err(Error::ValueKindMismatch { requested, actual });
            }
        }
        if self.burst_threshold == 0 {
            return Err(Error::InvalidBurstThreshold);
        }
        let default = self.default.or_else(implicit_default::<V>);
        tracing::debug!(
            kind = %actual,
            burst_threshold = self.burst_threshold,
            has_default = default.is_some(),
            "trie configured"
        );
        Ok(Trie::from_parts(default, self.burst_threshold))
    }
}

impl<V: 'static> Default for TrieBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [`Trie::search_with_prefix`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results; `None` means unbounded.
    pub limit: Option<usize>,
    /// Return results in ascending byte order instead of trie order.
    pub sorted: bool,
}

impl SearchOptions {
    /// Unbounded, unsorted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Like [`limit`](Self::limit), for callers holding a signed count.
    pub fn try_limit(self, limit: i64) -> Result<Self> {
        let limit = usize::try_from(limit).map_err(|_| Error::NegativeLimit { limit })?;
        Ok(self.limit(limit))
    }

    /// Request ascending byte order.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }
}
