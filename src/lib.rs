//! # triez
//!
//! An in-memory HAT-trie keyed by arbitrary byte strings, built for three
//! query shapes: exact lookup, enumeration of every key under a prefix, and
//! longest-prefix match against a probe.
//!
//! Dense leaf regions are kept in small unsorted buckets. When a bucket grows
//! past the burst threshold it is split into a 256-way container whose
//! children partition the entries by their next byte.
//!
//! The [`Trie::change_all`] mutator materializes and updates every prefix,
//! suffix or substring of an input in one call. Indexing each phrase by its
//! suffixes turns "which phrases contain S" into a prefix search for S.
//!
//! ## Example
//!
//! ```rust
//! use triez::{ChangeMode, SearchOptions, Trie};
//!
//! let mut t: Trie<i64> = Trie::new();
//! t.set("万塘路一锅鸡", 1);
//! t.set("万塘路", 2);
//! assert_eq!(t.get("万塘路"), Some(&2));
//!
//! let hits = t.search_with_prefix("万塘", SearchOptions::new().sorted(true));
//! assert_eq!(hits.len(), 2);
//!
//! let mut idx: Trie<i64> = Trie::new();
//! idx.change_all(ChangeMode::Suffix, "ATACGGTCCA", |_| 2);
//! let hits = idx.search_with_prefix("CGGT", SearchOptions::new());
//! assert_eq!(*hits[0].1, 2);
//! ```
//!
//! ## Concurrency
//!
//! The engine is single-threaded: `&self` methods may run concurrently with
//! each other, `&mut self` methods need exclusive access. [`SharedTrie`]
//! wraps a trie in a reader-writer lock for callers that share one.

#![warn(missing_docs)]

mod bucket;
mod burst;
mod change;
mod config;
mod error;
mod iter;
mod node;
mod search;
mod shared;
mod stats;
mod traverse;

pub use change::ChangeMode;
pub use config::{SearchOptions, TrieBuilder, ValueKind, DEFAULT_BURST_THRESHOLD};
pub use error::{Error, Result};
pub use iter::Iter;
pub use shared::SharedTrie;
pub use stats::TrieStats;

use node::Node;

/// A HAT-trie mapping byte-string keys to values of type `V`.
///
/// `i64` tries are the fixed-width integer kind and default to `0` for
/// absent keys during [`change_all`](Trie::change_all) and
/// [`append`](Trie::append); any other `V` is the arbitrary-value kind with no
/// default unless one is configured through [`Trie::builder`].
pub struct Trie<V> {
    root: Node<V>,
    len: usize,
    default: Option<V>,
    burst_threshold: usize,
}

impl<V: 'static> Trie<V> {
    /// An empty trie with the implicit default for `V` and the default
    /// burst threshold.
    pub fn new() -> Self {
        Self::from_parts(config::implicit_default::<V>(), DEFAULT_BURST_THRESHOLD)
    }

    /// Configure a trie before creating it.
    pub fn builder() -> TrieBuilder<V> {
        TrieBuilder::new()
    }

    /// Kind of value this trie stores.
    pub fn value_kind(&self) -> ValueKind {
        ValueKind::of::<V>()
    }
}

impl<V> Trie<V> {
    pub(crate) fn from_parts(default: Option<V>, burst_threshold: usize) -> Self {
        Self {
            root: Node::empty(),
            len: 0,
            default,
            burst_threshold,
        }
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Same as [`len`](Trie::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Whether no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value used for keys that `change_all` or `append` materialize.
    pub fn default_value(&self) -> Option<&V> {
        self.default.as_ref()
    }

    /// Bucket size above which a bucket bursts.
    pub fn burst_threshold(&self) -> usize {
        self.burst_threshold
    }

    /// Value stored under `key`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        traverse::lookup(&self.root, key.as_ref())
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        traverse::lookup_mut(&mut self.root, key.as_ref())
    }

    /// Whether `key` is stored. Never materializes a default.
    pub fn has_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn set(&mut self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        let old = traverse::insert(&mut self.root, key.as_ref(), value, self.burst_threshold);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Remove `key`, handing its value back to the caller.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
        let old = traverse::remove(&mut self.root, key.as_ref());
        if old.is_some() {
            self.len -= 1;
        }
        old
    }

    /// Store a clone of the default value under `key`.
    ///
    /// Returns `false`, storing nothing, if the trie has no default.
    pub fn append(&mut self, key: impl AsRef<[u8]>) -> bool
    where
        V: Clone,
    {
        match self.default.clone() {
            Some(value) => {
                self.set(key, value);
                true
            }
            None => false,
        }
    }

    /// Drop every entry. Configuration is kept.
    pub fn clear(&mut self) {
        self.root = Node::empty();
        self.len = 0;
    }

    /// All entries in trie order (not globally sorted).
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root, false)
    }

    /// All entries in ascending byte order.
    pub fn iter_sorted(&self) -> Iter<'_, V> {
        Iter::new(&self.root, true)
    }

    /// Call `f` for every entry in trie order. The first `Err` stops the
    /// walk and is returned; the trie is unaffected either way.
    pub fn try_each<E, F>(&self, f: F) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], &V) -> std::result::Result<(), E>,
    {
        Iter::new(&self.root, false).try_visit(None, f)
    }
}

impl<V: 'static> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for Trie<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            default: self.default.clone(),
            burst_threshold: self.burst_threshold,
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(&k).into_owned(), v)))
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for Trie<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K: AsRef<[u8]>, V: 'static> FromIterator<(K, V)> for Trie<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}


#[cfg(test)]
mod proptests;
