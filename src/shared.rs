//! A trie behind a reader-writer lock.
//!
//! Readers run concurrently; `set`, `delete` and `change_all` take the write
//! lock, so a mutation never overlaps a lookup, search or enumeration.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::change::ChangeMode;
use crate::config::SearchOptions;
use crate::Trie;

/// A [`Trie`] that can be shared across threads.
///
/// Reads hand back owned values, since no borrow may outlive the lock.
/// Use [`read`](SharedTrie::read) to borrow through a guard instead.
pub struct SharedTrie<V> {
    inner: RwLock<Trie<V>>,
}

impl<V: 'static> SharedTrie<V> {
    /// An empty shared trie with default configuration.
    pub fn new() -> Self {
        Self::from(Trie::new())
    }
}

impl<V> SharedTrie<V> {
    /// Value stored under `key`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Whether `key` is stored.
    pub fn has_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().has_key(key)
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn set(&self, key: impl AsRef<[u8]>, value: V) -> Option<V> {
        self.inner.write().set(key, value)
    }

    /// Remove `key`.
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Option<V> {
        self.inner.write().delete(key)
    }

    /// See [`Trie::search_with_prefix`].
    pub fn search_with_prefix(
        &self,
        prefix: impl AsRef<[u8]>,
        opts: SearchOptions,
    ) -> Vec<(Vec<u8>, V)>
    where
        V: Clone,
    {
        self.inner
            .read()
            .search_with_prefix(prefix, opts)
            .into_iter()
            .map(|(k, v)| (k, v.clone()))
            .collect()
    }

    /// See [`Trie::longest_match`]. The matched key is returned owned.
    pub fn longest_match(&self, probe: impl AsRef<[u8]>) -> Option<(Vec<u8>, V)>
    where
        V: Clone,
    {
        let probe = probe.as_ref();
        self.inner
            .read()
            .longest_match(probe)
            .map(|(k, v)| (k.to_vec(), v.clone()))
    }

    /// See [`Trie::change_all`]. Holds the write lock for the whole pass.
    pub fn change_all<F>(&self, mode: ChangeMode, input: impl AsRef<[u8]>, combine: F)
    where
        F: FnMut(Option<&V>) -> V,
    {
        self.inner.write().change_all(mode, input, combine)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the trie for a batch of reads.
    pub fn read(&self) -> RwLockReadGuard<'_, Trie<V>> {
        self.inner.read()
    }

    /// Borrow the trie exclusively.
    pub fn write(&self) -> RwLockWriteGuard<'_, Trie<V>> {
        self.inner.write()
    }

    /// Unwrap the trie.
    pub fn into_inner(self) -> Trie<V> {
        self.inner.into_inner()
    }
}

impl<V> From<Trie<V>> for SharedTrie<V> {
    fn from(trie: Trie<V>) -> Self {
        Self {
            inner: RwLock::new(trie),
        }
    }
}

impl<V: 'static> Default for SharedTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}
