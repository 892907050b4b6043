//! Prefix enumeration and longest-prefix match.

use crate::config::SearchOptions;
use crate::iter::Iter;
use crate::node::Node;
use crate::Trie;

impl<V> Trie<V> {
    /// Lazily enumerate the entries whose key starts with `prefix`.
    pub fn iter_prefix(&self, prefix: impl AsRef<[u8]>, sorted: bool) -> Iter<'_, V> {
        Iter::with_prefix(&self.root, prefix.as_ref(), sorted)
    }

    /// Collect the entries whose key starts with `prefix`, with full keys.
    ///
    /// Without `sorted`, results come in trie order, and a `limit` keeps the
    /// first entries of that order rather than the smallest keys.
    pub fn search_with_prefix(
        &self,
        prefix: impl AsRef<[u8]>,
        opts: SearchOptions,
    ) -> Vec<(Vec<u8>, &V)> {
        let iter = self.iter_prefix(prefix, opts.sorted);
        match opts.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }

    /// Like [`search_with_prefix`](Trie::search_with_prefix), handing each
    /// entry to `f` instead of collecting. The first `Err` stops the search
    /// and is returned.
    pub fn try_search_with_prefix<E, F>(
        &self,
        prefix: impl AsRef<[u8]>,
        opts: SearchOptions,
        f: F,
    ) -> Result<(), E>
    where
        F: FnMut(&[u8], &V) -> Result<(), E>,
    {
        self.iter_prefix(prefix, opts.sorted).try_visit(opts.limit, f)
    }

    /// The longest stored key that is a prefix of `probe`, as a sub-slice of
    /// `probe`, with its value.
    ///
    /// The empty key only matches if it was stored.
    pub fn longest_match<'p, K>(&self, probe: &'p K) -> Option<(&'p [u8], &V)>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let probe = probe.as_ref();
        let mut best: Option<(usize, &V)> = None;
        let mut node = &self.root;
        let mut depth = 0;
        loop {
            match node {
                Node::Container(container) => {
                    if let Some(value) = &container.value {
                        best = Some((depth, value));
                    }
                    let Some(child) = probe.get(depth).and_then(|&b| container.child(b)) else {
                        break;
                    };
                    node = child;
                    depth += 1;
                }
                Node::Bucket(bucket) => {
                    if let Some((len, value)) = bucket.longest_prefix_of(&probe[depth..]) {
                        best = Some((depth + len, value));
                    }
                    break;
                }
            }
        }
        best.map(|(len, value)| (&probe[..len], value))
    }
}
