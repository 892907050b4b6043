//! Leaf storage: an unsorted run of `(suffix, value)` pairs that share the
//! path leading to the bucket.
//!
//! Buckets are scanned linearly. The burst threshold bounds their length, so
//! a scan is never longer than the threshold. Sorting happens on demand, on a
//! side list of indices, so reads never reorder entries.

use smallvec::SmallVec;

/// Key bytes left over after the path consumed by containers.
pub(crate) type Suffix = SmallVec<[u8; 16]>;

#[derive(Clone)]
pub(crate) struct Bucket<V> {
    entries: Vec<(Suffix, V)>,
}

impl<V> Bucket<V> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn position(&self, suffix: &[u8]) -> Option<usize> {
        self.entries.iter().position(|(s, _)| s.as_slice() == suffix)
    }

    pub(crate) fn get(&self, suffix: &[u8]) -> Option<&V> {
        self.position(suffix).map(|i| &self.entries[i].1)
    }

    pub(crate) fn get_mut(&mut self, suffix: &[u8]) -> Option<&mut V> {
        let i = self.position(suffix)?;
        Some(&mut self.entries[i].1)
    }

    /// Insert or overwrite. Returns the replaced value.
    pub(crate) fn insert(&mut self, suffix: &[u8], value: V) -> Option<V> {
        match self.position(suffix) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((Suffix::from_slice(suffix), value));
                None
            }
        }
    }

    /// Append without a duplicate check. The caller guarantees `suffix` is
    /// not already present.
    #[inline]
    pub(crate) fn push(&mut self, suffix: Suffix, value: V) {
        debug_assert!(self.position(&suffix).is_none());
        self.entries.push((suffix, value));
    }

    pub(crate) fn remove(&mut self, suffix: &[u8]) -> Option<V> {
        let i = self.position(suffix)?;
        Some(self.entries.swap_remove(i).1)
    }

    #[inline]
    pub(crate) fn entry(&self, idx: usize) -> (&[u8], &V) {
        let (suffix, value) = &self.entries[idx];
        (suffix.as_slice(), value)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&[u8], &V)> {
        self.entries.iter().map(|(s, v)| (s.as_slice(), v))
    }

    pub(crate) fn into_entries(self) -> std::vec::IntoIter<(Suffix, V)> {
        self.entries.into_iter()
    }

    /// Indices of the entries whose suffix starts with `filter`, in bucket
    /// order or, if `sorted`, in ascending suffix order.
    pub(crate) fn matching_order(&self, filter: &[u8], sorted: bool) -> Vec<usize> {
        let mut order: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (s, _))| s.starts_with(filter))
            .map(|(i, _)| i)
            .collect();
        if sorted {
            order.sort_unstable_by(|&a, &b| self.entries[a].0.cmp(&self.entries[b].0));
        }
        order
    }

    /// Bytes every stored suffix starts with.
    pub(crate) fn shared_prefix(&self) -> &[u8] {
        let mut suffixes = self.entries.iter().map(|(s, _)| s.as_slice());
        let Some(first) = suffixes.next() else {
            return &[];
        };
        let mut len = first.len();
        for s in suffixes {
            len = first[..len].iter().zip(s).take_while(|(a, b)| a == b).count();
            if len == 0 {
                break;
            }
        }
        &first[..len]
    }

    /// The longest stored suffix that is a prefix of `probe`.
    pub(crate) fn longest_prefix_of(&self, probe: &[u8]) -> Option<(usize, &V)> {
        self.iter()
            .filter(|(s, _)| probe.starts_with(s))
            .max_by_key(|(s, _)| s.len())
            .map(|(s, v)| (s.len(), v))
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        let spilled: usize = self
            .entries
            .iter()
            .filter(|(s, _)| s.spilled())
            .map(|(s, _)| s.capacity())
            .sum();
        self.entries.capacity() * std::mem::size_of::<(Suffix, V)>() + spilled
    }
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self::new()
    }
}
