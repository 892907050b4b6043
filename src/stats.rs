//! Shape and memory statistics.

use crate::node::{Container, Node};
use crate::Trie;

/// Structural statistics for a trie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrieStats {
    /// Number of containers, including a container root.
    pub containers: usize,
    /// Number of buckets, empty ones included.
    pub buckets: usize,
    /// Number of stored keys.
    pub entries: usize,
    /// Entries in the fullest bucket.
    pub max_bucket_len: usize,
    /// Key bytes consumed on the way to the deepest node.
    pub max_depth: usize,
}

impl TrieStats {
    /// Average entries per bucket.
    pub fn avg_bucket_len(&self) -> f64 {
        if self.buckets == 0 {
            0.0
        } else {
            self.entries as f64 / self.buckets as f64
        }
    }
}

impl<V> Trie<V> {
    /// Walk the trie and count its nodes.
    pub fn stats(&self) -> TrieStats {
        let mut stats = TrieStats::default();
        let mut stack: Vec<(&Node<V>, usize)> = vec![(&self.root, 0)];
        while let Some((node, depth)) = stack.pop() {
            stats.max_depth = stats.max_depth.max(depth);
            match node {
                Node::Container(container) => {
                    stats.containers += 1;
                    if container.value.is_some() {
                        stats.entries += 1;
                    }
                    stack.extend(container.children().map(|(_, child)| (child, depth + 1)));
                }
                Node::Bucket(bucket) => {
                    stats.buckets += 1;
                    stats.entries += bucket.len();
                    stats.max_bucket_len = stats.max_bucket_len.max(bucket.len());
                }
            }
        }
        stats
    }

    /// Approximate heap bytes owned by the trie, excluding whatever the
    /// values themselves own.
    pub fn memory_usage(&self) -> usize {
        let mut bytes = 0;
        let mut stack: Vec<&Node<V>> = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Container(container) => {
                    bytes += std::mem::size_of::<Container<V>>();
                    stack.extend(container.children().map(|(_, child)| child));
                }
                Node::Bucket(bucket) => bytes += bucket.heap_bytes(),
            }
        }
        bytes
    }
}
