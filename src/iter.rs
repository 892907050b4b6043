//! Depth-first enumeration of stored entries.
//!
//! Trie order: a container yields its own value, then its children in byte
//! order; a bucket yields entries in insertion order, or in suffix order when
//! sorting was requested. With sorting, the result is ascending byte order
//! overall.
//!
//! The iterator only borrows the trie. Dropping it at any point (including
//! during a panic unwinding out of a consumer) leaves nothing to restore.

use std::iter::FusedIterator;

use crate::bucket::Bucket;
use crate::node::{Container, Node};
use crate::traverse;

enum Frame<'a, V> {
    Container {
        node: &'a Container<V>,
        depth: usize,
        /// 0: own value not yet visited; otherwise the next child slot + 1.
        next: usize,
    },
    Bucket {
        bucket: &'a Bucket<V>,
        depth: usize,
        order: Order,
    },
}

enum Order {
    Sequential(usize),
    Indexed(std::vec::IntoIter<usize>),
}

enum Step<'a, V> {
    Yield {
        depth: usize,
        suffix: &'a [u8],
        value: &'a V,
    },
    Descend {
        depth: usize,
        byte: u8,
        child: &'a Node<V>,
    },
    Pop,
}

/// Iterator over `(key, value)` pairs. See [`Trie::iter`](crate::Trie::iter).
pub struct Iter<'a, V> {
    stack: Vec<Frame<'a, V>>,
    /// Key of the entry last yielded; frames truncate it to their depth.
    key: Vec<u8>,
    sorted: bool,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(root: &'a Node<V>, sorted: bool) -> Self {
        let mut iter = Self {
            stack: Vec::with_capacity(16),
            key: Vec::new(),
            sorted,
        };
        iter.push(root, 0);
        iter
    }

    /// Entries whose key starts with `prefix`.
    pub(crate) fn with_prefix(root: &'a Node<V>, prefix: &[u8], sorted: bool) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            key: Vec::new(),
            sorted,
        };
        let Some((node, depth)) = traverse::descend(root, prefix) else {
            return iter;
        };
        iter.key.extend_from_slice(&prefix[..depth]);
        match node {
            Node::Container(_) => iter.push(node, depth),
            Node::Bucket(bucket) => {
                // Stopped early: the rest of the prefix filters the bucket.
                let order = bucket.matching_order(&prefix[depth..], sorted);
                iter.stack.push(Frame::Bucket {
                    bucket,
                    depth,
                    order: Order::Indexed(order.into_iter()),
                });
            }
        }
        iter
    }

    fn push(&mut self, node: &'a Node<V>, depth: usize) {
        let frame = match node {
            Node::Container(container) => Frame::Container {
                node: container,
                depth,
                next: 0,
            },
            Node::Bucket(bucket) if self.sorted => Frame::Bucket {
                bucket,
                depth,
                order: Order::Indexed(bucket.matching_order(&[], true).into_iter()),
            },
            Node::Bucket(bucket) => Frame::Bucket {
                bucket,
                depth,
                order: Order::Sequential(0),
            },
        };
        self.stack.push(frame);
    }

    fn step(&mut self) -> Option<Step<'a, V>> {
        let step = match self.stack.last_mut()? {
            Frame::Container { node, depth, next } => {
                let node: &'a Container<V> = *node;
                if *next == 0 {
                    *next = 1;
                    if let Some(value) = &node.value {
                        return Some(Step::Yield {
                            depth: *depth,
                            suffix: &[],
                            value,
                        });
                    }
                }
                match node.next_child(*next - 1) {
                    Some((byte, child)) => {
                        *next = byte as usize + 2;
                        Step::Descend {
                            depth: *depth,
                            byte,
                            child,
                        }
                    }
                    None => Step::Pop,
                }
            }
            Frame::Bucket {
                bucket,
                depth,
                order,
            } => {
                let bucket: &'a Bucket<V> = *bucket;
                let idx = match order {
                    Order::Sequential(i) if *i < bucket.len() => {
                        *i += 1;
                        Some(*i - 1)
                    }
                    Order::Sequential(_) => None,
                    Order::Indexed(it) => it.next(),
                };
                match idx {
                    Some(idx) => {
                        let (suffix, value) = bucket.entry(idx);
                        Step::Yield {
                            depth: *depth,
                            suffix,
                            value,
                        }
                    }
                    None => Step::Pop,
                }
            }
        };
        Some(step)
    }

    /// Move to the next entry. On success its full key is in `self.key`.
    pub(crate) fn advance(&mut self) -> Option<&'a V> {
        loop {
            match self.step()? {
                Step::Yield {
                    depth,
                    suffix,
                    value,
                } => {
                    self.key.truncate(depth);
                    self.key.extend_from_slice(suffix);
                    return Some(value);
                }
                Step::Descend { depth, byte, child } => {
                    self.key.truncate(depth);
                    self.key.push(byte);
                    self.push(child, depth + 1);
                }
                Step::Pop => {
                    self.stack.pop();
                }
            }
        }
    }

    /// Feed up to `limit` entries to `f` without allocating a key per entry.
    /// The first `Err` stops the walk and is returned.
    pub(crate) fn try_visit<E, F>(mut self, limit: Option<usize>, mut f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &'a V) -> Result<(), E>,
    {
        let mut remaining = limit.unwrap_or(usize::MAX);
        while remaining > 0 {
            let Some(value) = self.advance() else {
                break;
            };
            f(&self.key, value)?;
            remaining -= 1;
        }
        Ok(())
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.advance()?;
        Some((self.key.clone(), value))
    }
}

impl<V> FusedIterator for Iter<'_, V> {}
