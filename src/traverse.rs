//! Descent primitives shared by lookup, insertion, deletion, prefix search
//! and the change-all mutator.
//!
//! A descent consumes one key byte per container and stops at the first
//! bucket, or at a container once the key is exhausted.

use crate::burst;
use crate::node::Node;

/// Walk `key` from `node`. Returns the node where the walk stopped and the
/// number of key bytes consumed, or `None` if a container has no child for
/// the next byte.
pub(crate) fn descend<'a, V>(mut node: &'a Node<V>, key: &[u8]) -> Option<(&'a Node<V>, usize)> {
    let mut depth = 0;
    loop {
        match node {
            Node::Container(container) if depth < key.len() => {
                node = container.child(key[depth])?;
                depth += 1;
            }
            _ => return Some((node, depth)),
        }
    }
}

pub(crate) fn descend_mut<'a, V>(
    mut node: &'a mut Node<V>,
    key: &[u8],
) -> Option<(&'a mut Node<V>, usize)> {
    let mut depth = 0;
    loop {
        if depth == key.len() {
            return Some((node, depth));
        }
        match node {
            Node::Bucket(_) => return Some((node, depth)),
            Node::Container(container) => {
                node = container.child_mut(key[depth])?;
                depth += 1;
            }
        }
    }
}

pub(crate) fn lookup<'a, V>(root: &'a Node<V>, key: &[u8]) -> Option<&'a V> {
    match descend(root, key)? {
        (Node::Container(container), _) => container.value.as_ref(),
        (Node::Bucket(bucket), depth) => bucket.get(&key[depth..]),
    }
}

pub(crate) fn lookup_mut<'a, V>(root: &'a mut Node<V>, key: &[u8]) -> Option<&'a mut V> {
    match descend_mut(root, key)? {
        (Node::Container(container), _) => container.value.as_mut(),
        (Node::Bucket(bucket), depth) => bucket.get_mut(&key[depth..]),
    }
}

/// Insert or overwrite, creating buckets along the way and bursting the
/// target bucket if it grew past `threshold`. Returns the replaced value.
pub(crate) fn insert<V>(root: &mut Node<V>, key: &[u8], value: V, threshold: usize) -> Option<V> {
    let mut node = root;
    let mut depth = 0;
    loop {
        match node {
            Node::Container(container) => {
                let Some(&byte) = key.get(depth) else {
                    return container.value.replace(value);
                };
                node = container.child_or_insert(byte);
                depth += 1;
            }
            Node::Bucket(bucket) => {
                let old = bucket.insert(&key[depth..], value);
                if old.is_none() && bucket.len() > threshold {
                    burst::burst_if_overfull(node, threshold, depth);
                }
                return old;
            }
        }
    }
}

/// Remove `key`. Emptied buckets stay in place.
pub(crate) fn remove<V>(root: &mut Node<V>, key: &[u8]) -> Option<V> {
    match descend_mut(root, key)? {
        (Node::Container(container), _) => container.value.take(),
        (Node::Bucket(bucket), depth) => bucket.remove(&key[depth..]),
    }
}
