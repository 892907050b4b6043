//! Burst controller: replaces an overfull bucket with a container whose
//! children partition the bucket's entries by their first suffix byte.

use crate::bucket::{Bucket, Suffix};
use crate::node::{Container, Node};

/// Burst `node` if it is a bucket holding more than `threshold` entries.
///
/// Bytes shared by every suffix become a chain of single-child containers,
/// built in one pass, so a long common prefix costs one copy per entry.
/// Child buckets that are still overfull are burst in turn, so on return no
/// bucket below `node` exceeds the threshold. `depth` is the number of key
/// bytes consumed above `node`.
pub(crate) fn burst_if_overfull<V>(node: &mut Node<V>, threshold: usize, depth: usize) {
    let mut pending: Vec<(&mut Node<V>, usize)> = vec![(node, depth)];
    while let Some((node, depth)) = pending.pop() {
        let Node::Bucket(bucket) = node else {
            continue;
        };
        if bucket.len() <= threshold {
            continue;
        }
        let entries = bucket.len();
        let (shared, container) = split(std::mem::take(bucket));
        tracing::debug!(
            entries,
            depth,
            chain = shared.len(),
            fanout = container.occupied(),
            "bucket burst"
        );

        let mut slot = node;
        for &byte in shared.iter() {
            *slot = Node::Container(Box::new(Container::new()));
            slot = match slot {
                Node::Container(link) => link.child_or_insert(byte),
                Node::Bucket(_) => unreachable!("slot was just replaced by a container"),
            };
        }
        *slot = Node::Container(Box::new(container));
        if let Node::Container(branching) = slot {
            let below = depth + shared.len() + 1;
            pending.extend(branching.children_mut().map(|child| (child, below)));
        }
    }
}

/// Strip the bytes every suffix shares and redistribute the entries one
/// level below them. The entry with nothing left becomes the container's own
/// value. Returns the stripped bytes with the branching container.
fn split<V>(bucket: Bucket<V>) -> (Suffix, Container<V>) {
    let shared = Suffix::from_slice(bucket.shared_prefix());
    let mut container = Container::new();
    for (suffix, value) in bucket.into_entries() {
        match suffix[shared.len()..].split_first() {
            None => container.value = Some(value),
            Some((&byte, rest)) => match container.child_or_insert(byte) {
                Node::Bucket(child) => child.push(Suffix::from_slice(rest), value),
                Node::Container(_) => unreachable!("fresh container only holds buckets"),
            },
        }
    }
    (shared, container)
}
