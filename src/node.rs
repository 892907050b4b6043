//! Trie nodes.
//!
//! - `Container`: 256 byte-indexed child slots plus a slot for the key that
//!   ends exactly at this depth
//! - `Bucket`: see [`crate::bucket`]
//!
//! A container exclusively owns its children; there are no parent links.
//! A long shared key prefix becomes one container per byte, so dropping and
//! cloning walk the tree with an explicit stack instead of recursing.

use crate::bucket::Bucket;

pub(crate) const FANOUT: usize = 256;

pub(crate) enum Node<V> {
    Container(Box<Container<V>>),
    Bucket(Bucket<V>),
}

impl<V> Node<V> {
    #[inline]
    pub(crate) fn empty() -> Self {
        Node::Bucket(Bucket::new())
    }
}

pub(crate) struct Container<V> {
    children: [Option<Node<V>>; FANOUT],
    /// Value of the key whose bytes end at this container.
    pub(crate) value: Option<V>,
    occupied: u16,
}

impl<V> Container<V> {
    pub(crate) fn new() -> Self {
        Self {
            children: std::array::from_fn(|_| None),
            value: None,
            occupied: 0,
        }
    }

    #[inline]
    pub(crate) fn child(&self, byte: u8) -> Option<&Node<V>> {
        self.children[byte as usize].as_ref()
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, byte: u8) -> Option<&mut Node<V>> {
        self.children[byte as usize].as_mut()
    }

    /// The child under `byte`, creating an empty bucket if there is none.
    pub(crate) fn child_or_insert(&mut self, byte: u8) -> &mut Node<V> {
        let slot = &mut self.children[byte as usize];
        if slot.is_none() {
            self.occupied += 1;
        }
        slot.get_or_insert_with(Node::empty)
    }

    /// First occupied slot at or after `from`.
    pub(crate) fn next_child(&self, from: usize) -> Option<(u8, &Node<V>)> {
        self.children
            .get(from..)?
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.as_ref().map(|c| ((from + i) as u8, c)))
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = (u8, &Node<V>)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i as u8, c)))
    }

    /// Install `node` under `byte`, which must be empty.
    fn set_child(&mut self, byte: u8, node: Node<V>) {
        let slot = &mut self.children[byte as usize];
        debug_assert!(slot.is_none());
        *slot = Some(node);
        self.occupied += 1;
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Node<V>> {
        self.children.iter_mut().flatten()
    }

    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        self.occupied as usize
    }
}

impl<V> Drop for Container<V> {
    fn drop(&mut self) {
        let mut stack: Vec<Node<V>> = self.children.iter_mut().filter_map(Option::take).collect();
        while let Some(node) = stack.pop() {
            if let Node::Container(mut container) = node {
                stack.extend(container.children.iter_mut().filter_map(Option::take));
            }
        }
    }
}

struct CloneFrame<'a, V> {
    src: &'a Container<V>,
    dst: Box<Container<V>>,
    /// Next child slot of `src` to copy.
    next: usize,
}

impl<'a, V: Clone> CloneFrame<'a, V> {
    fn new(src: &'a Container<V>) -> Self {
        let mut dst = Box::new(Container::new());
        dst.value = src.value.clone();
        Self { src, dst, next: 0 }
    }
}

impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        let root = match self {
            Node::Bucket(bucket) => return Node::Bucket(bucket.clone()),
            Node::Container(container) => container,
        };
        let mut stack = vec![CloneFrame::new(root)];
        while let Some(top) = stack.last_mut() {
            let src = top.src;
            match src.next_child(top.next) {
                Some((byte, Node::Bucket(bucket))) => {
                    top.next = byte as usize + 1;
                    top.dst.set_child(byte, Node::Bucket(bucket.clone()));
                }
                Some((byte, Node::Container(child))) => {
                    top.next = byte as usize + 1;
                    stack.push(CloneFrame::new(child));
                }
                None => {
                    let Some(done) = stack.pop() else { break };
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.dst.set_child((parent.next - 1) as u8, Node::Container(done.dst))
                        }
                        None => return Node::Container(done.dst),
                    }
                }
            }
        }
        unreachable!("the root frame returns once its children are copied")
    }
}
