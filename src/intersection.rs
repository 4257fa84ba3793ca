use alloc::rc::Rc;
use alloc::string::String;
use core::fmt::Write;
use core::hash::BuildHasher;
use core::iter::FusedIterator;

use log::debug;

use crate::ByAddress;
use crate::ChainHash;

/// A link to the next node, or `None` at the end of a list.
pub type Link = Option<Rc<ListNode>>;

/// A node of a singly linked list.
///
/// Nodes are reference counted so several lists can share a tail.
#[derive(Debug)]
pub struct ListNode {
    /// The value carried by this node.
    pub val: i32,
    /// The rest of the list.
    pub next: Link,
}

impl ListNode {
    /// Creates a node with no successor.
    pub fn new(val: i32) -> Self {
        Self { val, next: None }
    }
}

impl Drop for ListNode {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                // The rest of the list is still reachable from another head.
                Err(_) => break,
            }
        }
    }
}

/// An iterator over the nodes of a list, head first.
///
/// This struct is created by [`nodes`].
#[derive(Clone)]
pub struct Nodes<'a> {
    next: Option<&'a Rc<ListNode>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Rc<ListNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_ref();
        Some(node)
    }
}

impl FusedIterator for Nodes<'_> {}

/// Returns an iterator over the nodes reachable from `head`.
pub fn nodes(head: &Link) -> Nodes<'_> {
    Nodes {
        next: head.as_ref(),
    }
}

/// Builds a list holding `values` in order.
///
/// # Examples
///
/// ```rust
/// use chain_hash::intersection::create_list;
/// use chain_hash::intersection::nodes;
///
/// let list = create_list(&[4, 1, 8]);
/// assert_eq!(nodes(&list).map(|n| n.val).collect::<Vec<_>>(), [4, 1, 8]);
/// assert!(create_list(&[]).is_none());
/// ```
pub fn create_list(values: &[i32]) -> Link {
    prepend(values, None)
}

fn prepend(values: &[i32], tail: Link) -> Link {
    values
        .iter()
        .rev()
        .fold(tail, |next, &val| Some(Rc::new(ListNode { val, next })))
}

/// Returns the first node of `head` carrying `value`.
pub fn find_node(head: &Link, value: i32) -> Link {
    nodes(head).find(|node| node.val == value).cloned()
}

/// Builds list `b` so that it joins `a` at the first node of `a` carrying
/// `intersect_val`.
///
/// The values of `b` up to its first `intersect_val` become a fresh prefix and
/// the rest of `b` is replaced by the shared node of `a`. If either list lacks
/// `intersect_val`, `b` is built on its own and shares nothing with `a`.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
///
/// use chain_hash::intersection::connect_lists;
/// use chain_hash::intersection::create_list;
/// use chain_hash::intersection::find_node;
/// use chain_hash::intersection::nodes;
///
/// let a = create_list(&[4, 1, 8, 4, 5]);
/// let b = connect_lists(&a, &[5, 6, 1, 8, 4, 5], 8);
///
/// let shared = find_node(&a, 8).unwrap();
/// assert!(nodes(&b).any(|node| Rc::ptr_eq(node, &shared)));
/// ```
pub fn connect_lists(a: &Link, b: &[i32], intersect_val: i32) -> Link {
    let shared = find_node(a, intersect_val);
    let split = b.iter().position(|&val| val == intersect_val);

    match (shared, split) {
        (Some(shared), Some(split)) => prepend(&b[..split], Some(shared)),
        _ => create_list(b),
    }
}

/// Renders at most `max_nodes` values of a list as `[1 -> 2 -> 3]`, ending
/// with ` -> ...` when the list goes on.
///
/// # Examples
///
/// ```rust
/// use chain_hash::intersection::create_list;
/// use chain_hash::intersection::render_list;
///
/// let list = create_list(&[1, 2, 3]);
/// assert_eq!(render_list(&list, 10), "[1 -> 2 -> 3]");
/// assert_eq!(render_list(&list, 2), "[1 -> 2 -> ...]");
/// ```
pub fn render_list(head: &Link, max_nodes: usize) -> String {
    let mut out = String::from("[");
    let mut rest = nodes(head);

    for (count, node) in rest.by_ref().take(max_nodes).enumerate() {
        let _ = write!(out, "{}", node.val);
        if node.next.is_some() && count + 1 < max_nodes {
            out.push_str(" -> ");
        }
    }
    if rest.next().is_some() {
        out.push_str(" -> ...");
    }

    out.push(']');
    out
}

/// Returns the first node of `b` that is also a node of `a`, comparing nodes
/// by identity rather than by value.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use chain_hash::intersection::create_list;
/// use chain_hash::intersection::intersection_node;
///
/// // Equal values, but no node in common.
/// let a = create_list(&[1, 2, 3]);
/// let b = create_list(&[1, 2, 3]);
/// assert!(intersection_node(&a, &b).is_none());
/// # }
/// ```
#[cfg(any(feature = "std", feature = "foldhash"))]
pub fn intersection_node(a: &Link, b: &Link) -> Link {
    intersection_node_with_hasher(a, b, crate::DefaultHashBuilder::default())
}

/// Like [`intersection_node`], hashing node addresses with `hash_builder`.
pub fn intersection_node_with_hasher<S>(a: &Link, b: &Link, hash_builder: S) -> Link
where
    S: BuildHasher,
{
    let mut visited = ChainHash::with_hasher(hash_builder);
    for node in nodes(a) {
        visited.set(ByAddress(&**node), ());
    }

    for node in nodes(b) {
        if visited.contains(&ByAddress(&**node)) {
            debug!("lists meet at node {:p} ({})", Rc::as_ptr(node), node.val);
            return Some(Rc::clone(node));
        }
    }

    None
}
