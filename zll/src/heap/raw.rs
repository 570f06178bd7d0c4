// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Linkage engine of the skew heap.
//!
//! These functions work on trees of [`ShHeader`]s, with or without an [`ShHeap`] owning them.
//! Every function that orders nodes takes the comparator to use as an argument, so a bare tree can
//! be ordered by anything implementing [`Compare`], including closures.
//! The comparator must be the same for all operations on one tree.
//!
//! Except for [`detached`], all functions are `unsafe`, because the compiler cannot verify that
//! every header reachable through the links is still alive and embedded in a record of type `E`.
//!
//! [`ShHeap`]: super::ShHeap

use core::ptr::{self, NonNull};

use super::header::{ShHeader, ShLink};
use super::traits::SkewHeap;
use crate::link::Link;
use crate::traits::{Compare, LinkElement, TypedLink};

fn is_slot<T>(slot: Option<NonNull<T>>, node: &T) -> bool {
    slot.map_or(false, |ptr| ptr::eq(ptr.as_ptr(), node))
}

/// Takes the left child of `node`, leaving the child without a parent.
unsafe fn detach_left<'a, E, L, C>(node: &ShHeader<E, L, C>) -> Option<&'a ShHeader<E, L, C>>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    let child = node.left_node()?;
    node.left.set(None);
    child.parent.set(Link::Empty);
    Some(child)
}

/// Takes the right child of `node`, leaving the child without a parent.
unsafe fn detach_right<'a, E, L, C>(node: &ShHeader<E, L, C>) -> Option<&'a ShHeader<E, L, C>>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    let child = node.right_node()?;
    node.right.set(None);
    child.parent.set(Link::Empty);
    Some(child)
}

fn attach_left<E, L, C>(node: &ShHeader<E, L, C>, child: Option<&ShHeader<E, L, C>>)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    node.left.set(child.map(NonNull::from));
    if let Some(child) = child {
        child.parent.set(node.as_link());
    }
}

fn attach_right<E, L, C>(node: &ShHeader<E, L, C>, child: Option<&ShHeader<E, L, C>>)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    node.right.set(child.map(NonNull::from));
    if let Some(child) = child {
        child.parent.set(node.as_link());
    }
}

/// Puts `new` into the slot `old` occupies below `parent`.
///
/// If `parent` is the owning heap, `new` becomes its top.
/// `old` keeps its own parent link.
unsafe fn replace_in_parent<E, L, C>(
    parent: ShLink<E, L, C>,
    old: &ShHeader<E, L, C>,
    new: Option<&ShHeader<E, L, C>>,
) where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    let new_ptr = new.map(NonNull::from);

    match parent {
        Link::Empty => (),
        Link::Node(node) => {
            let node = node.as_ref();

            if is_slot(node.left.get(), old) {
                node.left.set(new_ptr);
            } else if is_slot(node.right.get(), old) {
                node.right.set(new_ptr);
            }
        }
        Link::Container(heap) => heap.as_ref().top.set(new_ptr),
    }

    if let Some(new) = new {
        new.parent.set(parent);
    }
}

/// Detaches both children of `node` and returns them melded into one tree.
unsafe fn pop_children<'a, E, L, C, K>(
    node: &ShHeader<E, L, C>,
    comp: &K,
) -> Option<&'a ShHeader<E, L, C>>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    K: Compare<E> + ?Sized,
{
    match (detach_left(node), detach_right(node)) {
        (Some(left), Some(right)) => Some(meld(left, right, comp)),
        (Some(child), None) | (None, Some(child)) => Some(child),
        (None, None) => None,
    }
}

/// Returns `true` if `node` is not a member of any tree.
pub fn detached<E, L, C>(node: &ShHeader<E, L, C>) -> bool
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    node.left.get().is_none() && node.right.get().is_none() && node.parent.get().is_empty()
}

/// Melds the trees rooted at `lhs` and `rhs` into one and returns its root.
///
/// Both roots must be free of a parent.
/// If neither root is less than the other, `lhs` becomes the root.
///
/// The merge walks down the right spines of both trees.
/// Every node on the way gets the smaller of its right child and the remaining tree as its new
/// left child and its former left child as its new right child.
///
/// This operation computes in *O*(log *n*) amortized time.
pub unsafe fn meld<'a, E, L, C, K>(
    lhs: &'a ShHeader<E, L, C>,
    rhs: &'a ShHeader<E, L, C>,
    comp: &K,
) -> &'a ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    K: Compare<E> + ?Sized,
{
    zll_assert!(lhs.parent.get().is_empty() && rhs.parent.get().is_empty());

    if ptr::eq(lhs, rhs) {
        return lhs;
    }

    let (root, mut other) = if comp.less(rhs.containing_record(), lhs.containing_record()) {
        (rhs, lhs)
    } else {
        (lhs, rhs)
    };

    let mut current = root;

    loop {
        let old_left = detach_left(current);

        match detach_right(current) {
            None => {
                attach_left(current, Some(other));
                attach_right(current, old_left);
                return root;
            }
            Some(right) => {
                let (winner, loser) =
                    if comp.less(other.containing_record(), right.containing_record()) {
                        (other, right)
                    } else {
                        (right, other)
                    };

                attach_left(current, Some(winner));
                attach_right(current, old_left);
                current = winner;
                other = loser;
            }
        }
    }
}

/// Removes `node` from its tree and puts its melded children into its former place.
///
/// A leaf just clears the slot of its parent.
/// If `node` is the top of an [`ShHeap`], the melded children become the new top.
/// Detaching an already detached node does nothing.
///
/// [`ShHeap`]: super::ShHeap
pub unsafe fn detach<E, L, C, K>(node: &ShHeader<E, L, C>, comp: &K)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    K: Compare<E> + ?Sized,
{
    let parent = node.parent.replace(Link::Empty);
    let replacement = pop_children(node, comp);
    replace_in_parent(parent, node, replacement);
}

/// Melds the detached `node` into the subtree rooted at `root` and puts the combined subtree into
/// the former place of `root`.
///
/// If `root` is not the top of its tree, `node` must not be less than the parent of `root`,
/// otherwise the heap order breaks. [`top_node_of`] finds the top.
/// If `root` is the top of an [`ShHeap`], the heap's top is updated.
///
/// [`ShHeap`]: super::ShHeap
pub unsafe fn link_detached<E, L, C, K>(
    root: &ShHeader<E, L, C>,
    node: &ShHeader<E, L, C>,
    comp: &K,
) where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    K: Compare<E> + ?Sized,
{
    zll_assert!(detached(node));

    let parent = root.parent.replace(Link::Empty);
    let new_root = meld(root, node, comp);
    replace_in_parent(parent, root, Some(new_root));
}

/// Links the detached `copy` into the tree of `node`, as if it were an equal sibling of `node`.
///
/// `copy` must compare equal to `node`.
/// It is melded with the right subtree of `node`, which keeps the heap order.
pub unsafe fn link_detached_copy_of<E, L, C, K>(
    node: &ShHeader<E, L, C>,
    copy: &ShHeader<E, L, C>,
    comp: &K,
) where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    K: Compare<E> + ?Sized,
{
    zll_assert!(detached(copy));

    let subtree = match detach_right(node) {
        Some(right) => meld(right, copy, comp),
        None => copy,
    };

    attach_right(node, Some(subtree));
}

/// Puts the detached `to` into the position of `from`, leaving `from` detached.
pub unsafe fn move_from_to<E, L, C>(from: &ShHeader<E, L, C>, to: &ShHeader<E, L, C>)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    if ptr::eq(from, to) {
        return;
    }

    zll_assert!(detached(to));

    attach_left(to, detach_left(from));
    attach_right(to, detach_right(from));

    let parent = from.parent.replace(Link::Empty);
    replace_in_parent(parent, from, Some(to));
}

/// Returns the root of the tree containing `node`.
///
/// This operation computes in *O*(*h*) time, where *h* is the depth of `node`.
pub unsafe fn top_node_of<'a, E, L, C>(node: &'a ShHeader<E, L, C>) -> &'a ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    let mut current = node;

    while let Some(parent) = current.parent_node() {
        current = parent;
    }

    current
}

/// Returns the leftmost node of the subtree rooted at `node`.
fn leftmost<'a, E, L, C>(node: &'a ShHeader<E, L, C>) -> &'a ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    let mut current = node;

    while let Some(left) = current.left_node() {
        current = left;
    }

    current
}

/// Returns the first node of a post-order walk through the subtree rooted at `node`.
fn first_postorder<'a, E, L, C>(node: &'a ShHeader<E, L, C>) -> &'a ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    let mut current = node;

    loop {
        if let Some(left) = current.left_node() {
            current = left;
        } else if let Some(right) = current.right_node() {
            current = right;
        } else {
            return current;
        }
    }
}

fn is_left_child<E, L, C>(parent: &ShHeader<E, L, C>, node: &ShHeader<E, L, C>) -> bool
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    is_slot(parent.left.get(), node)
}

/// Calls `f` for every node of the subtree rooted at `root`, visiting each node before its left
/// and right subtrees.
///
/// The walk follows the parent links and never leaves the subtree.
pub unsafe fn preorder_traverse<E, L, C, F>(root: &ShHeader<E, L, C>, mut f: F)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    F: FnMut(&E),
{
    let mut current = root;

    loop {
        f(current.containing_record());

        if let Some(left) = current.left_node() {
            current = left;
            continue;
        }
        if let Some(right) = current.right_node() {
            current = right;
            continue;
        }

        // Climb until we come up from a left subtree that has a right sibling.
        loop {
            if ptr::eq(current, root) {
                return;
            }

            let parent = match current.parent_node() {
                Some(parent) => parent,
                None => return,
            };

            if is_left_child(parent, current) {
                if let Some(right) = parent.right_node() {
                    current = right;
                    break;
                }
            }

            current = parent;
        }
    }
}

/// Calls `f` for every node of the subtree rooted at `root`, visiting the left subtree of each
/// node before the node and the node before its right subtree.
pub unsafe fn inorder_traverse<E, L, C, F>(root: &ShHeader<E, L, C>, mut f: F)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    F: FnMut(&E),
{
    let mut current = leftmost(root);

    loop {
        f(current.containing_record());

        if let Some(right) = current.right_node() {
            current = leftmost(right);
            continue;
        }

        // Climb until we come up from a left subtree.
        loop {
            if ptr::eq(current, root) {
                return;
            }

            let parent = match current.parent_node() {
                Some(parent) => parent,
                None => return,
            };

            let from_left = is_left_child(parent, current);
            current = parent;

            if from_left {
                break;
            }
        }
    }
}

/// Calls `f` for every node of the subtree rooted at `root`, visiting the left and right subtrees
/// of each node before the node itself.
pub unsafe fn postorder_traverse<E, L, C, F>(root: &ShHeader<E, L, C>, mut f: F)
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
    F: FnMut(&E),
{
    let mut current = first_postorder(root);

    loop {
        f(current.containing_record());

        if ptr::eq(current, root) {
            return;
        }

        let parent = match current.parent_node() {
            Some(parent) => parent,
            None => return,
        };

        current = match parent.right_node() {
            Some(right) if is_left_child(parent, current) => first_postorder(right),
            _ => parent,
        };
    }
}
