// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Linkage engine of the doubly linked list.
//!
//! These functions work on chains of [`LlHeader`]s, with or without an [`LlList`] owning them.
//! A *range* is a contiguous run of headers given by its first and last member, where `last`
//! is reachable from `first` by following `next` links.
//!
//! All functions are `unsafe`, because the compiler cannot verify that every header reachable
//! through the links is still alive and embedded in a record of type `E`.
//! Callers must uphold that for every header they pass in and every header linked to one.
//!
//! [`LlList`]: super::LlList

use core::ptr;

use super::header::{LlHeader, LlLink};
use super::traits::LinkedList;
use crate::link::Link;
use crate::traits::{LinkElement, TypedLink};

/// Sets the forward link of whatever `link` refers to.
///
/// For the owning list, this is the first node.
unsafe fn set_next<E, L>(link: LlLink<E, L>, value: LlLink<E, L>) {
    match link {
        Link::Empty => (),
        Link::Node(node) => node.as_ref().next.set(value),
        Link::Container(list) => list.as_ref().first.set(value.as_node()),
    }
}

/// Sets the backward link of whatever `link` refers to.
///
/// For the owning list, this is the last node.
unsafe fn set_prev<E, L>(link: LlLink<E, L>, value: LlLink<E, L>) {
    match link {
        Link::Empty => (),
        Link::Node(node) => node.as_ref().prev.set(value),
        Link::Container(list) => list.as_ref().last.set(value.as_node()),
    }
}

/// Links the detached range `[first, last]` in between `prev` and `next`.
pub(crate) unsafe fn splice<E, L>(
    prev: LlLink<E, L>,
    next: LlLink<E, L>,
    first: &LlHeader<E, L>,
    last: &LlHeader<E, L>,
) {
    first.prev.set(prev);
    last.next.set(next);
    set_next(prev, first.as_link());
    set_prev(next, last.as_link());
}

/// Returns `true` if `node` is not a member of any chain.
pub fn detached<E, L>(node: &LlHeader<E, L>) -> bool {
    node.next.get().is_empty() && node.prev.get().is_empty()
}

/// Returns `true` if the range `[first, last]` forms a chain of its own.
pub fn detached_range<E, L>(first: &LlHeader<E, L>, last: &LlHeader<E, L>) -> bool {
    first.prev.get().is_empty() && last.next.get().is_empty()
}

/// Removes `node` from its chain and links its former neighbors to each other.
///
/// Detaching an already detached node does nothing.
pub unsafe fn detach<E, L>(node: &LlHeader<E, L>) {
    let next = node.next.replace(Link::Empty);
    let prev = node.prev.replace(Link::Empty);
    set_prev(next, prev);
    set_next(prev, next);
}

/// Removes the range `[first, last]` from its chain and links the former neighbors of the range to
/// each other.
///
/// Afterwards, the range is a chain of its own.
pub unsafe fn detach_range<E, L>(first: &LlHeader<E, L>, last: &LlHeader<E, L>) {
    let before = first.prev.replace(Link::Empty);
    let after = last.next.replace(Link::Empty);
    set_next(before, after);
    set_prev(after, before);
}

/// Puts the detached `to` into the position of `from`, leaving `from` detached.
pub unsafe fn move_from_to<E, L>(from: &LlHeader<E, L>, to: &LlHeader<E, L>) {
    if ptr::eq(from, to) {
        return;
    }

    zll_assert!(detached(to));

    let next = from.next.replace(Link::Empty);
    let prev = from.prev.replace(Link::Empty);
    to.next.set(next);
    to.prev.set(prev);
    set_prev(next, to.as_link());
    set_next(prev, to.as_link());
}

/// Links the detached `node` right after `anchor`.
pub unsafe fn link_detached_as_next<E, L>(anchor: &LlHeader<E, L>, node: &LlHeader<E, L>) {
    zll_assert!(detached(node));
    splice(anchor.as_link(), anchor.next.get(), node, node);
}

/// Links the detached `node` right before `anchor`.
pub unsafe fn link_detached_as_prev<E, L>(anchor: &LlHeader<E, L>, node: &LlHeader<E, L>) {
    zll_assert!(detached(node));
    splice(anchor.prev.get(), anchor.as_link(), node, node);
}

/// Links the detached `node` after the last node of the chain containing `member`.
///
/// This operation computes in *O*(*n*) time.
pub unsafe fn link_detached_as_last<E, L>(member: &LlHeader<E, L>, node: &LlHeader<E, L>) {
    link_detached_as_next(last_node_of(member), node);
}

/// Links the detached `node` before the first node of the chain containing `member`.
///
/// This operation computes in *O*(*n*) time.
pub unsafe fn link_detached_as_first<E, L>(member: &LlHeader<E, L>, node: &LlHeader<E, L>) {
    link_detached_as_prev(first_node_of(member), node);
}

/// Links the detached range `[first, last]` right after `anchor`.
pub unsafe fn link_range_as_next<E, L>(
    anchor: &LlHeader<E, L>,
    first: &LlHeader<E, L>,
    last: &LlHeader<E, L>,
) {
    zll_assert!(detached_range(first, last));
    splice(anchor.as_link(), anchor.next.get(), first, last);
}

/// Links the detached range `[first, last]` right before `anchor`.
pub unsafe fn link_range_as_prev<E, L>(
    anchor: &LlHeader<E, L>,
    first: &LlHeader<E, L>,
    last: &LlHeader<E, L>,
) {
    zll_assert!(detached_range(first, last));
    splice(anchor.prev.get(), anchor.as_link(), first, last);
}

/// Links the given nodes into a chain in iteration order.
///
/// The first node may already be a member of a chain, the following ones are linked after it.
/// All other nodes must be detached.
pub unsafe fn link_group<'a, E: 'a, L: 'a, I>(nodes: I)
where
    I: IntoIterator<Item = &'a LlHeader<E, L>>,
{
    let mut nodes = nodes.into_iter();
    let mut anchor = match nodes.next() {
        Some(node) => node,
        None => return,
    };

    for node in nodes {
        link_detached_as_next(anchor, node);
        anchor = node;
    }
}

/// Returns the first node of the chain containing `node`.
///
/// This operation computes in *O*(*n*) time.
pub unsafe fn first_node_of<E, L>(node: &LlHeader<E, L>) -> &LlHeader<E, L> {
    let mut current = node;
    while let Some(prev) = current.prev_node() {
        current = prev;
    }

    current
}

/// Returns the last node of the chain containing `node`.
///
/// This operation computes in *O*(*n*) time.
pub unsafe fn last_node_of<E, L>(node: &LlHeader<E, L>) -> &LlHeader<E, L> {
    let mut current = node;
    while let Some(next) = current.next_node() {
        current = next;
    }

    current
}

/// Returns the node following `node` if `node` is not the end of the range.
unsafe fn next_in_range<'a, E, L>(
    node: &LlHeader<E, L>,
    last: &LlHeader<E, L>,
) -> Option<&'a LlHeader<E, L>> {
    if ptr::eq(node, last) {
        None
    } else {
        node.next_node()
    }
}

/// Merges the ranges `[lhs_first, lhs_last]` and `[rhs_first, rhs_last]`, which must both be sorted
/// with respect to `less`.
///
/// The merged range takes the place of the left-hand range, the right-hand range is removed from
/// its chain.
/// The merge is stable: of two equal elements, the one from the left-hand range comes first.
/// Returns the first and last node of the merged range.
///
/// This operation computes in *O*(*n* + *m*) time.
pub unsafe fn merge_ranges<'a, E, L, F>(
    lhs_first: &'a LlHeader<E, L>,
    lhs_last: &'a LlHeader<E, L>,
    rhs_first: &'a LlHeader<E, L>,
    rhs_last: &'a LlHeader<E, L>,
    mut less: F,
) -> (&'a LlHeader<E, L>, &'a LlHeader<E, L>)
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E, &E) -> bool,
{
    detach_range(rhs_first, rhs_last);

    let mut first = lhs_first;
    let mut lhs = Some(lhs_first);
    let mut rhs = Some(rhs_first);

    while let (Some(l), Some(r)) = (lhs, rhs) {
        if less(r.containing_record(), l.containing_record()) {
            // `r` belongs in front of `l`.
            // It is always the first node of what is left of the right-hand range.
            rhs = r.next_node();
            detach(r);
            link_detached_as_prev(l, r);

            if ptr::eq(l, first) {
                first = r;
            }
        } else {
            lhs = next_in_range(l, lhs_last);
        }
    }

    match rhs {
        Some(r) => {
            link_range_as_next(lhs_last, r, rhs_last);
            (first, rhs_last)
        }
        None => (first, lhs_last),
    }
}

/// Detaches every node of the range `[first, last]` for which `pred` returns `true`.
///
/// `pred` is called exactly once per node, in order.
/// Returns the number of detached nodes.
pub unsafe fn range_remove<E, L, F>(first: &LlHeader<E, L>, last: &LlHeader<E, L>, mut pred: F) -> usize
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E) -> bool,
{
    let mut count = 0;
    let mut current = Some(first);

    while let Some(node) = current {
        current = next_in_range(node, last);

        if pred(node.containing_record()) {
            detach(node);
            count += 1;
        }
    }

    count
}

/// Reverses the order of the range `[first, last]` in place.
///
/// Returns the new first and last node of the range, which are the former `last` and `first`.
pub unsafe fn range_reverse<'a, E, L>(
    first: &'a LlHeader<E, L>,
    last: &'a LlHeader<E, L>,
) -> (&'a LlHeader<E, L>, &'a LlHeader<E, L>) {
    // Move the predecessor of `last` behind the most recently moved node until `first` has moved.
    let mut anchor = last;

    while !ptr::eq(anchor, first) {
        let node = match last.prev_node() {
            Some(node) => node,
            None => break,
        };

        detach(node);
        link_detached_as_next(anchor, node);
        anchor = node;
    }

    (last, first)
}

/// Detaches every node of the range `[first, last]` for which `eq` returns `true` when called
/// with the closest preceding node that stays in the range and the node itself.
///
/// Only the first node of each group of consecutive equal nodes stays.
/// Returns the number of detached nodes.
pub unsafe fn range_unique<E, L, F>(first: &LlHeader<E, L>, last: &LlHeader<E, L>, mut eq: F) -> usize
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E, &E) -> bool,
{
    let mut count = 0;
    let mut kept = first;
    let mut current = next_in_range(first, last);

    while let Some(node) = current {
        current = next_in_range(node, last);

        if eq(kept.containing_record(), node.containing_record()) {
            detach(node);
            count += 1;
        } else {
            kept = node;
        }
    }

    count
}

/// A range that has been split at its first node.
struct Partition<'a, E, L> {
    /// First node, last node and length of the nodes that compared less than the pivot.
    lower: Option<(&'a LlHeader<E, L>, &'a LlHeader<E, L>, usize)>,
    pivot: &'a LlHeader<E, L>,
    /// First node, last node and length of the remaining nodes.
    upper: Option<(&'a LlHeader<E, L>, &'a LlHeader<E, L>, usize)>,
}

/// Moves every node of `[first, last]` that compares less than `first` right in front of `first`,
/// keeping the relative order of the moved nodes and of the remaining ones.
unsafe fn partition<'a, E, L, F>(
    first: &'a LlHeader<E, L>,
    last: &'a LlHeader<E, L>,
    less: &mut F,
) -> Partition<'a, E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E, &E) -> bool,
{
    let pivot = first;
    let pivot_record = pivot.containing_record();

    let mut lower_first = None;
    let mut lower_len = 0;
    let mut upper_last = None;
    let mut upper_len = 0;
    let mut current = next_in_range(pivot, last);

    while let Some(node) = current {
        current = next_in_range(node, last);

        if less(node.containing_record(), pivot_record) {
            detach(node);
            link_detached_as_prev(pivot, node);
            lower_first.get_or_insert(node);
            lower_len += 1;
        } else {
            upper_last = Some(node);
            upper_len += 1;
        }
    }

    Partition {
        lower: lower_first
            .zip(pivot.prev_node())
            .map(|(first, last)| (first, last, lower_len)),
        pivot,
        upper: pivot
            .next_node()
            .zip(upper_last)
            .map(|(first, last)| (first, last, upper_len)),
    }
}

unsafe fn qsort<'a, E, L, F>(
    mut first: &'a LlHeader<E, L>,
    mut last: &'a LlHeader<E, L>,
    less: &mut F,
) -> (&'a LlHeader<E, L>, &'a LlHeader<E, L>)
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E, &E) -> bool,
{
    // `first..last` is the part still to sort.
    // `leftmost` and `rightmost` tell whether it decides the bounds of the entire range.
    let mut sorted_first = first;
    let mut sorted_last = last;
    let mut leftmost = true;
    let mut rightmost = true;

    loop {
        if ptr::eq(first, last) {
            if leftmost {
                sorted_first = first;
            }
            if rightmost {
                sorted_last = last;
            }

            return (sorted_first, sorted_last);
        }

        let Partition {
            lower,
            pivot,
            upper,
        } = partition(first, last, less);

        if leftmost && lower.is_none() {
            sorted_first = pivot;
        }
        if rightmost && upper.is_none() {
            sorted_last = pivot;
        }

        // Recurse into the shorter partition and keep looping on the longer one.
        // This bounds the recursion depth to log2(n).
        let (next, next_leftmost, next_rightmost) = match (lower, upper) {
            (None, None) => return (sorted_first, sorted_last),
            (Some(lower), None) => (lower, leftmost, false),
            (None, Some(upper)) => (upper, false, rightmost),
            (Some(lower), Some(upper)) if lower.2 <= upper.2 => {
                let (lower_first, _) = qsort(lower.0, lower.1, less);
                if leftmost {
                    sorted_first = lower_first;
                }

                (upper, false, rightmost)
            }
            (Some(lower), Some(upper)) => {
                let (_, upper_last) = qsort(upper.0, upper.1, less);
                if rightmost {
                    sorted_last = upper_last;
                }

                (lower, leftmost, false)
            }
        };

        first = next.0;
        last = next.1;
        leftmost = next_leftmost;
        rightmost = next_rightmost;
    }
}

/// Sorts the range `[first, last]` with respect to `less` by partitioning it around its first node.
///
/// The sort is stable.
/// Returns the new first and last node of the range.
///
/// This operation computes in *O*(*n* log *n*) time on average and in *O*(*n*²) time when the range
/// is already sorted in either direction.
pub unsafe fn range_qsort<'a, E, L, F>(
    first: &'a LlHeader<E, L>,
    last: &'a LlHeader<E, L>,
    mut less: F,
) -> (&'a LlHeader<E, L>, &'a LlHeader<E, L>)
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E, &E) -> bool,
{
    qsort(first, last, &mut less)
}

/// Calls `f` for every node of the chain containing `node`: first for its predecessors from the
/// nearest to the farthest, then for `node` itself, then for its successors.
pub unsafe fn for_each_node<E, L, F>(node: &LlHeader<E, L>, mut f: F)
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E),
{
    find_if_node(node, |element| {
        f(element);
        false
    });
}

/// Returns the first node of the chain containing `node` for which `pred` returns `true`, visiting
/// the nodes in the same order as [`for_each_node`].
pub unsafe fn find_if_node<E, L, F>(node: &LlHeader<E, L>, mut pred: F) -> Option<&LlHeader<E, L>>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
    F: FnMut(&E) -> bool,
{
    let mut current = node.prev_node();
    while let Some(prev) = current {
        if pred(prev.containing_record()) {
            return Some(prev);
        }
        current = prev.prev_node();
    }

    if pred(node.containing_record()) {
        return Some(node);
    }

    let mut current = node.next_node();
    while let Some(next) = current {
        if pred(next.containing_record()) {
            return Some(next);
        }
        current = next.next_node();
    }

    None
}
