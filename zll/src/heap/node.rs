// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cmp::Ordering;
use core::fmt;
use core::mem::MaybeUninit;
use core::ops::Deref;
use core::pin::Pin;
use core::ptr;

use moveit::{new, MoveNew, MoveRef, New};

use super::base::ShHeap;
use super::header::ShHeader;
use super::raw;
use super::traits::{NodeHeap, SkewHeap};
use crate::traits::{Compare, LinkElement, Less, TypedLink};

/// Orders [`ShNode`]s by their values, using a comparator of type `C`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ByValue<C>(pub C);

impl<T, L, C> Compare<ShNode<T, L, C>> for ByValue<C>
where
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    fn less(&self, a: &ShNode<T, L, C>, b: &ShNode<T, L, C>) -> bool {
        self.0.less(&a.value, &b.value)
    }
}

/// A [`ShHeap`] of [`ShNode`]s holding values of type `T`, ordered by `C`.
pub type ShNodeHeap<T, L = NodeHeap, C = Less> = ShHeap<ShNode<T, L, C>, L, ByValue<C>>;

/// A value together with the [`ShHeader`] linking it into a skew heap of type `L`.
///
/// Nodes are ordered by their values, using a comparator of type `C`.
/// Operations on a node use the comparator of the [`ShHeap`] owning its tree, or `C::default()`
/// for a bare tree.
/// Like [`LlNode`](crate::list::LlNode), a node takes care of its own links:
/// moving it puts the destination into the exact position of the source,
/// copying it links the copy below the source,
/// and dropping it detaches it.
///
/// Changing the value of a linked node through [`value_mut`](Self::value_mut) may break the heap
/// order. Detach the node first and link it again afterwards.
pub struct ShNode<T, L = NodeHeap, C = Less>
where
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    entry: ShHeader<Self, L, ByValue<C>>,
    value: T,
}

impl<T, L, C> ShNode<T, L, C>
where
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    /// Creates a detached node holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            entry: ShHeader::new(),
            value,
        }
    }

    /// Creates a copy of `src` holding a clone of its value and links it into the tree of `src`.
    pub fn copy_of(src: Pin<&Self>) -> impl New<Output = Self> + '_
    where
        T: Clone,
    {
        unsafe {
            new::by_raw(move |this: Pin<&mut MaybeUninit<Self>>| {
                let this = this.get_unchecked_mut().write(Self::new(src.value.clone()));
                src.entry.with_comparator(|comp| {
                    raw::link_detached_copy_of(&src.entry, &this.entry, comp)
                });
            })
        }
    }

    /// Detaches the node and gives it the value and position of `src`, which ends up detached.
    pub fn move_assign(self: Pin<&mut Self>, src: Pin<MoveRef<'_, Self>>) {
        let this = unsafe { self.get_unchecked_mut() };

        // Parent slots are found by address, so relink before `src` leaves it.
        unsafe {
            this.entry
                .with_comparator(|comp| raw::detach(&this.entry, comp));
            raw::move_from_to(&src.entry, &this.entry);
        }

        let Self { entry: _, value } =
            unsafe { MoveRef::into_inner(Pin::into_inner_unchecked(src)) };
        this.value = value;
    }

    /// Detaches the node, gives it a clone of the value of `src` and links it into the tree of
    /// `src`.
    ///
    /// Assigning a node to itself does nothing.
    pub fn copy_assign(self: Pin<&mut Self>, src: Pin<&Self>)
    where
        T: Clone,
    {
        if ptr::eq(&*self, &*src) {
            return;
        }

        let this = unsafe { self.get_unchecked_mut() };

        unsafe {
            this.entry
                .with_comparator(|comp| raw::detach(&this.entry, comp));
        }

        this.value = src.value.clone();

        unsafe {
            src.entry.with_comparator(|comp| {
                raw::link_detached_copy_of(&src.entry, &this.entry, comp)
            });
        }
    }

    /// Detaches the node from its tree.
    pub fn detach(self: Pin<&Self>) {
        unsafe {
            self.entry
                .with_comparator(|comp| raw::detach(&self.entry, comp));
        }
    }

    /// Returns `true` if the node is not a member of any tree.
    pub fn is_detached(&self) -> bool {
        self.entry.is_detached()
    }

    /// Melds `node` into the tree containing this node.
    ///
    /// If `node` is linked anywhere else, it is detached from there first.
    ///
    /// This operation computes in *O*(*h*) time for finding the top of the tree, followed by
    /// *O*(log *n*) amortized time for the meld.
    pub fn link(self: Pin<&Self>, node: Pin<&Self>) {
        if ptr::eq(&*self, &*node) {
            return;
        }

        unsafe {
            node.entry
                .with_comparator(|comp| raw::detach(&node.entry, comp));
            self.entry.with_comparator(|comp| {
                raw::link_detached(raw::top_node_of(&self.entry), &node.entry, comp)
            });
        }
    }

    /// Returns the top node of the tree containing this node.
    ///
    /// # Safety
    ///
    /// The returned node must not be used after it has been dropped.
    pub unsafe fn top(&self) -> &Self {
        raw::top_node_of(&self.entry).containing_record()
    }

    /// Returns the left child of this node.
    ///
    /// # Safety
    ///
    /// The returned node must not be used after it has been dropped.
    pub unsafe fn left(&self) -> Option<&Self> {
        self.entry
            .left_node()
            .map(|header| header.containing_record())
    }

    /// Returns the right child of this node.
    ///
    /// # Safety
    ///
    /// The returned node must not be used after it has been dropped.
    pub unsafe fn right(&self) -> Option<&Self> {
        self.entry
            .right_node()
            .map(|header| header.containing_record())
    }

    /// Returns the parent of this node, or `None` if it is the top of its tree.
    ///
    /// # Safety
    ///
    /// The returned node must not be used after it has been dropped.
    pub unsafe fn parent(&self) -> Option<&Self> {
        self.entry
            .parent_node()
            .map(|header| header.containing_record())
    }

    /// Returns a reference to the header of this node.
    pub fn header(&self) -> &ShHeader<Self, L, ByValue<C>> {
        &self.entry
    }

    /// Returns a mutable reference to the value of this node.
    pub fn value_mut(self: Pin<&mut Self>) -> &mut T {
        unsafe { &mut self.get_unchecked_mut().value }
    }
}

unsafe impl<T, L, C> LinkElement<L> for ShNode<T, L, C>
where
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    fn offset() -> usize {
        let base = MaybeUninit::<Self>::uninit();
        let base_ptr = base.as_ptr();
        let field_ptr = unsafe { ptr::addr_of!((*base_ptr).entry) };
        field_ptr as usize - base_ptr as usize
    }
}

unsafe impl<T, L, C> MoveNew for ShNode<T, L, C>
where
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let this = this.get_unchecked_mut().as_mut_ptr();

        // Parent slots are found by address, so the header has to be relinked while `src` is
        // still in place. The value follows afterwards.
        let entry = ptr::addr_of_mut!((*this).entry);
        entry.write(ShHeader::new());
        raw::move_from_to(&src.entry, &*entry);

        let Self { entry: _, value } = MoveRef::into_inner(Pin::into_inner_unchecked(src));
        ptr::addr_of_mut!((*this).value).write(value);
    }
}

impl<T, L, C> Deref for ShNode<T, L, C>
where
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, L, C> Default for ShNode<T, L, C>
where
    T: Default,
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, L, C> fmt::Debug for ShNode<T, L, C>
where
    T: fmt::Debug,
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShNode")
            .field("value", &self.value)
            .field("detached", &self.entry.is_detached())
            .finish()
    }
}

impl<T, L, C> PartialEq for ShNode<T, L, C>
where
    T: PartialEq,
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T, L, C> PartialOrd for ShNode<T, L, C>
where
    T: PartialOrd,
    L: TypedLink<T = SkewHeap>,
    C: Compare<T> + Default,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Greater;
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use moveit::moveit;

    type Node = ShNode<i32>;

    /// Verifies the parent links and the min-heap order below `node` and returns the number of
    /// nodes in its subtree.
    fn verify(node: &Node) -> usize {
        let mut count = 1;

        for child in [unsafe { node.left() }, unsafe { node.right() }]
            .into_iter()
            .flatten()
        {
            assert!(ptr::eq(unsafe { child.parent() }.unwrap(), node));
            assert!(**child >= **node);
            count += verify(child);
        }

        count
    }

    /// Returns the sorted values of the tree containing `node`.
    fn members(node: &Node) -> Vec<i32> {
        let top = unsafe { node.top() };
        assert!(unsafe { top.parent() }.is_none());

        let mut values = Vec::new();
        unsafe { raw::preorder_traverse(top.header(), |node| values.push(**node)) };
        assert_eq!(verify(top), values.len());

        values.sort();
        values
    }

    fn boxed(values: &[i32]) -> Vec<Pin<Box<Node>>> {
        let nodes: Vec<_> = values.iter().map(|value| Box::pin(Node::new(*value))).collect();

        for node in &nodes[1..] {
            nodes[0].as_ref().link(node.as_ref());
        }

        nodes
    }

    #[test]
    fn test_new_is_detached() {
        let node = Node::new(1);
        assert!(node.is_detached());
        assert_eq!(*node, 1);

        let node = Node::default();
        assert!(node.is_detached());
        assert!(ptr::eq(unsafe { node.top() }, &node));
    }

    #[test]
    fn test_link_and_detach() {
        let nodes = boxed(&[5, 2, 4, 1, 3]);

        assert_eq!(members(&nodes[0]), [1, 2, 3, 4, 5]);
        assert_eq!(**unsafe { nodes[2].top() }, 1);

        nodes[3].as_ref().detach();
        assert!(nodes[3].is_detached());
        assert_eq!(members(&nodes[0]), [2, 3, 4, 5]);
        assert_eq!(**unsafe { nodes[0].top() }, 2);

        // Detaching a node below the top keeps the rest of the tree.
        nodes[2].as_ref().detach();
        assert_eq!(members(&nodes[0]), [2, 3, 5]);
    }

    #[test]
    fn test_link_moves_between_trees() {
        let nodes = boxed(&[1, 2, 3]);
        let others = boxed(&[4, 5]);

        others[0].as_ref().link(nodes[1].as_ref());
        assert_eq!(members(&nodes[0]), [1, 3]);
        assert_eq!(members(&others[0]), [2, 4, 5]);

        // Linking a node to its own tree keeps it a single member.
        nodes[0].as_ref().link(nodes[2].as_ref());
        nodes[0].as_ref().link(nodes[0].as_ref());
        assert_eq!(members(&nodes[2]), [1, 3]);
    }

    #[test]
    fn test_drop_detaches() {
        let nodes = boxed(&[2, 4]);

        {
            let top = Box::pin(Node::new(1));
            nodes[0].as_ref().link(top.as_ref());
            assert_eq!(members(&nodes[0]), [1, 2, 4]);
        }

        assert_eq!(members(&nodes[0]), [2, 4]);
        assert_eq!(**unsafe { nodes[1].top() }, 2);
    }

    #[test]
    fn test_move() {
        let nodes = boxed(&[1, 3, 5]);

        moveit! {
            let b = new::of(Node::new(2));
        }

        nodes[0].as_ref().link(b.as_ref());
        let parent = unsafe { b.parent() }.map(|node| node as *const Node);
        assert_eq!(members(&nodes[0]), [1, 2, 3, 5]);

        moveit! {
            let d = new::mov(b);
        }

        assert_eq!(**d, 2);
        assert_eq!(unsafe { d.parent() }.map(|node| node as *const Node), parent);
        assert_eq!(members(&nodes[0]), [1, 2, 3, 5]);
        assert_eq!(members(&d), [1, 2, 3, 5]);
    }

    #[test]
    fn test_move_top() {
        let nodes = boxed(&[2, 3]);

        moveit! {
            let a = new::of(Node::new(1));
        }

        nodes[0].as_ref().link(a.as_ref());
        assert!(ptr::eq(unsafe { nodes[1].top() }, &*a));

        moveit! {
            let b = new::mov(a);
        }

        assert!(ptr::eq(unsafe { nodes[1].top() }, &*b));
        assert_eq!(members(&nodes[0]), [1, 2, 3]);
    }

    #[test]
    fn test_move_assign() {
        let nodes = boxed(&[1, 3, 5]);
        let others = boxed(&[7, 9]);

        moveit! {
            let d = new::of(Node::new(4));
        }

        nodes[0].as_ref().link(d.as_ref());

        moveit! {
            let mut target = new::of(Node::new(8));
        }

        others[0].as_ref().link(target.as_ref());
        assert_eq!(members(&others[0]), [7, 8, 9]);

        target.as_mut().move_assign(d);

        assert_eq!(**target, 4);
        assert_eq!(members(&nodes[0]), [1, 3, 4, 5]);
        assert_eq!(members(&target), [1, 3, 4, 5]);
        assert_eq!(members(&others[0]), [7, 9]);
    }

    #[test]
    fn test_copy() {
        let nodes = boxed(&[1, 3]);

        moveit! {
            let copy = Node::copy_of(nodes[1].as_ref());
        }

        assert_eq!(**copy, 3);
        assert_eq!(members(&nodes[0]), [1, 3, 3]);

        // Copying a detached node pairs it with its copy.
        let single = Box::pin(Node::new(6));
        moveit! {
            let copy = Node::copy_of(single.as_ref());
        }
        assert_eq!(members(&copy), [6, 6]);
        assert!(ptr::eq(unsafe { copy.parent() }.unwrap(), &*single));
    }

    #[test]
    fn test_copy_assign() {
        let nodes = boxed(&[1, 3, 5]);
        let mut others = boxed(&[2, 8]);

        others[1].as_mut().copy_assign(nodes[1].as_ref());

        assert_eq!(**others[1], 3);
        assert_eq!(members(&nodes[0]), [1, 3, 3, 5]);
        assert_eq!(members(&others[0]), [2]);

        // Assigning the sibling of the source keeps the tree intact.
        others[1].as_mut().copy_assign(nodes[0].as_ref());
        assert_eq!(**others[1], 1);
        assert_eq!(members(&nodes[0]), [1, 1, 3, 5]);
    }

    #[test]
    fn test_value_mut() {
        let mut nodes = boxed(&[1, 2]);

        nodes[1].as_ref().detach();
        *nodes[1].as_mut().value_mut() = 0;
        nodes[0].as_ref().link(nodes[1].as_ref());
        assert_eq!(**unsafe { nodes[0].top() }, 0);
    }

    #[test]
    fn test_in_heap() {
        let values: Vec<_> = [4, 1, 3, 2]
            .into_iter()
            .map(|i| Box::pin(ShNode::<i32>::new(i)))
            .collect();

        moveit! {
            let mut heap = unsafe { ShNodeHeap::<i32>::from_nodes(values.iter().map(|node| &**node)) };
        }

        assert_eq!(unsafe { heap.as_ref().top() }.map(|node| **node), Some(1));

        // Detaching through the node updates the heap.
        values[1].as_ref().detach();
        assert_eq!(heap.as_ref().len(), 3);
        assert_eq!(unsafe { heap.as_ref().top() }.map(|node| **node), Some(2));

        // Linking through a member keeps the heap's top current.
        values[0].as_ref().link(values[1].as_ref());
        assert_eq!(unsafe { heap.as_ref().top() }.map(|node| **node), Some(1));

        let mut taken = Vec::new();
        while let Some(node) = unsafe { heap.as_mut().take() } {
            taken.push(**node);
        }
        assert_eq!(taken, [1, 2, 3, 4]);
    }

    #[test]
    fn test_max_heap() {
        let values: Vec<_> = [4, 1, 3, 2]
            .into_iter()
            .map(|i| Box::pin(ShNode::<i32, NodeHeap, Greater>::new(i)))
            .collect();

        moveit! {
            let mut heap = unsafe {
                ShNodeHeap::<i32, NodeHeap, Greater>::from_nodes(values.iter().map(|node| &**node))
            };
        }

        let mut taken = Vec::new();
        while let Some(node) = unsafe { heap.as_mut().take() } {
            taken.push(**node);
        }
        assert_eq!(taken, [4, 3, 2, 1]);
    }

    #[derive(Clone, Copy, Debug, Default)]
    struct Direction(bool);

    impl Compare<i32> for Direction {
        fn less(&self, a: &i32, b: &i32) -> bool {
            if self.0 {
                a > b
            } else {
                a < b
            }
        }
    }

    #[test]
    fn test_heap_comparator() {
        let mut values: Vec<_> = [9, 3, 12, 1, 7, 11, 5, 2, 10, 6, 4, 8]
            .into_iter()
            .map(|i| Box::pin(ShNode::<i32, NodeHeap, Direction>::new(i)))
            .collect();

        moveit! {
            let mut heap = ShNodeHeap::<i32, NodeHeap, Direction>::with_compare(ByValue(Direction(true)));
        }

        for node in &values {
            unsafe { heap.as_mut().link(node) };
        }

        // Dropping and detaching nodes inside the tree melds with the descending order.
        for value in [7, 3, 10] {
            let position = values.iter().position(|node| ***node == value).unwrap();
            drop(values.remove(position));
        }

        let five = values.iter().position(|node| ***node == 5).unwrap();
        values[five].as_ref().detach();
        assert_eq!(heap.as_ref().len(), 8);

        values[0].as_ref().link(values[five].as_ref());
        assert_eq!(unsafe { heap.as_ref().top() }.map(|node| **node), Some(12));

        let mut taken = Vec::new();
        while let Some(node) = unsafe { heap.as_mut().take() } {
            taken.push(**node);
        }
        assert_eq!(taken, [12, 11, 9, 8, 6, 5, 4, 2, 1]);
    }
}
