// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cmp::Ordering;
use core::fmt;
use core::mem::MaybeUninit;
use core::ops::Deref;
use core::pin::Pin;
use core::ptr;

use moveit::{new, MoveNew, MoveRef, New};

use super::header::LlHeader;
use super::raw;
use super::traits::{LinkedList, NodeList};
use crate::traits::{LinkElement, TypedLink};

/// A value together with the [`LlHeader`] linking it into a doubly linked list of type `L`.
///
/// `LlNode` takes care of its own links:
///
/// * A new node is detached.
/// * Moving a node (through [`MoveNew`] or [`move_assign`]) puts the destination into the exact
///   position of the source, which ends up detached.
/// * Copying a node (through [`copy_of`] or [`copy_assign`]) links the copy right after the source.
/// * Dropping a node detaches it.
///
/// As nodes are only ever linked while pinned, linking and detaching them is safe.
///
/// [`copy_assign`]: Self::copy_assign
/// [`copy_of`]: Self::copy_of
/// [`move_assign`]: Self::move_assign
pub struct LlNode<T, L = NodeList> {
    entry: LlHeader<Self, L>,
    value: T,
}

impl<T, L> LlNode<T, L>
where
    L: TypedLink<T = LinkedList>,
{
    /// Creates a detached node holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            entry: LlHeader::new(),
            value,
        }
    }

    /// Creates a copy of `src` holding a clone of its value and links it right after `src`.
    pub fn copy_of(src: Pin<&Self>) -> impl New<Output = Self> + '_
    where
        T: Clone,
    {
        unsafe {
            new::by_raw(move |this: Pin<&mut MaybeUninit<Self>>| {
                let this = this.get_unchecked_mut().write(Self::new(src.value.clone()));
                raw::link_detached_as_next(&src.entry, &this.entry);
            })
        }
    }

    /// Detaches the node and gives it the value and position of `src`, which ends up detached.
    pub fn move_assign(self: Pin<&mut Self>, src: Pin<MoveRef<'_, Self>>) {
        let this = unsafe { self.get_unchecked_mut() };

        // Leave our position while `src` is still at its address, in case it is our neighbor.
        unsafe { raw::detach(&this.entry) };

        let Self { entry, value } = unsafe { MoveRef::into_inner(Pin::into_inner_unchecked(src)) };
        unsafe { raw::move_from_to(&entry, &this.entry) };
        this.value = value;
    }

    /// Detaches the node, gives it a clone of the value of `src` and links it right after `src`.
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
        this.value = src.value.clone();

        unsafe {
            raw::detach(&this.entry);
            raw::link_detached_as_next(&src.entry, &this.entry);
        }
    }

    /// Detaches the node from its chain.
    pub fn detach(self: Pin<&Self>) {
        unsafe { raw::detach(&self.entry) }
    }

    /// Returns `true` if the node is not a member of any chain.
    pub fn is_detached(&self) -> bool {
        self.entry.is_detached()
    }

    /// Moves `node` right after this node.
    ///
    /// If `node` is linked anywhere else, it is detached from there first.
    pub fn link_next(self: Pin<&Self>, node: Pin<&Self>) {
        if ptr::eq(&*self, &*node) {
            return;
        }

        unsafe {
            raw::detach(&node.entry);
            raw::link_detached_as_next(&self.entry, &node.entry);
        }
    }

    /// Moves `node` right before this node.
    ///
    /// If `node` is linked anywhere else, it is detached from there first.
    pub fn link_prev(self: Pin<&Self>, node: Pin<&Self>) {
        if ptr::eq(&*self, &*node) {
            return;
        }

        unsafe {
            raw::detach(&node.entry);
            raw::link_detached_as_prev(&self.entry, &node.entry);
        }
    }

    /// Returns the following node of the chain, or `None` if this is the last one.
    ///
    /// # Safety
    ///
    /// The returned node must not be used after it has been dropped.
    pub unsafe fn next(&self) -> Option<&Self> {
        self.entry
            .next_node()
            .map(|header| header.containing_record())
    }

    /// Returns the preceding node of the chain, or `None` if this is the first one.
    ///
    /// # Safety
    ///
    /// The returned node must not be used after it has been dropped.
    pub unsafe fn prev(&self) -> Option<&Self> {
        self.entry
            .prev_node()
            .map(|header| header.containing_record())
    }

    /// Returns a reference to the header of this node.
    pub fn header(&self) -> &LlHeader<Self, L> {
        &self.entry
    }

    /// Returns a mutable reference to the value of this node.
    pub fn value_mut(self: Pin<&mut Self>) -> &mut T {
        unsafe { &mut self.get_unchecked_mut().value }
    }
}

unsafe impl<T, L> LinkElement<L> for LlNode<T, L>
where
    L: TypedLink<T = LinkedList>,
{
    fn offset() -> usize {
        let base = MaybeUninit::<Self>::uninit();
        let base_ptr = base.as_ptr();
        let field_ptr = unsafe { ptr::addr_of!((*base_ptr).entry) };
        field_ptr as usize - base_ptr as usize
    }
}

unsafe impl<T, L> MoveNew for LlNode<T, L>
where
    L: TypedLink<T = LinkedList>,
{
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let Self { entry, value } = MoveRef::into_inner(Pin::into_inner_unchecked(src));
        let this = this.get_unchecked_mut().write(Self::new(value));

        // `entry` has left its address, but its neighbors still point to the old one.
        // Redirecting them only needs the links stored in `entry`.
        raw::move_from_to(&entry, &this.entry);
    }
}

impl<T, L> Deref for LlNode<T, L> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, L> Default for LlNode<T, L>
where
    T: Default,
    L: TypedLink<T = LinkedList>,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug, L> fmt::Debug for LlNode<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlNode")
            .field("value", &self.value)
            .field("detached", &self.entry.is_detached())
            .finish()
    }
}

impl<T: PartialEq, L> PartialEq for LlNode<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: PartialOrd, L> PartialOrd for LlNode<T, L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}
