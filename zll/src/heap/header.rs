// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::Cell;
use core::fmt;
use core::marker::{PhantomData, PhantomPinned};
use core::ptr::NonNull;

use super::base::ShHeap;
use super::raw;
use super::traits::SkewHeap;
use crate::link::Link;
use crate::traits::{Compare, LinkElement, Less, TypedLink};

/// The parent link of a heap header: a parent header, the owning [`ShHeap`], or nothing.
pub(crate) type ShLink<E, L, C> = Link<ShHeader<E, L, C>, ShHeap<E, L, C>>;

/// The header a record embeds to become a member of a skew heap of type `L`, ordered by `C`.
///
/// A header starts detached.
/// When it is dropped, it melds its children into its former place and is detached afterwards.
/// The children are melded with the comparator of the owning [`ShHeap`], or with `C::default()`
/// if the tree has no owner.
/// The top header of a tree owned by a [`ShHeap`] has that heap as its parent.
pub struct ShHeader<E, L, C = Less>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    pub(crate) left: Cell<Option<NonNull<Self>>>,
    pub(crate) right: Cell<Option<NonNull<Self>>>,
    pub(crate) parent: Cell<ShLink<E, L, C>>,
    marker: PhantomData<(*const E, *const L)>,
    pin: PhantomPinned,
}

impl<E, L, C> ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    /// Creates a detached header.
    pub const fn new() -> Self {
        Self {
            left: Cell::new(None),
            right: Cell::new(None),
            parent: Cell::new(Link::Empty),
            marker: PhantomData,
            pin: PhantomPinned,
        }
    }

    /// Returns the header embedded in `element`.
    pub fn of(element: &E) -> &Self {
        let element_ptr = element as *const E;

        // This is the canonical implementation of `byte_add`
        let header_ptr = unsafe { element_ptr.cast::<u8>().add(E::offset()).cast::<Self>() };

        unsafe { &*header_ptr }
    }

    /// Returns `true` if this header is not a member of any tree.
    pub fn is_detached(&self) -> bool {
        raw::detached(self)
    }

    pub(crate) fn as_link(&self) -> ShLink<E, L, C> {
        Link::Node(NonNull::from(self))
    }

    pub(crate) fn left_node<'a>(&self) -> Option<&'a Self> {
        self.left.get().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    pub(crate) fn right_node<'a>(&self) -> Option<&'a Self> {
        self.right.get().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    pub(crate) fn parent_node<'a>(&self) -> Option<&'a Self> {
        self.parent
            .get()
            .as_node()
            .map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Calls `f` with the comparator ordering the tree of this header.
    ///
    /// That is the comparator of the [`ShHeap`] owning the tree, or `C::default()` for a bare
    /// tree. Finding the owner computes in *O*(*h*) time, where *h* is the depth of this header.
    pub(crate) unsafe fn with_comparator<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&C) -> R,
    {
        match raw::top_node_of(self).parent.get().as_container() {
            Some(heap) => f(&heap.as_ref().comp),
            None => f(&C::default()),
        }
    }

    /// Returns the record this header is embedded in.
    pub(crate) fn containing_record<'a>(&self) -> &'a E {
        unsafe { &*self.element_ptr() }
    }

    fn element_ptr(&self) -> *const E {
        let ptr = self as *const Self;

        // This is the canonical implementation of `byte_sub`
        let ptr = unsafe { ptr.cast::<u8>().sub(E::offset()) };

        ptr.cast()
    }
}

impl<E, L, C> Default for ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, L, C> Drop for ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    fn drop(&mut self) {
        let this = &*self;

        if !this.is_detached() {
            unsafe { this.with_comparator(|comp| raw::detach(this, comp)) }
        }
    }
}

impl<E, L, C> fmt::Debug for ShHeader<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShHeader")
            .field("left", &self.left.get())
            .field("right", &self.right.get())
            .field("parent", &self.parent.get())
            .finish()
    }
}
