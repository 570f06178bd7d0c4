// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::Cell;
use core::fmt;
use core::marker::{PhantomData, PhantomPinned};
use core::ptr::NonNull;

use super::base::LlList;
use super::raw;
use super::traits::LinkedList;
use crate::link::Link;
use crate::traits::{LinkElement, TypedLink};

/// The link of a list header: a sibling header, the owning [`LlList`], or nothing.
pub(crate) type LlLink<E, L> = Link<LlHeader<E, L>, LlList<E, L>>;

/// The header a record embeds to become a member of a doubly linked list of type `L`.
///
/// A header starts detached and returns to being detached when it is dropped, relinking its
/// former neighbors to each other first.
/// The outermost headers of a chain that is owned by an [`LlList`] point to that list.
pub struct LlHeader<E, L> {
    pub(crate) next: Cell<LlLink<E, L>>,
    pub(crate) prev: Cell<LlLink<E, L>>,
    marker: PhantomData<(*const E, *const L)>,
    pin: PhantomPinned,
}

impl<E, L> LlHeader<E, L> {
    /// Creates a detached header.
    pub const fn new() -> Self {
        Self {
            next: Cell::new(Link::Empty),
            prev: Cell::new(Link::Empty),
            marker: PhantomData,
            pin: PhantomPinned,
        }
    }

    /// Returns `true` if this header is not a member of any chain.
    pub fn is_detached(&self) -> bool {
        raw::detached(self)
    }

    pub(crate) fn as_link(&self) -> LlLink<E, L> {
        Link::Node(NonNull::from(self))
    }

    /// Returns the next header of the chain, unless this is the last one.
    pub(crate) fn next_node<'a>(&self) -> Option<&'a Self> {
        self.next.get().as_node().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// Returns the previous header of the chain, unless this is the first one.
    pub(crate) fn prev_node<'a>(&self) -> Option<&'a Self> {
        self.prev.get().as_node().map(|ptr| unsafe { &*ptr.as_ptr() })
    }
}

impl<E, L> LlHeader<E, L>
where
    E: LinkElement<L>,
    L: TypedLink<T = LinkedList>,
{
    /// Returns the header embedded in `element`.
    pub fn of(element: &E) -> &Self {
        let element_ptr = element as *const E;

        // This is the canonical implementation of `byte_add`
        let header_ptr = unsafe { element_ptr.cast::<u8>().add(E::offset()).cast::<Self>() };

        unsafe { &*header_ptr }
    }

    /// Returns the record this header is embedded in.
    pub(crate) fn containing_record<'a>(&self) -> &'a E {
        unsafe { &*self.element_ptr() }
    }

    pub(crate) fn element_ptr(&self) -> *mut E {
        let ptr = self as *const Self;

        // This is the canonical implementation of `byte_sub`
        let ptr = unsafe { ptr.cast::<u8>().sub(E::offset()) };

        ptr.cast::<E>() as *mut E
    }
}

impl<E, L> Default for LlHeader<E, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, L> Drop for LlHeader<E, L> {
    fn drop(&mut self) {
        unsafe { raw::detach(self) }
    }
}

impl<E, L> fmt::Debug for LlHeader<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlHeader")
            .field("next", &self.next.get())
            .field("prev", &self.prev.get())
            .finish()
    }
}
