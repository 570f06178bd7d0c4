// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::Cell;
use core::marker::PhantomPinned;
use core::mem::{self, MaybeUninit};
use core::pin::Pin;
use core::ptr::{self, NonNull};

use moveit::{new, MoveNew, MoveRef, New};

use super::header::{ShHeader, ShLink};
use super::raw;
use super::traits::SkewHeap;
use crate::link::Link;
use crate::traits::{Compare, LinkElement, Less, TypedLink};

/// A skew heap owning a tree of [`ShHeader`]s, ordered by a comparator of type `C`.
///
/// The heap caches the top of the tree and links it back to itself, so the cache stays current
/// when the top is detached through [`raw`] or by dropping it.
///
/// With the default [`Less`] comparator, the top is the least element.
/// [`Greater`](crate::Greater) turns the heap into a max-heap.
///
/// Elements must stay at a stable address as long as they are linked.
/// All functions that take or return element references are therefore `unsafe`.
///
/// Dropping the heap only cuts the link between the heap and its top.
/// The nodes stay linked as a bare tree.
pub struct ShHeap<E, L, C = Less>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    pub(crate) top: Cell<Option<NonNull<ShHeader<E, L, C>>>>,
    pub(crate) comp: C,
    pin: PhantomPinned,
}

impl<E, L, C> ShHeap<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    fn empty(comp: C) -> Self {
        Self {
            top: Cell::new(None),
            comp,
            pin: PhantomPinned,
        }
    }

    fn as_link(&self) -> ShLink<E, L, C> {
        Link::Container(NonNull::from(self))
    }

    fn top_node<'a>(&self) -> Option<&'a ShHeader<E, L, C>> {
        self.top.get().map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    fn attach_top(&self, header: &ShHeader<E, L, C>) {
        self.top.set(Some(NonNull::from(header)));
        header.parent.set(self.as_link());
    }

    /// Cuts the link between the heap and its top and returns the top.
    fn release<'a>(&self) -> Option<&'a ShHeader<E, L, C>> {
        let top = self.top_node()?;

        top.parent.set(Link::Empty);
        self.top.set(None);

        Some(top)
    }

    /// Melds the detached `header` or the parentless tree rooted at it into the heap.
    unsafe fn meld_tree(&self, header: &ShHeader<E, L, C>) {
        let top = match self.release() {
            Some(top) => raw::meld(top, header, &self.comp),
            None => header,
        };

        self.attach_top(top);
    }

    /// Creates a new empty skew heap with a default comparator.
    pub fn new() -> impl New<Output = Self> {
        new::of(Self::empty(C::default()))
    }

    /// Creates a new empty skew heap ordered by `comp`.
    pub fn with_compare(comp: C) -> impl New<Output = Self> {
        new::of(Self::empty(comp))
    }

    /// Creates a new skew heap out of the given elements.
    ///
    /// # Safety
    ///
    /// All elements must be detached and must stay at their address as long as they are linked.
    pub unsafe fn from_nodes<'a, I>(elements: I) -> impl New<Output = Self> + 'a
    where
        I: IntoIterator<Item = &'a E> + 'a,
        E: 'a,
        L: 'a,
        C: 'a,
    {
        Self::new().with(move |this| {
            let this = this.into_ref().get_ref();

            for element in elements {
                let header = ShHeader::of(element);
                zll_assert!(header.is_detached());
                this.meld_tree(header);
            }
        })
    }

    /// Returns the comparator ordering this heap.
    pub fn comparator(self: Pin<&Self>) -> &C {
        &self.get_ref().comp
    }

    /// Calls `f` for every element of the heap, visiting the top first and every node before
    /// its children.
    ///
    /// This operation computes in *O*(*n*) time.
    pub unsafe fn for_each<F>(self: Pin<&Self>, f: F)
    where
        F: FnMut(&E),
    {
        if let Some(top) = self.top_node() {
            raw::preorder_traverse(top, f);
        }
    }

    /// Returns `true` if the heap is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn is_empty(self: Pin<&Self>) -> bool {
        self.top.get().is_none()
    }

    /// Counts all elements and returns the size of the heap.
    ///
    /// This operation computes in *O*(*n*) time.
    pub fn len(self: Pin<&Self>) -> usize {
        let mut count = 0;

        if let Some(top) = self.top_node() {
            unsafe { raw::preorder_traverse(top, |_| count += 1) }
        }

        count
    }

    /// Links `element` into the heap.
    ///
    /// If `element` is already linked, it is detached first, even if it is a member of this heap.
    ///
    /// This operation computes in *O*(log *n*) amortized time.
    pub unsafe fn link(self: Pin<&mut Self>, element: &E) {
        let this = self.into_ref().get_ref();
        let header = ShHeader::of(element);

        raw::detach(header, &this.comp);
        this.meld_tree(header);
    }

    /// Moves all elements from `other` into the heap.
    /// After this operation, `other` becomes empty.
    ///
    /// Both heaps must be ordered by the same comparator.
    ///
    /// This operation computes in *O*(log *n*) amortized time.
    pub fn merge(self: Pin<&mut Self>, other: Pin<&mut Self>) {
        let this = self.into_ref().get_ref();

        if let Some(top) = other.into_ref().get_ref().release() {
            unsafe { this.meld_tree(top) }
        }
    }

    /// Detaches the top element.
    ///
    /// Nothing happens if the heap is empty.
    ///
    /// This operation computes in *O*(log *n*) amortized time.
    pub fn pop(self: Pin<&mut Self>) {
        if let Some(top) = self.top_node() {
            unsafe { raw::detach(top, &self.comp) }
        }
    }

    /// Detaches the top element and returns it, or `None` if the heap is empty.
    ///
    /// This operation computes in *O*(log *n*) amortized time.
    pub unsafe fn take(self: Pin<&mut Self>) -> Option<&E> {
        let top = self.top_node()?;
        raw::detach(top, &self.comp);

        Some(top.containing_record())
    }

    /// Releases our own elements as a bare tree and moves all elements of `other` into this heap,
    /// exchanging the comparators of both heaps.
    /// After this operation, `other` becomes empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub fn take_from(self: Pin<&mut Self>, other: Pin<&mut Self>) {
        // The comparator is not structurally pinned.
        let this = unsafe { self.get_unchecked_mut() };
        let other = unsafe { other.get_unchecked_mut() };
        mem::swap(&mut this.comp, &mut other.comp);

        this.release();

        if let Some(top) = other.release() {
            this.attach_top(top);
        }
    }

    /// Provides a reference to the top element, or `None` if the heap is empty.
    ///
    /// This operation computes in *O*(*1*) time.
    pub unsafe fn top(self: Pin<&Self>) -> Option<&E> {
        self.top_node().map(|header| header.containing_record())
    }
}

impl<E, L, C> Drop for ShHeap<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    fn drop(&mut self) {
        self.release();
    }
}

unsafe impl<E, L, C> MoveNew for ShHeap<E, L, C>
where
    E: LinkElement<L>,
    L: TypedLink<T = SkewHeap>,
    C: Compare<E> + Default,
{
    unsafe fn move_new(src: Pin<MoveRef<'_, Self>>, this: Pin<&mut MaybeUninit<Self>>) {
        let src = MoveRef::into_inner(Pin::into_inner_unchecked(src));
        let top = src.release();

        // `src` is empty now, so dropping it would only drop its comparator.
        let comp = ptr::read(&src.comp);
        mem::forget(src);

        let this = this.get_unchecked_mut().write(Self::empty(comp));

        if let Some(top) = top {
            this.attach_top(top);
        }
    }
}
