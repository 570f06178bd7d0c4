// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::private::Sealed;

/// Kind of an intrusive structure, i.e. [`LinkedList`] or [`SkewHeap`].
///
/// [`LinkedList`]: crate::list::LinkedList
/// [`SkewHeap`]: crate::heap::SkewHeap
pub trait LinkType: Sealed {}

/// Designates an empty enum as the marker of one intrusive structure of a specific kind
/// (doubly linked list or skew heap).
/// You are supposed to define an empty enum and implement this trait for every header field
/// of every element type in your program.
///
/// This is required, because a single element may be part of multiple structures, and henceforth
/// its element structure then contains multiple header fields (e.g. [`LlHeader`]).
/// To make all functions link and unlink elements via the correct header fields,
/// structures need to be uniquely identified, and this is what the empty enum types are for.
///
/// The easiest way to implement this trait is to use `derive` with the appropriate kind
/// ([`LinkedList`] or [`SkewHeap`]):
///
/// ```ignore
/// #[derive(LinkedList)]
/// enum MyList {}
/// ```
///
/// [`LinkedList`]: crate::list::LinkedList
/// [`LlHeader`]: crate::list::LlHeader
/// [`SkewHeap`]: crate::heap::SkewHeap
pub trait TypedLink {
    type T: LinkType;
}

/// Designates a structure as an element with a header field (e.g. [`LlHeader`]) of a
/// particular intrusive structure (identified via the enum that implements [`TypedLink`]).
///
/// You can implement this trait multiple times for a structure if it is part of multiple
/// structures (and therefore contains multiple header fields).
///
/// The easiest way to implement this trait for all header fields of a structure is to use
/// `derive` on the structure:
///
/// ```ignore
/// #[derive(LinkElement)]
/// struct MyElement {
///     entry: LlHeader<Self, MyList>,
///     value: i32,
/// }
/// ```
///
/// # Safety
///
/// [`offset`](Self::offset) must return the exact byte offset of a header field of type
/// `LlHeader<Self, L>` or `ShHeader<Self, L, _>` inside `Self`.
/// Header pointers are converted back to element pointers with it.
///
/// [`LlHeader`]: crate::list::LlHeader
pub unsafe trait LinkElement<L: TypedLink> {
    /// Returns the byte offset to the header field relative to the beginning of the
    /// element structure.
    fn offset() -> usize;
}

/// A strict weak ordering over elements.
///
/// `less(a, b)` returns `true` if `a` must come before `b`.
/// For a skew heap, the element that no other element comes before is the top.
///
/// Implemented for [`Less`], [`Greater`] and every `Fn(&E, &E) -> bool`.
pub trait Compare<E: ?Sized> {
    fn less(&self, a: &E, b: &E) -> bool;
}

/// Orders elements ascending via [`PartialOrd`], making a skew heap a min-heap.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Less;

impl<E: PartialOrd + ?Sized> Compare<E> for Less {
    fn less(&self, a: &E, b: &E) -> bool {
        a < b
    }
}

/// Orders elements descending via [`PartialOrd`], making a skew heap a max-heap.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Greater;

impl<E: PartialOrd + ?Sized> Compare<E> for Greater {
    fn less(&self, a: &E, b: &E) -> bool {
        a > b
    }
}

impl<E: ?Sized, F> Compare<E> for F
where
    F: Fn(&E, &E) -> bool,
{
    fn less(&self, a: &E, b: &E) -> bool {
        self(a, b)
    }
}
