// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Intrusive doubly linked lists and skew heaps.
//!
//! Both structures operate directly on headers embedded in the caller's own records.
//! `zll` never allocates, never copies element payloads and never owns an element.
//! It only maintains the linkage between headers:
//!
//! * [`list`] provides the doubly linked list: the [`LlHeader`](list::LlHeader) to embed,
//!   the [`LlList`](list::LlList) container, the raw linkage engine in [`list::raw`] and the
//!   self-relinking [`LlNode`](list::LlNode) wrapper.
//! * [`heap`] provides the skew heap: the [`ShHeader`](heap::ShHeader) to embed,
//!   the [`ShHeap`](heap::ShHeap) container, the raw meld engine in [`heap::raw`] and the
//!   self-relinking [`ShNode`](heap::ShNode) wrapper.
//!
//! A link of either structure may end at a sibling node or at the owning container, see [`Link`].
//! Every header detaches itself when it is dropped, so destroying a linked record never leaves a
//! dangling pointer in a surviving neighbor or container.
//! This is only sound as long as linked records do not move, which is why linking requires
//! pinned records and containers are constructed in place through [`moveit`].
//!
//! Precondition violations are programmer errors. They are caught by assertions in debug builds
//! (and in release builds with the `checked` feature) and are undefined behavior otherwise.

#![no_std]

#[cfg(test)]
extern crate alloc;

// Required for deriving our traits when testing.
#[cfg(test)]
extern crate self as zll;

#[macro_use]
mod assert;
pub mod heap;
mod link;
pub mod list;
mod private;
mod traits;

pub use link::*;
pub use traits::*;
pub use zll_macros::LinkElement;
