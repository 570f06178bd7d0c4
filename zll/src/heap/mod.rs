// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Intrusive skew heap.
//!
//! A skew heap is a binary tree in heap order without any balance invariant.
//! Every meld swaps the children along its path, which keeps merging two heaps, linking a node
//! and popping the top at *O*(log *n*) amortized time.
//!
//! A record joins a heap by embedding a [`ShHeader`] and implementing [`LinkElement`] for the
//! heap's marker type, usually through `#[derive(LinkElement)]`.
//! The third type parameter of the header selects the [`Compare`] implementation ordering the heap,
//! [`Less`] (a min-heap) by default:
//!
//! ```ignore
//! use zll::heap::{ShHeader, SkewHeap};
//! use zll::{Greater, LinkElement};
//!
//! #[derive(SkewHeap)]
//! enum Timers {}
//!
//! #[derive(LinkElement)]
//! struct Timer {
//!     deadline: u64,
//!     entry: ShHeader<Self, Timers>,
//! }
//! ```
//!
//! The functions in [`raw`] operate on trees of headers without any container.
//! [`ShHeap`] caches the top of a tree and offers the usual heap operations on top.
//! [`ShNode`] wraps any value together with a header and relinks itself when it is moved or copied.
//!
//! [`Compare`]: crate::Compare
//! [`Less`]: crate::Less
//! [`LinkElement`]: crate::LinkElement

mod base;
mod header;
mod node;
pub mod raw;
mod traits;

pub use base::*;
pub use header::*;
pub use node::*;
pub use traits::*;
