// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::private::Sealed;
use crate::traits::{LinkType, TypedLink};

/// Designates a structure as an intrusive skew heap.
///
/// You usually want to use `#[derive(SkewHeap)]` to implement [`TypedLink`] with type set to `SkewHeap`.
pub enum SkewHeap {}

impl LinkType for SkewHeap {}
impl Sealed for SkewHeap {}

/// Designates an empty enum as a skew heap.
///
/// Technically, this macro implements [`TypedLink`] with type set to [`enum@SkewHeap`].
pub use zll_macros::SkewHeap;

/// The heap every [`ShNode`] is a member of, unless another marker is given.
///
/// [`ShNode`]: crate::heap::ShNode
pub enum NodeHeap {}

impl TypedLink for NodeHeap {
    type T = SkewHeap;
}
