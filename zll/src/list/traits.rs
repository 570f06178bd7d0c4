// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::private::Sealed;
use crate::traits::{LinkType, TypedLink};

/// Designates a structure as an intrusive doubly linked list.
///
/// You usually want to use `#[derive(LinkedList)]` to implement [`TypedLink`] with type set to `LinkedList`.
pub enum LinkedList {}

impl LinkType for LinkedList {}
impl Sealed for LinkedList {}

/// Designates an empty enum as a doubly linked list.
///
/// Technically, this macro implements [`TypedLink`] with type set to [`enum@LinkedList`].
pub use zll_macros::LinkedList;

/// The list every [`LlNode`] is a member of, unless another marker is given.
///
/// [`LlNode`]: crate::list::LlNode
pub enum NodeList {}

impl TypedLink for NodeList {
    type T = LinkedList;
}
