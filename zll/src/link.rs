// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;
use core::ptr::NonNull;

/// A link field of a header: it ends either at a sibling node, at the owning container,
/// or nowhere.
///
/// `N` is the header type of the nodes, `C` the container type.
/// Letting the outermost links of a chain point to the container instead of being empty
/// keeps the container's cached boundary nodes up to date without special-casing the ends of
/// a chain.
pub enum Link<N, C> {
    /// The link ends nowhere. A header whose links are all `Empty` is detached.
    Empty,
    /// The link refers to a sibling node.
    Node(NonNull<N>),
    /// The link refers to the container owning the structure.
    Container(NonNull<C>),
}

impl<N, C> Link<N, C> {
    /// Returns the node this link refers to, or `None` if it is empty or refers to the container.
    #[inline]
    pub fn as_node(self) -> Option<NonNull<N>> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the container this link refers to, or `None` if it is empty or refers to a node.
    #[inline]
    pub fn as_container(self) -> Option<NonNull<C>> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Returns `true` if the link ends nowhere.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl<N, C> Clone for Link<N, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, C> Copy for Link<N, C> {}

impl<N, C> Default for Link<N, C> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<N, C> PartialEq for Link<N, C> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Node(a), Self::Node(b)) => a == b,
            (Self::Container(a), Self::Container(b)) => a == b,
            _ => false,
        }
    }
}

impl<N, C> Eq for Link<N, C> {}

impl<N, C> From<Option<NonNull<N>>> for Link<N, C> {
    fn from(node: Option<NonNull<N>>) -> Self {
        node.map_or(Self::Empty, Self::Node)
    }
}

impl<N, C> fmt::Debug for Link<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Container(container) => f.debug_tuple("Container").field(container).finish(),
        }
    }
}
