// Copyright 2026 The zll Authors
// SPDX-License-Identifier: MIT OR Apache-2.0
//
//! Intrusive doubly linked list.
//!
//! A record joins a list by embedding an [`LlHeader`] and implementing [`LinkElement`] for the
//! list's marker type, usually through `#[derive(LinkElement)]`:
//!
//! ```ignore
//! use zll::list::{LinkedList, LlHeader};
//! use zll::LinkElement;
//!
//! #[derive(LinkedList)]
//! enum ReadyQueue {}
//!
//! #[derive(LinkElement)]
//! struct Thread {
//!     id: u32,
//!     ready: LlHeader<Self, ReadyQueue>,
//! }
//! ```
//!
//! The functions in [`raw`] operate on chains of headers without any container.
//! [`LlList`] caches the two boundary nodes of a chain and offers the usual list operations on top.
//! [`LlNode`] wraps any value together with a header and relinks itself when it is moved or copied.
//!
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
