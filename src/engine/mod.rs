//! Engine - Node registry and headless document.
//!
//! The engine manages the core data structures:
//! - Registry: slot allocation, generational handles, ownership edges
//! - Document: attachment queries, text content and HTML rendering
//!
//! # Architecture
//!
//! Nodes are NOT objects. They are generational indices into one
//! thread-local arena:
//!
//! ```text
//! #0v0: Element p      (parent=None)
//! #1v0: Block          (parent=#0, HIDDEN)
//! #2v0: Element code   (parent=#1)
//! #3v0: Text "hello"   (parent=#2)
//! ```
//!
//! Hiding a block anchor detaches its whole subtree in one flag flip; the
//! subtree's nodes keep their identity and listeners.

pub mod document;
mod registry;

pub use document::*;
pub use registry::{
    children, flags, is_alive, kind, node_count, parent, release_node, roots, structural_ops,
};

pub(crate) use registry::{NodeData, allocate, on_destroy, set_hidden, with_node, with_node_mut};
