//! Primitives - Node building blocks.
//!
//! This module provides the construction primitives:
//! - [`element`] / [`text`] / [`space`] - Nodes, visible as soon as they exist
//! - [`if_block`] - Conditional inclusion of a subtree
//! - [`Disposable`] - What a component can own
//!
//! # Architecture
//!
//! Every primitive:
//! 1. Allocates a slot in the registry under its parent
//! 2. Writes its payload (tag, attributes, text)
//! 3. Returns a handle; later changes are explicit calls on that handle
//!
//! There is no implicit reactivity here. Updaters decide what to rewrite.

mod control_flow;
mod node;
mod types;

pub use control_flow::{ConditionalBlock, if_block};
pub use node::{attr, element, set_attr, set_text, space, tag, text, text_of};
pub use types::*;
