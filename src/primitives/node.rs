//! Node Primitives - Elements and text.
//!
//! Construction is immediate: the node is part of the document as soon as
//! the call returns. There is no staging phase and no diffing; every later
//! change is an explicit call such as [`set_text`].
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::{element, text, set_text, Attrs, Parent};
//!
//! let p = element("p", Attrs::from([("class", "greeting")]), Parent::Root)?;
//! let t = text("count is 0", p)?;
//!
//! // Later, from an updater
//! set_text(t, "count is 1")?;
//! ```

use crate::engine::{NodeData, allocate, with_node, with_node_mut};
use crate::error::{Result, RuntimeError};
use crate::types::{Attrs, NodeId, Parent};

// =============================================================================
// Construction
// =============================================================================

/// Create an element and append it under `parent`.
pub fn element(tag: &str, attrs: impl Into<Attrs>, parent: impl Into<Parent>) -> Result<NodeId> {
    allocate(
        NodeData::Element {
            tag: tag.to_string(),
            attrs: attrs.into(),
        },
        parent.into(),
    )
}

/// Create a text node and append it under `parent`.
pub fn text(content: impl Into<String>, parent: impl Into<Parent>) -> Result<NodeId> {
    allocate(NodeData::Text(content.into()), parent.into())
}

/// Create a single-space text node, used to separate inline elements.
pub fn space(parent: impl Into<Parent>) -> Result<NodeId> {
    text(" ", parent)
}

// =============================================================================
// Text Payload
// =============================================================================

/// Replace the content of a text node in place.
///
/// The node keeps its identity; nothing is reallocated.
pub fn set_text(node: NodeId, content: impl Into<String>) -> Result<()> {
    let content = content.into();
    with_node_mut(node, |entry| match &mut entry.data {
        NodeData::Text(current) => {
            *current = content;
            Ok(())
        }
        _ => Err(RuntimeError::WrongKind {
            node,
            expected: "text",
        }),
    })?
}

/// Current content of a text node.
pub fn text_of(node: NodeId) -> Result<String> {
    with_node(node, |entry| match &entry.data {
        NodeData::Text(content) => Ok(content.clone()),
        _ => Err(RuntimeError::WrongKind {
            node,
            expected: "text",
        }),
    })?
}

// =============================================================================
// Element Payload
// =============================================================================

/// Tag name of an element.
pub fn tag(node: NodeId) -> Result<String> {
    with_node(node, |entry| match &entry.data {
        NodeData::Element { tag, .. } => Ok(tag.clone()),
        _ => Err(RuntimeError::WrongKind {
            node,
            expected: "element",
        }),
    })?
}

/// Get an attribute of an element.
pub fn attr(node: NodeId, name: &str) -> Result<Option<String>> {
    with_node(node, |entry| match &entry.data {
        NodeData::Element { attrs, .. } => Ok(attrs.get(name).map(str::to_string)),
        _ => Err(RuntimeError::WrongKind {
            node,
            expected: "element",
        }),
    })?
}

/// Set an attribute of an element, in place.
pub fn set_attr(node: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
    let value = value.into();
    with_node_mut(node, |entry| match &mut entry.data {
        NodeData::Element { attrs, .. } => {
            attrs.set(name, value);
            Ok(())
        }
        _ => Err(RuntimeError::WrongKind {
            node,
            expected: "element",
        }),
    })?
}
