//! Headless Document - Read side of the node tree.
//!
//! Nothing here mutates nodes. These queries answer what a user would see:
//! which nodes are attached, what text they show, and the whole document as
//! HTML (blocks render their children inline, excluded blocks render nothing).

use std::fmt::Write as _;

use super::registry::{self, NodeData};
use crate::error::Result;
use crate::types::{NodeFlags, NodeId};

// =============================================================================
// Attachment
// =============================================================================

/// Whether the node is currently part of the visible document.
///
/// A node is attached when no block anchor above it is hidden. A block's own
/// hidden flag only affects its descendants.
pub fn is_attached(id: NodeId) -> Result<bool> {
    let mut current = registry::parent(id)?;
    while let Some(ancestor) = current {
        let (flags, parent) = registry::with_node(ancestor, |e| (e.flags, e.parent))?;
        if flags.contains(NodeFlags::HIDDEN) {
            return Ok(false);
        }
        current = parent;
    }
    Ok(true)
}

/// Children that are rendered under `id`, with included blocks flattened.
pub fn visible_children(id: NodeId) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    for child in registry::children(id)? {
        collect_visible(child, &mut out)?;
    }
    Ok(out)
}

fn collect_visible(id: NodeId, out: &mut Vec<NodeId>) -> Result<()> {
    let (is_block, hidden) = registry::with_node(id, |e| {
        (matches!(e.data, NodeData::Block), e.flags.contains(NodeFlags::HIDDEN))
    })?;
    if !is_block {
        out.push(id);
        return Ok(());
    }
    if hidden {
        return Ok(());
    }
    for child in registry::children(id)? {
        collect_visible(child, out)?;
    }
    Ok(())
}

// =============================================================================
// Text Content
// =============================================================================

/// Concatenated text of every attached text node under `id` (or its own text).
pub fn text_content(id: NodeId) -> Result<String> {
    let mut out = String::new();
    write_text(id, &mut out)?;
    Ok(out)
}

fn write_text(id: NodeId, out: &mut String) -> Result<()> {
    let own = registry::with_node(id, |e| match &e.data {
        NodeData::Text(content) => Some(content.clone()),
        _ => None,
    })?;
    if let Some(content) = own {
        out.push_str(&content);
        return Ok(());
    }
    for child in visible_children(id)? {
        write_text(child, out)?;
    }
    Ok(())
}

// =============================================================================
// HTML Rendering
// =============================================================================

/// Render the whole attached document.
pub fn render_html() -> Result<String> {
    let mut out = String::new();
    for root in registry::roots() {
        let mut flat = Vec::new();
        collect_visible(root, &mut flat)?;
        for id in flat {
            write_html(id, &mut out)?;
        }
    }
    Ok(out)
}

/// Render one node and its attached descendants.
///
/// Rendering a block anchor renders its children when included and nothing
/// otherwise.
pub fn render_node(id: NodeId) -> Result<String> {
    let mut out = String::new();
    let mut flat = Vec::new();
    collect_visible(id, &mut flat)?;
    for node in flat {
        write_html(node, &mut out)?;
    }
    Ok(out)
}

fn write_html(id: NodeId, out: &mut String) -> Result<()> {
    let data = registry::with_node(id, |e| e.data.clone())?;
    match data {
        NodeData::Text(content) => out.push_str(&escape(&content, false)),
        NodeData::Element { tag, attrs } => {
            out.push('<');
            out.push_str(&tag);
            for (name, value) in attrs.iter() {
                let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
            }
            out.push('>');
            for child in visible_children(id)? {
                write_html(child, out)?;
            }
            let _ = write!(out, "</{}>", tag);
        }
        NodeData::Block => {
            for child in visible_children(id)? {
                write_html(child, out)?;
            }
        }
    }
    Ok(())
}

fn escape(s: &str, attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset the whole thread-local runtime: nodes, listeners and stylesheet.
pub fn reset_document() {
    registry::reset_registry();
    crate::state::events::reset_listeners();
    crate::style::reset_stylesheet();
}
