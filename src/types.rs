//! Core types for the headless document.
//!
//! Node handles, node kinds, per-node flags, attribute lists and the
//! insertion point used when constructing nodes.

use std::fmt;

// =============================================================================
// NodeId - Generational handle into the node arena
// =============================================================================

/// Opaque handle to a node in the document.
///
/// The `generation` changes every time a slot is reused, so a handle that
/// outlived its node is detected instead of silently aliasing a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the arena.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// NodeKind
// =============================================================================

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Element with a tag and attributes. Can own children.
    Element,
    /// Text leaf. Cannot own children.
    Text,
    /// Insertion anchor of a conditional block. Owns the block's subtree.
    Block,
}

impl NodeKind {
    /// Human readable name used in errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Block => "block",
        }
    }

    /// Whether nodes of this kind may be used as a parent.
    pub fn can_have_children(&self) -> bool {
        !matches!(self, NodeKind::Text)
    }
}

// =============================================================================
// Node Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// Block anchor whose subtree is currently detached.
        const HIDDEN = 1 << 0;
        /// The node currently has at least one event listener.
        const HAS_LISTENERS = 1 << 1;
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Ordered attribute list of an element.
///
/// Insertion order is preserved so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    /// Empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`Attrs::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute, returning its old value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attrs {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// =============================================================================
// Parent - Insertion point for construction
// =============================================================================

/// Where a newly constructed node is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parent {
    /// Top level of the document.
    #[default]
    Root,
    /// Last child of an element or block anchor.
    Node(NodeId),
}

impl Parent {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Parent::Root => None,
            Parent::Node(id) => Some(*id),
        }
    }
}

impl From<NodeId> for Parent {
    fn from(id: NodeId) -> Self {
        Parent::Node(id)
    }
}

impl From<Option<NodeId>> for Parent {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Parent::Root, Parent::Node)
    }
}

// =============================================================================
// MountState
// =============================================================================

/// Lifecycle state of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountState {
    #[default]
    Unmounted,
    Mounted,
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_preserve_order_and_replace_in_place() {
        let mut attrs = Attrs::from([("class", "a"), ("id", "x")]);
        attrs.set("class", "b");
        attrs.set("title", "t");

        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("class", "b"), ("id", "x"), ("title", "t")]);
        assert_eq!(attrs.remove("id"), Some("x".to_string()));
        assert_eq!(attrs.get("id"), None);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_parent_conversions() {
        let id = NodeId::new(3, 1);
        assert_eq!(Parent::from(id), Parent::Node(id));
        assert_eq!(Parent::from(None::<NodeId>), Parent::Root);
        assert_eq!(Parent::Root.node(), None);
    }

    #[test]
    fn test_flags_default_empty() {
        let mut flags = NodeFlags::default();
        assert!(flags.is_empty());
        flags.insert(NodeFlags::HIDDEN);
        assert!(flags.contains(NodeFlags::HIDDEN));
        assert!(!flags.contains(NodeFlags::HAS_LISTENERS));
    }
}
