//! Node Registry - Slot allocation for the headless document.
//!
//! Manages the lifecycle of node slots:
//! - Generational handles (a released slot never aliases an old handle)
//! - Free slot pool for O(1) reuse
//! - Parent/child ownership edges in declaration order
//! - Destroy callbacks run when a node is released

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{ConstructionError, Result, RuntimeError};
use crate::types::{Attrs, NodeFlags, NodeId, NodeKind, Parent};

// =============================================================================
// Node Storage
// =============================================================================

/// Payload of a node.
#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Element { tag: String, attrs: Attrs },
    Text(String),
    Block,
}

impl NodeData {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Block => NodeKind::Block,
        }
    }
}

/// A live node.
#[derive(Debug)]
pub(crate) struct NodeEntry {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) flags: NodeFlags,
}

struct Slot {
    generation: u32,
    entry: Option<NodeEntry>,
}

struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    destroy_callbacks: HashMap<NodeId, Vec<Box<dyn FnOnce()>>>,
    structural_ops: u64,
}

impl Registry {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            destroy_callbacks: HashMap::new(),
            structural_ops: 0,
        }
    }

    fn get(&self, id: NodeId) -> Option<&NodeEntry> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    fn insert(&mut self, entry: NodeEntry) -> NodeId {
        // Reuse free slot or grow
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            NodeId::new(index, 0)
        }
    }

    /// Drop the entry and unlink it from its owner. Tolerates repeated calls.
    fn remove(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index()) else { return };
        if slot.generation != id.generation {
            return;
        }
        let Some(entry) = slot.entry.take() else { return };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        match entry.parent {
            Some(parent) => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::new());
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocate a node and append it under `parent`.
///
/// The parent must be alive and must not be a text node.
pub(crate) fn allocate(data: NodeData, parent: Parent) -> Result<NodeId> {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();

        if let Parent::Node(parent_id) = parent {
            let Some(parent_entry) = reg.get(parent_id) else {
                return Err(ConstructionError::MissingParent { parent: parent_id }.into());
            };
            if !parent_entry.data.kind().can_have_children() {
                return Err(ConstructionError::TextParent { parent: parent_id }.into());
            }
        }

        let id = reg.insert(NodeEntry {
            data,
            parent: parent.node(),
            children: Vec::new(),
            flags: NodeFlags::NONE,
        });

        match parent {
            Parent::Node(parent_id) => {
                if let Some(parent_entry) = reg.get_mut(parent_id) {
                    parent_entry.children.push(id);
                }
            }
            Parent::Root => reg.roots.push(id),
        }

        tracing::trace!(node = %id, ?parent, "node allocated");
        Ok(id)
    })
}

/// Release a node and, recursively, every node it owns.
///
/// Children go first (last declared first), then the node's destroy callbacks
/// run, then the slot is freed. Releasing a stale handle is a no-op.
pub fn release_node(id: NodeId) {
    let children = REGISTRY.with(|reg| reg.borrow().get(id).map(|e| e.children.clone()));
    let Some(children) = children else { return };

    for child in children.into_iter().rev() {
        release_node(child);
    }

    run_destroy_callbacks(id);

    REGISTRY.with(|reg| reg.borrow_mut().remove(id));
    tracing::trace!(node = %id, "node released");
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the node is released.
pub(crate) fn on_destroy(id: NodeId, callback: impl FnOnce() + 'static) {
    REGISTRY.with(|reg| {
        reg.borrow_mut()
            .destroy_callbacks
            .entry(id)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for a node.
fn run_destroy_callbacks(id: NodeId) {
    // Taken out first: callbacks are free to touch the registry.
    let callbacks = REGISTRY.with(|reg| reg.borrow_mut().destroy_callbacks.remove(&id));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Access
// =============================================================================

/// Run `f` against a live node.
pub(crate) fn with_node<R>(id: NodeId, f: impl FnOnce(&NodeEntry) -> R) -> Result<R> {
    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        reg.get(id).map(f).ok_or(RuntimeError::StaleHandle(id))
    })
}

/// Run `f` against a live node, mutably.
pub(crate) fn with_node_mut<R>(id: NodeId, f: impl FnOnce(&mut NodeEntry) -> R) -> Result<R> {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.get_mut(id).map(f).ok_or(RuntimeError::StaleHandle(id))
    })
}

/// Whether the handle still refers to a live node.
pub fn is_alive(id: NodeId) -> bool {
    REGISTRY.with(|reg| reg.borrow().get(id).is_some())
}

/// Kind of a live node.
pub fn kind(id: NodeId) -> Result<NodeKind> {
    with_node(id, |e| e.data.kind())
}

/// Owner of a node (`None` for document roots).
pub fn parent(id: NodeId) -> Result<Option<NodeId>> {
    with_node(id, |e| e.parent)
}

/// Children of a node in declaration order, attached or not.
pub fn children(id: NodeId) -> Result<Vec<NodeId>> {
    with_node(id, |e| e.children.clone())
}

/// Flags of a node.
pub fn flags(id: NodeId) -> Result<NodeFlags> {
    with_node(id, |e| e.flags)
}

/// Document roots in declaration order.
pub fn roots() -> Vec<NodeId> {
    REGISTRY.with(|reg| reg.borrow().roots.clone())
}

/// Number of live nodes.
pub fn node_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().len())
}

// =============================================================================
// Structural Changes
// =============================================================================

/// Set or clear the `HIDDEN` flag of a block anchor.
///
/// Returns whether anything changed. Every change counts as one structural
/// operation (an attach or a detach of the anchored subtree).
pub(crate) fn set_hidden(id: NodeId, hidden: bool) -> Result<bool> {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let entry = reg.get_mut(id).ok_or(RuntimeError::StaleHandle(id))?;
        if entry.flags.contains(NodeFlags::HIDDEN) == hidden {
            return Ok(false);
        }
        entry.flags.set(NodeFlags::HIDDEN, hidden);
        reg.structural_ops += 1;
        Ok(true)
    })
}

/// Total attach/detach operations performed so far.
pub fn structural_ops() -> u64 {
    REGISTRY.with(|reg| reg.borrow().structural_ops)
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every node without running destroy callbacks.
pub(crate) fn reset_registry() {
    REGISTRY.with(|reg| *reg.borrow_mut() = Registry::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn element(tag: &str, parent: Parent) -> NodeId {
        allocate(
            NodeData::Element {
                tag: tag.into(),
                attrs: Attrs::new(),
            },
            parent,
        )
        .unwrap()
    }

    #[test]
    fn test_allocate_in_declaration_order() {
        reset_registry();

        let root = element("div", Parent::Root);
        let a = element("p", root.into());
        let b = element("span", root.into());

        assert_eq!(roots(), vec![root]);
        assert_eq!(children(root).unwrap(), vec![a, b]);
        assert_eq!(parent(a).unwrap(), Some(root));
        assert_eq!(node_count(), 3);
    }

    #[test]
    fn test_release_recursive_and_reuse_with_new_generation() {
        reset_registry();

        let root = element("div", Parent::Root);
        let child = element("p", root.into());

        release_node(root);
        assert!(!is_alive(root));
        assert!(!is_alive(child));
        assert_eq!(node_count(), 0);

        // Reuses a freed slot but the old handle stays dead
        let fresh = element("div", Parent::Root);
        assert!(fresh.index() == root.index() || fresh.index() == child.index());
        assert!(!is_alive(root));
        assert!(!is_alive(child));
        assert!(is_alive(fresh));
    }

    #[test]
    fn test_missing_and_text_parent_rejected() {
        reset_registry();

        let root = element("div", Parent::Root);
        release_node(root);
        let err = allocate(NodeData::Block, root.into()).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Construction(ConstructionError::MissingParent { .. })
        ));

        let text = allocate(NodeData::Text("hi".into()), Parent::Root).unwrap();
        let err = allocate(NodeData::Block, text.into()).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Construction(ConstructionError::TextParent { .. })
        ));
    }

    #[test]
    fn test_destroy_callback_runs_once() {
        reset_registry();

        let called = Rc::new(Cell::new(0));
        let called_clone = called.clone();

        let node = element("p", Parent::Root);
        on_destroy(node, move || called_clone.set(called_clone.get() + 1));

        release_node(node);
        release_node(node);
        assert_eq!(called.get(), 1);
    }

    #[test]
    fn test_set_hidden_counts_changes_only() {
        reset_registry();

        let block = allocate(NodeData::Block, Parent::Root).unwrap();
        let before = structural_ops();

        assert!(set_hidden(block, true).unwrap());
        assert!(!set_hidden(block, true).unwrap());
        assert!(set_hidden(block, false).unwrap());
        assert_eq!(structural_ops() - before, 2);
    }
}
