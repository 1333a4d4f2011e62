//! Control Flow Primitives - Conditional inclusion.
//!
//! [`if_block`] places a block anchor among its parent's children and owns
//! everything constructed under it. The anchor's subtree is attached while
//! the predicate holds and detached otherwise.
//!
//! # Pattern: Detach, Don't Destroy
//!
//! Unlike a re-rendering `show()`, toggling never rebuilds the subtree. It is
//! built once, then attached or detached by flipping the anchor's `HIDDEN`
//! flag, so node identity and bound listeners survive any number of flips.
//!
//! ```ignore
//! let ok = State::new(false);
//!
//! let block = if_block({ let ok = ok.clone(); move || ok.get() }, Parent::Root)?;
//! let p = element("p", Attrs::new(), &block)?;
//!
//! ok.set(true);
//! block.toggle()?; // p attached
//! ```
//!
//! # Nesting
//!
//! A block built under another block's anchor keeps its own cached state.
//! Detaching the outer block hides the inner subtree too; attaching it again
//! restores whatever the inner block last decided.
//!
//! # Ordering
//!
//! Anchors sit among their siblings in declaration order, so any combination
//! of toggles on blocks sharing one parent renders in that same order.

use std::rc::Rc;

use crate::engine::{self, NodeData, allocate, set_hidden};
use crate::error::Result;
use crate::primitives::Disposable;
use crate::types::{NodeFlags, NodeId, Parent};

// =============================================================================
// ConditionalBlock
// =============================================================================

struct BlockInner {
    anchor: NodeId,
    predicate: Box<dyn Fn() -> bool>,
}

/// Handle to a conditional block.
///
/// Cloning shares the same block.
#[derive(Clone)]
pub struct ConditionalBlock {
    inner: Rc<BlockInner>,
}

/// Create a conditional block under `parent`.
///
/// The predicate is evaluated once now to decide the initial state. Nodes
/// constructed with the block as parent are visible only while it is
/// included.
pub fn if_block(
    predicate: impl Fn() -> bool + 'static,
    parent: impl Into<Parent>,
) -> Result<ConditionalBlock> {
    let anchor = allocate(NodeData::Block, parent.into())?;
    let included = predicate();
    if !included {
        // Initial state, not a transition: the subtree is still empty.
        engine::with_node_mut(anchor, |e| e.flags.insert(NodeFlags::HIDDEN))?;
    }
    tracing::trace!(block = %anchor, included, "conditional block created");

    Ok(ConditionalBlock {
        inner: Rc::new(BlockInner {
            anchor,
            predicate: Box::new(predicate),
        }),
    })
}

impl ConditionalBlock {
    /// The block's insertion anchor. Use it (or `&block`) as a parent.
    pub fn anchor(&self) -> NodeId {
        self.inner.anchor
    }

    /// Re-evaluate the predicate and reconcile the subtree with it.
    ///
    /// Performs at most one structural operation. Returns `true` when the
    /// inclusion state changed.
    pub fn toggle(&self) -> Result<bool> {
        let included = (self.inner.predicate)();
        let changed = set_hidden(self.inner.anchor, !included)?;
        if changed {
            tracing::trace!(block = %self.inner.anchor, included, "conditional block toggled");
        }
        Ok(changed)
    }

    /// Cached result of the last predicate evaluation.
    ///
    /// Returns `false` once the block has been disposed.
    pub fn is_included(&self) -> bool {
        engine::flags(self.inner.anchor)
            .map(|flags| !flags.contains(NodeFlags::HIDDEN))
            .unwrap_or(false)
    }

    /// Whether the block itself is still alive.
    pub fn is_alive(&self) -> bool {
        engine::is_alive(self.inner.anchor)
    }
}

impl Disposable for ConditionalBlock {
    fn dispose(&self) {
        engine::release_node(self.inner.anchor);
    }
}

impl From<&ConditionalBlock> for Parent {
    fn from(block: &ConditionalBlock) -> Self {
        Parent::Node(block.anchor())
    }
}

impl std::fmt::Debug for ConditionalBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionalBlock")
            .field("anchor", &self.inner.anchor)
            .field("included", &self.is_included())
            .finish()
    }
}
