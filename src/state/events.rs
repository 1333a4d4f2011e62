//! Events Module - Event binding and dispatch.
//!
//! Binds named events on nodes to `(mutator, updater)` pairs. Firing a
//! binding runs the mutator (change raw state) and then the updater
//! (propagate the change to memos, text, blocks and styles). Nothing else is
//! scheduled; the update is complete when [`dispatch`] returns.
//!
//! # API
//!
//! - `listen(node, event, mutator, updater)` - Bind, returns a [`Subscription`]
//! - `dispatch(node, event)` - Fire every binding for `event` on `node`
//! - `listener_count(node)` - Bindings currently on a node
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::{dispatch, listen, set_text};
//!
//! let n = State::new(0);
//! let sub = listen(button, "click",
//!     { let n = n.clone(); move || n.update(|v| *v += 1) },
//!     { let n = n.clone(); move || set_text(count, n.get().to_string()) },
//! )?;
//!
//! dispatch(button, "click")?; // count shows "1"
//! sub.dispose();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::with_config;
use crate::engine::{self, is_attached};
use crate::error::{Result, RuntimeError};
use crate::primitives::Disposable;
use crate::types::{NodeFlags, NodeId};

// =============================================================================
// TYPES
// =============================================================================

/// Changes raw state.
pub type Mutator = Rc<dyn Fn()>;

/// Propagates a state change. Errors abort the dispatch.
pub type Updater = Rc<dyn Fn() -> Result<()>>;

/// Return types accepted from an updater.
pub trait IntoUpdateResult {
    fn into_update_result(self) -> Result<()>;
}

impl IntoUpdateResult for () {
    fn into_update_result(self) -> Result<()> {
        Ok(())
    }
}

impl IntoUpdateResult for Result<()> {
    fn into_update_result(self) -> Result<()> {
        self
    }
}

#[derive(Clone)]
struct Listener {
    id: usize,
    event: String,
    mutator: Mutator,
    updater: Updater,
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct ListenerRegistry {
    by_node: HashMap<NodeId, Vec<Listener>>,
    next_id: usize,
}

impl ListenerRegistry {
    fn new() -> Self {
        Self {
            by_node: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn contains(&self, node: NodeId, id: usize) -> bool {
        self.by_node
            .get(&node)
            .is_some_and(|listeners| listeners.iter().any(|l| l.id == id))
    }
}

thread_local! {
    static REGISTRY: RefCell<ListenerRegistry> = RefCell::new(ListenerRegistry::new());
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle to one binding. Disposing it removes the binding.
#[derive(Debug, Clone)]
pub struct Subscription {
    node: NodeId,
    id: usize,
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether this binding is still registered.
    pub fn is_active(&self) -> bool {
        self.active.get() && REGISTRY.with(|reg| reg.borrow().contains(self.node, self.id))
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        if !self.active.replace(false) {
            return;
        }
        let emptied = REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            let Some(listeners) = reg.by_node.get_mut(&self.node) else {
                return false;
            };
            listeners.retain(|l| l.id != self.id);
            if !listeners.is_empty() {
                return false;
            }
            reg.by_node.remove(&self.node);
            true
        });
        if emptied {
            // Node may already be released
            let _ = engine::with_node_mut(self.node, |e| e.flags.remove(NodeFlags::HAS_LISTENERS));
        }
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// Bind `event` on `node` to a mutator and an updater.
///
/// When the node is released, all of its bindings go with it.
pub fn listen<M, U, R>(node: NodeId, event: &str, mutator: M, updater: U) -> Result<Subscription>
where
    M: Fn() + 'static,
    U: Fn() -> R + 'static,
    R: IntoUpdateResult,
{
    let node_flags = engine::flags(node)?;
    if !node_flags.contains(NodeFlags::HAS_LISTENERS) {
        engine::with_node_mut(node, |e| e.flags.insert(NodeFlags::HAS_LISTENERS))?;
        engine::on_destroy(node, move || remove_node_listeners(node));
    }

    let listener_id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.by_node.entry(node).or_default().push(Listener {
            id,
            event: event.to_string(),
            mutator: Rc::new(mutator),
            updater: Rc::new(move || updater().into_update_result()),
        });
        id
    });

    tracing::trace!(node = %node, event, listener = listener_id, "listener bound");
    Ok(Subscription {
        node,
        id: listener_id,
        active: Rc::new(Cell::new(true)),
    })
}

fn remove_node_listeners(node: NodeId) {
    REGISTRY.with(|reg| {
        reg.borrow_mut().by_node.remove(&node);
    });
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Fire every binding for `event` on `node`, in binding order.
///
/// For each binding the mutator fully completes before the updater starts.
/// The first updater error stops the dispatch and is returned. Nodes inside
/// a detached block receive nothing unless `dispatch_detached` is configured.
///
/// Returns how many bindings fired.
pub fn dispatch(node: NodeId, event: &str) -> Result<usize> {
    if !engine::is_alive(node) {
        return Err(RuntimeError::StaleHandle(node));
    }
    if !is_attached(node)? && !with_config(|c| c.dispatch_detached) {
        tracing::warn!(node = %node, event, "event dispatched to a detached node ignored");
        return Ok(0);
    }

    // Cloned out so handlers may listen, dispose or dispatch freely.
    let listeners: Vec<Listener> = REGISTRY.with(|reg| {
        reg.borrow()
            .by_node
            .get(&node)
            .map(|all| all.iter().filter(|l| l.event == event).cloned().collect())
            .unwrap_or_default()
    });

    let mut fired = 0;
    for listener in listeners {
        // An earlier handler may have removed this one
        let still_bound = REGISTRY.with(|reg| reg.borrow().contains(node, listener.id));
        if !still_bound {
            continue;
        }
        (listener.mutator)();
        (listener.updater)()?;
        fired += 1;
    }

    tracing::trace!(node = %node, event, fired, "event dispatched");
    Ok(fired)
}

/// Number of bindings on a node, across all events.
pub fn listener_count(node: NodeId) -> usize {
    REGISTRY.with(|reg| reg.borrow().by_node.get(&node).map_or(0, Vec::len))
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop every binding.
pub fn reset_listeners() {
    REGISTRY.with(|reg| *reg.borrow_mut() = ListenerRegistry::new());
}
