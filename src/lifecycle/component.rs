//! Component - Ownership and lifecycle root.
//!
//! A component owns what it registers: nodes, blocks, styles, event
//! subscriptions, effects and nested components. It is the unit of mount,
//! unmount and disposal.
//!
//! # Lifecycle
//!
//! ```text
//! Unmounted --mount()--> Mounted --unmount()--> Unmounted
//!     |                     |
//!     +-----dispose()-------+-----> Disposed (final)
//! ```
//!
//! - Mount: own effects in registration order, then nested components in
//!   registration order (parent before children).
//! - Unmount: effects and nested components in reverse registration order.
//! - Dispose: every owned item in reverse registration order, exactly once.
//!   A second dispose is a no-op (or an error with `strict_dispose`).
//!
//! Dropping the last handle to a component that was never disposed disposes
//! it.
//!
//! # Example
//!
//! ```ignore
//! let app = Component::new("App");
//!
//! let p = element("p", Attrs::new(), Parent::Root)?;
//! let t = text("current count is 0", p)?;
//! let effect = Effect::new(|| tracing::info!("mounted"));
//!
//! app.on_mount(&effect)?;
//! app.register(p)?;
//! app.mount()?;
//! // ...
//! app.dispose()?;
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::config::with_config;
use crate::error::{Result, RuntimeError};
use crate::lifecycle::Effect;
use crate::primitives::{ConditionalBlock, Disposable};
use crate::state::Subscription;
use crate::style::Style;
use crate::types::{MountState, NodeId};

// =============================================================================
// Owned - What a component can own
// =============================================================================

/// One item owned by a component.
#[derive(Clone)]
pub enum Owned {
    Node(NodeId),
    Block(ConditionalBlock),
    Style(Style),
    Subscription(Subscription),
    Effect(Effect),
    Component(Component),
    /// Any other disposable resource.
    Other(Rc<dyn Disposable>),
}

impl Owned {
    fn dispose(&self) {
        match self {
            Owned::Node(node) => node.dispose(),
            Owned::Block(block) => block.dispose(),
            Owned::Style(style) => style.dispose(),
            Owned::Subscription(sub) => sub.dispose(),
            Owned::Effect(effect) => effect.dispose(),
            Owned::Component(component) => component.dispose_quiet(),
            Owned::Other(other) => other.dispose(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Owned::Node(_) => "node",
            Owned::Block(_) => "block",
            Owned::Style(_) => "style",
            Owned::Subscription(_) => "subscription",
            Owned::Effect(_) => "effect",
            Owned::Component(_) => "component",
            Owned::Other(_) => "other",
        }
    }
}

impl From<NodeId> for Owned {
    fn from(node: NodeId) -> Self {
        Owned::Node(node)
    }
}

impl From<ConditionalBlock> for Owned {
    fn from(block: ConditionalBlock) -> Self {
        Owned::Block(block)
    }
}

impl From<&ConditionalBlock> for Owned {
    fn from(block: &ConditionalBlock) -> Self {
        Owned::Block(block.clone())
    }
}

impl From<Style> for Owned {
    fn from(style: Style) -> Self {
        Owned::Style(style)
    }
}

impl From<&Style> for Owned {
    fn from(style: &Style) -> Self {
        Owned::Style(style.clone())
    }
}

impl From<Subscription> for Owned {
    fn from(sub: Subscription) -> Self {
        Owned::Subscription(sub)
    }
}

impl From<Effect> for Owned {
    fn from(effect: Effect) -> Self {
        Owned::Effect(effect)
    }
}

impl From<Component> for Owned {
    fn from(component: Component) -> Self {
        Owned::Component(component)
    }
}

impl From<&Component> for Owned {
    fn from(component: &Component) -> Self {
        Owned::Component(component.clone())
    }
}

impl From<Rc<dyn Disposable>> for Owned {
    fn from(other: Rc<dyn Disposable>) -> Self {
        Owned::Other(other)
    }
}

// =============================================================================
// Component
// =============================================================================

struct ComponentInner {
    name: String,
    state: Cell<MountState>,
    owned: RefCell<Vec<Owned>>,
}

impl ComponentInner {
    /// Dispose every owned item, last registered first.
    fn teardown(&self) {
        self.state.set(MountState::Disposed);
        let owned = std::mem::take(&mut *self.owned.borrow_mut());
        let count = owned.len();
        for item in owned.iter().rev() {
            tracing::trace!(component = %self.name, kind = item.kind(), "disposing owned item");
            item.dispose();
        }
        tracing::debug!(component = %self.name, items = count, "component disposed");
    }
}

impl Drop for ComponentInner {
    fn drop(&mut self) {
        if self.state.get() != MountState::Disposed {
            self.teardown();
        }
    }
}

/// Handle to a component. Clones share the same component.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ComponentInner {
                name: name.into(),
                state: Cell::new(MountState::Unmounted),
                owned: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> MountState {
        self.inner.state.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.state() == MountState::Mounted
    }

    /// Number of items currently owned.
    pub fn owned_count(&self) -> usize {
        self.inner.owned.borrow().len()
    }

    fn disposed_error(&self) -> RuntimeError {
        RuntimeError::ComponentDisposed {
            component: self.inner.name.clone(),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Take ownership of `item`.
    ///
    /// Effects and nested components registered while this component is
    /// mounted are mounted right away. A disposed nested component is
    /// rejected and nothing is registered.
    pub fn register(&self, item: impl Into<Owned>) -> Result<&Self> {
        if self.state() == MountState::Disposed {
            return Err(self.disposed_error());
        }
        let item = item.into();
        if let Owned::Component(child) = &item {
            if child.state() == MountState::Disposed {
                return Err(child.disposed_error());
            }
        }

        if self.is_mounted() {
            match &item {
                Owned::Effect(effect) => effect.mount(),
                Owned::Component(child) => child.mount()?,
                _ => {}
            }
        }
        self.inner.owned.borrow_mut().push(item);
        Ok(self)
    }

    /// Register several items in order.
    pub fn register_all(&self, items: impl IntoIterator<Item = Owned>) -> Result<()> {
        for item in items {
            self.register(item)?;
        }
        Ok(())
    }

    /// Run `effect` whenever this component mounts.
    pub fn on_mount(&self, effect: &Effect) -> Result<()> {
        self.register(effect.clone()).map(|_| ())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mount: effects first, then nested components. No-op if mounted.
    pub fn mount(&self) -> Result<()> {
        match self.state() {
            MountState::Disposed => return Err(self.disposed_error()),
            MountState::Mounted => return Ok(()),
            MountState::Unmounted => {}
        }
        self.inner.state.set(MountState::Mounted);

        // Snapshot: effects may register more items while running
        let owned = self.inner.owned.borrow().clone();
        for item in &owned {
            if let Owned::Effect(effect) = item {
                effect.mount();
            }
        }
        for item in &owned {
            if let Owned::Component(child) = item {
                // Disposed on its own; nothing left to mount
                if child.state() == MountState::Disposed {
                    continue;
                }
                child.mount()?;
            }
        }

        tracing::debug!(component = %self.inner.name, "component mounted");
        Ok(())
    }

    /// Unmount: tear down effects and nested components, last first.
    ///
    /// Nodes, styles and subscriptions stay in place. No-op unless mounted.
    pub fn unmount(&self) {
        if self.state() != MountState::Mounted {
            return;
        }
        self.inner.state.set(MountState::Unmounted);

        let owned = self.inner.owned.borrow().clone();
        for item in owned.iter().rev() {
            match item {
                Owned::Effect(effect) => effect.unmount(),
                Owned::Component(child) => child.unmount(),
                _ => {}
            }
        }

        tracing::debug!(component = %self.inner.name, "component unmounted");
    }

    /// Dispose everything this component owns, last registered first.
    ///
    /// Calling it again is a no-op, or [`RuntimeError::DoubleDispose`] when
    /// `strict_dispose` is configured.
    pub fn dispose(&self) -> Result<()> {
        if self.state() == MountState::Disposed {
            if with_config(|c| c.strict_dispose) {
                return Err(RuntimeError::DoubleDispose {
                    component: self.inner.name.clone(),
                });
            }
            tracing::warn!(component = %self.inner.name, "component disposed twice");
            return Ok(());
        }
        self.inner.teardown();
        Ok(())
    }

    /// Dispose, ignoring a repeated call regardless of configuration.
    fn dispose_quiet(&self) {
        if self.state() != MountState::Disposed {
            self.inner.teardown();
        }
    }
}

impl Disposable for Component {
    fn dispose(&self) {
        self.dispose_quiet();
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .field("owned", &self.owned_count())
            .finish()
    }
}
