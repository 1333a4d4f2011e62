//! Scoped styles.
//!
//! A [`Style`] owns one CSS block, generated from the state its generator
//! closes over and namespaced by a [`StyleId`] (typically used as a class
//! name). The block is regenerated only when [`Style::update`] is called, by
//! the same updater that changed the state.
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::{element, style_id, Attrs, Parent, State, Style};
//!
//! let n = State::new(0i64);
//! let sid = style_id();
//!
//! let p = element("p", Attrs::from([("class", sid.as_str())]), Parent::Root)?;
//! let style = Style::new(sid, {
//!     let n = n.clone();
//!     move |id| {
//!         let color = if n.get().abs() >= 10 { "red" } else { "green" };
//!         format!("p.{id} {{ color: {color}; }}")
//!     }
//! })?;
//!
//! n.set(-10);
//! style.update()?; // now red
//! ```

mod sheet;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::with_config;
use crate::error::{Result, RuntimeError};
use crate::primitives::Disposable;

pub use sheet::{css_for, reset_stylesheet, style_count, stylesheet};

// =============================================================================
// StyleId
// =============================================================================

static NEXT_STYLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique scope token for one style block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId {
    serial: u64,
    token: String,
}

/// Allocate a new scope token, `<style_prefix><n>`.
pub fn style_id() -> StyleId {
    let serial = NEXT_STYLE_ID.fetch_add(1, Ordering::Relaxed);
    let token = with_config(|c| format!("{}{}", c.style_prefix, serial));
    StyleId { serial, token }
}

impl StyleId {
    /// The token, as used in class attributes.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Selector for `tag` elements carrying this token as a class.
    pub fn selector(&self, tag: &str) -> String {
        format!("{}.{}", tag, self.token)
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl From<StyleId> for String {
    fn from(id: StyleId) -> Self {
        id.token
    }
}

impl From<&StyleId> for String {
    fn from(id: &StyleId) -> Self {
        id.token.clone()
    }
}

// =============================================================================
// Style
// =============================================================================

struct StyleInner {
    id: StyleId,
    generator: Box<dyn Fn(&StyleId) -> String>,
    disposed: Cell<bool>,
}

/// Handle to a scoped CSS block. Clones share the same block.
#[derive(Clone)]
pub struct Style {
    inner: Rc<StyleInner>,
}

impl Style {
    /// Bind `generator` to `id` and apply its output immediately.
    ///
    /// An id serves one live style at a time; binding it again before the
    /// first style is disposed fails with [`RuntimeError::StyleIdInUse`].
    pub fn new(id: StyleId, generator: impl Fn(&StyleId) -> String + 'static) -> Result<Self> {
        if sheet::contains(&id) {
            return Err(RuntimeError::StyleIdInUse(id));
        }
        Ok(Self::bind(id, generator))
    }

    /// Like [`Style::new`] with a freshly allocated id.
    pub fn scoped(generator: impl Fn(&StyleId) -> String + 'static) -> Self {
        Self::bind(style_id(), generator)
    }

    fn bind(id: StyleId, generator: impl Fn(&StyleId) -> String + 'static) -> Self {
        let css = generator(&id);
        sheet::apply(&id, css);
        tracing::trace!(style = %id, "style applied");

        Self {
            inner: Rc::new(StyleInner {
                id,
                generator: Box::new(generator),
                disposed: Cell::new(false),
            }),
        }
    }

    pub fn id(&self) -> &StyleId {
        &self.inner.id
    }

    /// Regenerate the block and replace the applied text as a whole.
    pub fn update(&self) -> Result<()> {
        if self.inner.disposed.get() {
            return Err(RuntimeError::StyleDisposed(self.inner.id.clone()));
        }
        let css = (self.inner.generator)(&self.inner.id);
        sheet::apply(&self.inner.id, css);
        tracing::trace!(style = %self.inner.id, "style updated");
        Ok(())
    }

    /// CSS text applied at the last update (or construction).
    pub fn css_text(&self) -> Option<String> {
        sheet::css_for(&self.inner.id)
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl Disposable for Style {
    fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        sheet::remove(&self.inner.id);
        tracing::trace!(style = %self.inner.id, "style removed");
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Style")
            .field("id", &self.inner.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
