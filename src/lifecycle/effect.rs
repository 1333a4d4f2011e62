//! Effect - Mount callback with optional teardown.
//!
//! An effect does nothing until its component mounts. Mounting runs the
//! callback once; if the callback returned a teardown, unmounting runs it
//! once. Mount/unmount pairs can repeat if the component is remounted.
//!
//! ```ignore
//! let effect = Effect::new(|| {
//!     tracing::info!("component A mounted");
//!     Box::new(|| tracing::info!("component A unmounted")) as Cleanup
//! });
//! component.on_mount(&effect)?;
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::primitives::{Cleanup, Disposable, IntoTeardown};

struct EffectInner {
    mount_fn: RefCell<Box<dyn FnMut() -> Option<Cleanup>>>,
    teardown: RefCell<Option<Cleanup>>,
    mounted: Cell<bool>,
    mounts: Cell<u64>,
}

/// Handle to an effect. Clones share the same effect.
#[derive(Clone)]
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    /// Create an inert effect. The callback may return `()`, a [`Cleanup`]
    /// or an `Option<Cleanup>`.
    pub fn new<F, R>(mut mount_fn: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: IntoTeardown,
    {
        Self {
            inner: Rc::new(EffectInner {
                mount_fn: RefCell::new(Box::new(move || mount_fn().into_teardown())),
                teardown: RefCell::new(None),
                mounted: Cell::new(false),
                mounts: Cell::new(0),
            }),
        }
    }

    /// Run the mount callback. No-op if already mounted.
    pub fn mount(&self) {
        if self.inner.mounted.replace(true) {
            return;
        }
        self.inner.mounts.set(self.inner.mounts.get() + 1);
        let teardown = {
            let mut mount_fn = self.inner.mount_fn.borrow_mut();
            let mount_fn = &mut *mount_fn;
            mount_fn()
        };
        *self.inner.teardown.borrow_mut() = teardown;
    }

    /// Run the stored teardown, if any. No-op if not mounted.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        let teardown = self.inner.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// How many times the mount callback ran.
    pub fn mount_count(&self) -> u64 {
        self.inner.mounts.get()
    }
}

impl Disposable for Effect {
    fn dispose(&self) {
        self.unmount();
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("mounted", &self.is_mounted())
            .field("mounts", &self.mount_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_until_mounted() {
        let ran = Rc::new(Cell::new(0));
        let ran_clone = ran.clone();
        let effect = Effect::new(move || ran_clone.set(ran_clone.get() + 1));

        assert_eq!(ran.get(), 0);
        effect.mount();
        effect.mount();
        assert_eq!(ran.get(), 1);
        assert!(effect.is_mounted());
    }

    #[test]
    fn test_teardown_pairs_with_mount() {
        let torn = Rc::new(Cell::new(0));
        let torn_clone = torn.clone();
        let effect = Effect::new(move || {
            let torn = torn_clone.clone();
            Box::new(move || torn.set(torn.get() + 1)) as Cleanup
        });

        effect.mount();
        effect.unmount();
        effect.unmount();
        assert_eq!(torn.get(), 1);

        effect.mount();
        effect.dispose();
        assert_eq!(torn.get(), 2);
        assert_eq!(effect.mount_count(), 2);
    }

    #[test]
    fn test_no_teardown_is_noop_on_unmount() {
        let effect = Effect::new(|| None::<Cleanup>);
        effect.mount();
        effect.unmount();
        assert!(!effect.is_mounted());
    }
}
