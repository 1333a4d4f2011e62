//! State cells - Raw component state.
//!
//! A [`State`] is the explicit home of a value that mutators change and
//! computations read. It wraps a spark-signals [`Signal`] and counts writes,
//! so a caller can tell whether anything happened since it last looked.
//!
//! Nothing subscribes to a `State` automatically. Updaters decide what to
//! refresh after a mutator ran.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use spark_signals::{Signal, signal};

/// Reactive cell owned by one component instance.
///
/// Clones share the same cell; hand a clone to each mutator or computation
/// that needs it.
pub struct State<T: Clone + PartialEq + 'static> {
    value: Signal<T>,
    generation: Rc<Cell<u64>>,
}

impl<T: Clone + PartialEq + 'static> State<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: signal(initial),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.value.set(value);
        self.generation.set(self.generation.get() + 1);
    }

    /// Modify the value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.value.get();
        f(&mut value);
        self.set(value);
    }

    /// Read through a closure.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.get())
    }

    /// Number of writes so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

impl<T: Clone + PartialEq + 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.get())
            .field("generation", &self.generation())
            .finish()
    }
}
