//! Memo - Cached computation with explicit refresh.
//!
//! A memo computes on first read and then serves its cache until it is
//! refreshed explicitly, either directly or by a [`BatchUpdate`](super::BatchUpdate).
//! Dependencies are never discovered: whoever mutates state decides which
//! memos to refresh and in what order.
//!
//! # Example
//!
//! ```ignore
//! let numbers = State::new(vec![1u64]);
//!
//! let sum = Memo::new({
//!     let numbers = numbers.clone();
//!     move || numbers.with(|v| v.iter().sum::<u64>())
//! });
//!
//! assert_eq!(sum.value()?, 1);   // computed now
//! numbers.update(|v| v.push(1));
//! assert_eq!(sum.value()?, 1);   // still cached
//! sum.refresh()?;
//! assert_eq!(sum.value()?, 2);
//! ```
//!
//! # No cascading
//!
//! A computation may read another memo only if that memo is fresh. Reading
//! a stale memo from inside a refresh fails with
//! [`RuntimeError::NestedRefresh`]; list the dependency first in the batch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ComputeError, Result, RuntimeError};

// =============================================================================
// Refresh Depth
// =============================================================================

thread_local! {
    /// Number of memo computations currently on the stack.
    static REFRESH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// RAII guard marking a computation in progress, restored even on panic.
struct RefreshGuard;

impl RefreshGuard {
    fn enter() -> Self {
        REFRESH_DEPTH.with(|d| d.set(d.get() + 1));
        RefreshGuard
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        REFRESH_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

fn is_refreshing() -> bool {
    REFRESH_DEPTH.with(|d| d.get() > 0)
}

static NEXT_MEMO: AtomicU64 = AtomicU64::new(0);

// =============================================================================
// Refresh trait
// =============================================================================

/// Something a batch can refresh.
pub trait Refresh {
    /// Recompute unconditionally.
    fn refresh(&self) -> Result<()>;

    /// Name used in diagnostics.
    fn label(&self) -> String;
}

// =============================================================================
// Memo
// =============================================================================

type Computation<T> = Box<dyn Fn() -> std::result::Result<T, ComputeError>>;

struct MemoInner<T> {
    label: RefCell<String>,
    compute: Computation<T>,
    cached: RefCell<Option<T>>,
    stale: Cell<bool>,
    refreshes: Cell<u64>,
}

/// Cached computation. Clones share the same cache.
pub struct Memo<T: 'static> {
    inner: Rc<MemoInner<T>>,
}

impl<T: 'static> Memo<T> {
    /// Memo over an infallible computation. Nothing runs until the first read.
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Self::from_computation(Box::new(move || Ok(compute())))
    }

    /// Memo over a computation that can fail.
    ///
    /// A failure surfaces as [`RuntimeError::Recomputation`] from whichever
    /// call triggered the refresh.
    pub fn try_new<E>(compute: impl Fn() -> std::result::Result<T, E> + 'static) -> Self
    where
        E: Into<ComputeError>,
    {
        Self::from_computation(Box::new(move || compute().map_err(Into::into)))
    }

    fn from_computation(compute: Computation<T>) -> Self {
        let serial = NEXT_MEMO.fetch_add(1, Ordering::Relaxed);
        Self {
            inner: Rc::new(MemoInner {
                label: RefCell::new(format!("memo#{serial}")),
                compute,
                cached: RefCell::new(None),
                stale: Cell::new(true),
                refreshes: Cell::new(0),
            }),
        }
    }

    /// Name this memo for errors and traces.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        *self.inner.label.borrow_mut() = label.into();
        self
    }

    /// Recompute now and replace the cache.
    ///
    /// On failure the previous cache is kept and the memo stays as it was.
    /// Called from inside another memo's computation (or its own) it fails
    /// with [`RuntimeError::NestedRefresh`] and computes nothing.
    pub fn refresh(&self) -> Result<()> {
        if is_refreshing() {
            return Err(RuntimeError::NestedRefresh { memo: self.label() });
        }
        let computed = {
            let _guard = RefreshGuard::enter();
            (self.inner.compute)()
        };
        match computed {
            Ok(value) => {
                *self.inner.cached.borrow_mut() = Some(value);
                self.inner.stale.set(false);
                self.inner.refreshes.set(self.inner.refreshes.get() + 1);
                tracing::trace!(memo = %self.label(), "memo refreshed");
                Ok(())
            }
            Err(source) => Err(RuntimeError::Recomputation {
                memo: self.label(),
                source,
            }),
        }
    }

    /// Make the next read recompute.
    pub fn invalidate(&self) {
        self.inner.stale.set(true);
    }

    /// Whether the next read will recompute.
    pub fn is_stale(&self) -> bool {
        self.inner.stale.get()
    }

    /// How many successful computations ran.
    pub fn refresh_count(&self) -> u64 {
        self.inner.refreshes.get()
    }

    /// Run `f` on the current value, computing it first if stale.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        self.ensure_fresh()?;
        let cached = self.inner.cached.borrow();
        match cached.as_ref() {
            Some(value) => Ok(f(value)),
            // ensure_fresh() succeeded, so the cache is filled
            None => Err(RuntimeError::NestedRefresh { memo: self.label() }),
        }
    }

    fn ensure_fresh(&self) -> Result<()> {
        if !self.inner.stale.get() {
            return Ok(());
        }
        if is_refreshing() {
            return Err(RuntimeError::NestedRefresh { memo: self.label() });
        }
        self.refresh()
    }

    /// Label used in errors and traces.
    pub fn label(&self) -> String {
        self.inner.label.borrow().clone()
    }
}

impl<T: Clone + 'static> Memo<T> {
    /// Current value, computing it first if stale.
    pub fn value(&self) -> Result<T> {
        self.with_value(T::clone)
    }

    /// Cached value without computing anything.
    pub fn peek(&self) -> Option<T> {
        self.inner.cached.borrow().clone()
    }
}

impl<T: 'static> Refresh for Memo<T> {
    fn refresh(&self) -> Result<()> {
        Memo::refresh(self)
    }

    fn label(&self) -> String {
        Memo::label(self)
    }
}

impl<T: 'static> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("label", &self.label())
            .field("cached", &self.inner.cached.borrow())
            .field("stale", &self.is_stale())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::State;

    #[test]
    fn test_lazy_first_read() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let memo = Memo::new(move || {
            calls_clone.set(calls_clone.get() + 1);
            42
        });

        assert!(memo.is_stale());
        assert_eq!(calls.get(), 0);
        assert_eq!(memo.peek(), None);

        assert_eq!(memo.value().unwrap(), 42);
        assert_eq!(memo.value().unwrap(), 42);
        assert_eq!(calls.get(), 1);
        assert!(!memo.is_stale());
    }

    #[test]
    fn test_no_implicit_refresh() {
        let n = State::new(1);
        let memo = Memo::new({
            let n = n.clone();
            move || n.get() * 10
        });

        assert_eq!(memo.value().unwrap(), 10);
        n.set(2);
        assert_eq!(memo.value().unwrap(), 10, "refresh is explicit");

        memo.refresh().unwrap();
        assert_eq!(memo.value().unwrap(), 20);

        n.set(3);
        memo.invalidate();
        assert_eq!(memo.value().unwrap(), 30);
        assert_eq!(memo.refresh_count(), 3);
    }

    #[test]
    fn test_failure_keeps_previous_cache() {
        let n = State::new(1i64);
        let memo = Memo::try_new({
            let n = n.clone();
            move || {
                let v = n.get();
                if v < 0 { Err("negative") } else { Ok(v) }
            }
        })
        .with_label("non_negative");

        assert_eq!(memo.value().unwrap(), 1);
        n.set(-1);
        let err = memo.refresh().unwrap_err();
        assert!(matches!(&err, RuntimeError::Recomputation { memo, .. } if memo == "non_negative"));
        assert!(err.to_string().contains("negative"));
        assert_eq!(memo.peek(), Some(1));
    }

    #[test]
    fn test_reading_stale_memo_inside_refresh_fails() {
        let base = Memo::new(|| 2).with_label("base");
        let derived = Memo::try_new({
            let base = base.clone();
            move || base.value().map(|b| b * 2)
        })
        .with_label("derived");

        // base never computed: derived cannot cascade into it
        let err = derived.value().unwrap_err();
        assert!(matches!(err, RuntimeError::Recomputation { .. }));
        assert!(base.is_stale());

        // Dependency first, then dependent
        base.refresh().unwrap();
        assert_eq!(derived.value().unwrap(), 4);
    }

    #[test]
    fn test_explicit_refresh_inside_refresh_fails() {
        let computations = Rc::new(Cell::new(0));
        let base = Memo::new({
            let computations = computations.clone();
            move || {
                computations.set(computations.get() + 1);
                2
            }
        })
        .with_label("base");
        base.refresh().unwrap();

        let derived = Memo::try_new({
            let base = base.clone();
            move || {
                base.refresh()?;
                base.value()
            }
        })
        .with_label("derived");

        let err = derived.refresh().unwrap_err();
        match err {
            RuntimeError::Recomputation { memo, source } => {
                assert_eq!(memo, "derived");
                let inner = source.downcast_ref::<RuntimeError>();
                assert!(
                    matches!(inner, Some(RuntimeError::NestedRefresh { memo }) if memo == "base")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(computations.get(), 1);
        assert!(derived.is_stale());
    }

    #[test]
    fn test_self_refresh_fails_instead_of_recursing() {
        let slot: Rc<RefCell<Option<Memo<u32>>>> = Rc::new(RefCell::new(None));
        let memo = Memo::try_new({
            let slot = slot.clone();
            move || {
                if let Some(me) = slot.borrow().as_ref() {
                    me.refresh()?;
                }
                Ok::<_, RuntimeError>(1)
            }
        })
        .with_label("selfish");
        *slot.borrow_mut() = Some(memo.clone());

        let err = memo.refresh().unwrap_err();
        assert!(matches!(err, RuntimeError::Recomputation { ref memo, .. } if memo == "selfish"));
        assert_eq!(memo.refresh_count(), 0);

        // Break the cycle so the memo can drop
        slot.borrow_mut().take();
    }

    #[test]
    fn test_with_value_borrows() {
        let memo = Memo::new(|| vec![1, 2, 3]);
        assert_eq!(memo.with_value(|v| v.len()).unwrap(), 3);
    }
}
