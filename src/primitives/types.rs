//! Primitive types - Cleanup and disposal.

use crate::engine::release_node;
use crate::types::NodeId;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Teardown returned by an effect's mount callback.
pub type Cleanup = Box<dyn FnOnce()>;

/// Return types accepted from an effect's mount callback.
///
/// `()` means "nothing to tear down".
pub trait IntoTeardown {
    fn into_teardown(self) -> Option<Cleanup>;
}

impl IntoTeardown for () {
    fn into_teardown(self) -> Option<Cleanup> {
        None
    }
}

impl IntoTeardown for Cleanup {
    fn into_teardown(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoTeardown for Option<Cleanup> {
    fn into_teardown(self) -> Option<Cleanup> {
        self
    }
}

// =============================================================================
// Disposable
// =============================================================================

/// Anything a component can own and release.
///
/// `dispose` must be idempotent: the second call does nothing.
pub trait Disposable {
    fn dispose(&self);
}

impl Disposable for NodeId {
    fn dispose(&self) {
        release_node(*self);
    }
}
