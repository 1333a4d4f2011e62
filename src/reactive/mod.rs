//! Reactive values - State cells, memos and batches.
//!
//! - [`State`] - Raw state owned by a component
//! - [`Memo`] - Cached computation, refreshed explicitly
//! - [`BatchUpdate`] - Refresh memos first, then apply writes
//!
//! Dependencies are declared by the call site, never inferred. An updater
//! lists the memos to refresh (dependencies before dependents) and the
//! targets to rewrite.

mod batch;
mod memo;
mod state;

pub use batch::{BatchUpdate, Target};
pub use memo::{Memo, Refresh};
pub use state::State;
