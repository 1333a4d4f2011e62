//! Interaction state - Event bindings.
//!
//! - [`events`] - `listen`/`dispatch`, the only way updates are triggered

pub mod events;

pub use events::{
    IntoUpdateResult, Mutator, Subscription, Updater, dispatch, listen, listener_count,
    reset_listeners,
};
