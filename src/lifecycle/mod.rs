//! Lifecycle - Components and mount effects.
//!
//! - [`Component`] - Owns nodes, blocks, styles, subscriptions and effects
//! - [`Effect`] - Runs on mount, tears down on unmount

mod component;
mod effect;

pub use component::{Component, Owned};
pub use effect::Effect;
