//! # spark-dom
//!
//! Headless reactive document runtime for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for state cells.
//!
//! ## Architecture
//!
//! Nodes live in one thread-local arena and are addressed by generational
//! [`NodeId`] handles. Nothing is re-rendered implicitly: every change flows
//! through an explicit event binding.
//!
//! ```text
//! dispatch(node, event) → mutator (raw State) → updater
//!                                                 ├─ Memo::refresh / BatchUpdate
//!                                                 ├─ set_text / set_attr
//!                                                 ├─ ConditionalBlock::toggle
//!                                                 └─ Style::update
//! ```
//!
//! A [`Component`] owns what it registers and disposes it in reverse
//! registration order.
//!
//! ## Modules
//!
//! - [`types`] - Node handles, kinds, flags, attributes, insertion points
//! - [`engine`] - Node registry and headless document queries
//! - [`primitives`] - Elements, text, conditional blocks
//! - [`reactive`] - State cells, memos, batched updates
//! - [`state`] - Event binding and dispatch
//! - [`style`] - Scoped, regenerable CSS blocks
//! - [`lifecycle`] - Components and mount effects
//! - [`config`] - Runtime configuration
//! - [`error`] - Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod primitives;
pub mod reactive;
pub mod state;
pub mod style;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{ComputeError, ConstructionError, Result, RuntimeError};

pub use config::{RuntimeConfig, config, configure, reset_config};

pub use engine::{
    children, flags, is_alive, is_attached, kind, node_count, parent, release_node, render_html,
    render_node, reset_document, roots, structural_ops, text_content, visible_children,
};

pub use primitives::{
    Cleanup, ConditionalBlock, Disposable, IntoTeardown, attr, element, if_block, set_attr,
    set_text, space, tag, text, text_of,
};

pub use reactive::{BatchUpdate, Memo, Refresh, State, Target};

pub use state::{IntoUpdateResult, Subscription, dispatch, listen, listener_count};

pub use style::{Style, StyleId, css_for, style_count, style_id, stylesheet};

pub use lifecycle::{Component, Effect, Owned};
