//! Error types for the runtime.

use thiserror::Error;

use crate::style::StyleId;
use crate::types::NodeId;

/// Error produced by a user computation (memo body, batch producer).
pub type ComputeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A node could not be constructed at the requested insertion point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The parent handle does not exist or was already disposed.
    #[error("parent {parent} does not exist or was disposed")]
    MissingParent { parent: NodeId },

    /// Text nodes cannot own children.
    #[error("text node {parent} cannot have children")]
    TextParent { parent: NodeId },
}

/// Errors returned by the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Node or block construction failed.
    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),

    /// A memo's computation failed. Remaining batched work was abandoned.
    #[error("memo `{memo}` failed to recompute: {source}")]
    Recomputation {
        memo: String,
        #[source]
        source: ComputeError,
    },

    /// A stale memo was read while another memo was refreshing.
    #[error("memo `{memo}` is stale and cannot be refreshed from inside another computation")]
    NestedRefresh { memo: String },

    /// The component was disposed twice (only with `strict_dispose`).
    #[error("component `{component}` was already disposed")]
    DoubleDispose { component: String },

    /// The component is disposed and can no longer be mounted or extended.
    #[error("component `{component}` is disposed")]
    ComponentDisposed { component: String },

    /// The node handle refers to a node that no longer exists.
    #[error("node {0} has been disposed")]
    StaleHandle(NodeId),

    /// The node exists but has the wrong kind for the operation.
    #[error("node {node} is not a {expected} node")]
    WrongKind { node: NodeId, expected: &'static str },

    /// The style was disposed and can no longer be updated.
    #[error("style `{0}` has been disposed")]
    StyleDisposed(StyleId),

    /// Another live style is already bound to this id.
    #[error("style id `{0}` is already bound to a live style")]
    StyleIdInUse(StyleId),
}

impl RuntimeError {
    /// Wrap a computation failure for the memo with the given label.
    pub fn recomputation(memo: impl Into<String>, source: impl Into<ComputeError>) -> Self {
        RuntimeError::Recomputation {
            memo: memo.into(),
            source: source.into(),
        }
    }
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
