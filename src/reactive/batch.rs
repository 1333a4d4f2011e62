//! BatchUpdate - Refresh memos, then write targets.
//!
//! A batch runs in two phases:
//! 1. Refresh every listed memo, in the listed order
//! 2. Run every `(target, producer)` pair, in the listed order
//!
//! No write happens before the last memo refreshed, so no target ever shows a
//! mix of old and new memo values. Ordering is the caller's job: list a
//! memo's dependencies before the memo itself.
//!
//! # Failure
//!
//! The first error aborts the batch and is returned. Writes applied before
//! the failure stay applied; keep computations total to avoid that.
//!
//! # Example
//!
//! ```ignore
//! BatchUpdate::new()
//!     .memo(&joined)
//!     .memo(&sum)
//!     .write(joined_text, || joined.value())
//!     .write(sum_text, || sum.value())
//!     .run()?;
//! ```

use std::fmt::Display;

use crate::error::Result;
use crate::primitives::{set_attr, set_text};
use crate::types::NodeId;

use super::memo::Refresh;

// =============================================================================
// Target
// =============================================================================

/// Where a producer's output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Content of a text node.
    Text(NodeId),
    /// One attribute of an element.
    Attr(NodeId, String),
}

impl Target {
    fn apply(&self, value: String) -> Result<()> {
        match self {
            Target::Text(node) => set_text(*node, value),
            Target::Attr(node, name) => set_attr(*node, name, value),
        }
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Text(node)
    }
}

// =============================================================================
// BatchUpdate
// =============================================================================

type Producer<'a> = Box<dyn Fn() -> Result<String> + 'a>;

/// Ordered list of memo refreshes followed by target writes.
#[derive(Default)]
pub struct BatchUpdate<'a> {
    memos: Vec<&'a dyn Refresh>,
    writes: Vec<(Target, Producer<'a>)>,
}

impl<'a> BatchUpdate<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh `memo` in phase one.
    pub fn memo(mut self, memo: &'a dyn Refresh) -> Self {
        self.memos.push(memo);
        self
    }

    /// Write `producer()` into `target` in phase two.
    pub fn write<V, F>(mut self, target: impl Into<Target>, producer: F) -> Self
    where
        V: Display,
        F: Fn() -> Result<V> + 'a,
    {
        let producer: Producer<'a> = Box::new(move || producer().map(|v| v.to_string()));
        self.writes.push((target.into(), producer));
        self
    }

    /// Run both phases, stopping at the first error.
    pub fn run(self) -> Result<()> {
        for memo in &self.memos {
            memo.refresh()?;
        }
        for (target, producer) in &self.writes {
            let value = producer()?;
            target.apply(value)?;
        }
        tracing::debug!(
            memos = self.memos.len(),
            writes = self.writes.len(),
            "batch applied"
        );
        Ok(())
    }
}
