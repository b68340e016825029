//! Event types for workflow execution.
//!
//! Events are emitted as records move through workflows, for subscribers
//! (dashboards, audit log) and for the monitor that persists them.

mod record;
mod workflow;

pub use record::*;
pub use workflow::*;

use crate::{runtime::RecordId, workflow::node::NodeId};

/// Generic event wrapper.
#[derive(Debug, Clone)]
pub struct Event<T> {
    inner: T,
}

/// Top-level event type carried on the channel.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// Workflow lifecycle events (deployed, activated, paused, archived).
    Workflow(WorkflowEvent),
    /// Per-record execution events.
    Record(RecordEvent),
}

/// Event message containing record and node context.
#[derive(Debug, Clone)]
pub struct Message {
    /// Record that generated this event (empty for workflow events).
    pub rid: RecordId,
    /// Workflow the event belongs to.
    pub wid: String,
    /// Node that generated this event (empty for record/workflow events).
    pub nid: NodeId,
    /// The actual event data.
    pub event: FlowEvent,
}

/// Log entry emitted during record execution.
#[derive(Debug, Clone)]
pub struct Log {
    pub rid: RecordId,
    pub nid: NodeId,
    pub content: String,
    /// Timestamp in milliseconds.
    pub timestamp: i64,
}

impl<T> std::ops::Deref for Event<T>
where
    T: std::fmt::Debug + Clone,
{
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> Event<T>
where
    T: std::fmt::Debug + Clone,
{
    pub fn new(inner: &T) -> Self {
        Self {
            inner: inner.clone(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl FlowEvent {
    /// Whether this event ends the record (completed, failed or exited).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowEvent::Record(RecordEvent::Completed(_)) | FlowEvent::Record(RecordEvent::Failed(_)) | FlowEvent::Record(RecordEvent::Exited(_))
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FlowEvent::Record(RecordEvent::Failed(_)))
    }
}
