//! Workflow compilation and node configuration.
//!
//! This module owns the typed node configurations (the authoritative
//! per-kind validation contract), condition evaluation, message templates,
//! delay arithmetic and the compiled runtime graph the executor walks.

pub mod condition;
pub mod config;
pub mod edge;
pub mod node;
pub mod schedule;
pub mod template;
#[allow(clippy::module_inception)]
mod workflow;

pub use condition::{Condition, ConditionOperator, LogicalOperator};
pub use config::NodeConfig;
pub use edge::{Edge, EdgeId, SourceHandle};
pub use node::{Node, NodeId};
pub use workflow::Workflow;
