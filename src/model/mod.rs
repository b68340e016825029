//! Serialized workflow definitions.
//!
//! These types are the JSON persistence contract shared with the surrounding
//! campaign product: `{ nodes: [{id, type, label, position, config}],
//! edges: [{id, source, target, sourceHandle?}] }`.

mod edge;
mod node;
mod workflow;

pub use edge::EdgeModel;
pub use node::{NodeModel, Position};
pub use workflow::{WorkflowModel, WorkflowSettings, WorkflowStatus};
