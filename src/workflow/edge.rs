//! Runtime edge definitions for connecting nodes.
//!
//! Edges define the flow between nodes, supporting conditional branching
//! through source handles ("true"/"false" for condition nodes, branch ids
//! for split nodes).

use serde::{Deserialize, Serialize};

use crate::{model::EdgeModel, workflow::node::NodeId};

/// Unique identifier for an edge within a workflow.
pub type EdgeId = String;

/// Source handle identifying which output port of a node an edge leaves from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum SourceHandle {
    /// The single output port of sequential nodes.
    #[default]
    Default,
    /// A named branch port: "true"/"false" on condition nodes, a branch id
    /// on split nodes, "timeout" on wait_until nodes.
    Branch(String),
}

impl SourceHandle {
    pub fn branch(name: impl Into<String>) -> Self {
        SourceHandle::Branch(name.into())
    }
}

/// Runtime edge connecting two nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Edge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// ID of the source node.
    pub source: NodeId,
    /// ID of the target node.
    pub target: NodeId,
    /// Which output port this edge leaves from.
    pub source_handle: SourceHandle,
}

impl From<&EdgeModel> for Edge {
    fn from(model: &EdgeModel) -> Self {
        Self {
            id: model.id.clone(),
            source: model.source.clone(),
            target: model.target.clone(),
            source_handle: match &model.source_handle {
                Some(handle) => SourceHandle::Branch(handle.clone()),
                None => SourceHandle::Default,
            },
        }
    }
}
