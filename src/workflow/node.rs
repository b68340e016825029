use serde::{Deserialize, Serialize};

use crate::{
    ReachflowError, Result,
    model::NodeModel,
    registry::NodeKind,
    workflow::config::NodeConfig,
};

/// node id
pub type NodeId = String;

/// Compiled workflow node: kind, label and typed configuration.
///
/// Unlike the serialized [`NodeModel`], the config here is the parsed tagged
/// union; invalid field combinations cannot be represented.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// node id
    pub id: NodeId,
    /// node kind, immutable after creation
    pub kind: NodeKind,
    /// human-readable label
    pub label: String,
    /// typed, kind-specific configuration
    pub config: NodeConfig,
}

impl TryFrom<&NodeModel> for Node {
    type Error = ReachflowError;

    fn try_from(model: &NodeModel) -> Result<Self> {
        let config = NodeConfig::parse(model.kind, &model.config)?;
        Ok(Self {
            id: model.id.clone(),
            kind: model.kind,
            label: model.label.clone(),
            config,
        })
    }
}
