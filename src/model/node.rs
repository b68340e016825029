use serde::{Deserialize, Serialize};

use crate::registry::NodeKind;

/// Canvas placement of a node. Execution-irrelevant, preserved on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Serialized workflow node.
///
/// `config` holds the raw, kind-specific payload; it is parsed into a typed
/// [`NodeConfig`](crate::workflow::NodeConfig) when the workflow is compiled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeModel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub config: serde_json::Value,
}
