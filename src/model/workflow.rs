use serde::{Deserialize, Serialize};

use crate::{
    ReachflowError, Result,
    model::{EdgeModel, NodeModel},
};

/// Workflow lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Archived,
}

/// Workflow-level execution settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    /// Exit in-flight records as soon as the contact replies.
    #[serde(default)]
    pub stop_on_reply: bool,
    /// Enrollment throttle, evaluated at enrollment time only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_contacts_per_day: Option<u32>,
}

/// Serialized workflow aggregate: nodes, edges, status and settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub settings: WorkflowSettings,
    pub nodes: Vec<NodeModel>,
    pub edges: Vec<EdgeModel>,
}

impl WorkflowModel {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<WorkflowModel>(s).map_err(|e| ReachflowError::Workflow(format!("{}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ReachflowError::Workflow(format!("{}", e)))
    }
}
