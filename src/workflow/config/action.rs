use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ReachflowError, Result};

/// Contact-data mutations an action node can perform.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionType {
    #[default]
    AddTag,
    RemoveTag,
    UpdateField,
    AddToList,
    RemoveFromList,
    SendNotification,
}

/// Action node configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// New field value; `{{name}}` tokens are rendered at execution time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
}

impl ActionConfig {
    pub fn validate(&self) -> Result<()> {
        match self.action_type {
            ActionType::AddTag | ActionType::RemoveTag => {
                if self.tag_ids.is_empty() {
                    return Err(ReachflowError::Node(format!("{} action requires at least one tag", self.action_type.as_ref())));
                }
            }
            ActionType::UpdateField => {
                if self.field_name.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("update_field action requires a field name".to_string()));
                }
            }
            ActionType::AddToList | ActionType::RemoveFromList => {
                if self.list_id.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node(format!("{} action requires a list id", self.action_type.as_ref())));
                }
            }
            ActionType::SendNotification => {
                if self.notification_email.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("send_notification action requires a notification email".to_string()));
                }
            }
        }
        Ok(())
    }
}
