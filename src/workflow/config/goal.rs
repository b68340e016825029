use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result};

/// What a goal node records when reached.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GoalType {
    #[default]
    Conversion,
    Revenue,
}

/// Goal node configuration. Reaching a goal completes the record.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalConfig {
    #[serde(default)]
    pub goal_name: String,
    #[serde(default)]
    pub goal_type: GoalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_amount: Option<f64>,
    #[serde(default)]
    pub notify_on_completion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
}

impl GoalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.goal_name.trim().is_empty() {
            return Err(ReachflowError::Node("goal node requires a goal name".to_string()));
        }
        if self.goal_type == GoalType::Revenue && self.revenue_amount.is_none() {
            return Err(ReachflowError::Node("revenue goal requires a revenue amount".to_string()));
        }
        if self.notify_on_completion && self.notification_email.as_deref().unwrap_or("").is_empty() {
            return Err(ReachflowError::Node("goal notification requires a notification email".to_string()));
        }
        Ok(())
    }
}
