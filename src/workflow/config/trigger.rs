use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result};

/// The external event that starts enrollment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TriggerKind {
    #[default]
    ContactCreated,
    TagApplied,
    DateTime,
    WebhookReceived,
    CustomFieldChanged,
    ContactReplied,
}

/// Trigger node configuration. Exactly one trigger exists per workflow.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    #[serde(default)]
    pub trigger_kind: TriggerKind,
    /// Tags that fire a `tag_applied` trigger (any match enrolls).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// ISO-8601 instant for a `date_time` trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Inbound hook address for a `webhook_received` trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Watched field for a `custom_field_changed` trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl TriggerConfig {
    pub fn validate(&self) -> Result<()> {
        match self.trigger_kind {
            TriggerKind::TagApplied => {
                if self.tags.is_empty() {
                    return Err(ReachflowError::Node("tag_applied trigger requires at least one tag".to_string()));
                }
            }
            TriggerKind::DateTime => {
                let date = self.date.as_deref().unwrap_or("");
                if date.is_empty() {
                    return Err(ReachflowError::Node("date_time trigger requires a date".to_string()));
                }
                chrono::DateTime::parse_from_rfc3339(date).map_err(|_| ReachflowError::Node(format!("date_time trigger has invalid date '{}'", date)))?;
            }
            TriggerKind::WebhookReceived => {
                if self.webhook_url.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("webhook_received trigger requires a webhook url".to_string()));
                }
            }
            TriggerKind::CustomFieldChanged => {
                if self.field_name.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("custom_field_changed trigger requires a field name".to_string()));
                }
            }
            TriggerKind::ContactCreated | TriggerKind::ContactReplied => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_applied_requires_tags() {
        let config = TriggerConfig {
            trigger_kind: TriggerKind::TagApplied,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TriggerConfig {
            trigger_kind: TriggerKind::TagApplied,
            tags: vec!["vip".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_date_time_requires_parseable_date() {
        let config = TriggerConfig {
            trigger_kind: TriggerKind::DateTime,
            date: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TriggerConfig {
            trigger_kind: TriggerKind::DateTime,
            date: Some("2024-06-01T09:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_contact_created_needs_nothing() {
        assert!(TriggerConfig::default().validate().is_ok());
    }
}
