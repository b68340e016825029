//! Typed node configurations.
//!
//! Each node kind carries a concrete config shape; the union is closed and
//! tagged, so invalid field combinations cannot be expressed. Raw config
//! payloads coming off the wire are shape-checked with a JSON schema before
//! serde parsing, then cross-field rules are applied by each variant's
//! `validate`.

mod action;
mod ai;
mod condition_node;
mod delay;
mod goal;
mod message;
mod split;
mod trigger;
mod wait_until;
mod webhook;

pub use action::{ActionConfig, ActionType};
pub use ai::{AiAction, AiConfig};
pub use condition_node::ConditionConfig;
pub use delay::{DelayConfig, DelayUnit};
pub use goal::{GoalConfig, GoalType};
pub use message::MessageConfig;
pub use split::{Branch, SplitConfig, SplitType};
pub use trigger::{TriggerConfig, TriggerKind};
pub use wait_until::WaitUntilConfig;
pub use webhook::{AuthType, HttpMethod, WebhookConfig};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ReachflowError, Result, registry::NodeKind};

/// Kind-specific node configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeConfig {
    Trigger(TriggerConfig),
    Message(MessageConfig),
    Delay(DelayConfig),
    Condition(ConditionConfig),
    Action(ActionConfig),
    WaitUntil(WaitUntilConfig),
    Split(SplitConfig),
    Webhook(WebhookConfig),
    Ai(AiConfig),
    Goal(GoalConfig),
}

impl NodeConfig {
    /// The node kind this config belongs to.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Trigger(_) => NodeKind::Trigger,
            NodeConfig::Message(_) => NodeKind::Message,
            NodeConfig::Delay(_) => NodeKind::Delay,
            NodeConfig::Condition(_) => NodeKind::Condition,
            NodeConfig::Action(_) => NodeKind::Action,
            NodeConfig::WaitUntil(_) => NodeKind::WaitUntil,
            NodeConfig::Split(_) => NodeKind::Split,
            NodeConfig::Webhook(_) => NodeKind::Webhook,
            NodeConfig::Ai(_) => NodeKind::Ai,
            NodeConfig::Goal(_) => NodeKind::Goal,
        }
    }

    /// Default configuration for a freshly created node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Trigger => NodeConfig::Trigger(TriggerConfig::default()),
            NodeKind::Message => NodeConfig::Message(MessageConfig::default()),
            NodeKind::Delay => NodeConfig::Delay(DelayConfig::default()),
            NodeKind::Condition => NodeConfig::Condition(ConditionConfig::default()),
            NodeKind::Action => NodeConfig::Action(ActionConfig::default()),
            NodeKind::WaitUntil => NodeConfig::WaitUntil(WaitUntilConfig::default()),
            NodeKind::Split => NodeConfig::Split(SplitConfig::default()),
            NodeKind::Webhook => NodeConfig::Webhook(WebhookConfig::default()),
            NodeKind::Ai => NodeConfig::Ai(AiConfig::default()),
            NodeKind::Goal => NodeConfig::Goal(GoalConfig::default()),
        }
    }

    /// Parse a raw config payload for a node of `kind`.
    ///
    /// The payload is the bare object stored in `NodeModel::config` - the
    /// discriminator comes from the node's own `type` field, so it is
    /// injected here before deserializing the tagged union.
    pub fn parse(
        kind: NodeKind,
        raw: &Value,
    ) -> Result<Self> {
        let mut payload = match raw {
            Value::Object(map) => map.clone(),
            Value::Null => serde_json::Map::new(),
            _ => return Err(ReachflowError::Node(format!("config for {} node must be an object", kind.as_ref()))),
        };
        payload.insert("type".to_string(), Value::String(kind.as_ref().to_string()));
        let payload = Value::Object(payload);

        jsonschema::validate(&schema(kind), &payload).map_err(|e| ReachflowError::Node(format!("invalid {} config: {}", kind.as_ref(), e)))?;

        let config = serde_json::from_value::<NodeConfig>(payload).map_err(|e| ReachflowError::Node(format!("invalid {} config: {}", kind.as_ref(), e)))?;
        Ok(config)
    }

    /// Serialize back to the bare payload stored in `NodeModel::config`
    /// (without the injected discriminator).
    pub fn to_model_value(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("type");
        }
        value
    }

    /// Cross-field completeness rules, the per-kind config editor contract.
    pub fn validate(&self) -> Result<()> {
        match self {
            NodeConfig::Trigger(c) => c.validate(),
            NodeConfig::Message(c) => c.validate(),
            NodeConfig::Delay(c) => c.validate(),
            NodeConfig::Condition(c) => c.validate(),
            NodeConfig::Action(c) => c.validate(),
            NodeConfig::WaitUntil(c) => c.validate(),
            NodeConfig::Split(c) => c.validate(),
            NodeConfig::Webhook(c) => c.validate(),
            NodeConfig::Ai(c) => c.validate(),
            NodeConfig::Goal(c) => c.validate(),
        }
    }
}

/// Structural JSON schema per kind, checked before serde parsing.
fn schema(kind: NodeKind) -> Value {
    use serde_json::json;
    match kind {
        NodeKind::Trigger => json!({
            "type": "object",
            "properties": {
                "triggerKind": { "type": "string", "enum": ["contact_created", "tag_applied", "date_time", "webhook_received", "custom_field_changed", "contact_replied"] },
                "tags": { "type": "array", "items": { "type": "string" } },
                "date": { "type": ["string", "null"] },
                "webhookUrl": { "type": ["string", "null"] },
                "fieldName": { "type": ["string", "null"] }
            }
        }),
        NodeKind::Message => json!({
            "type": "object",
            "properties": {
                "customMessage": { "type": ["string", "null"] },
                "templateId": { "type": ["string", "null"] }
            }
        }),
        NodeKind::Delay => json!({
            "type": "object",
            "properties": {
                "amount": { "type": "integer" },
                "unit": { "type": "string", "enum": ["minutes", "hours", "days", "weeks"] },
                "businessHoursOnly": { "type": "boolean" },
                "skipWeekends": { "type": "boolean" },
                "specificTime": { "type": ["string", "null"] }
            }
        }),
        NodeKind::Condition => json!({
            "type": "object",
            "properties": {
                "condition": { "type": "object" }
            }
        }),
        NodeKind::Action => json!({
            "type": "object",
            "properties": {
                "actionType": { "type": "string", "enum": ["add_tag", "remove_tag", "update_field", "add_to_list", "remove_from_list", "send_notification"] },
                "tagIds": { "type": "array", "items": { "type": "string" } },
                "fieldName": { "type": ["string", "null"] },
                "fieldValue": {},
                "listId": { "type": ["string", "null"] },
                "notificationEmail": { "type": ["string", "null"] }
            }
        }),
        NodeKind::WaitUntil => json!({
            "type": "object",
            "properties": {
                "condition": { "type": "object" },
                "checkEveryMinutes": { "type": "integer", "minimum": 1 },
                "timeoutAmount": { "type": ["integer", "null"] },
                "timeoutUnit": { "type": ["string", "null"], "enum": ["minutes", "hours", "days", "weeks", null] }
            }
        }),
        NodeKind::Split => json!({
            "type": "object",
            "properties": {
                "splitType": { "type": "string", "enum": ["percentage", "random", "field_based"] },
                "branches": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "label": { "type": "string" },
                            "percentage": { "type": "number", "minimum": 0, "maximum": 100 }
                        },
                        "required": ["id"]
                    }
                },
                "fieldName": { "type": ["string", "null"] }
            }
        }),
        NodeKind::Webhook => json!({
            "type": "object",
            "properties": {
                "url": { "type": "string" },
                "method": { "type": "string", "enum": ["get", "post", "put", "patch", "delete"] },
                "authType": { "type": "string", "enum": ["none", "bearer", "basic", "api_key"] },
                "token": { "type": ["string", "null"] },
                "username": { "type": ["string", "null"] },
                "password": { "type": ["string", "null"] },
                "apiKey": { "type": ["string", "null"] },
                "headerName": { "type": ["string", "null"] },
                "headers": { "type": "object", "additionalProperties": { "type": "string" } },
                "retryOnFailure": { "type": "boolean" },
                "maxRetries": { "type": "integer", "minimum": 1, "maximum": 5 },
                "responseField": { "type": ["string", "null"] },
                "timeoutMs": { "type": "integer", "minimum": 0 }
            }
        }),
        NodeKind::Ai => json!({
            "type": "object",
            "properties": {
                "action": { "type": "string", "enum": ["categorize", "extract_info", "generate_response", "translate"] },
                "model": { "type": "string" },
                "temperature": { "type": "number", "minimum": 0, "maximum": 1 },
                "maxTokens": { "type": "integer", "minimum": 50, "maximum": 4000 },
                "categories": { "type": "array", "items": { "type": "string" } },
                "extractionPrompt": { "type": ["string", "null"] },
                "responsePrompt": { "type": ["string", "null"] },
                "sourceLanguage": { "type": ["string", "null"] },
                "targetLanguage": { "type": ["string", "null"] },
                "outputField": { "type": ["string", "null"] }
            }
        }),
        NodeKind::Goal => json!({
            "type": "object",
            "properties": {
                "goalName": { "type": "string" },
                "goalType": { "type": "string", "enum": ["conversion", "revenue"] },
                "revenueAmount": { "type": ["number", "null"] },
                "notifyOnCompletion": { "type": "boolean" },
                "notificationEmail": { "type": ["string", "null"] }
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_injects_discriminator() {
        let raw = json!({"amount": 2, "unit": "days", "skipWeekends": true});
        let config = NodeConfig::parse(NodeKind::Delay, &raw).unwrap();
        let NodeConfig::Delay(delay) = &config else {
            panic!("expected delay config");
        };
        assert_eq!(delay.amount, 2);
        assert!(delay.skip_weekends);
        assert_eq!(config.kind(), NodeKind::Delay);
    }

    #[test]
    fn test_default_payload_parses_for_every_kind() {
        use strum::IntoEnumIterator;
        // Compiles every schema and round-trips every default payload.
        for kind in NodeKind::iter() {
            let payload = NodeConfig::default_for(kind).to_model_value();
            let config = NodeConfig::parse(kind, &payload).unwrap_or_else(|e| panic!("{}: {}", kind.as_ref(), e));
            assert_eq!(config.kind(), kind);
        }
    }

    #[test]
    fn test_parse_null_uses_defaults() {
        let config = NodeConfig::parse(NodeKind::Message, &serde_json::Value::Null).unwrap();
        assert_eq!(config.kind(), NodeKind::Message);
    }

    #[test]
    fn test_parse_rejects_schema_violation() {
        // maxRetries above the allowed bound
        let raw = json!({"url": "https://example.com/hook", "maxRetries": 9});
        assert!(NodeConfig::parse(NodeKind::Webhook, &raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(NodeConfig::parse(NodeKind::Goal, &json!("nope")).is_err());
    }

    #[test]
    fn test_to_model_value_strips_tag() {
        let config = NodeConfig::default_for(NodeKind::Delay);
        let value = config.to_model_value();
        assert!(value.get("type").is_none());
        assert!(value.get("amount").is_some());
    }

    #[test]
    fn test_round_trip_through_model_value() {
        let raw = json!({"goalName": "purchase", "goalType": "revenue", "revenueAmount": 25.0});
        let config = NodeConfig::parse(NodeKind::Goal, &raw).unwrap();
        let back = NodeConfig::parse(NodeKind::Goal, &config.to_model_value()).unwrap();
        assert_eq!(config, back);
    }
}
