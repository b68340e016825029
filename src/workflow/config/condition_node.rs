use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result, workflow::condition::Condition};

/// Condition node configuration: the primary condition plus its chain.
///
/// Routing follows the "true"/"false" source handles on the node's
/// outgoing edges.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl ConditionConfig {
    pub fn validate(&self) -> Result<()> {
        match &self.condition {
            Some(condition) => condition.validate(),
            None => Err(ReachflowError::Node("condition node requires a condition".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::workflow::condition::ConditionOperator;

    #[test]
    fn test_condition_required() {
        assert!(ConditionConfig::default().validate().is_err());

        let config = ConditionConfig {
            condition: Some(Condition {
                field: "tag".to_string(),
                operator: ConditionOperator::Equals,
                value: Some(json!("vip")),
                logical_operator: None,
                conditions: Vec::new(),
            }),
        };
        assert!(config.validate().is_ok());
    }
}
