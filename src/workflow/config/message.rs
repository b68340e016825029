use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result};

/// Message node configuration.
///
/// A message sends either free-form text (`customMessage`, with `{{name}}`
/// interpolation) or a pre-approved template (`templateId`). The two modes
/// are mutually exclusive.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl MessageConfig {
    pub fn validate(&self) -> Result<()> {
        let has_custom = self.custom_message.as_deref().is_some_and(|m| !m.trim().is_empty());
        let has_template = self.template_id.as_deref().is_some_and(|t| !t.trim().is_empty());
        match (has_custom, has_template) {
            (true, true) => Err(ReachflowError::Node("message node cannot set both customMessage and templateId".to_string())),
            (false, false) => Err(ReachflowError::Node("message node requires customMessage or templateId".to_string())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_are_mutually_exclusive() {
        let config = MessageConfig {
            custom_message: Some("hi".to_string()),
            template_id: Some("tpl_1".to_string()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_one_mode_required() {
        assert!(MessageConfig::default().validate().is_err());

        let config = MessageConfig {
            custom_message: Some("hi {{name}}".to_string()),
            template_id: None,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_custom_message_does_not_count() {
        let config = MessageConfig {
            custom_message: Some("   ".to_string()),
            template_id: None,
        };
        assert!(config.validate().is_err());
    }
}
