use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result};

/// What an AI node asks the model to do.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AiAction {
    #[default]
    Categorize,
    ExtractInfo,
    GenerateResponse,
    Translate,
}

/// AI node configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default)]
    pub action: AiAction,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Candidate labels for `categorize`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    /// Context key the structured result is stored under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_field: Option<String>,
}

fn default_model() -> String {
    "default".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            action: AiAction::default(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            categories: Vec::new(),
            extraction_prompt: None,
            response_prompt: None,
            source_language: None,
            target_language: None,
            output_field: None,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<()> {
        match self.action {
            AiAction::Categorize => {
                if self.categories.is_empty() {
                    return Err(ReachflowError::Node("categorize requires at least one category".to_string()));
                }
            }
            AiAction::ExtractInfo => {
                if self.extraction_prompt.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("extract_info requires an extraction prompt".to_string()));
                }
            }
            AiAction::GenerateResponse => {
                if self.response_prompt.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("generate_response requires a response prompt".to_string()));
                }
            }
            AiAction::Translate => {
                if self.source_language.as_deref().unwrap_or("").is_empty() || self.target_language.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("translate requires source and target languages".to_string()));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ReachflowError::Node("temperature must be between 0 and 1".to_string()));
        }
        if !(50..=4000).contains(&self.max_tokens) {
            return Err(ReachflowError::Node("maxTokens must be between 50 and 4000".to_string()));
        }
        Ok(())
    }
}
