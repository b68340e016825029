use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result};

/// Upper bound on configured webhook retries.
pub const MAX_RETRIES_LIMIT: u32 = 5;

/// HTTP methods a webhook node may use.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

/// Authentication modes for outbound webhook calls.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthType {
    #[default]
    None,
    Bearer,
    Basic,
    ApiKey,
}

/// Webhook node configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Header carrying the api key, e.g. "X-Api-Key".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,
    /// Extra headers; values support `{{name}}` tokens.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub retry_on_failure: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Context key to store the response body under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_field: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: HttpMethod::default(),
            auth_type: AuthType::default(),
            token: None,
            username: None,
            password: None,
            api_key: None,
            header_name: None,
            headers: HashMap::new(),
            retry_on_failure: false,
            max_retries: default_max_retries(),
            response_field: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl WebhookConfig {
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.url).map_err(|_| ReachflowError::Node(format!("webhook url '{}' is not an absolute url", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ReachflowError::Node(format!("webhook url scheme '{}' is not supported", url.scheme())));
        }

        match self.auth_type {
            AuthType::None => {}
            AuthType::Bearer => {
                if self.token.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("bearer auth requires a token".to_string()));
                }
            }
            AuthType::Basic => {
                if self.username.as_deref().unwrap_or("").is_empty() || self.password.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("basic auth requires username and password".to_string()));
                }
            }
            AuthType::ApiKey => {
                if self.api_key.as_deref().unwrap_or("").is_empty() || self.header_name.as_deref().unwrap_or("").is_empty() {
                    return Err(ReachflowError::Node("api_key auth requires a key and a header name".to_string()));
                }
            }
        }

        if self.retry_on_failure && !(1..=MAX_RETRIES_LIMIT).contains(&self.max_retries) {
            return Err(ReachflowError::Node(format!("maxRetries must be between 1 and {}", MAX_RETRIES_LIMIT)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> WebhookConfig {
        WebhookConfig {
            url: "https://example.com/hook".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_must_be_absolute() {
        let config = WebhookConfig {
            url: "/relative/path".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_url_scheme_restricted() {
        let config = WebhookConfig {
            url: "ftp://example.com/hook".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bearer_requires_token() {
        let config = WebhookConfig {
            auth_type: AuthType::Bearer,
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            token: Some("secret".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_basic_requires_both_credentials() {
        let config = WebhookConfig {
            auth_type: AuthType::Basic,
            username: Some("svc".to_string()),
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            password: Some("pw".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_requires_key_and_header() {
        let config = WebhookConfig {
            auth_type: AuthType::ApiKey,
            api_key: Some("k".to_string()),
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            header_name: Some("X-Api-Key".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_bounds_enforced_only_when_enabled() {
        let config = WebhookConfig {
            retry_on_failure: true,
            max_retries: 0,
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            retry_on_failure: false,
            max_retries: 0,
            ..valid()
        };
        assert!(config.validate().is_ok());
    }
}
