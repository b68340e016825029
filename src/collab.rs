//! Collaborator traits supplied by the embedding application.
//!
//! The engine never talks to the outside world directly. Messaging, contact
//! data, durable timers, webhook delivery and AI calls are all seams the host
//! implements; the engine only depends on these traits. A production-grade
//! [`WebhookClient`] backed by reqwest is provided, everything else is
//! host-specific.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ReachflowError, Result,
    common::Vars,
    workflow::config::{AiConfig, AuthType, GoalType, WebhookConfig},
};

/// A contact as the engine sees it: identity, custom fields and tags.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub fields: Vars,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Contact {
    pub fn has_tag(
        &self,
        tag: &str,
    ) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A rendered message ready for delivery.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub contact_id: String,
    pub phone: String,
    /// Rendered body for custom messages; empty when a template is used.
    pub body: String,
    /// Pre-approved template reference, mutually exclusive with `body`.
    pub template_id: Option<String>,
    pub workflow_id: String,
    pub node_id: String,
}

/// Read/write access to the host's contact database.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get(
        &self,
        contact_id: &str,
    ) -> Result<Contact>;

    async fn add_tags(
        &self,
        contact_id: &str,
        tags: &[String],
    ) -> Result<()>;

    async fn remove_tags(
        &self,
        contact_id: &str,
        tags: &[String],
    ) -> Result<()>;

    async fn update_field(
        &self,
        contact_id: &str,
        field: &str,
        value: Value,
    ) -> Result<()>;

    async fn add_to_list(
        &self,
        contact_id: &str,
        list_id: &str,
    ) -> Result<()>;

    async fn remove_from_list(
        &self,
        contact_id: &str,
        list_id: &str,
    ) -> Result<()>;

    /// Whether the contact replied after `since`; drives stop-on-reply exits.
    async fn has_replied_since(
        &self,
        contact_id: &str,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// Record a goal conversion for reporting.
    async fn record_conversion(
        &self,
        contact_id: &str,
        goal_name: &str,
        goal_type: GoalType,
        revenue_amount: Option<f64>,
    ) -> Result<()>;

    /// Deliver an internal notification email to an operator.
    async fn send_notification(
        &self,
        email: &str,
        subject: &str,
        body: &str,
    ) -> Result<()>;
}

/// Outbound message delivery.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    async fn send(
        &self,
        message: &OutboundMessage,
    ) -> Result<()>;
}

/// Durable timer service for waiting records.
///
/// The engine hands over (record id, resume instant) pairs; the host is
/// expected to call [`crate::Engine::resume`] at or after that instant, and
/// to survive restarts.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn schedule_resume(
        &self,
        record_id: &str,
        at: DateTime<Utc>,
    ) -> Result<()>;

    async fn cancel(
        &self,
        record_id: &str,
    ) -> Result<()>;
}

/// Response of a webhook call, as the executor evaluates it.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    /// 2xx is success; everything else counts as a failed attempt.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, falling back to the raw string.
    pub fn body_value(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::String(self.body.clone()))
    }
}

/// Outbound webhook delivery.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Perform one attempt. Transport errors are `Err`; any HTTP status is
    /// `Ok` and left to the caller to judge.
    async fn call(
        &self,
        config: &WebhookConfig,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> Result<WebhookResponse>;
}

/// Structured result of an AI step.
#[derive(Debug, Clone, PartialEq)]
pub struct AiOutcome {
    /// Stored under the node's `outputField` in the record context.
    pub value: Value,
}

/// Model-backed processing for AI nodes.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn run(
        &self,
        config: &AiConfig,
        contact: &Contact,
        context: &Vars,
    ) -> Result<AiOutcome>;
}

/// Everything the executor needs from the host, bundled.
#[derive(Clone)]
pub struct Collaborators {
    pub contacts: Arc<dyn ContactStore>,
    pub messages: Arc<dyn MessageDispatcher>,
    pub scheduler: Arc<dyn Scheduler>,
    pub webhooks: Arc<dyn WebhookClient>,
    pub ai: Arc<dyn AiClient>,
}

/// Reqwest-backed [`WebhookClient`].
pub struct HttpWebhookClient {
    client: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn build_headers(
        config: &WebhookConfig,
        extra: &HashMap<String, String>,
    ) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("accept"), HeaderValue::from_static("*/*"));

        if let Some((name, value)) = auth_header(config)? {
            headers.insert(name, value);
        }

        for (key, value) in extra {
            headers.insert(
                key.parse::<HeaderName>().map_err(|err| ReachflowError::Collab(err.to_string()))?,
                value.parse().map_err(|err: InvalidHeaderValue| ReachflowError::Collab(err.to_string()))?,
            );
        }
        Ok(headers)
    }
}

impl Default for HttpWebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Authorization header implied by the webhook auth config, if any.
fn auth_header(config: &WebhookConfig) -> Result<Option<(HeaderName, HeaderValue)>> {
    let (name, value) = match config.auth_type {
        AuthType::None => return Ok(None),
        AuthType::Bearer => {
            let token = config.token.as_deref().unwrap_or("");
            ("authorization".to_string(), format!("Bearer {}", token))
        }
        AuthType::Basic => {
            let user = config.username.as_deref().unwrap_or("");
            let pass = config.password.as_deref().unwrap_or("");
            let encoded = STANDARD.encode(format!("{}:{}", user, pass).as_bytes());
            ("authorization".to_string(), format!("Basic {}", encoded))
        }
        AuthType::ApiKey => {
            let key = config.api_key.as_deref().unwrap_or("");
            let header = config.header_name.as_deref().unwrap_or("Authorization");
            (header.to_lowercase(), key.to_string())
        }
    };
    let name = name.parse::<HeaderName>().map_err(|err| ReachflowError::Collab(err.to_string()))?;
    let value = value.parse::<HeaderValue>().map_err(|err: InvalidHeaderValue| ReachflowError::Collab(err.to_string()))?;
    Ok(Some((name, value)))
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn call(
        &self,
        config: &WebhookConfig,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> Result<WebhookResponse> {
        let method = config.method.as_ref().parse::<reqwest::Method>().map_err(|_| ReachflowError::Collab(format!("invalid method '{:?}'", config.method)))?;

        let mut request = self
            .client
            .request(method, &config.url)
            .headers(Self::build_headers(config, headers)?)
            .timeout(Duration::from_millis(config.timeout_ms));

        if !matches!(config.method, crate::workflow::config::HttpMethod::Get) {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| ReachflowError::Collab(format!("http error: {}", err)))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| ReachflowError::Collab(err.to_string()))?;

        Ok(WebhookResponse {
            status,
            body,
        })
    }
}
