//! Per-record step loop.
//!
//! The executor advances one [`ExecutionRecord`] through its pinned workflow
//! graph until the record suspends on a waiting node or reaches a terminal
//! status. Each enrolled contact gets its own record, so executors never
//! share mutable state; collaborators handle all outside effects.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::{
    ReachflowError, Result,
    collab::{Collaborators, Contact, OutboundMessage},
    common::BroadcastQueue,
    config::{BusinessHours, Config, WebhookRetryConfig},
    events::{Event, FlowEvent, Message, RecordEvent},
    runtime::record::{ExecutionRecord, RecordStatus},
    utils,
    workflow::{
        Node, NodeConfig, SourceHandle, Workflow,
        config::{ActionConfig, ActionType, SplitType, WaitUntilConfig, WebhookConfig},
        schedule, template,
    },
};

/// Where a single step leaves the record.
enum Step {
    /// Move on to another node and keep stepping.
    Goto(String),
    /// Suspend until the given instant.
    Wait(DateTime<Utc>),
    Complete,
    Exit(String),
    Fail(String),
}

/// Drives records through one compiled workflow.
pub struct Executor {
    workflow: Arc<Workflow>,
    collab: Collaborators,
    webhook_retry: WebhookRetryConfig,
    business_hours: BusinessHours,
    events: Arc<BroadcastQueue<Event<Message>>>,
}

impl Executor {
    pub fn new(
        workflow: Arc<Workflow>,
        collab: Collaborators,
        config: &Config,
        events: Arc<BroadcastQueue<Event<Message>>>,
    ) -> Self {
        Self {
            workflow,
            collab,
            webhook_retry: config.webhook.clone(),
            business_hours: config.business_hours.clone(),
            events,
        }
    }

    pub fn workflow(&self) -> Arc<Workflow> {
        self.workflow.clone()
    }

    /// Step the record until it suspends or terminates.
    ///
    /// Safe to call again after a resume: the record's current node and
    /// `scheduled_resume_at` carry the waiting state.
    pub async fn advance(
        &self,
        record: &mut ExecutionRecord,
    ) -> Result<()> {
        while record.status == RecordStatus::Active {
            if self.workflow.settings().stop_on_reply && self.collab.contacts.has_replied_since(&record.contact_id, record.enrolled_at).await? {
                self.conclude(record, RecordStatus::Exited, "contact replied");
                break;
            }

            let Some(node) = self.workflow.get_node(&record.current_node_id).cloned() else {
                let reason = format!("node {} not found in workflow {}", record.current_node_id, record.workflow_id);
                self.conclude(record, RecordStatus::Failed, &reason);
                break;
            };

            if record.enter(&node.id) {
                self.emit(record, &node.id, RecordEvent::NodeEntered(utils::time::time_millis()));
            }

            match self.execute(record, &node).await {
                Ok(Step::Goto(next)) => record.current_node_id = next,
                Ok(Step::Wait(at)) => {
                    record.status = RecordStatus::Waiting;
                    record.scheduled_resume_at = Some(at);
                    record.set_outcome("waiting");
                    if let Err(err) = self.collab.scheduler.schedule_resume(&record.id, at).await {
                        self.conclude(record, RecordStatus::Failed, &format!("scheduler: {}", err));
                        break;
                    }
                    self.emit(record, &node.id, RecordEvent::Waiting(at.timestamp_millis()));
                }
                Ok(Step::Complete) => self.conclude(record, RecordStatus::Completed, ""),
                Ok(Step::Exit(reason)) => self.conclude(record, RecordStatus::Exited, &reason),
                Ok(Step::Fail(reason)) => self.conclude(record, RecordStatus::Failed, &reason),
                Err(err) => self.conclude(record, RecordStatus::Failed, &err.to_string()),
            }
        }
        Ok(())
    }

    async fn execute(
        &self,
        record: &mut ExecutionRecord,
        node: &Node,
    ) -> Result<Step> {
        tracing::trace!("executor::execute record={} node={}", record.id, node.id);
        match &node.config {
            NodeConfig::Trigger(_) => {
                record.set_outcome("ok");
                self.next_or_complete(node)
            }
            NodeConfig::Message(config) => {
                let contact = self.contact(record).await?;
                let message = match config.template_id.as_deref().filter(|t| !t.is_empty()) {
                    Some(template_id) => OutboundMessage {
                        contact_id: contact.id.clone(),
                        phone: contact.phone.clone(),
                        body: String::new(),
                        template_id: Some(template_id.to_string()),
                        workflow_id: record.workflow_id.clone(),
                        node_id: node.id.clone(),
                    },
                    None => OutboundMessage {
                        contact_id: contact.id.clone(),
                        phone: contact.phone.clone(),
                        body: template::render(config.custom_message.as_deref().unwrap_or(""), &contact, &record.context),
                        template_id: None,
                        workflow_id: record.workflow_id.clone(),
                        node_id: node.id.clone(),
                    },
                };
                self.collab.messages.send(&message).await?;
                record.set_outcome("sent");
                self.next_or_complete(node)
            }
            NodeConfig::Delay(config) => {
                // A set resume instant means the scheduler woke us up.
                if record.scheduled_resume_at.take().is_some() {
                    record.set_outcome("resumed");
                    self.next_or_complete(node)
                } else {
                    Ok(Step::Wait(schedule::resume_at(config, Utc::now(), &self.business_hours)?))
                }
            }
            NodeConfig::Condition(config) => {
                let condition = config.condition.as_ref().ok_or(ReachflowError::Node(format!("condition node {} has no condition", node.id)))?;
                let contact = self.contact(record).await?;
                let branch = if condition.evaluate(&contact, &record.context) { "true" } else { "false" };
                record.set_outcome(branch);
                self.branch_or_fail(node, SourceHandle::branch(branch))
            }
            NodeConfig::Split(config) => {
                let branch_id = match config.split_type {
                    SplitType::FieldBased => {
                        let contact = self.contact(record).await?;
                        let field = config.field_name.as_deref().unwrap_or("");
                        let value = contact.fields.get_value(field).map(value_to_string).unwrap_or_default();
                        match config.pick_by_value(&value) {
                            Some(branch) => branch.id.clone(),
                            None => return Ok(Step::Fail(format!("split node {}: no branch matches value '{}'", node.id, value))),
                        }
                    }
                    _ => config
                        .pick_weighted(&node.id, &record.contact_id)
                        .map(|branch| branch.id.clone())
                        .ok_or(ReachflowError::Node(format!("split node {} has no branches", node.id)))?,
                };
                record.set_outcome(&branch_id);
                self.branch_or_fail(node, SourceHandle::branch(branch_id))
            }
            NodeConfig::Action(config) => {
                self.run_action(record, config).await?;
                record.set_outcome(config.action_type.as_ref());
                self.next_or_complete(node)
            }
            NodeConfig::WaitUntil(config) => self.wait_until(record, node, config).await,
            NodeConfig::Webhook(config) => self.call_webhook(record, node, config).await,
            NodeConfig::Ai(config) => {
                let contact = self.contact(record).await?;
                let outcome = self.collab.ai.run(config, &contact, &record.context).await?;
                record.context.set(config.output_field.as_deref().unwrap_or("aiResult"), outcome.value);
                record.set_outcome("done");
                self.next_or_complete(node)
            }
            NodeConfig::Goal(config) => {
                self.collab.contacts.record_conversion(&record.contact_id, &config.goal_name, config.goal_type, config.revenue_amount).await?;
                if config.notify_on_completion
                    && let Some(email) = config.notification_email.as_deref()
                {
                    let body = format!("contact {} reached goal '{}'", record.contact_id, config.goal_name);
                    self.collab.contacts.send_notification(email, &format!("Goal reached: {}", config.goal_name), &body).await?;
                }
                record.set_outcome("converted");
                Ok(Step::Complete)
            }
        }
    }

    async fn wait_until(
        &self,
        record: &mut ExecutionRecord,
        node: &Node,
        config: &WaitUntilConfig,
    ) -> Result<Step> {
        let condition = config.condition.as_ref().ok_or(ReachflowError::Node(format!("wait_until node {} has no condition", node.id)))?;
        record.scheduled_resume_at = None;

        let contact = self.contact(record).await?;
        if condition.evaluate(&contact, &record.context) {
            record.set_outcome("satisfied");
            return self.next_or_complete(node);
        }

        if let Some(timeout_minutes) = config.timeout_minutes() {
            let entered = record.entered_current_at().unwrap_or_else(utils::time::time_millis);
            if utils::time::time_millis() - entered >= timeout_minutes * 60_000 {
                record.set_outcome("timeout");
                // Prefer the dedicated timeout branch, fall back to the
                // default edge.
                if let Some(next) = self.workflow.successor(&node.id, &SourceHandle::branch("timeout")) {
                    return Ok(Step::Goto(next.id.clone()));
                }
                return self.next_or_complete(node);
            }
        }

        Ok(Step::Wait(Utc::now() + chrono::Duration::minutes(config.check_every_minutes)))
    }

    async fn call_webhook(
        &self,
        record: &mut ExecutionRecord,
        node: &Node,
        config: &WebhookConfig,
    ) -> Result<Step> {
        let contact = self.contact(record).await?;
        let mut headers = HashMap::new();
        for (key, value) in &config.headers {
            headers.insert(key.clone(), template::render(value, &contact, &record.context));
        }
        let body = json!({
            "contactId": contact.id,
            "phone": contact.phone,
            "workflowId": record.workflow_id,
            "nodeId": node.id,
            "context": Value::from(record.context.clone()),
        });

        let attempts = if config.retry_on_failure { 1 + config.max_retries } else { 1 };
        let mut last_error = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                let backoff = self.webhook_retry.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff)).await;
                self.emit(record, &node.id, RecordEvent::Retry);
            }
            match self.collab.webhooks.call(config, &headers, &body).await {
                Ok(response) if response.is_success() => {
                    if let Some(field) = config.response_field.as_deref() {
                        record.context.set(field, response.body_value());
                    }
                    record.set_outcome("delivered");
                    return self.next_or_complete(node);
                }
                Ok(response) => last_error = format!("http status {}", response.status),
                Err(err) => last_error = err.to_string(),
            }
        }

        Ok(Step::Fail(format!("webhook node {} failed after {} attempt(s): {}", node.id, attempts, last_error)))
    }

    async fn run_action(
        &self,
        record: &ExecutionRecord,
        config: &ActionConfig,
    ) -> Result<()> {
        let contacts = &self.collab.contacts;
        let cid = &record.contact_id;
        match config.action_type {
            ActionType::AddTag => contacts.add_tags(cid, &config.tag_ids).await,
            ActionType::RemoveTag => contacts.remove_tags(cid, &config.tag_ids).await,
            ActionType::UpdateField => {
                let value = match &config.field_value {
                    Some(Value::String(s)) => {
                        let contact = self.contact(record).await?;
                        Value::String(template::render(s, &contact, &record.context))
                    }
                    Some(v) => v.clone(),
                    None => Value::Null,
                };
                contacts.update_field(cid, config.field_name.as_deref().unwrap_or(""), value).await
            }
            ActionType::AddToList => contacts.add_to_list(cid, config.list_id.as_deref().unwrap_or("")).await,
            ActionType::RemoveFromList => contacts.remove_from_list(cid, config.list_id.as_deref().unwrap_or("")).await,
            ActionType::SendNotification => {
                let body = format!("workflow {} notification for contact {}", record.workflow_id, cid);
                contacts.send_notification(config.notification_email.as_deref().unwrap_or(""), "Workflow notification", &body).await
            }
        }
    }

    async fn contact(
        &self,
        record: &ExecutionRecord,
    ) -> Result<Contact> {
        self.collab.contacts.get(&record.contact_id).await
    }

    /// Sequential node: follow the single outgoing edge, or complete.
    fn next_or_complete(
        &self,
        node: &Node,
    ) -> Result<Step> {
        match self.workflow.sole_successor(&node.id)? {
            Some(next) => Ok(Step::Goto(next.id.clone())),
            None => Ok(Step::Complete),
        }
    }

    /// Branching node: the chosen handle must have an edge.
    fn branch_or_fail(
        &self,
        node: &Node,
        handle: SourceHandle,
    ) -> Result<Step> {
        match self.workflow.successor(&node.id, &handle) {
            Some(next) => Ok(Step::Goto(next.id.clone())),
            None => Ok(Step::Fail(format!("node {}: no edge for selected branch", node.id))),
        }
    }

    fn conclude(
        &self,
        record: &mut ExecutionRecord,
        status: RecordStatus,
        reason: &str,
    ) {
        record.status = status;
        record.scheduled_resume_at = None;
        if !reason.is_empty() {
            record.error = Some(reason.to_string());
            record.set_outcome(reason);
        }
        let nid = record.current_node_id.clone();
        let event = match status {
            RecordStatus::Completed => RecordEvent::Completed(utils::time::time_millis()),
            RecordStatus::Failed => RecordEvent::Failed(reason.to_string()),
            RecordStatus::Exited => RecordEvent::Exited(reason.to_string()),
            _ => return,
        };
        self.emit(record, &nid, event);
    }

    fn emit(
        &self,
        record: &ExecutionRecord,
        nid: &str,
        event: RecordEvent,
    ) {
        let _ = self.events.send(Event::new(&Message {
            rid: record.id.clone(),
            wid: record.workflow_id.clone(),
            nid: nid.to_string(),
            event: FlowEvent::Record(event),
        }));
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        v => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use serde_json::json;

    use super::*;
    use crate::{
        collab::{AiClient, AiOutcome, ContactStore, MessageDispatcher, Scheduler, WebhookClient, WebhookResponse},
        common::Vars,
        model::WorkflowModel,
        workflow::config::{AiConfig, GoalType},
    };
    use async_trait::async_trait;

    #[derive(Default)]
    struct TestContacts {
        contact: Mutex<Contact>,
        replied: AtomicBool,
        tags_added: Mutex<Vec<String>>,
        conversions: Mutex<Vec<(String, GoalType)>>,
        notifications: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContactStore for TestContacts {
        async fn get(
            &self,
            _contact_id: &str,
        ) -> Result<Contact> {
            Ok(self.contact.lock().unwrap().clone())
        }

        async fn add_tags(
            &self,
            _contact_id: &str,
            tags: &[String],
        ) -> Result<()> {
            self.tags_added.lock().unwrap().extend(tags.iter().cloned());
            Ok(())
        }

        async fn remove_tags(
            &self,
            _contact_id: &str,
            _tags: &[String],
        ) -> Result<()> {
            Ok(())
        }

        async fn update_field(
            &self,
            _contact_id: &str,
            field: &str,
            value: Value,
        ) -> Result<()> {
            self.contact.lock().unwrap().fields.set(field, value);
            Ok(())
        }

        async fn add_to_list(
            &self,
            _contact_id: &str,
            _list_id: &str,
        ) -> Result<()> {
            Ok(())
        }

        async fn remove_from_list(
            &self,
            _contact_id: &str,
            _list_id: &str,
        ) -> Result<()> {
            Ok(())
        }

        async fn has_replied_since(
            &self,
            _contact_id: &str,
            _since: DateTime<Utc>,
        ) -> Result<bool> {
            Ok(self.replied.load(Ordering::Relaxed))
        }

        async fn record_conversion(
            &self,
            _contact_id: &str,
            goal_name: &str,
            goal_type: GoalType,
            _revenue_amount: Option<f64>,
        ) -> Result<()> {
            self.conversions.lock().unwrap().push((goal_name.to_string(), goal_type));
            Ok(())
        }

        async fn send_notification(
            &self,
            email: &str,
            _subject: &str,
            _body: &str,
        ) -> Result<()> {
            self.notifications.lock().unwrap().push(email.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestMessages {
        sent: Mutex<Vec<OutboundMessage>>,
    }

    #[async_trait]
    impl MessageDispatcher for TestMessages {
        async fn send(
            &self,
            message: &OutboundMessage,
        ) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestScheduler {
        scheduled: Mutex<Vec<(String, DateTime<Utc>)>>,
    }

    #[async_trait]
    impl Scheduler for TestScheduler {
        async fn schedule_resume(
            &self,
            record_id: &str,
            at: DateTime<Utc>,
        ) -> Result<()> {
            self.scheduled.lock().unwrap().push((record_id.to_string(), at));
            Ok(())
        }

        async fn cancel(
            &self,
            _record_id: &str,
        ) -> Result<()> {
            Ok(())
        }
    }

    struct TestWebhook {
        calls: AtomicUsize,
        status: u16,
    }

    #[async_trait]
    impl WebhookClient for TestWebhook {
        async fn call(
            &self,
            _config: &WebhookConfig,
            _headers: &HashMap<String, String>,
            _body: &Value,
        ) -> Result<WebhookResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(WebhookResponse {
                status: self.status,
                body: r#"{"ok": true}"#.to_string(),
            })
        }
    }

    struct TestAi;

    #[async_trait]
    impl AiClient for TestAi {
        async fn run(
            &self,
            _config: &AiConfig,
            _contact: &Contact,
            _context: &Vars,
        ) -> Result<AiOutcome> {
            Ok(AiOutcome {
                value: json!({"category": "billing"}),
            })
        }
    }

    struct Harness {
        contacts: Arc<TestContacts>,
        messages: Arc<TestMessages>,
        scheduler: Arc<TestScheduler>,
        webhook: Arc<TestWebhook>,
        executor: Executor,
    }

    fn harness(
        model_json: serde_json::Value,
        webhook_status: u16,
    ) -> Harness {
        let model: WorkflowModel = serde_json::from_value(model_json).unwrap();
        let workflow = Arc::new(Workflow::try_from(&model).unwrap());

        let contacts = Arc::new(TestContacts {
            contact: Mutex::new(Contact {
                id: "c1".to_string(),
                phone: "+15550100".to_string(),
                fields: Vars::new().with("name", "Alice").with("plan", "vip"),
                tags: vec![],
            }),
            ..Default::default()
        });
        let messages = Arc::new(TestMessages::default());
        let scheduler = Arc::new(TestScheduler::default());
        let webhook = Arc::new(TestWebhook {
            calls: AtomicUsize::new(0),
            status: webhook_status,
        });

        let collab = Collaborators {
            contacts: contacts.clone(),
            messages: messages.clone(),
            scheduler: scheduler.clone(),
            webhooks: webhook.clone(),
            ai: Arc::new(TestAi),
        };

        let mut config = Config::default();
        config.webhook.backoff_base_ms = 1;

        let executor = Executor::new(workflow, collab, &config, BroadcastQueue::new(64));
        Harness {
            contacts,
            messages,
            scheduler,
            webhook,
            executor,
        }
    }

    fn node(
        id: &str,
        kind: &str,
        config: serde_json::Value,
    ) -> serde_json::Value {
        json!({"id": id, "type": kind, "label": id, "position": {"x": 0.0, "y": 0.0}, "config": config})
    }

    fn edge(
        id: &str,
        source: &str,
        target: &str,
        handle: Option<&str>,
    ) -> serde_json::Value {
        match handle {
            Some(h) => json!({"id": id, "source": source, "target": target, "sourceHandle": h}),
            None => json!({"id": id, "source": source, "target": target}),
        }
    }

    fn linear_model() -> serde_json::Value {
        json!({
            "id": "wf1",
            "name": "welcome",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("m1", "message", json!({"customMessage": "Hi {{name}}"})),
                node("d1", "delay", json!({"amount": 1, "unit": "hours"})),
                node("g1", "goal", json!({"goalName": "welcomed"})),
            ],
            "edges": [
                edge("e1", "t1", "m1", None),
                edge("e2", "m1", "d1", None),
                edge("e3", "d1", "g1", None),
            ],
        })
    }

    #[tokio::test]
    async fn test_linear_scenario_completes_with_full_history() {
        let h = harness(linear_model(), 200);
        let mut record = ExecutionRecord::new("wf1", "c1", "t1");

        h.executor.advance(&mut record).await.unwrap();
        assert_eq!(record.status, RecordStatus::Waiting);
        assert!(record.scheduled_resume_at.is_some());
        assert_eq!(h.scheduler.scheduled.lock().unwrap().len(), 1);

        // Scheduler callback: reactivate and keep going.
        record.status = RecordStatus::Active;
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        let visited: Vec<&str> = record.history.iter().map(|h| h.node_id.as_str()).collect();
        assert_eq!(visited, ["t1", "m1", "d1", "g1"]);

        let sent = h.messages.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "Hi Alice");
        assert_eq!(h.contacts.conversions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_condition_routes_vip_branch() {
        let model = json!({
            "id": "wf2",
            "name": "routing",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("c1", "condition", json!({"condition": {"field": "plan", "operator": "equals", "value": "vip"}})),
                node("m1", "message", json!({"customMessage": "vip"})),
                node("m2", "message", json!({"customMessage": "standard"})),
            ],
            "edges": [
                edge("e1", "t1", "c1", None),
                edge("e2", "c1", "m1", Some("true")),
                edge("e3", "c1", "m2", Some("false")),
            ],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf2", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        let sent = h.messages.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "vip");
    }

    #[tokio::test]
    async fn test_missing_branch_edge_is_fatal() {
        // The false branch has no edge; a non-vip contact has nowhere to go.
        let model = json!({
            "id": "wf3",
            "name": "malformed",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("c1", "condition", json!({"condition": {"field": "plan", "operator": "equals", "value": "gold"}})),
                node("m1", "message", json!({"customMessage": "gold"})),
            ],
            "edges": [
                edge("e1", "t1", "c1", None),
                edge("e2", "c1", "m1", Some("true")),
            ],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf3", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Failed);
        assert!(record.error.as_deref().unwrap().contains("no edge"));
    }

    #[tokio::test]
    async fn test_webhook_retries_then_fails() {
        let model = json!({
            "id": "wf4",
            "name": "hook",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("w1", "webhook", json!({"url": "https://example.com/hook", "retryOnFailure": true, "maxRetries": 3})),
            ],
            "edges": [edge("e1", "t1", "w1", None)],
        });
        let h = harness(model, 500);
        let mut record = ExecutionRecord::new("wf4", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Failed);
        // Initial attempt plus 3 retries.
        assert_eq!(h.webhook.calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn test_webhook_response_captured_into_context() {
        let model = json!({
            "id": "wf5",
            "name": "hook",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("w1", "webhook", json!({"url": "https://example.com/hook", "responseField": "hookResult"})),
            ],
            "edges": [edge("e1", "t1", "w1", None)],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf5", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(h.webhook.calls.load(Ordering::Relaxed), 1);
        assert_eq!(record.context.get_value("hookResult"), Some(&json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_stop_on_reply_exits_before_stepping() {
        let mut model: WorkflowModel = serde_json::from_value(linear_model()).unwrap();
        model.settings.stop_on_reply = true;
        let h = harness(serde_json::to_value(&model).unwrap(), 200);
        h.contacts.replied.store(true, Ordering::Relaxed);

        let mut record = ExecutionRecord::new("wf1", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Exited);
        assert!(h.messages.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_split_full_weight_branch_routes_every_contact() {
        let model = json!({
            "id": "wf6",
            "name": "split",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("s1", "split", json!({"splitType": "percentage", "branches": [
                    {"id": "a", "label": "A", "percentage": 100.0},
                    {"id": "b", "label": "B", "percentage": 0.0}
                ]})),
                node("m1", "message", json!({"customMessage": "A"})),
                node("m2", "message", json!({"customMessage": "B"})),
            ],
            "edges": [
                edge("e1", "t1", "s1", None),
                edge("e2", "s1", "m1", Some("a")),
                edge("e3", "s1", "m2", Some("b")),
            ],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf6", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(h.messages.sent.lock().unwrap()[0].body, "A");
    }

    #[tokio::test]
    async fn test_action_and_ai_enrich_contact_and_context() {
        let model = json!({
            "id": "wf7",
            "name": "enrich",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("a1", "action", json!({"actionType": "add_tag", "tagIds": ["vip"]})),
                node("ai1", "ai", json!({"action": "categorize", "categories": ["billing", "support"], "outputField": "topic"})),
            ],
            "edges": [
                edge("e1", "t1", "a1", None),
                edge("e2", "a1", "ai1", None),
            ],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf7", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(h.contacts.tags_added.lock().unwrap().as_slice(), ["vip"]);
        assert_eq!(record.context.get_value("topic"), Some(&json!({"category": "billing"})));
    }

    #[tokio::test]
    async fn test_update_field_renders_value_tokens() {
        let model = json!({
            "id": "wf10",
            "name": "greet",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("a1", "action", json!({"actionType": "update_field", "fieldName": "greeting", "fieldValue": "Hello {{name}}"})),
            ],
            "edges": [edge("e1", "t1", "a1", None)],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf10", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        let contact = h.contacts.contact.lock().unwrap();
        assert_eq!(contact.fields.get_value("greeting"), Some(&json!("Hello Alice")));
    }

    #[tokio::test]
    async fn test_wait_until_satisfied_immediately_passes_through() {
        let model = json!({
            "id": "wf8",
            "name": "wait",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("w1", "wait_until", json!({"condition": {"field": "plan", "operator": "equals", "value": "vip"}})),
                node("m1", "message", json!({"customMessage": "hello vip"})),
            ],
            "edges": [
                edge("e1", "t1", "w1", None),
                edge("e2", "w1", "m1", None),
            ],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf8", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Completed);
        assert_eq!(h.messages.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wait_until_unsatisfied_suspends_for_recheck() {
        let model = json!({
            "id": "wf9",
            "name": "wait",
            "status": "active",
            "nodes": [
                node("t1", "trigger", json!({})),
                node("w1", "wait_until", json!({"condition": {"field": "plan", "operator": "equals", "value": "gold"}, "checkEveryMinutes": 5})),
                node("m1", "message", json!({"customMessage": "hello"})),
            ],
            "edges": [
                edge("e1", "t1", "w1", None),
                edge("e2", "w1", "m1", None),
            ],
        });
        let h = harness(model, 200);
        let mut record = ExecutionRecord::new("wf9", "c1", "t1");
        h.executor.advance(&mut record).await.unwrap();

        assert_eq!(record.status, RecordStatus::Waiting);
        let resume = record.scheduled_resume_at.unwrap();
        let minutes = (resume - Utc::now()).num_minutes();
        assert!((4..=5).contains(&minutes), "recheck in {} minutes", minutes);
    }
}
