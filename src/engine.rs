//! Workflow engine - the main entry point for Reachflow.
//!
//! The engine manages the lifecycle of workflows and execution records:
//! - Deploying and activating workflow definitions
//! - Enrolling contacts and driving their records through the graph
//! - Resuming waiting records when the scheduler fires
//! - Managing the event channel and storage

mod monitor;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::Utc;
use tokio::runtime::{Builder, Runtime};

use crate::{
    ChannelEvent, ChannelOptions, Config, ReachflowError, Result, StoreType,
    collab::{Collaborators, Contact},
    common::{MemCache, Queue, Shutdown},
    events::{Event, FlowEvent, Message, RecordEvent, WorkflowEvent},
    model::{WorkflowModel, WorkflowStatus},
    graph::GraphSnapshot,
    registry::NodeKind,
    runtime::{Channel, Executor, ExecutionRecord, RecordId, RecordStatus},
    store::{DbStore, MemStore, Store, data, query::Query},
    utils, validate,
    workflow::{Workflow, config::TriggerKind},
};

use monitor::Monitor;

/// Maximum number of pinned workflow graphs to cache in memory.
const WORKFLOW_CACHE_SIZE: usize = 2048;
/// Size of the queue for terminal record notifications.
const RECORD_DONE_QUEUE_SIZE: usize = 100;

/// External occurrence that may enroll contacts into active workflows.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    pub contact: Contact,
    /// Tag that was applied, for `tag_applied` events.
    pub tag: Option<String>,
    /// Field that changed, for `custom_field_changed` events.
    pub field_name: Option<String>,
}

/// The main workflow engine.
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new().collaborators(collabs).build()?;
/// engine.launch();
///
/// engine.deploy(&workflow)?;
/// engine.activate(&workflow.id)?;
/// let rid = engine.enroll(&workflow.id, "contact-1")?;
///
/// engine.shutdown();
/// ```
pub struct Engine {
    /// Event channel for broadcasting execution events.
    channel: Arc<Channel>,
    /// Persistent storage for workflows, records, events and logs.
    store: Arc<Store>,
    /// Background monitor for event persistence.
    monitor: Monitor,
    /// Application-supplied side-effect handlers.
    collab: Collaborators,
    config: Config,
    /// Queue for receiving terminal record notifications.
    records_done_queue: Arc<Queue<RecordId>>,
    /// Pinned workflow graphs, keyed by record id. Evicted entries are
    /// recompiled from the definition stored on the record row.
    pinned: Arc<MemCache<RecordId, Arc<Workflow>>>,

    /// Flag indicating if the engine is running.
    running: Arc<AtomicBool>,
    /// Tokio runtime for async task execution.
    runtime: Arc<Runtime>,
    /// Shutdown coordinator for graceful termination.
    shutdown: Arc<Shutdown>,
}

impl Engine {
    /// Creates a new engine with its own runtime.
    pub fn new_with_config(
        config: Config,
        collab: Collaborators,
    ) -> Self {
        let runtime = Arc::new(Builder::new_multi_thread().worker_threads(config.async_worker_thread_number.into()).enable_all().build().unwrap());
        Self::new(runtime, config, collab)
    }

    pub(crate) fn new(
        runtime: Arc<Runtime>,
        config: Config,
        collab: Collaborators,
    ) -> Self {
        let store = Store::new();
        let db: Box<dyn DbStore> = match config.store.store_type {
            StoreType::Mem => Box::new(MemStore::new()),
        };
        db.init(&store);

        let store = Arc::new(store);
        let channel = Arc::new(Channel::new(runtime.clone()));
        let monitor = Monitor::new(store.clone(), channel.clone(), runtime.clone());

        let records_done_queue = Queue::new(RECORD_DONE_QUEUE_SIZE);

        Self {
            channel,
            store,
            monitor,
            collab,
            config,
            records_done_queue,
            pinned: Arc::new(MemCache::new(WORKFLOW_CACHE_SIZE)),
            running: Arc::new(AtomicBool::new(false)),
            runtime,
            shutdown: Arc::new(Shutdown::new()),
        }
    }

    /// Starts the engine and begins processing events.
    pub fn launch(&self) {
        if self.running.swap(true, Ordering::Relaxed) {
            return;
        }

        // Register handlers first, then start listening
        // This ensures no events are missed
        self.monitor.monitor();
        self.channel.listen();

        // Drop pinned graphs once their record terminates
        let records_done_queue = self.records_done_queue.clone();
        ChannelEvent::channel(self.channel.clone(), ChannelOptions::default()).on_terminal(move |rid| {
            let _ = records_done_queue.send(rid);
        });

        let records_done_queue = self.records_done_queue.clone();
        let shutdown = self.shutdown.clone();
        let pinned = self.pinned.clone();
        self.runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.wait() => break,
                    Some(rid) = records_done_queue.next_async() => {
                        pinned.remove(&rid);
                    }
                }
            }
        });
    }

    /// Gracefully shuts down the engine. In-flight advance tasks drain on
    /// their own; waiting records stay persisted and can resume after a
    /// restart.
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }

        self.shutdown.shutdown();
        self.channel.shutdown();
    }

    /// Deploys a workflow definition to the store.
    ///
    /// The graph is validated first; errors refuse the deploy, warnings are
    /// returned to the caller.
    pub fn deploy(
        &self,
        workflow: &WorkflowModel,
    ) -> Result<Vec<validate::Issue>> {
        let snapshot = GraphSnapshot {
            nodes: workflow.nodes.clone(),
            edges: workflow.edges.clone(),
        };
        let issues = validate::validate(&snapshot);
        if !validate::is_activatable(&issues) {
            let first = issues.iter().find(|i| i.severity == validate::Severity::Error);
            return Err(ReachflowError::Validation(first.map(|i| i.message.clone()).unwrap_or_default()));
        }

        self.store.deploy(workflow)?;
        self.emit_workflow_event(&workflow.id, WorkflowEvent::Deployed);
        Ok(issues)
    }

    /// Activates a deployed workflow so that it accepts enrollments.
    pub fn activate(
        &self,
        wid: &str,
    ) -> Result<()> {
        let mut model = self.load_model(wid)?;
        // Re-validate: the stored definition may predate stricter rules.
        let snapshot = GraphSnapshot {
            nodes: model.nodes.clone(),
            edges: model.edges.clone(),
        };
        let issues = validate::validate(&snapshot);
        if !validate::is_activatable(&issues) {
            let first = issues.iter().find(|i| i.severity == validate::Severity::Error);
            return Err(ReachflowError::Validation(first.map(|i| i.message.clone()).unwrap_or_default()));
        }

        model.status = WorkflowStatus::Active;
        self.store.deploy(&model)?;
        self.emit_workflow_event(wid, WorkflowEvent::Activated);
        Ok(())
    }

    /// Pauses a workflow: no new enrollments, in-flight records drain.
    pub fn pause(
        &self,
        wid: &str,
    ) -> Result<()> {
        self.set_status(wid, WorkflowStatus::Paused)?;
        self.emit_workflow_event(wid, WorkflowEvent::Paused);
        Ok(())
    }

    /// Archives a workflow permanently. In-flight records drain.
    pub fn archive(
        &self,
        wid: &str,
    ) -> Result<()> {
        self.set_status(wid, WorkflowStatus::Archived)?;
        self.emit_workflow_event(wid, WorkflowEvent::Archived);
        Ok(())
    }

    /// Enrolls a contact into an active workflow, returning the new record
    /// id. The workflow graph is compiled and pinned to the record: later
    /// edits to the definition do not affect it.
    pub fn enroll(
        &self,
        wid: &str,
        contact_id: &str,
    ) -> Result<RecordId> {
        if !self.running.load(Ordering::Relaxed) {
            return Err(ReachflowError::Engine("engine is not running".to_string()));
        }

        let model = self.load_model(wid)?;
        if model.status != WorkflowStatus::Active {
            return Err(ReachflowError::Workflow(format!("workflow {} is not active", wid)));
        }

        if let Some(cap) = model.settings.max_contacts_per_day {
            let today = Utc::now().format("%Y-%m-%d").to_string();
            let enrolled = self.store.records().query(&Query::new().push("wid", wid).push("enrolled_day", today.as_str()))?;
            if enrolled.count >= cap as usize {
                return Err(ReachflowError::Workflow(format!("workflow {} reached its daily enrollment limit of {}", wid, cap)));
            }
        }

        let workflow = Arc::new(Workflow::try_from(&model)?);
        let trigger = workflow.trigger_node().ok_or(ReachflowError::Workflow(format!("workflow {} has no trigger node", wid)))?;

        let record = ExecutionRecord::new(wid, contact_id, &trigger.id);
        let rid = record.id.clone();
        // The definition rides on the row so the pin survives cache
        // eviction and restarts.
        self.store.records().create(&record_row(&record, model.to_json()?)?)?;
        self.pinned.set(rid.clone(), workflow.clone());

        self.emit_record_event(&record, RecordEvent::Enrolled(utils::time::time_millis()));
        self.spawn_advance(workflow, record);
        Ok(rid)
    }

    /// Routes an external trigger event: every active workflow whose trigger
    /// matches enrolls the event's contact. Returns the new record ids.
    pub fn handle_event(
        &self,
        event: &TriggerEvent,
    ) -> Result<Vec<RecordId>> {
        let page = self.store.workflows().query(&Query::new().push("status", WorkflowStatus::Active.as_ref()))?;

        let mut rids = Vec::new();
        for row in &page.rows {
            let model = WorkflowModel::from_json(&row.data)?;
            if !trigger_matches(&model, event) {
                continue;
            }
            match self.enroll(&row.id, &event.contact.id) {
                Ok(rid) => rids.push(rid),
                // One throttled workflow must not block the others.
                Err(err) => tracing::warn!("handle_event: enroll into {} failed: {}", row.id, err),
            }
        }
        Ok(rids)
    }

    /// Resumes a waiting record, typically from the scheduler callback.
    pub fn resume(
        &self,
        rid: &str,
    ) -> Result<()> {
        if !self.running.load(Ordering::Relaxed) {
            return Err(ReachflowError::Engine("engine is not running".to_string()));
        }

        let row = self.store.records().find(rid)?;
        let mut record = ExecutionRecord::from_json(&row.data)?;
        if record.status != RecordStatus::Waiting {
            return Err(ReachflowError::Record(format!("record {} is not waiting", rid)));
        }

        let workflow = match self.pinned.get(&rid.to_string()) {
            Some(workflow) => workflow,
            None => {
                // Evicted or restarted: recompile the definition the record
                // enrolled against, not the latest deploy.
                let model = WorkflowModel::from_json(&row.definition)?;
                let workflow = Arc::new(Workflow::try_from(&model)?);
                self.pinned.set(rid.to_string(), workflow.clone());
                workflow
            }
        };

        // Keep scheduled_resume_at: the executor uses it to tell a resumed
        // visit from a first visit.
        record.status = RecordStatus::Active;
        self.spawn_advance(workflow, record);
        Ok(())
    }

    /// Loads a record from the store.
    pub fn get_record(
        &self,
        rid: &str,
    ) -> Result<ExecutionRecord> {
        let row = self.store.records().find(rid)?;
        ExecutionRecord::from_json(&row.data)
    }

    /// Returns a reference to the event channel.
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    fn spawn_advance(
        &self,
        workflow: Arc<Workflow>,
        mut record: ExecutionRecord,
    ) {
        let executor = Executor::new(workflow, self.collab.clone(), &self.config, self.channel.event_queue());
        let store = self.store.clone();
        self.runtime.spawn(async move {
            if let Err(err) = executor.advance(&mut record).await {
                tracing::error!("advance record {} failed: {}", record.id, err);
            }
            // Carry the pinned definition forward from the existing row.
            match store.records().find(&record.id).and_then(|row| record_row(&record, row.definition)) {
                Ok(row) => {
                    if let Err(err) = store.records().update(&row) {
                        tracing::error!("persist record {} failed: {}", record.id, err);
                    }
                }
                Err(err) => tracing::error!("persist record {} failed: {}", record.id, err),
            }
        });
    }

    fn load_model(
        &self,
        wid: &str,
    ) -> Result<WorkflowModel> {
        let row = self.store.workflows().find(wid)?;
        WorkflowModel::from_json(&row.data)
    }

    fn set_status(
        &self,
        wid: &str,
        status: WorkflowStatus,
    ) -> Result<()> {
        let mut model = self.load_model(wid)?;
        model.status = status;
        self.store.deploy(&model)?;
        Ok(())
    }

    fn emit_workflow_event(
        &self,
        wid: &str,
        event: WorkflowEvent,
    ) {
        let _ = self.channel.event_queue().send(Event::new(&Message {
            rid: String::new(),
            wid: wid.to_string(),
            nid: String::new(),
            event: FlowEvent::Workflow(event),
        }));
    }

    fn emit_record_event(
        &self,
        record: &ExecutionRecord,
        event: RecordEvent,
    ) {
        let _ = self.channel.event_queue().send(Event::new(&Message {
            rid: record.id.clone(),
            wid: record.workflow_id.clone(),
            nid: record.current_node_id.clone(),
            event: FlowEvent::Record(event),
        }));
    }
}

/// Serialize a record into its store row. `definition` is the workflow
/// model the record enrolled against.
fn record_row(
    record: &ExecutionRecord,
    definition: String,
) -> Result<data::Record> {
    Ok(data::Record {
        id: record.id.clone(),
        wid: record.workflow_id.clone(),
        cid: record.contact_id.clone(),
        status: record.status.as_ref().to_string(),
        data: record.to_json()?,
        definition,
        enrolled_day: record.enrolled_at.format("%Y-%m-%d").to_string(),
        timestamp: utils::time::time_millis(),
    })
}

/// Whether a workflow's trigger configuration matches an external event.
fn trigger_matches(
    model: &WorkflowModel,
    event: &TriggerEvent,
) -> bool {
    let Some(node) = model.nodes.iter().find(|n| n.kind == NodeKind::Trigger) else {
        return false;
    };
    let Ok(crate::workflow::NodeConfig::Trigger(config)) = crate::workflow::NodeConfig::parse(NodeKind::Trigger, &node.config) else {
        return false;
    };
    if config.trigger_kind != event.kind {
        return false;
    }
    match config.trigger_kind {
        TriggerKind::TagApplied => event.tag.as_deref().is_some_and(|tag| config.tags.iter().any(|t| t == tag)),
        TriggerKind::CustomFieldChanged => config.field_name.as_deref() == event.field_name.as_deref(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        EngineBuilder,
        collab::{AiClient, AiOutcome, ContactStore, MessageDispatcher, OutboundMessage, Scheduler, WebhookClient, WebhookResponse},
        common::Vars,
        workflow::config::{AiConfig, GoalType, WebhookConfig},
    };

    #[derive(Default)]
    struct NullContacts {
        sent_notifications: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContactStore for NullContacts {
        async fn get(
            &self,
            contact_id: &str,
        ) -> crate::Result<Contact> {
            Ok(Contact {
                id: contact_id.to_string(),
                phone: "+15550100".to_string(),
                fields: Vars::new().with("name", "Alice"),
                tags: vec![],
            })
        }

        async fn add_tags(
            &self,
            _contact_id: &str,
            _tags: &[String],
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn remove_tags(
            &self,
            _contact_id: &str,
            _tags: &[String],
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn update_field(
            &self,
            _contact_id: &str,
            _field: &str,
            _value: Value,
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn add_to_list(
            &self,
            _contact_id: &str,
            _list_id: &str,
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn remove_from_list(
            &self,
            _contact_id: &str,
            _list_id: &str,
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn has_replied_since(
            &self,
            _contact_id: &str,
            _since: DateTime<Utc>,
        ) -> crate::Result<bool> {
            Ok(false)
        }

        async fn record_conversion(
            &self,
            _contact_id: &str,
            _goal_name: &str,
            _goal_type: GoalType,
            _revenue_amount: Option<f64>,
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn send_notification(
            &self,
            email: &str,
            _subject: &str,
            _body: &str,
        ) -> crate::Result<()> {
            self.sent_notifications.lock().unwrap().push(email.to_string());
            Ok(())
        }
    }

    struct NullMessages;

    #[async_trait]
    impl MessageDispatcher for NullMessages {
        async fn send(
            &self,
            _message: &OutboundMessage,
        ) -> crate::Result<()> {
            Ok(())
        }
    }

    struct NullScheduler;

    #[async_trait]
    impl Scheduler for NullScheduler {
        async fn schedule_resume(
            &self,
            _record_id: &str,
            _at: DateTime<Utc>,
        ) -> crate::Result<()> {
            Ok(())
        }

        async fn cancel(
            &self,
            _record_id: &str,
        ) -> crate::Result<()> {
            Ok(())
        }
    }

    struct NullWebhook;

    #[async_trait]
    impl WebhookClient for NullWebhook {
        async fn call(
            &self,
            _config: &WebhookConfig,
            _headers: &HashMap<String, String>,
            _body: &Value,
        ) -> crate::Result<WebhookResponse> {
            Ok(WebhookResponse {
                status: 200,
                body: "{}".to_string(),
            })
        }
    }

    struct NullAi;

    #[async_trait]
    impl AiClient for NullAi {
        async fn run(
            &self,
            _config: &AiConfig,
            _contact: &Contact,
            _context: &Vars,
        ) -> crate::Result<AiOutcome> {
            Ok(AiOutcome {
                value: json!("ok"),
            })
        }
    }

    fn collaborators() -> Collaborators {
        Collaborators {
            contacts: Arc::new(NullContacts::default()),
            messages: Arc::new(NullMessages),
            scheduler: Arc::new(NullScheduler),
            webhooks: Arc::new(NullWebhook),
            ai: Arc::new(NullAi),
        }
    }

    fn engine() -> Engine {
        let engine = EngineBuilder::new().async_worker_thread_number(2).collaborators(collaborators()).build().unwrap();
        engine.launch();
        engine
    }

    fn simple_model(
        wid: &str,
    ) -> WorkflowModel {
        WorkflowModel::from_json(
            &json!({
                "id": wid,
                "name": "welcome",
                "status": "draft",
                "nodes": [
                    {"id": "t1", "type": "trigger", "label": "Trigger", "position": {"x": 0.0, "y": 0.0}, "config": {}},
                    {"id": "m1", "type": "message", "label": "Hi", "position": {"x": 0.0, "y": 0.0}, "config": {"customMessage": "Hi {{name}}"}}
                ],
                "edges": [{"id": "e1", "source": "t1", "target": "m1"}]
            })
            .to_string(),
        )
        .unwrap()
    }

    fn wait_status(
        engine: &Engine,
        rid: &str,
        status: RecordStatus,
    ) -> ExecutionRecord {
        for _ in 0..100 {
            if let Ok(record) = engine.get_record(rid)
                && record.status == status
            {
                return record;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        panic!("record {} did not reach status {:?}", rid, status);
    }

    fn wait_terminal(
        engine: &Engine,
        rid: &str,
    ) -> ExecutionRecord {
        for _ in 0..100 {
            if let Ok(record) = engine.get_record(rid)
                && record.status.is_terminal()
            {
                return record;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        panic!("record {} did not reach a terminal status", rid);
    }

    #[test]
    fn test_enroll_runs_record_to_completion() {
        let engine = engine();
        engine.deploy(&simple_model("wf1")).unwrap();
        engine.activate("wf1").unwrap();

        let rid = engine.enroll("wf1", "c1").unwrap();
        let record = wait_terminal(&engine, &rid);
        assert_eq!(record.status, RecordStatus::Completed);
        let visited: Vec<&str> = record.history.iter().map(|h| h.node_id.as_str()).collect();
        assert_eq!(visited, ["t1", "m1"]);

        engine.shutdown();
    }

    #[test]
    fn test_enroll_requires_active_workflow() {
        let engine = engine();
        engine.deploy(&simple_model("wf1")).unwrap();
        assert!(engine.enroll("wf1", "c1").is_err());

        engine.activate("wf1").unwrap();
        engine.pause("wf1").unwrap();
        assert!(engine.enroll("wf1", "c1").is_err());

        engine.shutdown();
    }

    #[test]
    fn test_deploy_refuses_invalid_graph() {
        let engine = engine();
        let mut model = simple_model("wf1");
        model.nodes.retain(|n| n.kind != NodeKind::Trigger);
        model.edges.clear();
        assert!(matches!(engine.deploy(&model), Err(ReachflowError::Validation(_))));

        engine.shutdown();
    }

    #[test]
    fn test_daily_enrollment_cap() {
        let engine = engine();
        let mut model = simple_model("wf1");
        model.settings.max_contacts_per_day = Some(2);
        engine.deploy(&model).unwrap();
        engine.activate("wf1").unwrap();

        engine.enroll("wf1", "c1").unwrap();
        engine.enroll("wf1", "c2").unwrap();
        assert!(engine.enroll("wf1", "c3").is_err());

        engine.shutdown();
    }

    #[test]
    fn test_trigger_event_enrolls_matching_workflows() {
        let engine = engine();

        let mut tagged = simple_model("wf-tag");
        tagged.nodes[0].config = json!({"triggerKind": "tag_applied", "tags": ["vip"]});
        engine.deploy(&tagged).unwrap();
        engine.activate("wf-tag").unwrap();

        engine.deploy(&simple_model("wf-created")).unwrap();
        engine.activate("wf-created").unwrap();

        let contact = Contact {
            id: "c1".to_string(),
            phone: "+15550100".to_string(),
            fields: Vars::new(),
            tags: vec![],
        };

        let rids = engine
            .handle_event(&TriggerEvent {
                kind: TriggerKind::TagApplied,
                contact: contact.clone(),
                tag: Some("vip".to_string()),
                field_name: None,
            })
            .unwrap();
        assert_eq!(rids.len(), 1);

        // A non-matching tag enrolls nobody.
        let rids = engine
            .handle_event(&TriggerEvent {
                kind: TriggerKind::TagApplied,
                contact,
                tag: Some("basic".to_string()),
                field_name: None,
            })
            .unwrap();
        assert!(rids.is_empty());

        engine.shutdown();
    }

    fn delayed_model(
        wid: &str,
        message_node: &str,
    ) -> WorkflowModel {
        WorkflowModel::from_json(
            &json!({
                "id": wid,
                "name": "delayed",
                "status": "draft",
                "nodes": [
                    {"id": "t1", "type": "trigger", "label": "Trigger", "position": {"x": 0.0, "y": 0.0}, "config": {}},
                    {"id": "d1", "type": "delay", "label": "Wait", "position": {"x": 0.0, "y": 0.0}, "config": {"amount": 1, "unit": "hours"}},
                    {"id": message_node, "type": "message", "label": "Hi", "position": {"x": 0.0, "y": 0.0}, "config": {"customMessage": "Hi"}}
                ],
                "edges": [
                    {"id": "e1", "source": "t1", "target": "d1"},
                    {"id": "e2", "source": "d1", "target": message_node}
                ]
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_resume_recompiles_the_enrolled_definition_after_eviction() {
        let engine = engine();
        engine.deploy(&delayed_model("wf1", "m1")).unwrap();
        engine.activate("wf1").unwrap();

        let rid = engine.enroll("wf1", "c1").unwrap();
        wait_status(&engine, &rid, RecordStatus::Waiting);

        // Redeploy a changed definition, then drop the pinned graph to force
        // the recompile path.
        engine.deploy(&delayed_model("wf1", "m2")).unwrap();
        engine.pinned.remove(&rid);

        engine.resume(&rid).unwrap();
        let record = wait_terminal(&engine, &rid);
        assert_eq!(record.status, RecordStatus::Completed);
        let visited: Vec<&str> = record.history.iter().map(|h| h.node_id.as_str()).collect();
        assert_eq!(visited, ["t1", "d1", "m1"]);

        engine.shutdown();
    }

    #[test]
    fn test_resume_requires_waiting_record() {
        let engine = engine();
        engine.deploy(&simple_model("wf1")).unwrap();
        engine.activate("wf1").unwrap();

        let rid = engine.enroll("wf1", "c1").unwrap();
        wait_terminal(&engine, &rid);
        assert!(engine.resume(&rid).is_err());

        engine.shutdown();
    }
}
