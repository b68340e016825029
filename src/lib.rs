//! # Reachflow
//!
//! Reachflow is an embeddable, event-driven workflow automation engine for
//! contact messaging campaigns. It is designed to be embedded in a campaign
//! product to run contacts through designer-built automation graphs.
//!
//! ## Core Features
//!
//! - **Design-time graph store**: node/edge mutations with snapshot undo/redo
//! - **Static validation**: trigger uniqueness, reachability, per-node config
//!   completeness, split percentage sums, tight-loop detection
//! - **Per-contact execution**: every enrolled contact advances through the
//!   graph as an independent state machine, suspending on delay/wait_until
//!   nodes and resuming via a durable scheduler collaborator
//! - **Pluggable collaborators**: messaging, contact data, webhooks and AI
//!   calls are traits supplied by the embedding application
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reachflow::{EngineBuilder, WorkflowModel};
//!
//! let engine = EngineBuilder::new().collaborators(collabs).build()?;
//! engine.launch();
//!
//! // Deploy and activate a workflow, then enroll a contact
//! let workflow = WorkflowModel::from_json(json_str)?;
//! engine.deploy(&workflow)?;
//! engine.activate(&workflow.id)?;
//! let record_id = engine.enroll(&workflow.id, &contact)?;
//! ```

mod builder;
mod collab;
mod common;
mod config;
mod engine;
mod error;
mod events;
mod graph;
mod model;
mod registry;
mod runtime;
mod store;
mod utils;
mod validate;
mod workflow;

use std::sync::{Arc, RwLock};

pub use builder::EngineBuilder;
pub use collab::{
    AiClient, AiOutcome, Collaborators, Contact, ContactStore, HttpWebhookClient, MessageDispatcher, OutboundMessage, Scheduler, WebhookClient, WebhookResponse,
};
pub use common::{BroadcastQueue, Vars};
pub use config::{BusinessHours, Config, StoreType, WebhookRetryConfig};
pub use engine::{Engine, TriggerEvent};
pub use error::ReachflowError;
pub use events::{Event, FlowEvent, Log, Message, RecordEvent, WorkflowEvent};
pub use graph::{GraphSnapshot, GraphStore};
pub use model::*;
pub use registry::{NodeKind, PaletteEntry};
pub use runtime::{Channel, ChannelEvent, ChannelOptions, ExecutionRecord, Executor, HistoryEntry, RecordId, RecordStatus};
pub use validate::{Issue, Severity, is_activatable, validate};
pub use workflow::{Condition, ConditionOperator, LogicalOperator, Node, NodeConfig, SourceHandle, Workflow};
pub use workflow::config::{
    ActionConfig, ActionType, AiAction, AiConfig, AuthType, Branch, ConditionConfig, DelayConfig, DelayUnit, GoalConfig, GoalType, HttpMethod, MessageConfig,
    SplitConfig, SplitType, TriggerConfig, TriggerKind, WaitUntilConfig, WebhookConfig,
};

/// Result type alias for Reachflow operations.
pub type Result<T> = std::result::Result<T, ReachflowError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
