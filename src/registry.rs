//! Node type registry.
//!
//! Maps each node kind to its palette metadata and default configuration.
//! Pure lookups, no side effects. Adding a node kind means registering a
//! config variant, a default, a validation predicate and an execution
//! handler; `NodeKind` being a closed enum keeps the four in sync through
//! exhaustive matches.

use serde::{Deserialize, Serialize};

use crate::workflow::NodeConfig;

/// The closed set of workflow node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Trigger,
    Message,
    Delay,
    Condition,
    Action,
    WaitUntil,
    Split,
    Webhook,
    Ai,
    Goal,
}

/// Palette grouping for the editor sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Triggers,
    Messaging,
    Timing,
    Logic,
    Actions,
    Integrations,
    Intelligence,
    Goals,
}

/// Palette metadata for one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub kind: NodeKind,
    pub category: Category,
    /// Maximum number of instances allowed per workflow, `None` for unbounded.
    pub max_instances: Option<u32>,
}

/// Palette metadata for a single kind.
pub fn palette_entry(kind: NodeKind) -> PaletteEntry {
    let (category, max_instances) = match kind {
        NodeKind::Trigger => (Category::Triggers, Some(1)),
        NodeKind::Message => (Category::Messaging, None),
        NodeKind::Delay => (Category::Timing, None),
        NodeKind::WaitUntil => (Category::Timing, None),
        NodeKind::Condition => (Category::Logic, None),
        NodeKind::Split => (Category::Logic, None),
        NodeKind::Action => (Category::Actions, None),
        NodeKind::Webhook => (Category::Integrations, None),
        NodeKind::Ai => (Category::Intelligence, None),
        NodeKind::Goal => (Category::Goals, None),
    };
    PaletteEntry {
        kind,
        category,
        max_instances,
    }
}

/// The full palette in sidebar order.
pub fn palette() -> Vec<PaletteEntry> {
    use strum::IntoEnumIterator;
    NodeKind::iter().map(palette_entry).collect()
}

/// Default configuration for a freshly dropped node of `kind`.
pub fn default_config(kind: NodeKind) -> NodeConfig {
    NodeConfig::default_for(kind)
}

/// Default editor label for a freshly dropped node of `kind`.
pub fn default_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Trigger => "Trigger",
        NodeKind::Message => "Send message",
        NodeKind::Delay => "Wait",
        NodeKind::Condition => "If / else",
        NodeKind::Action => "Action",
        NodeKind::WaitUntil => "Wait until",
        NodeKind::Split => "Split",
        NodeKind::Webhook => "Webhook",
        NodeKind::Ai => "AI step",
        NodeKind::Goal => "Goal",
    }
}
