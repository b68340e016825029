use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ReachflowError, Result, common::Vars, utils, workflow::node::NodeId};

/// record id
pub type RecordId = String;

/// Lifecycle of one enrolled contact.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordStatus {
    /// Stepping through nodes.
    #[default]
    Active,
    /// Suspended on a delay or wait_until node.
    Waiting,
    /// Reached a goal or a node with no outgoing edge.
    Completed,
    /// Execution error (routing failure, exhausted webhook retries, ...).
    Failed,
    /// Left early through a global exit condition.
    Exited,
}

impl RecordStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordStatus::Completed | RecordStatus::Failed | RecordStatus::Exited)
    }
}

/// One visited node in a record's path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub node_id: NodeId,
    /// Entry timestamp in milliseconds.
    pub entered_at: i64,
    pub outcome: String,
}

/// Per-contact execution state: one record per enrollment.
///
/// The record is the unit of persistence; everything the executor needs to
/// continue after a restart lives here (plus the pinned workflow graph).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: RecordId,
    pub contact_id: String,
    pub workflow_id: String,
    pub current_node_id: NodeId,
    pub status: RecordStatus,
    /// Accumulated step outputs (webhook responses, AI results, ...).
    #[serde(default)]
    pub context: Vars,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scheduled_resume_at: Option<DateTime<Utc>>,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Failure or exit reason, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ExecutionRecord {
    /// Create a fresh record positioned at `entry_node` (the trigger).
    pub fn new(
        workflow_id: &str,
        contact_id: &str,
        entry_node: &str,
    ) -> Self {
        Self {
            id: utils::longid(),
            contact_id: contact_id.to_string(),
            workflow_id: workflow_id.to_string(),
            current_node_id: entry_node.to_string(),
            status: RecordStatus::Active,
            context: Vars::new(),
            scheduled_resume_at: None,
            enrolled_at: Utc::now(),
            history: Vec::new(),
            error: None,
        }
    }

    /// Record entry into a node. Re-entering the node a record is already
    /// positioned on (resume after waiting) does not duplicate the entry.
    pub fn enter(
        &mut self,
        node_id: &str,
    ) -> bool {
        if self.history.last().map(|h| h.node_id.as_str()) == Some(node_id) {
            return false;
        }
        self.history.push(HistoryEntry {
            node_id: node_id.to_string(),
            entered_at: utils::time::time_millis(),
            outcome: String::new(),
        });
        true
    }

    /// Set the outcome of the node currently being executed.
    pub fn set_outcome(
        &mut self,
        outcome: &str,
    ) {
        if let Some(entry) = self.history.last_mut() {
            entry.outcome = outcome.to_string();
        }
    }

    /// Millisecond timestamp the record first entered its current node.
    pub fn entered_current_at(&self) -> Option<i64> {
        self.history.last().filter(|h| h.node_id == self.current_node_id).map(|h| h.entered_at)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<ExecutionRecord>(s).map_err(|e| ReachflowError::Record(format!("{}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ReachflowError::Record(format!("{}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_deduplicates_current_node() {
        let mut record = ExecutionRecord::new("wf1", "c1", "t1");
        assert!(record.enter("t1"));
        assert!(!record.enter("t1"));
        assert_eq!(record.history.len(), 1);

        assert!(record.enter("m1"));
        // A later revisit of an earlier node is a new entry.
        assert!(record.enter("t1"));
        assert_eq!(record.history.len(), 3);
    }

    #[test]
    fn test_outcome_applies_to_last_entry() {
        let mut record = ExecutionRecord::new("wf1", "c1", "t1");
        record.enter("t1");
        record.enter("m1");
        record.set_outcome("sent");
        assert_eq!(record.history[0].outcome, "");
        assert_eq!(record.history[1].outcome, "sent");
    }

    #[test]
    fn test_json_round_trip() {
        let mut record = ExecutionRecord::new("wf1", "c1", "t1");
        record.enter("t1");
        record.status = RecordStatus::Waiting;
        record.context.set("score", 7);

        let back = ExecutionRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!RecordStatus::Active.is_terminal());
        assert!(!RecordStatus::Waiting.is_terminal());
        assert!(RecordStatus::Completed.is_terminal());
        assert!(RecordStatus::Failed.is_terminal());
        assert!(RecordStatus::Exited.is_terminal());
    }
}
