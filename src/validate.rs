//! Static workflow validation.
//!
//! Runs over a design-time [`GraphSnapshot`] and returns ordered issues.
//! Errors block activation; warnings are surfaced to the designer but do
//! not prevent the workflow from running.

use std::collections::HashMap;

use petgraph::{algo::tarjan_scc, graph::DiGraph};
use serde::{Deserialize, Serialize};

use crate::{
    graph::GraphSnapshot,
    registry::NodeKind,
    workflow::NodeConfig,
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding, attached to a node where that makes sense.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub message: String,
}

impl Issue {
    fn error(
        node_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            node_id: node_id.map(String::from),
            message: message.into(),
        }
    }

    fn warning(
        node_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            node_id: node_id.map(String::from),
            message: message.into(),
        }
    }
}

/// Whether a set of issues permits activation.
pub fn is_activatable(issues: &[Issue]) -> bool {
    issues.iter().all(|i| i.severity != Severity::Error)
}

/// Validate a workflow graph. Checks run in a fixed order so the issue
/// list is stable for a given snapshot.
pub fn validate(snapshot: &GraphSnapshot) -> Vec<Issue> {
    let mut issues = Vec::new();

    check_trigger(snapshot, &mut issues);
    check_unreachable(snapshot, &mut issues);
    check_configs(snapshot, &mut issues);
    check_cycles(snapshot, &mut issues);

    issues
}

/// (1) exactly one trigger node
fn check_trigger(
    snapshot: &GraphSnapshot,
    issues: &mut Vec<Issue>,
) {
    let triggers: Vec<_> = snapshot.nodes.iter().filter(|n| n.kind == NodeKind::Trigger).collect();
    match triggers.len() {
        0 => issues.push(Issue::error(None, "workflow must have a trigger node")),
        1 => {}
        n => issues.push(Issue::error(None, format!("workflow has {} trigger nodes, expected 1", n))),
    }
}

/// (2) non-trigger nodes nothing points at
fn check_unreachable(
    snapshot: &GraphSnapshot,
    issues: &mut Vec<Issue>,
) {
    for node in &snapshot.nodes {
        if node.kind == NodeKind::Trigger {
            continue;
        }
        if !snapshot.edges.iter().any(|e| e.target == node.id) {
            issues.push(Issue::warning(Some(&node.id), format!("node '{}' is unreachable: no incoming edge", node.label)));
        }
    }
}

/// (3) per-node completeness: non-empty label, then per-kind config rules
/// including split percentage sums
fn check_configs(
    snapshot: &GraphSnapshot,
    issues: &mut Vec<Issue>,
) {
    for node in &snapshot.nodes {
        if node.label.trim().is_empty() {
            issues.push(Issue::error(Some(&node.id), format!("{} node has no label", node.kind.as_ref())));
        }
        let result = NodeConfig::parse(node.kind, &node.config).and_then(|config| config.validate());
        if let Err(err) = result {
            issues.push(Issue::error(Some(&node.id), err.to_string()));
        }
    }
}

/// (4) cycle rule: a directed cycle with no waiting node inside is a tight
/// loop and an error; a cycle passing through delay/wait_until only warns.
fn check_cycles(
    snapshot: &GraphSnapshot,
    issues: &mut Vec<Issue>,
) {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut index = HashMap::new();
    for node in &snapshot.nodes {
        index.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
    }
    for edge in &snapshot.edges {
        if let (Some(source), Some(target)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
            graph.add_edge(*source, *target, ());
        }
    }

    let kinds: HashMap<&str, NodeKind> = snapshot.nodes.iter().map(|n| (n.id.as_str(), n.kind)).collect();

    for component in tarjan_scc(&graph) {
        // tarjan reports a node with a self-loop edge as a size-1 component
        if component.len() < 2 && graph.find_edge(component[0], component[0]).is_none() {
            continue;
        }
        let ids: Vec<&str> = component.iter().map(|idx| graph[*idx]).collect();
        let has_wait = ids.iter().any(|id| matches!(kinds.get(id), Some(NodeKind::Delay) | Some(NodeKind::WaitUntil)));
        let first = ids.first().copied();
        if has_wait {
            issues.push(Issue::warning(first, format!("cycle through {} node(s); contacts will loop until they exit", ids.len())));
        } else {
            issues.push(Issue::error(first, format!("tight loop through {} node(s) with no delay or wait_until inside", ids.len())));
        }
    }
}
