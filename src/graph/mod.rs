//! Design-time graph store backing the visual canvas.
//!
//! Holds the mutable node/edge collections the designer edits, enforces the
//! structural rules that must hold even mid-edit (unique trigger, no
//! self-loops, no duplicate edges) and keeps a snapshot history for
//! undo/redo. Config completeness is deliberately NOT enforced here; a
//! half-configured node is a normal editing state and is only flagged by
//! [`crate::validate`] at deploy time.

use serde::{Deserialize, Serialize};

use crate::{
    ReachflowError, Result,
    model::{EdgeModel, NodeModel, Position},
    registry::{self, NodeKind},
    utils,
};

/// Max snapshots kept on the undo stack.
const HISTORY_DEPTH: usize = 50;

/// Immutable copy of the canvas at one instant.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeModel>,
    pub edges: Vec<EdgeModel>,
}

/// The editable workflow graph.
pub struct GraphStore {
    nodes: Vec<NodeModel>,
    edges: Vec<EdgeModel>,
    selected: Option<String>,
    undo_stack: Vec<GraphSnapshot>,
    redo_stack: Vec<GraphSnapshot>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            selected: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Load an existing workflow into the canvas. History starts empty.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes,
            edges: snapshot.edges,
            selected: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn nodes(&self) -> &[NodeModel] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeModel] {
        &self.edges
    }

    /// Currently selected node id, if any. Selection is UI state and is not
    /// recorded in undo history.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_selected(
        &mut self,
        id: Option<String>,
    ) {
        self.selected = match id {
            Some(id) if self.nodes.iter().any(|n| n.id == id) => Some(id),
            _ => None,
        };
    }

    /// Add a node of the given kind with its registry defaults.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
    ) -> Result<NodeModel> {
        if let Some(max) = registry::palette_entry(kind).max_instances {
            let count = self.nodes.iter().filter(|n| n.kind == kind).count() as u32;
            if count >= max {
                return Err(ReachflowError::Node(format!("at most {} {} node(s) allowed", max, kind.as_ref())));
            }
        }

        self.checkpoint();
        let node = NodeModel {
            id: utils::shortid(),
            kind,
            label: registry::default_label(kind).to_string(),
            position,
            config: registry::default_config(kind).to_model_value(),
        };
        self.nodes.push(node.clone());
        Ok(node)
    }

    /// Replace a node's label and/or config. Kind is immutable.
    pub fn update_node(
        &mut self,
        id: &str,
        label: Option<String>,
        config: Option<serde_json::Value>,
    ) -> Result<()> {
        let idx = self.nodes.iter().position(|n| n.id == id).ok_or(ReachflowError::Node(format!("node {} not found", id)))?;

        self.checkpoint();
        let node = &mut self.nodes[idx];
        if let Some(label) = label {
            node.label = label;
        }
        if let Some(config) = config {
            node.config = config;
        }
        Ok(())
    }

    pub fn move_node(
        &mut self,
        id: &str,
        position: Position,
    ) -> Result<()> {
        let idx = self.nodes.iter().position(|n| n.id == id).ok_or(ReachflowError::Node(format!("node {} not found", id)))?;
        self.checkpoint();
        self.nodes[idx].position = position;
        Ok(())
    }

    /// Remove a node and every edge touching it. Unknown ids are a no-op.
    pub fn delete_node(
        &mut self,
        id: &str,
    ) {
        if !self.nodes.iter().any(|n| n.id == id) {
            return;
        }
        self.checkpoint();
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.source != id && e.target != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    /// Connect two nodes through an optional source handle.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
    ) -> Result<EdgeModel> {
        if source == target {
            return Err(ReachflowError::Edge("self-loop edges are not allowed".to_string()));
        }
        if !self.nodes.iter().any(|n| n.id == source) {
            return Err(ReachflowError::Edge(format!("source node {} not found", source)));
        }
        if !self.nodes.iter().any(|n| n.id == target) {
            return Err(ReachflowError::Edge(format!("target node {} not found", target)));
        }
        if self.edges.iter().any(|e| e.source == source && e.target == target && e.source_handle == source_handle) {
            return Err(ReachflowError::Edge(format!("edge {} -> {} already exists", source, target)));
        }

        self.checkpoint();
        let edge = EdgeModel {
            id: utils::shortid(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle,
        };
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Remove an edge. Unknown ids are a no-op.
    pub fn disconnect(
        &mut self,
        edge_id: &str,
    ) {
        if !self.edges.iter().any(|e| e.id == edge_id) {
            return;
        }
        self.checkpoint();
        self.edges.retain(|e| e.id != edge_id);
    }

    /// Revert the last mutation. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.snapshot());
        self.restore(previous);
        true
    }

    /// Re-apply the last undone mutation.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.snapshot());
        self.restore(next);
        true
    }

    /// Push the current state onto the undo stack; any new mutation makes the
    /// redo stack stale.
    fn checkpoint(&mut self) {
        self.undo_stack.push(self.snapshot());
        if self.undo_stack.len() > HISTORY_DEPTH {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    fn restore(
        &mut self,
        snapshot: GraphSnapshot,
    ) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        // Drop the selection if its node went away.
        if let Some(selected) = &self.selected
            && !self.nodes.iter().any(|n| n.id == *selected)
        {
            self.selected = None;
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_two_nodes() -> (GraphStore, String, String) {
        let mut store = GraphStore::new();
        let trigger = store.add_node(NodeKind::Trigger, Position::default()).unwrap();
        let message = store.add_node(NodeKind::Message, Position::default()).unwrap();
        (store, trigger.id, message.id)
    }

    #[test]
    fn test_add_node_uses_registry_defaults() {
        let mut store = GraphStore::new();
        let node = store.add_node(NodeKind::Delay, Position::default()).unwrap();
        assert_eq!(node.kind, NodeKind::Delay);
        assert_eq!(node.label, registry::default_label(NodeKind::Delay));
        assert!(node.config.is_object());
        // The stored config is bare: no discriminator field.
        assert!(node.config.get("type").is_none());
    }

    #[test]
    fn test_second_trigger_rejected() {
        let mut store = GraphStore::new();
        store.add_node(NodeKind::Trigger, Position::default()).unwrap();
        assert!(store.add_node(NodeKind::Trigger, Position::default()).is_err());
        // Other kinds are unlimited.
        store.add_node(NodeKind::Message, Position::default()).unwrap();
        store.add_node(NodeKind::Message, Position::default()).unwrap();
    }

    #[test]
    fn test_connect_rejects_self_loop_and_duplicates() {
        let (mut store, trigger, message) = store_with_two_nodes();
        assert!(store.connect(&trigger, &trigger, None).is_err());

        store.connect(&trigger, &message, None).unwrap();
        assert!(store.connect(&trigger, &message, None).is_err());
        // A different handle is a different edge.
        store.connect(&trigger, &message, Some("true".to_string())).unwrap();
    }

    #[test]
    fn test_delete_node_removes_incident_edges() {
        let (mut store, trigger, message) = store_with_two_nodes();
        store.connect(&trigger, &message, None).unwrap();

        store.delete_node(&message);
        assert_eq!(store.nodes().len(), 1);
        assert!(store.edges().is_empty());

        // Unknown id is a no-op and does not touch history.
        let undo_depth_before = store.undo_stack.len();
        store.delete_node("ghost");
        assert_eq!(store.undo_stack.len(), undo_depth_before);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let (mut store, trigger, message) = store_with_two_nodes();
        store.connect(&trigger, &message, None).unwrap();
        assert_eq!(store.edges().len(), 1);

        assert!(store.undo());
        assert!(store.edges().is_empty());

        assert!(store.redo());
        assert_eq!(store.edges().len(), 1);
    }

    #[test]
    fn test_mutation_clears_redo() {
        let (mut store, trigger, message) = store_with_two_nodes();
        store.connect(&trigger, &message, None).unwrap();
        store.undo();

        // A fresh mutation forks history; redo is gone.
        store.add_node(NodeKind::Delay, Position::default()).unwrap();
        assert!(!store.redo());
    }

    #[test]
    fn test_undo_exhausted_returns_false() {
        let mut store = GraphStore::new();
        assert!(!store.undo());
        assert!(!store.redo());
    }

    #[test]
    fn test_selection_not_in_history() {
        let (mut store, trigger, _) = store_with_two_nodes();
        store.set_selected(Some(trigger.clone()));

        store.add_node(NodeKind::Delay, Position::default()).unwrap();
        store.undo();
        // Selection survives undo; it is UI state, not graph state.
        assert_eq!(store.selected(), Some(trigger.as_str()));
    }

    #[test]
    fn test_selection_cleared_when_node_deleted() {
        let (mut store, _, message) = store_with_two_nodes();
        store.set_selected(Some(message.clone()));
        store.delete_node(&message);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_update_node_replaces_config() {
        let (mut store, _, message) = store_with_two_nodes();
        store.update_node(&message, Some("Welcome".to_string()), Some(serde_json::json!({"customMessage": "hi"}))).unwrap();

        let node = store.nodes().iter().find(|n| n.id == message).unwrap();
        assert_eq!(node.label, "Welcome");
        assert_eq!(node.config["customMessage"], "hi");
        assert!(store.update_node("ghost", None, None).is_err());
    }
}
