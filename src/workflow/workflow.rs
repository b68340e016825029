//! Compiled runtime workflow as a directed graph.
//!
//! A [`Workflow`] is built once from a [`WorkflowModel`] when a contact is
//! enrolled and never mutated afterwards; in-flight records keep walking the
//! graph they were pinned to even if the design-time model changes. The
//! petgraph structure makes successor lookup and reachability checks cheap.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    ReachflowError, Result,
    model::{WorkflowModel, WorkflowSettings, WorkflowStatus},
    registry::NodeKind,
    workflow::{
        edge::{Edge, SourceHandle},
        node::{Node, NodeId},
    },
};

/// Compiled workflow graph plus the model fields the executor needs.
#[derive(Debug, Clone)]
pub struct Workflow {
    id: String,
    name: String,
    status: WorkflowStatus,
    settings: WorkflowSettings,
    graph: DiGraph<Node, Edge>,
    index: HashMap<NodeId, NodeIndex>,
}

impl Workflow {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// get node by id
    pub fn get_node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    /// the workflow's single trigger node, if present
    pub fn trigger_node(&self) -> Option<&Node> {
        self.graph.node_indices().map(|idx| &self.graph[idx]).find(|node| node.kind == NodeKind::Trigger)
    }

    /// first node a newly enrolled contact executes: the trigger's sole
    /// successor
    pub fn entry_node(&self) -> Result<&Node> {
        let trigger = self.trigger_node().ok_or(ReachflowError::Workflow(format!("workflow {} has no trigger node", self.id)))?;
        self.sole_successor(&trigger.id)?.ok_or(ReachflowError::Workflow(format!("workflow {} trigger has no outgoing edge", self.id)))
    }

    /// all outgoing edges of a node
    pub fn outgoing_edges(
        &self,
        id: &str,
    ) -> Vec<&Edge> {
        self.index
            .get(id)
            .map(|idx| self.graph.edges_directed(*idx, Direction::Outgoing).map(|edge_ref| edge_ref.weight()).collect())
            .unwrap_or_default()
    }

    /// successor reached through a specific source handle
    pub fn successor(
        &self,
        id: &str,
        handle: &SourceHandle,
    ) -> Option<&Node> {
        let src_idx = self.index.get(id)?;
        self.graph
            .edges_directed(*src_idx, Direction::Outgoing)
            .find(|edge_ref| edge_ref.weight().source_handle == *handle)
            .map(|edge_ref| &self.graph[edge_ref.target()])
    }

    /// successor of a sequential node: at most one outgoing edge is allowed
    pub fn sole_successor(
        &self,
        id: &str,
    ) -> Result<Option<&Node>> {
        let src_idx = self.index.get(id).ok_or(ReachflowError::Node(format!("node {} not found", id)))?;
        let mut targets = self.graph.edges_directed(*src_idx, Direction::Outgoing).map(|edge_ref| edge_ref.target());

        let Some(first) = targets.next() else {
            return Ok(None);
        };
        if targets.next().is_some() {
            return Err(ReachflowError::Edge(format!("node {} has more than one outgoing edge", id)));
        }
        Ok(Some(&self.graph[first]))
    }

    /// check whether a node has no outgoing edges
    pub fn is_terminal(
        &self,
        id: &str,
    ) -> bool {
        self.index.get(id).map(|idx| self.graph.neighbors_directed(*idx, Direction::Outgoing).count() == 0).unwrap_or(true)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }
}

impl TryFrom<&WorkflowModel> for Workflow {
    type Error = ReachflowError;

    fn try_from(model: &WorkflowModel) -> Result<Self> {
        let mut graph: DiGraph<Node, Edge> = DiGraph::new();
        let mut index = HashMap::new();

        for node_model in model.nodes.iter() {
            let node = Node::try_from(node_model)?;
            let nid = node.id.clone();
            let node_idx = graph.add_node(node);
            index.insert(nid, node_idx);
        }
        for edge_model in model.edges.iter() {
            let edge = Edge::from(edge_model);
            let source = index.get(&edge.source).ok_or(ReachflowError::Edge(format!("source node {} not found", edge.source)))?;
            let target = index.get(&edge.target).ok_or(ReachflowError::Edge(format!("target node {} not found", edge.target)))?;
            graph.add_edge(*source, *target, edge);
        }

        Ok(Self {
            id: model.id.clone(),
            name: model.name.clone(),
            status: model.status,
            settings: model.settings.clone(),
            graph,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{EdgeModel, NodeModel, Position};

    fn node(
        id: &str,
        kind: NodeKind,
        config: serde_json::Value,
    ) -> NodeModel {
        NodeModel {
            id: id.to_string(),
            kind,
            label: id.to_string(),
            position: Position::default(),
            config,
        }
    }

    fn edge(
        id: &str,
        source: &str,
        target: &str,
        handle: Option<&str>,
    ) -> EdgeModel {
        EdgeModel {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: handle.map(|h| h.to_string()),
        }
    }

    fn model() -> WorkflowModel {
        WorkflowModel {
            id: "wf1".to_string(),
            name: "welcome".to_string(),
            status: WorkflowStatus::Active,
            settings: WorkflowSettings::default(),
            nodes: vec![
                node("t1", NodeKind::Trigger, json!({})),
                node(
                    "c1",
                    NodeKind::Condition,
                    json!({"condition": {"field": "plan", "operator": "equals", "value": "pro"}}),
                ),
                node("m1", NodeKind::Message, json!({"customMessage": "hi"})),
                node("m2", NodeKind::Message, json!({"customMessage": "bye"})),
            ],
            edges: vec![
                edge("e1", "t1", "c1", None),
                edge("e2", "c1", "m1", Some("true")),
                edge("e3", "c1", "m2", Some("false")),
            ],
        }
    }

    #[test]
    fn test_compile_and_entry() {
        let workflow = Workflow::try_from(&model()).unwrap();
        assert_eq!(workflow.node_count(), 4);
        assert_eq!(workflow.edge_count(), 3);
        assert_eq!(workflow.trigger_node().unwrap().id, "t1");
        assert_eq!(workflow.entry_node().unwrap().id, "c1");
    }

    #[test]
    fn test_successor_by_handle() {
        let workflow = Workflow::try_from(&model()).unwrap();
        assert_eq!(workflow.successor("c1", &SourceHandle::branch("true")).unwrap().id, "m1");
        assert_eq!(workflow.successor("c1", &SourceHandle::branch("false")).unwrap().id, "m2");
        assert!(workflow.successor("c1", &SourceHandle::Default).is_none());
    }

    #[test]
    fn test_sole_successor_rejects_fanout() {
        let workflow = Workflow::try_from(&model()).unwrap();
        assert!(workflow.sole_successor("c1").is_err());
        assert!(workflow.sole_successor("m1").unwrap().is_none());
        assert!(workflow.is_terminal("m1"));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let mut m = model();
        m.edges.push(edge("e4", "m1", "ghost", None));
        assert!(Workflow::try_from(&m).is_err());
    }
}
