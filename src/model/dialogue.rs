//! Dialogue: the indexed node arena.

use serde::{Deserialize, Serialize};
use super::{Node, NodeId};
use crate::{Error, Result};

/// A whole conversation graph.
///
/// Nodes live in one flat sequence; edges and conditions refer to them by
/// [`NodeId`] index, so cycles in the graph never become ownership cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    #[serde(default)]
    pub name: String,
    /// Node a session enters first.
    #[serde(default)]
    pub start: NodeId,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Dialogue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Append a node, returning its index.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn with_start(mut self, start: NodeId) -> Self {
        self.start = start;
        self
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All distinct participant names referenced by speakers, conditions,
    /// events and text arguments, sorted.
    pub fn participant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut add = |name: &str| {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        };
        for node in &self.nodes {
            add(&node.speaker);
            node.enter_conditions.iter().filter_map(|c| c.participant()).for_each(&mut add);
            node.enter_events.iter().for_each(|e| add(&e.participant));
            node.text_arguments.iter().for_each(|a| add(&a.participant));
            for edge in &node.children {
                edge.conditions.iter().filter_map(|c| c.participant()).for_each(&mut add);
                edge.text_arguments.iter().for_each(|a| add(&a.participant));
            }
        }
        names.sort();
        names
    }

    /// Check that the start node and every node index referenced by edges
    /// and conditions exist.
    pub fn validate(&self) -> Result<()> {
        if self.node(self.start).is_none() {
            return Err(Error::InvalidReference(format!(
                "start node {} (dialogue has {} nodes)", self.start, self.nodes.len()
            )));
        }
        for (owner, node) in self.nodes.iter().enumerate() {
            if let Some(bad) = node.references().find(|id| self.node(*id).is_none()) {
                return Err(Error::InvalidReference(format!(
                    "node {owner} references missing node {bad}"
                )));
            }
        }
        Ok(())
    }
}
