//! Node in the dialogue graph.

use serde::{Deserialize, Serialize};
use super::{Condition, Edge, Event, TextArgument};

/// Index of a node in its dialogue's node sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happens when a session enters the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Shows text and waits for the player to pick one of the children.
    #[default]
    Speech,
    /// Never shown; immediately follows its first satisfied child.
    Selector,
    /// Ends the conversation.
    End,
}

/// A node in the dialogue graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub kind: NodeKind,
    /// Name of the participant speaking this node's line.
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub text_arguments: Vec<TextArgument>,
    /// Checked whenever any edge leads here, on top of the edge's own conditions.
    #[serde(default)]
    pub enter_conditions: Vec<Condition>,
    /// Fired on participants when a session enters this node.
    #[serde(default)]
    pub enter_events: Vec<Event>,
    #[serde(default)]
    pub children: Vec<Edge>,
    /// Entering also requires at least one satisfiable child.
    #[serde(default)]
    pub check_children_on_evaluation: bool,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, ..Self::default() }
    }

    pub fn speech(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            ..Self::new(NodeKind::Speech)
        }
    }

    pub fn selector() -> Self {
        Self::new(NodeKind::Selector)
    }

    pub fn end() -> Self {
        Self::new(NodeKind::End)
    }

    pub fn with_child(mut self, edge: Edge) -> Self {
        self.children.push(edge);
        self
    }

    pub fn with_enter_condition(mut self, condition: Condition) -> Self {
        self.enter_conditions.push(condition);
        self
    }

    pub fn with_enter_event(mut self, event: Event) -> Self {
        self.enter_events.push(event);
        self
    }

    pub fn with_text_argument(mut self, argument: TextArgument) -> Self {
        self.text_arguments.push(argument);
        self
    }

    pub fn checking_children(mut self) -> Self {
        self.check_children_on_evaluation = true;
        self
    }

    pub fn is_end(&self) -> bool {
        self.kind == NodeKind::End
    }

    /// Node indices referenced by this node's edges and conditions.
    pub fn references(&self) -> impl Iterator<Item = NodeId> + '_ {
        let from_children = self.children.iter().flat_map(|edge| {
            edge.target.into_iter().chain(edge.conditions.iter().filter_map(Condition::node_reference))
        });
        let from_conditions = self.enter_conditions.iter().filter_map(Condition::node_reference);
        from_children.chain(from_conditions)
    }
}
