//! # Evaluation
//!
//! Read-only predicates over a dialogue and its participants:
//!
//! - [`edge`]: is an edge currently traversable (the recursive core)
//! - [`condition`]: does a single condition term hold
//! - [`text`]: bind text arguments into display strings
//!
//! Everything here goes through the [`Traversal`] trait, so it runs the
//! same against a live [`DialogueContext`](crate::DialogueContext) or a
//! detached [`Snapshot`]. Nothing in this module mutates participants or
//! authored data.

pub mod condition;
pub mod edge;
pub mod text;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::model::{Dialogue, Node, NodeId, Value, ValueType, VariableScope};
use crate::participant::{Participant, ParticipantHandle, Participants};
use crate::{Error, Result};

pub use condition::{evaluate_all, evaluate_condition};
pub use edge::{can_enter, evaluate_edge, has_satisfied_child};
pub use text::{construct_text, resolve_argument, MissingArgumentPolicy};

// ============================================================================
// Traversal Trait
// ============================================================================

/// What evaluation needs from the surrounding session.
pub trait Traversal {
    /// Resolve a node index.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Resolve a participant name.
    fn participant(&self, name: &str) -> Option<&ParticipantHandle>;

    /// Whether the session has entered `id` before.
    fn was_node_visited(&self, id: NodeId) -> bool;
}

// ============================================================================
// Visited set
// ============================================================================

/// Nodes whose entry check is in progress on the current call branch, plus
/// nodes whose children are being checked for a `HasSatisfiedChild` term.
///
/// A value, not a shared accumulator: [`VisitedSet::with`] and
/// [`VisitedSet::with_children_check`] return an extended copy and leave `self`
/// alone, so sibling edges evaluated from the same node never see each
/// other's additions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    nodes: SmallVec<[NodeId; 8]>,
    children: SmallVec<[NodeId; 4]>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only `id`. Every per-node evaluation pass starts here.
    pub fn seeded(id: NodeId) -> Self {
        Self::new().with(id)
    }

    pub fn with(&self, id: NodeId) -> Self {
        let mut nodes = self.nodes.clone();
        if !nodes.contains(&id) {
            nodes.push(id);
        }
        Self { nodes, children: self.children.clone() }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// A copy that records `id`'s children check as in progress. Entry
    /// membership is unchanged.
    pub fn with_children_check(&self, id: NodeId) -> Self {
        let mut children = self.children.clone();
        if !children.contains(&id) {
            children.push(id);
        }
        Self { nodes: self.nodes.clone(), children }
    }

    pub fn in_children_check(&self, id: NodeId) -> bool {
        self.children.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// A detached, read-only view of a dialogue and its participants.
///
/// Useful for asking "which edges are open from here" without starting a
/// session (tooling, previews, tests).
#[derive(Debug)]
pub struct Snapshot<'a> {
    dialogue: &'a Dialogue,
    participants: &'a Participants,
    history: HashSet<NodeId>,
}

impl<'a> Snapshot<'a> {
    pub fn new(dialogue: &'a Dialogue, participants: &'a Participants) -> Self {
        Self { dialogue, participants, history: HashSet::new() }
    }

    /// Pretend these nodes were already visited.
    pub fn with_history(mut self, visited: impl IntoIterator<Item = NodeId>) -> Self {
        self.history.extend(visited);
        self
    }

    pub fn dialogue(&self) -> &Dialogue {
        self.dialogue
    }
}

impl Traversal for Snapshot<'_> {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.dialogue.node(id)
    }

    fn participant(&self, name: &str) -> Option<&ParticipantHandle> {
        self.participants.get(name)
    }

    fn was_node_visited(&self, id: NodeId) -> bool {
        self.history.contains(&id)
    }
}

// ============================================================================
// Variable reads shared by conditions and text arguments
// ============================================================================

/// Read one variable of type `ty` from `participant`, in `scope`.
pub(crate) fn read_variable(
    participant: &dyn Participant,
    variable: &str,
    scope: VariableScope,
    ty: ValueType,
) -> Result<Value> {
    let value = match (scope, ty) {
        (VariableScope::Interface, ValueType::Int) => Value::Int(participant.int_value(variable)?),
        (VariableScope::Interface, ValueType::Float) => Value::Float(participant.float_value(variable)?),
        (VariableScope::Interface, ValueType::Bool) => Value::Bool(participant.bool_value(variable)?),
        (VariableScope::Interface, ValueType::Name) => Value::Name(participant.name_value(variable)?),
        (VariableScope::Class, _) => participant.class_variable(variable)?,
    };
    let fits = match ty {
        ValueType::Float => value.is_numeric(),
        other => value.value_type() == other,
    };
    if !fits {
        return Err(Error::TypeError { expected: ty.to_string(), got: value.type_name().to_owned() });
    }
    Ok(value)
}

/// Look up `name` and run `read` under its read lock.
pub(crate) fn with_participant<T: Traversal + ?Sized, R>(
    traversal: &T,
    name: &str,
    read: impl FnOnce(&dyn Participant) -> Result<R>,
) -> Result<R> {
    let handle = traversal
        .participant(name)
        .ok_or_else(|| Error::ParticipantNotFound(name.to_owned()))?;
    let guard = handle.read();
    read(&*guard)
}
