//! Condition terms gating edges and node entry.
//!
//! The operator set is closed: every condition is one variant of
//! [`Condition`] and carries only the fields it reads. Evaluation lives in
//! [`crate::eval::condition`].

use serde::{Deserialize, Serialize};
use super::NodeId;

/// Where a participant variable is looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableScope {
    /// Through the participant's typed getters (`int_value`, ...).
    #[default]
    Interface,
    /// Through the participant's by-name variable table.
    Class,
}

/// Numeric comparison operator. The participant's value is the left operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[default]
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    pub fn compare_int(self, left: i32, right: i32) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::Less => left < right,
            Comparison::LessOrEqual => left <= right,
            Comparison::Greater => left > right,
            Comparison::GreaterOrEqual => left >= right,
        }
    }

    /// Equality checks allow [`FLOAT_TOLERANCE`](super::value::FLOAT_TOLERANCE).
    pub fn compare_float(self, left: f32, right: f32) -> bool {
        use super::value::nearly_equal;
        match self {
            Comparison::Equal => nearly_equal(left, right),
            Comparison::NotEqual => !nearly_equal(left, right),
            Comparison::Less => left < right,
            Comparison::LessOrEqual => left <= right,
            Comparison::Greater => left > right,
            Comparison::GreaterOrEqual => left >= right,
        }
    }
}

/// A single boolean term. Lists of conditions are AND-ed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// The participant's named predicate must return `expected`.
    Event {
        participant: String,
        name: String,
        #[serde(default = "expect_true")]
        expected: bool,
    },
    Int {
        participant: String,
        variable: String,
        #[serde(default)]
        scope: VariableScope,
        #[serde(default)]
        comparison: Comparison,
        value: i32,
    },
    Float {
        participant: String,
        variable: String,
        #[serde(default)]
        scope: VariableScope,
        #[serde(default)]
        comparison: Comparison,
        value: f32,
    },
    Bool {
        participant: String,
        variable: String,
        #[serde(default)]
        scope: VariableScope,
        #[serde(default = "expect_true")]
        expected: bool,
    },
    /// Name equality (`equal: true`) or inequality.
    Name {
        participant: String,
        variable: String,
        #[serde(default)]
        scope: VariableScope,
        value: String,
        #[serde(default = "expect_true")]
        equal: bool,
    },
    /// Whether the current session has entered `node` before.
    WasNodeVisited {
        node: NodeId,
        #[serde(default = "expect_true")]
        expected: bool,
    },
    /// Whether `node` has at least one satisfiable child right now.
    HasSatisfiedChild {
        node: NodeId,
        #[serde(default = "expect_true")]
        expected: bool,
    },
}

fn expect_true() -> bool {
    true
}

impl Condition {
    pub fn event(participant: impl Into<String>, name: impl Into<String>) -> Self {
        Condition::Event { participant: participant.into(), name: name.into(), expected: true }
    }

    pub fn int(participant: impl Into<String>, variable: impl Into<String>, comparison: Comparison, value: i32) -> Self {
        Condition::Int {
            participant: participant.into(),
            variable: variable.into(),
            scope: VariableScope::Interface,
            comparison,
            value,
        }
    }

    pub fn float(participant: impl Into<String>, variable: impl Into<String>, comparison: Comparison, value: f32) -> Self {
        Condition::Float {
            participant: participant.into(),
            variable: variable.into(),
            scope: VariableScope::Interface,
            comparison,
            value,
        }
    }

    pub fn bool(participant: impl Into<String>, variable: impl Into<String>, expected: bool) -> Self {
        Condition::Bool {
            participant: participant.into(),
            variable: variable.into(),
            scope: VariableScope::Interface,
            expected,
        }
    }

    pub fn name_equals(participant: impl Into<String>, variable: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Name {
            participant: participant.into(),
            variable: variable.into(),
            scope: VariableScope::Interface,
            value: value.into(),
            equal: true,
        }
    }

    pub fn was_visited(node: NodeId) -> Self {
        Condition::WasNodeVisited { node, expected: true }
    }

    pub fn has_satisfied_child(node: NodeId) -> Self {
        Condition::HasSatisfiedChild { node, expected: true }
    }

    /// Flip the expected outcome (or the comparison, for numeric terms).
    pub fn negated(self) -> Self {
        match self {
            Condition::Event { participant, name, expected } => Condition::Event { participant, name, expected: !expected },
            Condition::Bool { participant, variable, scope, expected } => Condition::Bool { participant, variable, scope, expected: !expected },
            Condition::Name { participant, variable, scope, value, equal } => Condition::Name { participant, variable, scope, value, equal: !equal },
            Condition::WasNodeVisited { node, expected } => Condition::WasNodeVisited { node, expected: !expected },
            Condition::HasSatisfiedChild { node, expected } => Condition::HasSatisfiedChild { node, expected: !expected },
            Condition::Int { participant, variable, scope, comparison, value } => {
                Condition::Int { participant, variable, scope, comparison: comparison.inverse(), value }
            }
            Condition::Float { participant, variable, scope, comparison, value } => {
                Condition::Float { participant, variable, scope, comparison: comparison.inverse(), value }
            }
        }
    }

    /// Switch variable lookups to the participant's by-name table.
    pub fn in_class_scope(mut self) -> Self {
        match &mut self {
            Condition::Int { scope, .. }
            | Condition::Float { scope, .. }
            | Condition::Bool { scope, .. }
            | Condition::Name { scope, .. } => *scope = VariableScope::Class,
            _ => {}
        }
        self
    }

    /// Participant this condition reads, if any.
    pub fn participant(&self) -> Option<&str> {
        match self {
            Condition::Event { participant, .. }
            | Condition::Int { participant, .. }
            | Condition::Float { participant, .. }
            | Condition::Bool { participant, .. }
            | Condition::Name { participant, .. } => Some(participant),
            Condition::WasNodeVisited { .. } | Condition::HasSatisfiedChild { .. } => None,
        }
    }

    /// Node this condition refers to, if any.
    pub fn node_reference(&self) -> Option<NodeId> {
        match self {
            Condition::WasNodeVisited { node, .. } | Condition::HasSatisfiedChild { node, .. } => Some(*node),
            _ => None,
        }
    }
}

impl Comparison {
    pub fn inverse(self) -> Self {
        match self {
            Comparison::Equal => Comparison::NotEqual,
            Comparison::NotEqual => Comparison::Equal,
            Comparison::Less => Comparison::GreaterOrEqual,
            Comparison::LessOrEqual => Comparison::Greater,
            Comparison::Greater => Comparison::LessOrEqual,
            Comparison::GreaterOrEqual => Comparison::Less,
        }
    }
}
