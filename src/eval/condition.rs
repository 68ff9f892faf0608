//! Condition term evaluation.
//!
//! A condition that cannot be evaluated (unknown participant, unsupported
//! capability, wrong variable type, missing node) does not hold. The reason
//! is logged at `debug`.

use tracing::debug;

use crate::model::{Condition, ValueType, VariableScope};
use crate::Result;
use super::{edge::has_satisfied_child, read_variable, with_participant, Traversal, VisitedSet};

/// AND of `conditions`, left to right, stopping at the first failure.
/// An empty list holds.
pub fn evaluate_all<T: Traversal + ?Sized>(conditions: &[Condition], traversal: &T, visited: &VisitedSet) -> bool {
    conditions.iter().all(|condition| evaluate_condition(condition, traversal, visited))
}

/// Evaluate a single condition term.
///
/// `visited` is only consulted by [`Condition::HasSatisfiedChild`], which
/// recurses into the edge evaluator with the node's children check marked
/// in progress.
pub fn evaluate_condition<T: Traversal + ?Sized>(condition: &Condition, traversal: &T, visited: &VisitedSet) -> bool {
    let outcome: Result<bool> = match condition {
        Condition::Event { participant, name, expected } => {
            with_participant(traversal, participant, |p| p.check_condition(name)).map(|v| v == *expected)
        }
        Condition::Int { participant, variable, scope, comparison, value } => {
            read(traversal, participant, variable, *scope, ValueType::Int)
                .map(|v| v.as_int().is_some_and(|v| comparison.compare_int(v, *value)))
        }
        Condition::Float { participant, variable, scope, comparison, value } => {
            read(traversal, participant, variable, *scope, ValueType::Float)
                .map(|v| v.as_float().is_some_and(|v| comparison.compare_float(v, *value)))
        }
        Condition::Bool { participant, variable, scope, expected } => {
            read(traversal, participant, variable, *scope, ValueType::Bool)
                .map(|v| v.as_bool() == Some(*expected))
        }
        Condition::Name { participant, variable, scope, value, equal } => {
            read(traversal, participant, variable, *scope, ValueType::Name)
                .map(|v| (v.as_name() == Some(value.as_str())) == *equal)
        }
        Condition::WasNodeVisited { node, expected } => Ok(traversal.was_node_visited(*node) == *expected),
        // A children check already in progress on this branch counts as
        // satisfied; re-entering it would never terminate.
        Condition::HasSatisfiedChild { node, expected } => match traversal.node(*node) {
            Some(_) if visited.in_children_check(*node) => Ok(*expected),
            Some(target) => {
                Ok(has_satisfied_child(target, traversal, &visited.with_children_check(*node)) == *expected)
            }
            None => {
                debug!(node = %node, "condition references missing node");
                return false;
            }
        },
    };

    outcome.unwrap_or_else(|e| {
        debug!(error = %e, "condition could not be evaluated");
        false
    })
}

fn read<T: Traversal + ?Sized>(
    traversal: &T,
    participant: &str,
    variable: &str,
    scope: VariableScope,
    ty: ValueType,
) -> Result<crate::model::Value> {
    with_participant(traversal, participant, |p| read_variable(p, variable, scope, ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Snapshot;
    use crate::model::{Comparison, Dialogue, Edge, Node, NodeId};
    use crate::participant::{Capabilities, Capability, MemoryParticipant, Participants};

    fn participants() -> Participants {
        Participants::new()
            .with(
                MemoryParticipant::new("Player")
                    .with_int("gold", 12)
                    .with_float("karma", 0.5)
                    .with_bool("knighted", true)
                    .with_name("faction", "Guild")
                    .with_condition("is_armed", true)
                    .with_class_variable("level", 7),
            )
            .with(MemoryParticipant::new("Ghost").with_capabilities(Capabilities::default()))
    }

    fn check(condition: Condition) -> bool {
        let dialogue = Dialogue::new("empty");
        let participants = participants();
        let snapshot = Snapshot::new(&dialogue, &participants);
        evaluate_condition(&condition, &snapshot, &VisitedSet::new())
    }

    #[test]
    fn test_interface_variables() {
        assert!(check(Condition::int("Player", "gold", Comparison::GreaterOrEqual, 12)));
        assert!(!check(Condition::int("Player", "gold", Comparison::Greater, 12)));
        assert!(check(Condition::float("Player", "karma", Comparison::Equal, 0.50001)));
        assert!(check(Condition::bool("Player", "knighted", true)));
        assert!(!check(Condition::bool("Player", "knighted", false)));
        assert!(check(Condition::name_equals("Player", "faction", "Guild")));
        assert!(check(Condition::name_equals("Player", "faction", "Thieves").negated()));
    }

    #[test]
    fn test_event_predicate() {
        assert!(check(Condition::event("Player", "is_armed")));
        assert!(!check(Condition::event("Player", "is_flying")));
        assert!(check(Condition::event("Player", "is_flying").negated()));
    }

    #[test]
    fn test_class_scope() {
        assert!(check(Condition::int("Player", "level", Comparison::Equal, 7).in_class_scope()));
        assert!(!check(Condition::int("Player", "prestige", Comparison::Equal, 0).in_class_scope()));
    }

    #[test]
    fn test_unresolvable_never_holds() {
        assert!(!check(Condition::int("Nobody", "gold", Comparison::Equal, 0)));
        assert!(!check(Condition::int("Nobody", "gold", Comparison::Equal, 0).negated()));
        assert!(!check(Condition::event("Ghost", "anything").negated()));
        assert!(!check(Condition::has_satisfied_child(NodeId(3))));
    }

    #[test]
    fn test_empty_list_holds() {
        let dialogue = Dialogue::new("empty");
        let participants = Participants::new();
        let snapshot = Snapshot::new(&dialogue, &participants);
        assert!(evaluate_all(&[], &snapshot, &VisitedSet::new()));
    }

    #[test]
    fn test_short_circuits_left_to_right() {
        // The second term would need a capability the participant lacks;
        // the first term fails before it is reached either way.
        let mut dialogue = Dialogue::new("d");
        dialogue.add_node(Node::speech("Player", "hi").with_child(Edge::to(NodeId(0))));
        let participants = Participants::new().with(
            MemoryParticipant::new("Player").with_capabilities(Capabilities::all().without(Capability::FloatVariables)),
        );
        let snapshot = Snapshot::new(&dialogue, &participants);

        let conditions = [
            Condition::int("Player", "gold", Comparison::Greater, 0),
            Condition::float("Player", "karma", Comparison::Equal, 0.0),
        ];
        assert!(!evaluate_all(&conditions, &snapshot, &VisitedSet::new()));
    }

    #[test]
    fn test_was_node_visited() {
        let dialogue = Dialogue::new("d");
        let participants = Participants::new();
        let snapshot = Snapshot::new(&dialogue, &participants).with_history([NodeId(2)]);
        let visited = VisitedSet::new();
        assert!(evaluate_condition(&Condition::was_visited(NodeId(2)), &snapshot, &visited));
        assert!(!evaluate_condition(&Condition::was_visited(NodeId(1)), &snapshot, &visited));
        assert!(evaluate_condition(&Condition::was_visited(NodeId(1)).negated(), &snapshot, &visited));
    }
}
