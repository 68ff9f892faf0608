//! Edge evaluation, the recursive core.
//!
//! An edge is traversable when its own conditions hold AND its target
//! node's entry check passes. The entry check may itself contain
//! [`Condition::HasSatisfiedChild`](crate::model::Condition) terms, which
//! evaluate other edges, which check other nodes, and so on. The
//! [`VisitedSet`] threaded through the recursion bounds it: a node already
//! on the current branch counts as enterable instead of being checked again,
//! so every distinct node is checked at most once per branch.
//!
//! A `HasSatisfiedChild` term in an edge's own conditions recurses without
//! entering any target, so the set also records whose children check is in
//! progress. Asking about such a node again on the same branch counts as
//! satisfied.
//!
//! ```text
//! evaluate_edge(e, visited)
//!   ├─ e.target == None                  → false
//!   ├─ e.conditions fail                 → false
//!   ├─ target unresolvable               → false
//!   ├─ target ∈ visited                  → true   (cycle guard)
//!   └─ entry_check(target, visited + target)
//!        ├─ target.enter_conditions
//!        └─ any child edge (if check_children_on_evaluation)
//!
//! HasSatisfiedChild(n, visited)
//!   ├─ n checking children in visited    → satisfied   (cycle guard)
//!   └─ any child edge of n, visited + checking(n)
//! ```

use tracing::debug;

use crate::model::{Edge, Node, NodeId};
use super::{condition::evaluate_all, Traversal, VisitedSet};

/// Whether `edge` can be taken right now.
///
/// `visited` holds the nodes already being checked on this call branch. A
/// top-level pass from node `N` passes `VisitedSet::seeded(N)`.
pub fn evaluate_edge<T: Traversal + ?Sized>(edge: &Edge, traversal: &T, visited: &VisitedSet) -> bool {
    let Some(target) = edge.target else {
        return false;
    };

    if !evaluate_all(&edge.conditions, traversal, visited) {
        return false;
    }

    let Some(node) = traversal.node(target) else {
        debug!(node = %target, "edge target does not resolve");
        return false;
    };

    if visited.contains(target) {
        return true;
    }

    entry_check(node, traversal, &visited.with(target))
}

/// Whether node `id` itself may be entered: its entry check, with `id`
/// added to `visited`. Edge conditions are not involved.
pub fn can_enter<T: Traversal + ?Sized>(id: NodeId, traversal: &T, visited: &VisitedSet) -> bool {
    match traversal.node(id) {
        Some(_) if visited.contains(id) => true,
        Some(node) => entry_check(node, traversal, &visited.with(id)),
        None => false,
    }
}

/// Whether any of `node`'s children is traversable.
pub fn has_satisfied_child<T: Traversal + ?Sized>(node: &Node, traversal: &T, visited: &VisitedSet) -> bool {
    node.children.iter().any(|edge| evaluate_edge(edge, traversal, visited))
}

/// Entry conditions, then (optionally) at least one traversable child.
/// `visited` already contains the node being checked.
fn entry_check<T: Traversal + ?Sized>(node: &Node, traversal: &T, visited: &VisitedSet) -> bool {
    if !evaluate_all(&node.enter_conditions, traversal, visited) {
        return false;
    }
    !node.check_children_on_evaluation || has_satisfied_child(node, traversal, visited)
}
