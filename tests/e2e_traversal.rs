//! End-to-end tests for edge evaluation and session traversal.
//!
//! Each test builds a small dialogue, registers memory participants and
//! drives either the bare evaluator (through a `Snapshot`) or a full
//! `DialogueContext`.

use dialogue_rs::{
    evaluate_edge, Comparison, Condition, ContextConfig, Dialogue, DialogueContext, Edge, EdgeOption,
    MemoryParticipant, Node, NodeId, Participants, Snapshot, TextArgument, VisitedSet,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn open(dialogue: &Dialogue, participants: &Participants, edge: &Edge) -> bool {
    evaluate_edge(edge, &Snapshot::new(dialogue, participants), &VisitedSet::new())
}

fn texts(options: &[EdgeOption]) -> Vec<&str> {
    options.iter().map(EdgeOption::text).collect()
}

// ============================================================================
// 1. Sentinel and trivially open edges
// ============================================================================

#[test]
fn test_invalid_edge_is_never_satisfied() {
    let mut dialogue = Dialogue::new("d");
    dialogue.add_node(Node::end());
    let participants = Participants::new();

    assert!(!open(&dialogue, &participants, Edge::invalid()));
    assert!(!Edge::invalid().is_valid());
}

#[test]
fn test_unconditional_edge_to_unconditional_node() {
    let mut dialogue = Dialogue::new("d");
    let end = dialogue.add_node(Node::end());
    assert!(open(&dialogue, &Participants::new(), &Edge::to(end)));
}

// ============================================================================
// 2. Cycle termination
// ============================================================================

#[test]
fn test_self_referential_entry_condition_terminates() {
    // A's only edge targets A; A may be entered iff that edge is satisfiable.
    let mut dialogue = Dialogue::new("ouroboros");
    let a = NodeId(0);
    dialogue.add_node(
        Node::speech("Narrator", "Round and round.")
            .with_child(Edge::to(a))
            .with_enter_condition(Condition::has_satisfied_child(a)),
    );

    assert!(open(&dialogue, &Participants::new(), &Edge::to(a)));

    let context = DialogueContext::start(dialogue, Participants::new(), ContextConfig::default()).unwrap();
    assert_eq!(context.options().len(), 1);
}

#[test]
fn test_long_cycle_with_gate_terminates() {
    // 0 → 1 → 2 → 3 → 0, every node checks its children, node 2 is gated.
    let mut dialogue = Dialogue::new("ring");
    for i in 0..4 {
        let mut node = Node::speech("Narrator", format!("step {i}"))
            .with_child(Edge::to(NodeId((i + 1) % 4)))
            .checking_children();
        if i == 2 {
            node = node.with_enter_condition(Condition::bool("Player", "has_key", true));
        }
        dialogue.add_node(node);
    }

    let locked = Participants::new().with(MemoryParticipant::new("Player"));
    let unlocked = Participants::new().with(MemoryParticipant::new("Player").with_bool("has_key", true));

    assert!(!open(&dialogue, &locked, &Edge::to(NodeId(1))));
    assert!(open(&dialogue, &unlocked, &Edge::to(NodeId(1))));
}

// ============================================================================
// 3. Satisfied / all-options partitioning
// ============================================================================

fn fork(hide_unsatisfied: bool) -> Dialogue {
    let mut e1 = Edge::to(NodeId(1))
        .with_text("Threaten")
        .with_condition(Condition::int("Player", "strength", Comparison::Greater, 10));
    if hide_unsatisfied {
        e1 = e1.hidden_when_unsatisfied();
    }

    let mut dialogue = Dialogue::new("fork");
    dialogue.add_node(
        Node::speech("Guard", "Move along.")
            .with_child(e1)
            .with_child(Edge::to(NodeId(2)).with_text("Leave")),
    );
    dialogue.add_node(Node::end());
    dialogue.add_node(Node::end());
    dialogue
}

fn weakling() -> Participants {
    Participants::new()
        .with(MemoryParticipant::new("Guard"))
        .with(MemoryParticipant::new("Player").with_int("strength", 4))
}

#[test]
fn test_unsatisfied_edge_is_listed_by_default() {
    let context = DialogueContext::start(fork(false), weakling(), ContextConfig::default()).unwrap();

    assert_eq!(texts(context.options()), vec!["Leave"]);
    assert_eq!(texts(context.all_options()), vec!["Threaten", "Leave"]);
    let satisfied: Vec<bool> = context.all_options().iter().map(|o| o.satisfied).collect();
    assert_eq!(satisfied, vec![false, true]);
}

#[test]
fn test_unsatisfied_edge_can_opt_out_of_listing() {
    let context = DialogueContext::start(fork(true), weakling(), ContextConfig::default()).unwrap();

    assert_eq!(texts(context.options()), vec!["Leave"]);
    assert_eq!(texts(context.all_options()), vec!["Leave"]);
}

// ============================================================================
// 4. Session behavior
// ============================================================================

#[test]
fn test_selector_enters_first_satisfied_child() {
    let mut dialogue = Dialogue::new("greeting");
    dialogue.add_node(
        Node::selector()
            .with_child(Edge::to(NodeId(1)).with_condition(Condition::was_visited(NodeId(3))))
            .with_child(Edge::to(NodeId(2))),
    );
    dialogue.add_node(Node::speech("Innkeeper", "Welcome back!").with_child(Edge::to(NodeId(3))));
    dialogue.add_node(Node::speech("Innkeeper", "New in town?").with_child(Edge::to(NodeId(3))));
    dialogue.add_node(Node::speech("Innkeeper", "What'll it be?").with_child(Edge::to(NodeId(0)).with_text("Again")));

    let participants = Participants::new().with(MemoryParticipant::new("Innkeeper"));
    let mut context = DialogueContext::start(dialogue, participants, ContextConfig::default()).unwrap();
    assert_eq!(context.active_node(), NodeId(2));
    assert_eq!(context.active_text(), "New in town?");

    context.choose_option(0).unwrap();
    assert!(context.was_node_visited(NodeId(3)));
    context.choose_option(0).unwrap();
    assert_eq!(context.active_node(), NodeId(1));
    assert_eq!(context.active_text(), "Welcome back!");
}

#[test]
fn test_enter_node_jumps() {
    let mut context = DialogueContext::start(fork(false), weakling(), ContextConfig::default()).unwrap();

    context.enter_node(NodeId(1)).unwrap();
    assert!(context.is_ended());
    assert!(context.was_node_visited(NodeId(0)));
    assert!(context.was_node_visited(NodeId(1)));
    assert!(!context.was_node_visited(NodeId(2)));
}

// ============================================================================
// 5. Properties
// ============================================================================

fn arb_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        ("[A-Z][a-z]{1,6}", "[a-z_]{1,8}").prop_map(|(p, n)| Condition::event(p, n)),
        ("[A-Z][a-z]{1,6}", "[a-z_]{1,8}", any::<i32>())
            .prop_map(|(p, v, x)| Condition::int(p, v, Comparison::Equal, x)),
        (0usize..4).prop_map(|i| Condition::was_visited(NodeId(i))),
        (0usize..4).prop_map(|i| Condition::has_satisfied_child(NodeId(i))),
        (0usize..4).prop_map(|i| Condition::has_satisfied_child(NodeId(i)).negated()),
    ]
}

proptest! {
    #[test]
    fn prop_sentinel_edge_is_never_satisfied(conditions in proptest::collection::vec(arb_condition(), 0..6)) {
        let mut dialogue = Dialogue::new("d");
        dialogue.add_node(Node::end());
        let participants = Participants::new().with(MemoryParticipant::new("Player"));

        let mut edge = Edge::none();
        edge.conditions = conditions;
        prop_assert!(!open(&dialogue, &participants, &edge));
    }

    #[test]
    fn prop_child_checks_on_edges_terminate(
        links in proptest::collection::vec(proptest::collection::vec((0usize..4, arb_condition()), 1..4), 4),
    ) {
        // Every node's edges may ask about any node's children, including
        // their own; sessions must still start and list options.
        let mut dialogue = Dialogue::new("tangle");
        for edges in links {
            let mut node = Node::speech("Narrator", "...");
            for (target, condition) in edges {
                node = node.with_child(Edge::to(NodeId(target)).with_condition(condition));
            }
            dialogue.add_node(node);
        }
        let participants = Participants::new().with(MemoryParticipant::new("Player"));

        for id in 0..4 {
            for edge in &dialogue.nodes[id].children {
                let _ = evaluate_edge(edge, &Snapshot::new(&dialogue, &participants), &VisitedSet::seeded(NodeId(id)));
            }
        }
        let context = DialogueContext::start(dialogue, participants, ContextConfig::default());
        prop_assert!(context.is_ok());
    }

    #[test]
    fn prop_edge_equality_ignores_presentation(
        constructed in ".{0,12}",
        state in "[a-z]{0,8}",
        key in "[a-z]{1,8}",
    ) {
        let base = Edge::to(NodeId(1)).with_text("Hello {who}");
        let mut decorated = base.clone()
            .with_speaker_state(state)
            .with_text_argument(TextArgument::display_name(key, "Player"));
        decorated.constructed_text = constructed;
        decorated.include_when_unsatisfied = false;

        prop_assert_eq!(&base, &decorated);
        prop_assert_ne!(&base, &base.clone().with_text("Goodbye"));
        prop_assert_ne!(&base, &Edge::to(NodeId(2)).with_text("Hello {who}"));
        prop_assert_ne!(&base, &base.clone().with_condition(Condition::was_visited(NodeId(0))));
    }
}
