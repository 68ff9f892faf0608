//! # dialogue-rs: Branching Dialogue Runtime
//!
//! Traversal and gating for branching dialogue graphs: which choices are
//! legal right now, what they say, and what happens when one is taken.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Participant` is the contract between the runtime and game objects
//! 2. **Plain data**: `Dialogue`, `Node`, `Edge`, `Condition`, `Event` are serde DTOs
//! 3. **Evaluation is read-only**: conditions and edges never mutate anything
//! 4. **Cycle-safe**: recursive edge checks carry a per-branch visited set
//!
//! ## Quick Start
//!
//! ```rust
//! use dialogue_rs::{
//!     Comparison, Condition, ContextConfig, Dialogue, DialogueContext, Edge, Event,
//!     MemoryParticipant, Node, NodeId, Participants,
//! };
//!
//! # fn example() -> dialogue_rs::Result<()> {
//! let mut dialogue = Dialogue::new("toll");
//! dialogue.add_node(
//!     Node::speech("Troll", "Pay the toll.")
//!         .with_child(
//!             Edge::to(NodeId(1))
//!                 .with_text("Pay")
//!                 .with_condition(Condition::int("Player", "gold", Comparison::GreaterOrEqual, 3)),
//!         )
//!         .with_child(Edge::to(NodeId(2)).with_text("Run")),
//! );
//! dialogue.add_node(Node::end().with_enter_event(Event::modify_int("Player", "gold", -3, true)));
//! dialogue.add_node(Node::end());
//!
//! let participants = Participants::new()
//!     .with(MemoryParticipant::new("Troll"))
//!     .with(MemoryParticipant::new("Player").with_int("gold", 5));
//!
//! let mut context = DialogueContext::start(dialogue, participants, ContextConfig::default())?;
//! assert_eq!(context.options().len(), 2);
//! context.choose_option(0)?;
//! assert!(context.is_ended());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Participants
//!
//! | Participant | Module | Description |
//! |-------------|--------|-------------|
//! | Memory | `participant::memory` | Map-backed, for testing/embedding |
//! | Custom | (yours) | Implement `Participant`, optionally with a `VariableTable` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod participant;
pub mod eval;
pub mod dispatch;
pub mod context;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Comparison, Condition, Dialogue, Edge, Event, EventKind, EventType,
    Node, NodeId, NodeKind, TextArgument, TextArgumentKind, Value, VariableScope,
};

// ============================================================================
// Re-exports: Participants
// ============================================================================

pub use participant::{
    Capabilities, Capability, MemoryParticipant, Participant,
    ParticipantHandle, Participants, VariableTable,
};

// ============================================================================
// Re-exports: Evaluation & session
// ============================================================================

pub use eval::{evaluate_edge, MissingArgumentPolicy, Snapshot, Traversal, VisitedSet};
pub use dispatch::dispatch;
pub use context::{ContextConfig, DialogueContext, EdgeOption};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Participant {participant} does not support {capability}")]
    Unsupported { participant: String, capability: Capability },

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("No option {index} (have {available})")]
    NoSuchOption { index: usize, available: usize },

    #[error("Option {0} is not satisfied")]
    OptionUnsatisfied(usize),

    #[error("Dialogue has ended")]
    DialogueEnded,

    #[error("More than {0} automatic transitions in a row")]
    TooManyTransitions(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
