//! # Dialogue Graph Model
//!
//! Plain data that every other module passes around: nodes, edges,
//! conditions, events, text arguments, values.
//!
//! Design rule: this module is pure data. No participant access, no
//! evaluation, no I/O. Evaluation lives in [`crate::eval`], mutation in
//! [`crate::dispatch`].

pub mod condition;
pub mod dialogue;
pub mod edge;
pub mod event;
pub mod node;
pub mod text_argument;
pub mod value;

pub use condition::{Comparison, Condition, VariableScope};
pub use dialogue::Dialogue;
pub use edge::{Edge, INDEX_NONE};
pub use event::{Event, EventKind, EventRecord, EventType};
pub use node::{Node, NodeId, NodeKind};
pub use text_argument::{placeholders, TextArgument, TextArgumentKind};
pub use value::{nearly_equal, Value, ValueType, FLOAT_TOLERANCE};
