//! Edge (child link) in the dialogue graph.
//!
//! An edge points at a node by index. The sentinel "no target" is
//! `None` in memory and [`INDEX_NONE`] in the flat serialized record.

use serde::{Deserialize, Serialize};
use super::{Condition, NodeId, TextArgument};

/// Serialized target index meaning "no destination".
pub const INDEX_NONE: i64 = -1;

/// A directed, conditionally gated link from one node to another.
///
/// Equality only considers `target`, `text` and `conditions`. Text
/// arguments, constructed text, speaker state and the listing flag are
/// presentation metadata and do not affect identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(with = "target_index", default = "no_target")]
    pub target: Option<NodeId>,
    /// Required but not sufficient: the target's enter conditions are checked too.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Raw template text, used for player choices.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub text_arguments: Vec<TextArgument>,
    /// `text` with its arguments substituted. Empty until a session binds it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub constructed_text: String,
    /// Speaker emotion/state attached to this choice. Display only.
    #[serde(default)]
    pub speaker_state: String,
    /// When false an unsatisfied edge is left out of the all-options listing.
    #[serde(default = "listed_by_default")]
    pub include_when_unsatisfied: bool,
}

fn no_target() -> Option<NodeId> {
    None
}

fn listed_by_default() -> bool {
    true
}

static INVALID_EDGE: Edge = Edge {
    target: None,
    conditions: Vec::new(),
    text: String::new(),
    text_arguments: Vec::new(),
    constructed_text: String::new(),
    speaker_state: String::new(),
    include_when_unsatisfied: true,
};

impl Default for Edge {
    fn default() -> Self {
        Self::none()
    }
}

impl Edge {
    /// A plain edge to `target`: no text, no conditions.
    pub fn to(target: NodeId) -> Self {
        Self { target: Some(target), ..Self::none() }
    }

    /// An edge with the sentinel target.
    pub fn none() -> Self {
        INVALID_EDGE.clone()
    }

    /// Shared placeholder for callers that need an edge when none qualifies.
    pub fn invalid() -> &'static Edge {
        &INVALID_EDGE
    }

    pub fn is_valid(&self) -> bool {
        self.target.is_some()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_text_argument(mut self, argument: TextArgument) -> Self {
        self.text_arguments.push(argument);
        self
    }

    pub fn with_speaker_state(mut self, state: impl Into<String>) -> Self {
        self.speaker_state = state.into();
        self
    }

    /// Leave this edge out of the all-options listing when it is unsatisfied.
    pub fn hidden_when_unsatisfied(mut self) -> Self {
        self.include_when_unsatisfied = false;
        self
    }

    /// The bound text if any, the raw template otherwise.
    pub fn display_text(&self) -> &str {
        if self.constructed_text.is_empty() { &self.text } else { &self.constructed_text }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.text == other.text
            && self.conditions == other.conditions
    }
}

/// Flat `i64` encoding of an optional target, `-1` for none.
mod target_index {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use super::{NodeId, INDEX_NONE};

    pub fn serialize<S: Serializer>(target: &Option<NodeId>, s: S) -> Result<S::Ok, S::Error> {
        let raw = match target {
            Some(id) => id.0 as i64,
            None => INDEX_NONE,
        };
        raw.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NodeId>, D::Error> {
        let raw = i64::deserialize(d)?;
        if raw <= INDEX_NONE {
            return Ok(None);
        }
        usize::try_from(raw)
            .map(|i| Some(NodeId(i)))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextArgument;

    #[test]
    fn test_sentinel_is_invalid() {
        assert!(!Edge::none().is_valid());
        assert!(!Edge::invalid().is_valid());
        assert!(Edge::to(NodeId(0)).is_valid());
    }

    #[test]
    fn test_equality_ignores_presentation() {
        let a = Edge::to(NodeId(3)).with_text("Tell me more.");
        let mut b = a.clone()
            .with_speaker_state("curious")
            .with_text_argument(TextArgument::display_name("who", "Lydia"))
            .hidden_when_unsatisfied();
        b.constructed_text = "Tell me more, please.".into();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_uses_identity_fields() {
        let a = Edge::to(NodeId(3)).with_text("Bye.");
        assert_ne!(a, Edge::to(NodeId(4)).with_text("Bye."));
        assert_ne!(a, Edge::to(NodeId(3)).with_text("Farewell."));
        assert_ne!(a, a.clone().with_condition(Condition::was_visited(NodeId(1))));
    }

    #[test]
    fn test_target_serializes_flat() {
        let json = serde_json::to_value(Edge::none()).unwrap();
        assert_eq!(json["target"], serde_json::json!(-1));

        let json = serde_json::to_value(Edge::to(NodeId(12))).unwrap();
        assert_eq!(json["target"], serde_json::json!(12));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let edge: Edge = serde_json::from_str(r#"{"target": 2}"#).unwrap();
        assert_eq!(edge.target, Some(NodeId(2)));
        assert!(edge.include_when_unsatisfied);
        assert!(edge.conditions.is_empty());

        let edge: Edge = serde_json::from_str("{}").unwrap();
        assert!(!edge.is_valid());
    }

    #[test]
    fn test_display_text_prefers_constructed() {
        let mut edge = Edge::to(NodeId(1)).with_text("Pay {cost} gold");
        assert_eq!(edge.display_text(), "Pay {cost} gold");
        edge.constructed_text = "Pay 10 gold".into();
        assert_eq!(edge.display_text(), "Pay 10 gold");
    }
}
