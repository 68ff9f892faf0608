//! Text arguments: typed values substituted into `{placeholder}` slots.

use serde::{Deserialize, Serialize};

/// How an argument's value is read from its participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextArgumentKind {
    /// The participant's display name.
    #[default]
    DisplayName,
    Int,
    Float,
    Name,
    ClassInt,
    ClassFloat,
    ClassName,
}

/// A placeholder in dialogue text and where its value comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextArgument {
    /// Placeholder key, written `{display_string}` in the text.
    pub display_string: String,
    /// Participant to read from. Empty means the speaker of the owning node.
    pub participant: String,
    pub kind: TextArgumentKind,
    /// Variable name. Unused for `DisplayName`.
    pub variable: String,
}

impl TextArgument {
    pub fn new(
        display_string: impl Into<String>,
        participant: impl Into<String>,
        kind: TextArgumentKind,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            display_string: display_string.into(),
            participant: participant.into(),
            kind,
            variable: variable.into(),
        }
    }

    pub fn display_name(display_string: impl Into<String>, participant: impl Into<String>) -> Self {
        Self::new(display_string, participant, TextArgumentKind::DisplayName, "")
    }

    /// Rebuild an argument list so it has exactly one entry per placeholder
    /// in `text`, in order of first appearance. Entries already in `existing`
    /// keep their settings; new placeholders get a default argument.
    pub fn sync_with_text(text: &str, existing: &[TextArgument]) -> Vec<TextArgument> {
        placeholders(text)
            .into_iter()
            .map(|key| {
                existing
                    .iter()
                    .find(|arg| arg.display_string == key)
                    .cloned()
                    .unwrap_or_else(|| TextArgument { display_string: key.to_owned(), ..Default::default() })
            })
            .collect()
    }
}

/// Placeholder keys (`{key}`) in `text`, deduplicated, in order of first
/// appearance. Empty braces and unterminated braces are ignored.
pub fn placeholders(text: &str) -> Vec<&str> {
    let mut keys: Vec<&str> = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']) else { break };
        if after.as_bytes()[close] == b'{' {
            // `{a{b}`: restart from the inner brace
            rest = &after[close..];
            continue;
        }
        let key = &after[..close];
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
        rest = &after[close + 1..];
    }
    keys
}
