//! Text argument binding.
//!
//! Dialogue and choice text are templates with `{key}` placeholders. Each
//! [`TextArgument`] names a key and where its value comes from; binding
//! reads every argument and substitutes the values in a single left-to-right
//! pass over the template. Binding never fails: an argument that cannot be
//! read is logged and handled according to [`MissingArgumentPolicy`].

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{TextArgument, TextArgumentKind, Value, ValueType, VariableScope};
use crate::Result;
use super::{read_variable, with_participant, Traversal};

/// What to put in place of an argument whose value could not be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingArgumentPolicy {
    /// Leave `{key}` in the text.
    #[default]
    KeepPlaceholder,
    /// Substitute an empty string.
    Blank,
}

/// Read the value of one argument. An empty participant name means `owner`.
pub fn resolve_argument<T: Traversal + ?Sized>(argument: &TextArgument, traversal: &T, owner: &str) -> Result<Value> {
    let participant = if argument.participant.is_empty() { owner } else { argument.participant.as_str() };
    let variable = argument.variable.as_str();

    with_participant(traversal, participant, |p| match argument.kind {
        TextArgumentKind::DisplayName => Ok(Value::Name(p.display_name())),
        TextArgumentKind::Int => read_variable(p, variable, VariableScope::Interface, ValueType::Int),
        TextArgumentKind::Float => read_variable(p, variable, VariableScope::Interface, ValueType::Float),
        TextArgumentKind::Name => read_variable(p, variable, VariableScope::Interface, ValueType::Name),
        TextArgumentKind::ClassInt => read_variable(p, variable, VariableScope::Class, ValueType::Int),
        TextArgumentKind::ClassFloat => read_variable(p, variable, VariableScope::Class, ValueType::Float),
        TextArgumentKind::ClassName => read_variable(p, variable, VariableScope::Class, ValueType::Name),
    })
}

/// Bind `arguments` into `template`.
///
/// With no arguments the template comes back unchanged. Placeholders that
/// no argument claims are left as written; when two arguments share a key
/// the first one wins.
pub fn construct_text<T: Traversal + ?Sized>(
    template: &str,
    arguments: &[TextArgument],
    traversal: &T,
    owner: &str,
    policy: MissingArgumentPolicy,
) -> String {
    if arguments.is_empty() {
        return template.to_owned();
    }

    // None marks an argument that exists but could not be read.
    let mut values: HashMap<&str, Option<String>> = HashMap::with_capacity(arguments.len());
    for argument in arguments {
        if values.contains_key(argument.display_string.as_str()) {
            continue;
        }
        let value = match resolve_argument(argument, traversal, owner) {
            Ok(value) => Some(value.to_string()),
            Err(e) => {
                warn!(key = %argument.display_string, error = %e, "text argument could not be resolved");
                None
            }
        };
        values.insert(argument.display_string.as_str(), value);
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']) else {
            break;
        };
        if after.as_bytes()[close] == b'{' {
            out.push('{');
            out.push_str(&after[..close]);
            rest = &after[close..];
            continue;
        }

        let key = &after[..close];
        match values.get(key) {
            Some(Some(value)) => out.push_str(value),
            Some(None) if policy == MissingArgumentPolicy::Blank => {}
            _ => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    // `rest` is either the tail after the last placeholder or an
    // unterminated `{...` that is copied verbatim.
    if let Some(open) = rest.find('{') {
        out.push_str(&rest[open..]);
    } else {
        out.push_str(rest);
    }
    out
}
