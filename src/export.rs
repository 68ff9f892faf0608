//! Dialogue export/import.
//!
//! Two formats:
//!
//! ```text
//! Dialogue → export_json()    → JSON document  → import_json() → Dialogue
//! Dialogue → export_outline() → plain-text listing for review / diffs
//! ```
//!
//! JSON is lossless for authored data. Events are written as flat records
//! and edge targets as integers with `-1` for none, so the documents line
//! up with the asset formats dialogue editors produce. Import validates node
//! references before handing the dialogue back.

use std::io::{Read, Write};

use crate::model::*;
use crate::Result;

/// Write `dialogue` as pretty-printed JSON.
pub fn export_json(dialogue: &Dialogue, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, dialogue)?;
    writeln!(writer)?;
    Ok(())
}

/// Read a dialogue from JSON and validate its node references.
pub fn import_json<R: Read>(reader: R) -> Result<Dialogue> {
    let dialogue: Dialogue = serde_json::from_reader(reader)?;
    dialogue.validate()?;
    Ok(dialogue)
}

/// Write a readable listing of every node and edge.
///
/// ```text
/// // dialogue: shop (3 nodes, start 0)
/// [0] speech Merchant: "Welcome."
///     -> 1 "Buy" if Player.gold >= 10
///     -> 2 "Leave"
/// ```
pub fn export_outline(dialogue: &Dialogue, writer: &mut dyn Write) -> Result<()> {
    writeln!(
        writer,
        "// dialogue: {} ({} nodes, start {})",
        dialogue.name,
        dialogue.len(),
        dialogue.start
    )?;

    for (index, node) in dialogue.nodes.iter().enumerate() {
        let kind = match node.kind {
            NodeKind::Speech => "speech",
            NodeKind::Selector => "selector",
            NodeKind::End => "end",
        };
        write!(writer, "[{index}] {kind}")?;
        if !node.speaker.is_empty() {
            write!(writer, " {}", node.speaker)?;
        }
        if !node.text.is_empty() {
            write!(writer, ": {:?}", node.text)?;
        }
        writeln!(writer)?;

        if !node.enter_conditions.is_empty() {
            writeln!(writer, "    enter if {}", format_conditions(&node.enter_conditions))?;
        }
        for event in &node.enter_events {
            writeln!(writer, "    on enter {}", format_event(event))?;
        }
        for edge in &node.children {
            let target = edge.target.map_or_else(|| "none".to_owned(), |t| t.to_string());
            write!(writer, "    -> {target}")?;
            if !edge.text.is_empty() {
                write!(writer, " {:?}", edge.text)?;
            }
            if !edge.conditions.is_empty() {
                write!(writer, " if {}", format_conditions(&edge.conditions))?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn format_conditions(conditions: &[Condition]) -> String {
    conditions.iter().map(format_condition).collect::<Vec<_>>().join(" and ")
}

fn format_condition(condition: &Condition) -> String {
    let not = |expected: bool| if expected { "" } else { "not " };
    match condition {
        Condition::Event { participant, name, expected } => format!("{}{participant}.{name}()", not(*expected)),
        Condition::Int { participant, variable, comparison, value, .. } => {
            format!("{participant}.{variable} {} {value}", format_comparison(*comparison))
        }
        Condition::Float { participant, variable, comparison, value, .. } => {
            format!("{participant}.{variable} {} {value}", format_comparison(*comparison))
        }
        Condition::Bool { participant, variable, expected, .. } => format!("{}{participant}.{variable}", not(*expected)),
        Condition::Name { participant, variable, value, equal, .. } => {
            format!("{participant}.{variable} {} {value:?}", if *equal { "==" } else { "!=" })
        }
        Condition::WasNodeVisited { node, expected } => format!("{}visited({node})", not(*expected)),
        Condition::HasSatisfiedChild { node, expected } => format!("{}open({node})", not(*expected)),
    }
}

fn format_comparison(comparison: Comparison) -> &'static str {
    match comparison {
        Comparison::Equal => "==",
        Comparison::NotEqual => "!=",
        Comparison::Less => "<",
        Comparison::LessOrEqual => "<=",
        Comparison::Greater => ">",
        Comparison::GreaterOrEqual => ">=",
    }
}

fn format_event(event: &Event) -> String {
    let target = format!("{}.{}", event.participant, event.name);
    let op = |delta: bool| if delta { "+=" } else { "=" };
    match &event.kind {
        EventKind::Notify => format!("{target}()"),
        EventKind::ModifyInt { value, delta } | EventKind::ModifyClassInt { value, delta } => {
            format!("{target} {} {value}", op(*delta))
        }
        EventKind::ModifyFloat { value, delta } | EventKind::ModifyClassFloat { value, delta } => {
            format!("{target} {} {value}", op(*delta))
        }
        EventKind::ModifyBool { value } | EventKind::ModifyClassBool { value } => format!("{target} = {value}"),
        EventKind::ModifyName { value } | EventKind::ModifyClassName { value } => format!("{target} = {value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn shop() -> Dialogue {
        let mut d = Dialogue::new("shop");
        d.add_node(
            Node::speech("Merchant", "Welcome.")
                .with_child(
                    Edge::to(NodeId(1))
                        .with_text("Buy")
                        .with_condition(Condition::int("Player", "gold", Comparison::GreaterOrEqual, 10)),
                )
                .with_child(Edge::to(NodeId(2)).with_text("Leave")),
        );
        d.add_node(
            Node::speech("Merchant", "Thanks!")
                .with_enter_event(Event::modify_int("Player", "gold", -10, true))
                .with_child(Edge::to(NodeId(2))),
        );
        d.add_node(Node::end());
        d
    }

    #[test]
    fn test_outline() {
        let mut out = Vec::new();
        export_outline(&shop(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("// dialogue: shop (3 nodes, start 0)\n"));
        assert!(text.contains("[0] speech Merchant: \"Welcome.\"\n"));
        assert!(text.contains("    -> 1 \"Buy\" if Player.gold >= 10\n"));
        assert!(text.contains("    on enter Player.gold += -10\n"));
        assert!(text.contains("[2] end\n"));
    }

    #[test]
    fn test_json_uses_flat_wire_format() {
        let mut out = Vec::new();
        export_json(&shop(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let event = &json["nodes"][1]["enter_events"][0];
        assert_eq!(event["event_type"], "ModifyInt");
        assert_eq!(event["int_value"], -10);
        assert_eq!(event["is_delta"], true);
        assert_eq!(json["nodes"][0]["children"][1]["target"], 2);
    }

    #[test]
    fn test_import_rejects_dangling_target() {
        let json = r#"{ "name": "broken", "nodes": [ { "children": [ { "target": 5 } ] } ] }"#;
        assert!(matches!(import_json(json.as_bytes()), Err(Error::InvalidReference(_))));
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        assert!(matches!(import_json("{ nope".as_bytes()), Err(Error::Json(_))));
    }
}
