//! Events: typed mutations and notifications sent to participants.
//!
//! In memory an event is a closed sum type ([`EventKind`]) that carries only
//! the payload its kind needs. On the wire it is the flat [`EventRecord`]
//! every dialogue asset format uses, with one slot per payload type.

use serde::{Deserialize, Serialize};
use super::value::nearly_equal;

/// A single effect applied to one participant.
///
/// Equality compares participant, name, kind and numeric/bool payloads
/// (floats within [`FLOAT_TOLERANCE`](super::value::FLOAT_TOLERANCE)).
/// The name payload of `ModifyName`/`ModifyClassName` is not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "EventRecord", from = "EventRecord")]
pub struct Event {
    /// Participant the event is called on.
    pub participant: String,
    /// The notification or variable affected.
    pub name: String,
    pub kind: EventKind,
}

/// What an event does, with its payload.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Plain notification, no payload.
    Notify,
    ModifyInt { value: i32, delta: bool },
    ModifyFloat { value: f32, delta: bool },
    ModifyBool { value: bool },
    ModifyName { value: String },
    /// Writes a variable found by name in the participant's variable table.
    ModifyClassInt { value: i32, delta: bool },
    ModifyClassFloat { value: f32, delta: bool },
    ModifyClassBool { value: bool },
    ModifyClassName { value: String },
}

/// Discriminant of [`EventKind`], as stored in flat records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[default]
    Notify,
    ModifyInt,
    ModifyFloat,
    ModifyBool,
    ModifyName,
    ModifyClassIntVariable,
    ModifyClassFloatVariable,
    ModifyClassBoolVariable,
    ModifyClassNameVariable,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Notify => EventType::Notify,
            EventKind::ModifyInt { .. } => EventType::ModifyInt,
            EventKind::ModifyFloat { .. } => EventType::ModifyFloat,
            EventKind::ModifyBool { .. } => EventType::ModifyBool,
            EventKind::ModifyName { .. } => EventType::ModifyName,
            EventKind::ModifyClassInt { .. } => EventType::ModifyClassIntVariable,
            EventKind::ModifyClassFloat { .. } => EventType::ModifyClassFloatVariable,
            EventKind::ModifyClassBool { .. } => EventType::ModifyClassBoolVariable,
            EventKind::ModifyClassName { .. } => EventType::ModifyClassNameVariable,
        }
    }

    fn int_value(&self) -> i32 {
        match self {
            EventKind::ModifyInt { value, .. } | EventKind::ModifyClassInt { value, .. } => *value,
            _ => 0,
        }
    }

    fn float_value(&self) -> f32 {
        match self {
            EventKind::ModifyFloat { value, .. } | EventKind::ModifyClassFloat { value, .. } => *value,
            _ => 0.0,
        }
    }

    fn bool_value(&self) -> bool {
        match self {
            EventKind::ModifyBool { value } | EventKind::ModifyClassBool { value } => *value,
            _ => false,
        }
    }

    fn is_delta(&self) -> bool {
        match self {
            EventKind::ModifyInt { delta, .. }
            | EventKind::ModifyFloat { delta, .. }
            | EventKind::ModifyClassInt { delta, .. }
            | EventKind::ModifyClassFloat { delta, .. } => *delta,
            _ => false,
        }
    }
}

impl Event {
    pub fn new(participant: impl Into<String>, name: impl Into<String>, kind: EventKind) -> Self {
        Self { participant: participant.into(), name: name.into(), kind }
    }

    pub fn notify(participant: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(participant, name, EventKind::Notify)
    }

    pub fn modify_int(participant: impl Into<String>, name: impl Into<String>, value: i32, delta: bool) -> Self {
        Self::new(participant, name, EventKind::ModifyInt { value, delta })
    }

    pub fn modify_float(participant: impl Into<String>, name: impl Into<String>, value: f32, delta: bool) -> Self {
        Self::new(participant, name, EventKind::ModifyFloat { value, delta })
    }

    pub fn modify_bool(participant: impl Into<String>, name: impl Into<String>, value: bool) -> Self {
        Self::new(participant, name, EventKind::ModifyBool { value })
    }

    pub fn modify_name(participant: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(participant, name, EventKind::ModifyName { value: value.into() })
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.participant == other.participant
            && self.name == other.name
            && self.kind.int_value() == other.kind.int_value()
            && nearly_equal(self.kind.float_value(), other.kind.float_value())
            && self.kind.is_delta() == other.kind.is_delta()
            && self.kind.bool_value() == other.kind.bool_value()
            && self.event_type() == other.event_type()
    }
}

// ============================================================================
// Flat record
// ============================================================================

/// Flat event record: one slot per payload type, only the slot matching
/// `event_type` is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    pub participant: String,
    pub event_type: EventType,
    pub name: String,
    pub int_value: i32,
    pub float_value: f32,
    pub name_value: String,
    pub bool_value: bool,
    pub is_delta: bool,
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        let mut record = EventRecord {
            event_type: event.event_type(),
            int_value: event.kind.int_value(),
            float_value: event.kind.float_value(),
            bool_value: event.kind.bool_value(),
            is_delta: event.kind.is_delta(),
            participant: event.participant,
            name: event.name,
            name_value: String::new(),
        };
        if let EventKind::ModifyName { value } | EventKind::ModifyClassName { value } = event.kind {
            record.name_value = value;
        }
        record
    }
}

impl From<EventRecord> for Event {
    fn from(r: EventRecord) -> Self {
        let kind = match r.event_type {
            EventType::Notify => EventKind::Notify,
            EventType::ModifyInt => EventKind::ModifyInt { value: r.int_value, delta: r.is_delta },
            EventType::ModifyFloat => EventKind::ModifyFloat { value: r.float_value, delta: r.is_delta },
            EventType::ModifyBool => EventKind::ModifyBool { value: r.bool_value },
            EventType::ModifyName => EventKind::ModifyName { value: r.name_value },
            EventType::ModifyClassIntVariable => EventKind::ModifyClassInt { value: r.int_value, delta: r.is_delta },
            EventType::ModifyClassFloatVariable => EventKind::ModifyClassFloat { value: r.float_value, delta: r.is_delta },
            EventType::ModifyClassBoolVariable => EventKind::ModifyClassBool { value: r.bool_value },
            EventType::ModifyClassNameVariable => EventKind::ModifyClassName { value: r.name_value },
        };
        Event { participant: r.participant, name: r.name, kind }
    }
}
