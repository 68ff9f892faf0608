//! Event dispatch: apply an [`Event`] to the participant it names.
//!
//! Exactly one participant mutation per successful call. A missing
//! participant or capability returns an error before anything is touched;
//! callers inside a session log the error and carry on.

use tracing::debug;

use crate::model::{Event, EventKind, Value};
use crate::participant::{unsupported, Capability, Participant, Participants};
use crate::{Error, Result};

/// Apply `event` to its participant.
pub fn dispatch(event: &Event, participants: &Participants) -> Result<()> {
    let handle = participants
        .get(&event.participant)
        .ok_or_else(|| Error::ParticipantNotFound(event.participant.clone()))?;
    let mut participant = handle.write();

    let capability = Capability::for_event(event.event_type());
    if !participant.capabilities().supports(capability) {
        return Err(unsupported(&event.participant, capability));
    }

    debug!(participant = %event.participant, name = %event.name, event = ?event.event_type(), "dispatching event");
    apply(&mut *participant, &event.name, &event.kind)
}

fn apply(participant: &mut dyn Participant, name: &str, kind: &EventKind) -> Result<()> {
    match kind {
        EventKind::Notify => participant.on_event(name),
        EventKind::ModifyInt { value, delta } => participant.modify_int(name, *value, *delta),
        EventKind::ModifyFloat { value, delta } => participant.modify_float(name, *value, *delta),
        EventKind::ModifyBool { value } => participant.modify_bool(name, *value),
        EventKind::ModifyName { value } => participant.modify_name(name, value),

        EventKind::ModifyClassInt { value, delta } => {
            let next = if *delta {
                let current = participant.class_variable(name)?;
                let current = current.as_int().ok_or_else(|| Error::TypeError {
                    expected: "INT".to_owned(),
                    got: current.type_name().to_owned(),
                })?;
                current.wrapping_add(*value)
            } else {
                *value
            };
            participant.set_class_variable(name, Value::Int(next))
        }
        EventKind::ModifyClassFloat { value, delta } => {
            let next = if *delta {
                let current = participant.class_variable(name)?;
                let current = current.as_float().ok_or_else(|| Error::TypeError {
                    expected: "FLOAT".to_owned(),
                    got: current.type_name().to_owned(),
                })?;
                current + *value
            } else {
                *value
            };
            participant.set_class_variable(name, Value::Float(next))
        }
        EventKind::ModifyClassBool { value } => participant.set_class_variable(name, Value::Bool(*value)),
        EventKind::ModifyClassName { value } => participant.set_class_variable(name, Value::Name(value.clone())),
    }
}
