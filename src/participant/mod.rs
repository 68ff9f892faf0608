//! # Participant Capability Interface
//!
//! This is THE contract between the dialogue runtime and game-side objects.
//! Conditions read participants through it; events mutate them through it.
//!
//! ## Implementations
//!
//! | Participant | Module | Description |
//! |-------------|--------|-------------|
//! | `MemoryParticipant` | `memory` | Map-backed, for testing/embedding |
//! | your game type | | Implement the methods it supports |
//!
//! Every capability method has a default that returns
//! [`Error::Unsupported`]. A participant only overrides what it can do and
//! reports it through [`Participant::capabilities`]; the runtime treats a
//! missing capability as a recoverable condition, never a crash.

pub mod memory;
pub mod variables;

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::model::{EventType, Value};
use crate::{Error, Result};

pub use memory::MemoryParticipant;
pub use variables::{Accessor, VariableTable};

// ============================================================================
// Capabilities
// ============================================================================

/// One capability a participant may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Named boolean predicates (`check_condition`).
    Conditions,
    /// Plain notifications (`on_event`).
    Events,
    IntVariables,
    FloatVariables,
    BoolVariables,
    NameVariables,
    /// By-name variable table (`class_variable` / `set_class_variable`).
    ClassVariables,
}

impl Capability {
    /// Capability an event of the given type needs.
    pub fn for_event(event_type: EventType) -> Self {
        match event_type {
            EventType::Notify => Capability::Events,
            EventType::ModifyInt => Capability::IntVariables,
            EventType::ModifyFloat => Capability::FloatVariables,
            EventType::ModifyBool => Capability::BoolVariables,
            EventType::ModifyName => Capability::NameVariables,
            EventType::ModifyClassIntVariable
            | EventType::ModifyClassFloatVariable
            | EventType::ModifyClassBoolVariable
            | EventType::ModifyClassNameVariable => Capability::ClassVariables,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Conditions => "conditions",
            Capability::Events => "events",
            Capability::IntVariables => "int variables",
            Capability::FloatVariables => "float variables",
            Capability::BoolVariables => "bool variables",
            Capability::NameVariables => "name variables",
            Capability::ClassVariables => "class variables",
        };
        f.write_str(s)
    }
}

/// What a participant can do. Checked before every event dispatch.
///
/// All fields default to false. Participants override via `capabilities()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub conditions: bool,
    pub events: bool,
    pub int_variables: bool,
    pub float_variables: bool,
    pub bool_variables: bool,
    pub name_variables: bool,
    pub class_variables: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            conditions: true,
            events: true,
            int_variables: true,
            float_variables: true,
            bool_variables: true,
            name_variables: true,
            class_variables: true,
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Conditions => self.conditions,
            Capability::Events => self.events,
            Capability::IntVariables => self.int_variables,
            Capability::FloatVariables => self.float_variables,
            Capability::BoolVariables => self.bool_variables,
            Capability::NameVariables => self.name_variables,
            Capability::ClassVariables => self.class_variables,
        }
    }

    /// Copy with one capability switched off.
    pub fn without(mut self, capability: Capability) -> Self {
        let slot = match capability {
            Capability::Conditions => &mut self.conditions,
            Capability::Events => &mut self.events,
            Capability::IntVariables => &mut self.int_variables,
            Capability::FloatVariables => &mut self.float_variables,
            Capability::BoolVariables => &mut self.bool_variables,
            Capability::NameVariables => &mut self.name_variables,
            Capability::ClassVariables => &mut self.class_variables,
        };
        *slot = false;
        self
    }
}

/// Build the error every default capability method returns.
pub fn unsupported(participant: &str, capability: Capability) -> Error {
    Error::Unsupported { participant: participant.to_owned(), capability }
}

// ============================================================================
// Participant Trait
// ============================================================================

/// A game-side object that conditions can read and events can modify.
///
/// Numeric `modify_*` calls receive the event's `delta` flag: `true` adds
/// the value to the current one, `false` overwrites. Range checks and
/// clamping are the participant's business.
pub trait Participant: Send + Sync {
    /// Name dialogues use to address this participant.
    fn name(&self) -> &str;

    /// Name shown in dialogue text.
    fn display_name(&self) -> String {
        self.name().to_owned()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    // ========================================================================
    // Reads (condition evaluation, text arguments)
    // ========================================================================

    fn check_condition(&self, _name: &str) -> Result<bool> {
        Err(unsupported(self.name(), Capability::Conditions))
    }

    fn int_value(&self, _name: &str) -> Result<i32> {
        Err(unsupported(self.name(), Capability::IntVariables))
    }

    fn float_value(&self, _name: &str) -> Result<f32> {
        Err(unsupported(self.name(), Capability::FloatVariables))
    }

    fn bool_value(&self, _name: &str) -> Result<bool> {
        Err(unsupported(self.name(), Capability::BoolVariables))
    }

    fn name_value(&self, _name: &str) -> Result<String> {
        Err(unsupported(self.name(), Capability::NameVariables))
    }

    /// Read a variable through the participant's by-name table.
    fn class_variable(&self, _name: &str) -> Result<Value> {
        Err(unsupported(self.name(), Capability::ClassVariables))
    }

    // ========================================================================
    // Writes (event dispatch)
    // ========================================================================

    fn on_event(&mut self, _name: &str) -> Result<()> {
        Err(unsupported(self.name(), Capability::Events))
    }

    fn modify_int(&mut self, _name: &str, _value: i32, _delta: bool) -> Result<()> {
        Err(unsupported(self.name(), Capability::IntVariables))
    }

    fn modify_float(&mut self, _name: &str, _value: f32, _delta: bool) -> Result<()> {
        Err(unsupported(self.name(), Capability::FloatVariables))
    }

    fn modify_bool(&mut self, _name: &str, _value: bool) -> Result<()> {
        Err(unsupported(self.name(), Capability::BoolVariables))
    }

    fn modify_name(&mut self, _name: &str, _value: &str) -> Result<()> {
        Err(unsupported(self.name(), Capability::NameVariables))
    }

    /// Overwrite a variable through the participant's by-name table.
    fn set_class_variable(&mut self, _name: &str, _value: Value) -> Result<()> {
        Err(unsupported(self.name(), Capability::ClassVariables))
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Shared, lockable participant. Evaluation takes read locks, dispatch a
/// write lock.
pub type ParticipantHandle = Arc<RwLock<dyn Participant>>;

/// Participants of one conversation, keyed by [`Participant::name`].
#[derive(Clone, Default)]
pub struct Participants {
    by_name: HashMap<String, ParticipantHandle>,
}

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant, returning its shared handle.
    pub fn insert<P: Participant + 'static>(&mut self, participant: P) -> ParticipantHandle {
        let handle: ParticipantHandle = Arc::new(RwLock::new(participant));
        self.insert_handle(handle.clone());
        handle
    }

    /// Register a handle the caller keeps a typed reference to.
    pub fn insert_shared<P: Participant + 'static>(&mut self, participant: Arc<RwLock<P>>) {
        self.insert_handle(participant);
    }

    pub fn insert_handle(&mut self, handle: ParticipantHandle) {
        let name = handle.read().name().to_owned();
        self.by_name.insert(name, handle);
    }

    pub fn with<P: Participant + 'static>(mut self, participant: P) -> Self {
        self.insert(participant);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParticipantHandle> {
        self.by_name.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParticipantHandle> {
        self.by_name.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Participants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
