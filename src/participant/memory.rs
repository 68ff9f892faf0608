//! In-memory participant.
//!
//! This is the reference implementation of `Participant`.
//! It keeps every variable kind in its own map.
//!
//! ## Behavior
//!
//! - **Interface variables default to zero**: reading an unset int, float,
//!   bool or name yields `0`, `0.0`, `false` or `""`, so a delta event on a
//!   fresh variable starts from zero.
//! - **Class variables must be declared**: `with_class_variable()` fixes
//!   both the name and the type. Unknown names and type changes are errors,
//!   like a by-name lookup on a real type would be.
//! - **Capabilities can be narrowed**: `with_capabilities()` turns methods
//!   off, which is handy for exercising unsupported-capability paths.
//!
//! Use this participant for:
//! - Testing dialogues without a game attached
//! - Embedding the runtime in tools that only need variable bookkeeping

use hashbrown::HashMap;

use crate::model::{Value, ValueType};
use crate::{Error, Result};
use super::{unsupported, Capabilities, Capability, Participant};

/// Map-backed participant.
#[derive(Debug, Clone)]
pub struct MemoryParticipant {
    name: String,
    display_name: Option<String>,
    capabilities: Capabilities,
    conditions: HashMap<String, bool>,
    ints: HashMap<String, i32>,
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    names: HashMap<String, String>,
    class_variables: HashMap<String, Value>,
    /// Notifications received through `on_event`, oldest first.
    received: Vec<String>,
}

impl MemoryParticipant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            capabilities: Capabilities::all(),
            conditions: HashMap::new(),
            ints: HashMap::new(),
            floats: HashMap::new(),
            bools: HashMap::new(),
            names: HashMap::new(),
            class_variables: HashMap::new(),
            received: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_condition(mut self, name: impl Into<String>, value: bool) -> Self {
        self.conditions.insert(name.into(), value);
        self
    }

    pub fn with_int(mut self, name: impl Into<String>, value: i32) -> Self {
        self.ints.insert(name.into(), value);
        self
    }

    pub fn with_float(mut self, name: impl Into<String>, value: f32) -> Self {
        self.floats.insert(name.into(), value);
        self
    }

    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.bools.insert(name.into(), value);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.names.insert(name.into(), value.into());
        self
    }

    /// Declare a by-name variable; its type is fixed from here on.
    pub fn with_class_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.class_variables.insert(name.into(), value.into());
        self
    }

    pub fn set_condition(&mut self, name: impl Into<String>, value: bool) {
        self.conditions.insert(name.into(), value);
    }

    pub fn received_events(&self) -> &[String] {
        &self.received
    }

    fn require(&self, capability: Capability) -> Result<()> {
        if self.capabilities.supports(capability) {
            Ok(())
        } else {
            Err(unsupported(&self.name, capability))
        }
    }
}

// ============================================================================
// Participant impl
// ============================================================================

impl Participant for MemoryParticipant {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> String {
        self.display_name.clone().unwrap_or_else(|| self.name.clone())
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    // ========================================================================
    // Reads
    // ========================================================================

    fn check_condition(&self, name: &str) -> Result<bool> {
        self.require(Capability::Conditions)?;
        Ok(self.conditions.get(name).copied().unwrap_or(false))
    }

    fn int_value(&self, name: &str) -> Result<i32> {
        self.require(Capability::IntVariables)?;
        Ok(self.ints.get(name).copied().unwrap_or_default())
    }

    fn float_value(&self, name: &str) -> Result<f32> {
        self.require(Capability::FloatVariables)?;
        Ok(self.floats.get(name).copied().unwrap_or_default())
    }

    fn bool_value(&self, name: &str) -> Result<bool> {
        self.require(Capability::BoolVariables)?;
        Ok(self.bools.get(name).copied().unwrap_or_default())
    }

    fn name_value(&self, name: &str) -> Result<String> {
        self.require(Capability::NameVariables)?;
        Ok(self.names.get(name).cloned().unwrap_or_default())
    }

    fn class_variable(&self, name: &str) -> Result<Value> {
        self.require(Capability::ClassVariables)?;
        self.class_variables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    fn on_event(&mut self, name: &str) -> Result<()> {
        self.require(Capability::Events)?;
        self.received.push(name.to_owned());
        Ok(())
    }

    fn modify_int(&mut self, name: &str, value: i32, delta: bool) -> Result<()> {
        self.require(Capability::IntVariables)?;
        let slot = self.ints.entry(name.to_owned()).or_default();
        *slot = if delta { slot.wrapping_add(value) } else { value };
        Ok(())
    }

    fn modify_float(&mut self, name: &str, value: f32, delta: bool) -> Result<()> {
        self.require(Capability::FloatVariables)?;
        let slot = self.floats.entry(name.to_owned()).or_default();
        *slot = if delta { *slot + value } else { value };
        Ok(())
    }

    fn modify_bool(&mut self, name: &str, value: bool) -> Result<()> {
        self.require(Capability::BoolVariables)?;
        self.bools.insert(name.to_owned(), value);
        Ok(())
    }

    fn modify_name(&mut self, name: &str, value: &str) -> Result<()> {
        self.require(Capability::NameVariables)?;
        self.names.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn set_class_variable(&mut self, name: &str, value: Value) -> Result<()> {
        self.require(Capability::ClassVariables)?;
        let slot = self
            .class_variables
            .get_mut(name)
            .ok_or_else(|| Error::UnknownVariable(name.to_owned()))?;
        *slot = match (slot.value_type(), value) {
            (ValueType::Float, Value::Int(i)) => Value::Float(i as f32),
            (expected, value) if value.value_type() == expected => value,
            (expected, value) => {
                return Err(Error::TypeError {
                    expected: expected.to_string(),
                    got: value.type_name().to_owned(),
                });
            }
        };
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variables_read_as_zero() {
        let p = MemoryParticipant::new("Player");
        assert_eq!(p.int_value("gold").unwrap(), 0);
        assert_eq!(p.float_value("karma").unwrap(), 0.0);
        assert!(!p.bool_value("met_king").unwrap());
        assert_eq!(p.name_value("faction").unwrap(), "");
        assert!(!p.check_condition("is_hungry").unwrap());
    }

    #[test]
    fn test_modify_int_delta_and_overwrite() {
        let mut p = MemoryParticipant::new("Player").with_int("gold", 10);
        p.modify_int("gold", 5, true).unwrap();
        assert_eq!(p.int_value("gold").unwrap(), 15);
        p.modify_int("gold", 5, false).unwrap();
        assert_eq!(p.int_value("gold").unwrap(), 5);
    }

    #[test]
    fn test_no_clamping() {
        let mut p = MemoryParticipant::new("Player").with_int("gold", 3);
        p.modify_int("gold", -10, true).unwrap();
        assert_eq!(p.int_value("gold").unwrap(), -7);
    }

    #[test]
    fn test_on_event_records_notifications() {
        let mut p = MemoryParticipant::new("Guard");
        p.on_event("alarm").unwrap();
        p.on_event("stand_down").unwrap();
        assert_eq!(p.received_events(), ["alarm", "stand_down"]);
    }

    #[test]
    fn test_class_variables_keep_their_type() {
        let mut p = MemoryParticipant::new("Merchant")
            .with_class_variable("stock", 4)
            .with_class_variable("markup", 1.5f32);

        p.set_class_variable("stock", Value::Int(9)).unwrap();
        p.set_class_variable("markup", Value::Int(2)).unwrap();
        assert_eq!(p.class_variable("stock").unwrap(), Value::Int(9));
        assert_eq!(p.class_variable("markup").unwrap(), Value::Float(2.0));

        assert!(matches!(p.set_class_variable("stock", Value::from("lots")), Err(Error::TypeError { .. })));
        assert!(matches!(p.set_class_variable("debt", Value::Int(1)), Err(Error::UnknownVariable(_))));
        assert_eq!(p.class_variable("stock").unwrap(), Value::Int(9));
    }

    #[test]
    fn test_narrowed_capabilities() {
        let mut p = MemoryParticipant::new("Statue")
            .with_capabilities(Capabilities::all().without(Capability::Events));
        assert!(matches!(
            p.on_event("poke"),
            Err(Error::Unsupported { capability: Capability::Events, .. })
        ));
        assert!(p.received_events().is_empty());
        assert!(p.modify_int("cracks", 1, true).is_ok());
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        assert_eq!(MemoryParticipant::new("npc_07").display_name(), "npc_07");
        assert_eq!(
            MemoryParticipant::new("npc_07").with_display_name("Old Tom").display_name(),
            "Old Tom"
        );
    }
}
