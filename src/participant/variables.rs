//! Name → accessor tables for a participant type's own fields.
//!
//! Events and conditions in the `Class` scope address a participant's
//! variables by name. Instead of runtime reflection, each participant type
//! builds one [`VariableTable`] up front (usually in a `static LazyLock`)
//! listing which fields are reachable and how to read and write them.
//!
//! ```rust
//! use std::sync::LazyLock;
//! use dialogue_rs::participant::VariableTable;
//!
//! struct Merchant { gold: i32, haggled: bool }
//!
//! static MERCHANT_VARIABLES: LazyLock<VariableTable<Merchant>> = LazyLock::new(|| {
//!     VariableTable::<Merchant>::new()
//!         .int("gold", |m| m.gold, |m, v| m.gold = v)
//!         .bool("haggled", |m| m.haggled, |m, v| m.haggled = v)
//! });
//! ```

use hashbrown::HashMap;

use crate::model::{Value, ValueType};
use crate::{Error, Result};

/// Getter/setter pair for one typed field of `T`.
pub enum Accessor<T> {
    Int { get: fn(&T) -> i32, set: fn(&mut T, i32) },
    Float { get: fn(&T) -> f32, set: fn(&mut T, f32) },
    Bool { get: fn(&T) -> bool, set: fn(&mut T, bool) },
    Name { get: fn(&T) -> String, set: fn(&mut T, String) },
}

impl<T> Accessor<T> {
    pub fn value_type(&self) -> ValueType {
        match self {
            Accessor::Int { .. } => ValueType::Int,
            Accessor::Float { .. } => ValueType::Float,
            Accessor::Bool { .. } => ValueType::Bool,
            Accessor::Name { .. } => ValueType::Name,
        }
    }
}

/// By-name variable table for participant type `T`.
pub struct VariableTable<T> {
    entries: HashMap<String, Accessor<T>>,
}

impl<T> Default for VariableTable<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<T> VariableTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int(self, name: &str, get: fn(&T) -> i32, set: fn(&mut T, i32)) -> Self {
        self.with(name, Accessor::Int { get, set })
    }

    pub fn float(self, name: &str, get: fn(&T) -> f32, set: fn(&mut T, f32)) -> Self {
        self.with(name, Accessor::Float { get, set })
    }

    pub fn bool(self, name: &str, get: fn(&T) -> bool, set: fn(&mut T, bool)) -> Self {
        self.with(name, Accessor::Bool { get, set })
    }

    pub fn name(self, name: &str, get: fn(&T) -> String, set: fn(&mut T, String)) -> Self {
        self.with(name, Accessor::Name { get, set })
    }

    pub fn with(mut self, name: &str, accessor: Accessor<T>) -> Self {
        self.entries.insert(name.to_owned(), accessor);
        self
    }

    pub fn value_type(&self, name: &str) -> Option<ValueType> {
        self.entries.get(name).map(Accessor::value_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read `name` from `target`.
    pub fn get(&self, target: &T, name: &str) -> Result<Value> {
        let accessor = self.entries.get(name).ok_or_else(|| Error::UnknownVariable(name.to_owned()))?;
        Ok(match accessor {
            Accessor::Int { get, .. } => Value::Int(get(target)),
            Accessor::Float { get, .. } => Value::Float(get(target)),
            Accessor::Bool { get, .. } => Value::Bool(get(target)),
            Accessor::Name { get, .. } => Value::Name(get(target)),
        })
    }

    /// Write `value` into `name` on `target`. Ints are accepted for float
    /// fields; any other type mismatch is an error and leaves `target` as is.
    pub fn set(&self, target: &mut T, name: &str, value: Value) -> Result<()> {
        let accessor = self.entries.get(name).ok_or_else(|| Error::UnknownVariable(name.to_owned()))?;
        let mismatch = |value: &Value| Error::TypeError {
            expected: accessor.value_type().to_string(),
            got: value.type_name().to_owned(),
        };
        match (accessor, value) {
            (Accessor::Int { set, .. }, Value::Int(v)) => set(target, v),
            (Accessor::Float { set, .. }, v @ (Value::Float(_) | Value::Int(_))) => {
                set(target, v.as_float().ok_or_else(|| mismatch(&v))?)
            }
            (Accessor::Bool { set, .. }, Value::Bool(v)) => set(target, v),
            (Accessor::Name { set, .. }, Value::Name(v)) => set(target, v),
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }
}
