//! Payload and operand value types.
//!
//! # Invariants
//! - `Payload` only holds the four kinds the wire format can tag.
//! - `Value` equality is structural; float `NaN` never equals itself.

use crate::registry::Operator;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Primitive data carried by an `AtomicData`.
///
/// Maps nest payloads of the same bounded kinds and keep keys sorted, which
/// is what makes the structured-text encoding canonical.
///
/// Deserialization is strict: integers must fit `i32` and only objects,
/// numbers and strings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Int(i32),
    Float(f32),
    Text(String),
    Map(BTreeMap<String, Payload>),
}

impl Payload {
    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Map(_) => "map",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::Text(value) => !value.is_empty(),
            Self::Map(entries) => !entries.is_empty(),
        }
    }

    /// Returns the first non-finite float found in this payload, if any.
    pub(crate) fn first_non_finite(&self) -> Option<f32> {
        match self {
            Self::Float(value) if !value.is_finite() => Some(*value),
            Self::Map(entries) => entries.values().find_map(Payload::first_non_finite),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = Payload;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "an i32, a float, a string or a map")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Payload, E> {
        i32::try_from(value)
            .map(Payload::Int)
            .map_err(|_| E::custom(format!("integer {value} does not fit in i32")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Payload, E> {
        i32::try_from(value)
            .map(Payload::Int)
            .map_err(|_| E::custom(format!("integer {value} does not fit in i32")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Payload, E> {
        Ok(Payload::Float(value as f32))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Payload, E> {
        Ok(Payload::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Payload, E> {
        Ok(Payload::Text(value))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Payload, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, Payload>()? {
            entries.insert(key, value);
        }
        Ok(Payload::Map(entries))
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Payload {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<BTreeMap<String, Payload>> for Payload {
    fn from(value: BTreeMap<String, Payload>) -> Self {
        Self::Map(value)
    }
}

/// Operand consumed and produced by registry operators.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent result, e.g. transparency over unequal values.
    Null,
    Bool(bool),
    Data(Payload),
    Operator(Operator),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Data(payload) => payload.type_name(),
            Self::Operator(_) => "operator",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Data(payload) => payload.is_truthy(),
            Self::Operator(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Data(payload) => write!(f, "{payload}"),
            Self::Operator(operator) => write!(f, "{}", operator.key()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Operator> for Value {
    fn from(value: Operator) -> Self {
        Self::Operator(value)
    }
}

impl From<Payload> for Value {
    fn from(value: Payload) -> Self {
        Self::Data(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Data(Payload::Int(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Data(Payload::Float(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Data(Payload::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Data(Payload::Text(value))
    }
}
