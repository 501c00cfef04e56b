//! Scalar atom holding one payload value.

use super::atom::{Atom, AtomKind, Expression};
use super::value::{Payload, Value};
use crate::codec::{AtomCodec, CodecResult};
use crate::registry::RegistryResult;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Atom wrapping exactly one primitive payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicData {
    payload: Payload,
}

impl AtomicData {
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Empty-map payload used as the initial scratch value.
    pub fn empty() -> Self {
        Self::new(Payload::empty_map())
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Inserts `value` under `key`, turning a non-map payload into a map first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Payload>) {
        if !matches!(self.payload, Payload::Map(_)) {
            self.payload = Payload::Map(BTreeMap::new());
        }
        if let Payload::Map(entries) = &mut self.payload {
            entries.insert(key.into(), value.into());
        }
    }
}

impl Default for AtomicData {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Payload> for AtomicData {
    fn from(value: Payload) -> Self {
        Self::new(value)
    }
}

impl From<i32> for AtomicData {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<f32> for AtomicData {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<&str> for AtomicData {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AtomicData {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<BTreeMap<String, Payload>> for AtomicData {
    fn from(value: BTreeMap<String, Payload>) -> Self {
        Self::new(value)
    }
}

impl Display for AtomicData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtomicData(data={})", self.payload)
    }
}

impl Atom for AtomicData {
    fn kind(&self) -> AtomKind {
        AtomKind::Data
    }

    fn encode_with(&self, codec: &AtomCodec<'_>) -> CodecResult<Vec<u8>> {
        codec.encode_data(self)
    }

    fn decode_with(codec: &AtomCodec<'_>, bytes: &[u8]) -> CodecResult<Self> {
        codec.decode_data(bytes)
    }

    /// Yields the payload; arguments are ignored.
    fn execute(&self, _args: &[Value]) -> RegistryResult<Value> {
        Ok(Value::Data(self.payload.clone()))
    }

    /// Wraps the raw expression text as a new data atom.
    fn parse_expression(&self, expression: &str) -> Expression {
        Expression::Data(AtomicData::from(expression))
    }
}
