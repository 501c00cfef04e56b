//! Atom capability set and the closed atom sum type.
//!
//! # Responsibility
//! - Define the operations every atom supports: encode, decode, execute,
//!   parse_expression, tautology.
//! - Dispatch over the two variants without open-ended inheritance.
//!
//! # Invariants
//! - The variant set is closed: `AtomicData` and `FormalTheory`.
//! - `AnyAtom` bytes are `[u8 variant][variant bytes]`; the variant layouts
//!   are unchanged inside the envelope.

use super::atomic_data::AtomicData;
use super::formal_theory::FormalTheory;
use super::value::Value;
use crate::codec::{AtomCodec, CodecError, CodecResult};
use crate::registry::{Operator, RegistryResult};
use std::fmt::{Display, Formatter};

const ENVELOPE_DATA: u8 = 0;
const ENVELOPE_THEORY: u8 = 1;

/// Variant discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Data,
    Theory,
}

impl AtomKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Theory => "theory",
        }
    }
}

/// Result of `Atom::parse_expression`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Raw text wrapped by a data atom.
    Data(AtomicData),
    /// Operator bound to the expression in a case base.
    Operator(Operator),
    /// The expression has no binding; callers must check for this.
    Unbound,
}

impl Expression {
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Operator(operator) => Some(*operator),
            _ => None,
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::Unbound)
    }
}

/// Operations shared by every atom variant.
pub trait Atom: Sized {
    fn kind(&self) -> AtomKind;

    /// Encodes through an explicit codec.
    fn encode_with(&self, codec: &AtomCodec<'_>) -> CodecResult<Vec<u8>>;

    /// Decodes through an explicit codec.
    fn decode_with(codec: &AtomCodec<'_>, bytes: &[u8]) -> CodecResult<Self>;

    /// Encodes against the process-wide registry.
    fn encode(&self) -> CodecResult<Vec<u8>> {
        self.encode_with(&AtomCodec::global())
    }

    /// Decodes against the process-wide registry.
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Self::decode_with(&AtomCodec::global(), bytes)
    }

    fn execute(&self, args: &[Value]) -> RegistryResult<Value>;

    fn parse_expression(&self, expression: &str) -> Expression;

    /// Invokes `predicate` and returns its result.
    fn tautology<P>(&self, predicate: P) -> bool
    where
        P: FnOnce() -> bool,
    {
        predicate()
    }
}

/// Closed sum over the atom variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyAtom {
    Data(AtomicData),
    Theory(FormalTheory),
}

impl From<AtomicData> for AnyAtom {
    fn from(value: AtomicData) -> Self {
        Self::Data(value)
    }
}

impl From<FormalTheory> for AnyAtom {
    fn from(value: FormalTheory) -> Self {
        Self::Theory(value)
    }
}

impl Display for AnyAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data(data) => write!(f, "{data}"),
            Self::Theory(theory) => write!(f, "{theory}"),
        }
    }
}

impl Atom for AnyAtom {
    fn kind(&self) -> AtomKind {
        match self {
            Self::Data(_) => AtomKind::Data,
            Self::Theory(_) => AtomKind::Theory,
        }
    }

    fn encode_with(&self, codec: &AtomCodec<'_>) -> CodecResult<Vec<u8>> {
        let (tag, body) = match self {
            Self::Data(data) => (ENVELOPE_DATA, data.encode_with(codec)?),
            Self::Theory(theory) => (ENVELOPE_THEORY, theory.encode_with(codec)?),
        };
        let mut bytes = Vec::with_capacity(body.len() + 1);
        bytes.push(tag);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn decode_with(codec: &AtomCodec<'_>, bytes: &[u8]) -> CodecResult<Self> {
        let Some((&tag, body)) = bytes.split_first() else {
            return Err(CodecError::TruncatedBuffer {
                needed: 1,
                remaining: 0,
            });
        };
        match tag {
            ENVELOPE_DATA => codec.decode_kind(AtomKind::Data, body),
            ENVELOPE_THEORY => codec.decode_kind(AtomKind::Theory, body),
            other => Err(CodecError::InvalidKind(other)),
        }
    }

    fn execute(&self, args: &[Value]) -> RegistryResult<Value> {
        match self {
            Self::Data(data) => data.execute(args),
            Self::Theory(theory) => theory.execute(args),
        }
    }

    fn parse_expression(&self, expression: &str) -> Expression {
        match self {
            Self::Data(data) => data.parse_expression(expression),
            Self::Theory(theory) => theory.parse_expression(expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnyAtom, Atom, AtomKind};
    use crate::codec::CodecError;
    use crate::model::atomic_data::AtomicData;
    use crate::model::formal_theory::FormalTheory;

    #[test]
    fn envelope_prefixes_variant_tag() {
        let atom = AnyAtom::from(AtomicData::from(42));
        assert_eq!(atom.encode().expect("encode"), vec![0, 0, 0, 0, 0, 42]);
        assert_eq!(atom.kind(), AtomKind::Data);
    }

    #[test]
    fn envelope_roundtrips_theory() {
        let atom = AnyAtom::from(FormalTheory::default());
        let bytes = atom.encode().expect("encode");
        assert_eq!(bytes[0], 1);
        assert_eq!(AnyAtom::decode(&bytes).expect("decode"), atom);
    }

    #[test]
    fn empty_envelope_is_truncated() {
        assert_eq!(
            AnyAtom::decode(&[]),
            Err(CodecError::TruncatedBuffer {
                needed: 1,
                remaining: 0,
            })
        );
    }

    #[test]
    fn unknown_envelope_tag_is_invalid_kind() {
        assert_eq!(AnyAtom::decode(&[7]), Err(CodecError::InvalidKind(7)));
    }
}
