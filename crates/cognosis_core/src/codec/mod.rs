//! Binary codec for atoms.
//!
//! # Responsibility
//! - Encode and decode `AtomicData` and `FormalTheory` to stable byte layouts.
//! - Re-bind operator ids to executables through the `OperatorRegistry`.
//! - Optionally place encoded output in a `ScratchArena`.
//!
//! # Invariants
//! - All integers on the wire are big-endian.
//! - Decoding never reads past the buffer; short input is `TruncatedBuffer`.
//! - Unknown operator ids fail the decode call and are never defaulted.
//!
//! # See also
//! - `data` and `theory` for the per-variant layouts.

use crate::model::atom::{AnyAtom, Atom, AtomKind};
use crate::model::atomic_data::AtomicData;
use crate::model::formal_theory::FormalTheory;
use crate::registry::{OperatorRegistry, RegistryError};
use crate::scratch::arena::{ArenaError, ScratchArena, ScratchRegion};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod data;
pub mod theory;
mod wire;

pub type CodecResult<T> = Result<T, CodecError>;

/// Encode/decode failures.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    InvalidKind(u8),
    TruncatedBuffer { needed: usize, remaining: usize },
    MalformedCaseBase { keys: usize, ids: usize },
    DuplicateCaseKey(String),
    InvalidUtf8,
    InvalidKeyBlob(String),
    InvalidMapPayload(String),
    NonFiniteFloat(f32),
    PayloadTooLarge(usize),
    TrailingBytes(usize),
    Registry(RegistryError),
    Arena(ArenaError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKind(kind) => write!(f, "invalid atom data kind tag: {kind}"),
            Self::TruncatedBuffer { needed, remaining } => write!(
                f,
                "truncated buffer: needed {needed} byte(s), {remaining} remaining"
            ),
            Self::MalformedCaseBase { keys, ids } => write!(
                f,
                "malformed case base: {keys} key(s) but {ids} operator id(s)"
            ),
            Self::DuplicateCaseKey(key) => write!(f, "duplicate case base key: {key}"),
            Self::InvalidUtf8 => write!(f, "payload is not valid UTF-8"),
            Self::InvalidKeyBlob(message) => write!(f, "invalid case base key array: {message}"),
            Self::InvalidMapPayload(message) => write!(f, "invalid map payload: {message}"),
            Self::NonFiniteFloat(value) => {
                write!(f, "map payload contains non-finite float {value}")
            }
            Self::PayloadTooLarge(len) => {
                write!(f, "payload of {len} bytes exceeds the u32 length prefix")
            }
            Self::TrailingBytes(extra) => write!(f, "{extra} unexpected trailing byte(s)"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Arena(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Arena(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for CodecError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<ArenaError> for CodecError {
    fn from(value: ArenaError) -> Self {
        Self::Arena(value)
    }
}

/// Codec bound to a borrowed operator registry.
#[derive(Debug, Clone, Copy)]
pub struct AtomCodec<'r> {
    registry: &'r OperatorRegistry,
}

impl AtomCodec<'static> {
    /// Codec over the process-wide registry.
    pub fn global() -> Self {
        Self::new(OperatorRegistry::global())
    }
}

impl Default for AtomCodec<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'r> AtomCodec<'r> {
    pub fn new(registry: &'r OperatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r OperatorRegistry {
        self.registry
    }

    pub fn encode_data(&self, data: &AtomicData) -> CodecResult<Vec<u8>> {
        data::encode_data(data)
    }

    pub fn decode_data(&self, bytes: &[u8]) -> CodecResult<AtomicData> {
        data::decode_data(bytes).inspect_err(|err| log_decode_error("data", bytes.len(), err))
    }

    pub fn encode_theory(&self, theory: &FormalTheory) -> CodecResult<Vec<u8>> {
        theory::encode_theory(self.registry, theory)
    }

    pub fn decode_theory(&self, bytes: &[u8]) -> CodecResult<FormalTheory> {
        theory::decode_theory(self.registry, bytes)
            .inspect_err(|err| log_decode_error("theory", bytes.len(), err))
    }

    /// Decodes `bytes` as the given variant without an envelope.
    pub fn decode_kind(&self, kind: AtomKind, bytes: &[u8]) -> CodecResult<AnyAtom> {
        match kind {
            AtomKind::Data => self.decode_data(bytes).map(AnyAtom::Data),
            AtomKind::Theory => self.decode_theory(bytes).map(AnyAtom::Theory),
        }
    }

    /// Encodes `atom` and copies the bytes into a region of `arena`.
    ///
    /// # Errors
    /// - Any encode error of the atom.
    /// - `Arena(AllocationTooLarge)` when the encoding exceeds one chunk.
    pub fn encode_into<A: Atom>(
        &self,
        atom: &A,
        arena: &mut ScratchArena,
    ) -> CodecResult<ScratchRegion> {
        let bytes = atom.encode_with(self)?;
        let region = arena.reserve(bytes.len())?;
        arena.bytes_mut(region)?.copy_from_slice(&bytes);
        debug!(
            "event=encode_into_arena module=codec status=ok bytes={} chunk={} offset={}",
            bytes.len(),
            region.chunk(),
            region.offset()
        );
        Ok(region)
    }
}

fn log_decode_error(variant: &str, len: usize, err: &CodecError) {
    debug!(
        "event=atom_decode module=codec status=error variant={} bytes={} error={}",
        variant, len, err
    );
}
