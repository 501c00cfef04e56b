//! `FormalTheory` wire format.
//!
//! ```text
//! [u32 reflexivity][u32 symmetry][u32 transitivity][u32 transparency]
//! [u32 keys_len][keys JSON array][u32 id] * N
//! ```
//!
//! Keys are written in lexicographic order and ids follow positionally, so
//! equal theories always encode to identical bytes.

use super::wire::{WireReader, WireWriter};
use super::{CodecError, CodecResult};
use crate::model::formal_theory::FormalTheory;
use crate::registry::{Operator, OperatorRegistry};
use std::collections::BTreeMap;

pub(crate) fn encode_theory(
    registry: &OperatorRegistry,
    theory: &FormalTheory,
) -> CodecResult<Vec<u8>> {
    let mut writer = WireWriter::with_capacity(64 + theory.case_base().len() * 16);

    for operator in theory.slots() {
        writer.put_u32(registry.id_of(operator.key())?);
    }

    // BTreeMap iteration is already lexicographic by key.
    let keys: Vec<&str> = theory.case_base().keys().map(String::as_str).collect();
    let blob =
        serde_json::to_vec(&keys).map_err(|err| CodecError::InvalidKeyBlob(err.to_string()))?;
    writer.put_len_prefixed(&blob)?;

    for operator in theory.case_base().values() {
        writer.put_u32(registry.id_of(operator.key())?);
    }

    Ok(writer.into_bytes())
}

pub(crate) fn decode_theory(
    registry: &OperatorRegistry,
    bytes: &[u8],
) -> CodecResult<FormalTheory> {
    let mut reader = WireReader::new(bytes);

    let reflexivity = registry.lookup(reader.read_u32()?)?;
    let symmetry = registry.lookup(reader.read_u32()?)?;
    let transitivity = registry.lookup(reader.read_u32()?)?;
    let transparency = registry.lookup(reader.read_u32()?)?;

    let blob = reader.read_len_prefixed()?;
    let keys: Vec<String> =
        serde_json::from_slice(blob).map_err(|err| CodecError::InvalidKeyBlob(err.to_string()))?;

    let trailing = reader.remaining();
    if trailing % 4 != 0 {
        return Err(CodecError::TruncatedBuffer {
            needed: 4,
            remaining: trailing % 4,
        });
    }
    let id_count = trailing / 4;
    if id_count != keys.len() {
        return Err(CodecError::MalformedCaseBase {
            keys: keys.len(),
            ids: id_count,
        });
    }

    let mut case_base: BTreeMap<String, Operator> = BTreeMap::new();
    for key in keys {
        let operator = registry.lookup(reader.read_u32()?)?;
        if case_base.contains_key(&key) {
            return Err(CodecError::DuplicateCaseKey(key));
        }
        case_base.insert(key, operator);
    }
    reader.finish()?;

    Ok(FormalTheory::from_parts(
        reflexivity,
        symmetry,
        transitivity,
        transparency,
        case_base,
    ))
}

#[cfg(test)]
mod tests {
    use super::{decode_theory, encode_theory};
    use crate::codec::CodecError;
    use crate::model::formal_theory::FormalTheory;
    use crate::registry::{OperatorRegistry, RegistryError};

    #[test]
    fn empty_case_base_encodes_empty_key_array() {
        let registry = OperatorRegistry::builtin();
        let theory = FormalTheory::without_cases();
        let bytes = encode_theory(&registry, &theory).expect("encode");

        assert_eq!(&bytes[..16], &[0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4]);
        assert_eq!(&bytes[16..], &[0, 0, 0, 2, b'[', b']']);
    }

    #[test]
    fn unknown_slot_id_is_fatal() {
        let registry = OperatorRegistry::builtin();
        let mut bytes = encode_theory(&registry, &FormalTheory::without_cases()).expect("encode");
        bytes[3] = 99;

        let err = decode_theory(&registry, &bytes).expect_err("id 99 is unknown");
        assert_eq!(err, CodecError::Registry(RegistryError::UnknownOperatorId(99)));
    }

    #[test]
    fn ragged_id_tail_is_truncated() {
        let registry = OperatorRegistry::builtin();
        let mut bytes = encode_theory(&registry, &FormalTheory::default()).expect("encode");
        bytes.pop();

        let err = decode_theory(&registry, &bytes).expect_err("last id is cut short");
        assert!(matches!(err, CodecError::TruncatedBuffer { .. }));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let registry = OperatorRegistry::builtin();
        let mut bytes = Vec::new();
        for id in 1u32..=4 {
            bytes.extend_from_slice(&id.to_be_bytes());
        }
        let blob = br#"["x","x"]"#;
        bytes.extend_from_slice(&(blob.len() as u32).to_be_bytes());
        bytes.extend_from_slice(blob);
        bytes.extend_from_slice(&9u32.to_be_bytes());
        bytes.extend_from_slice(&10u32.to_be_bytes());

        let err = decode_theory(&registry, &bytes).expect_err("duplicate key");
        assert_eq!(err, CodecError::DuplicateCaseKey("x".to_string()));
    }
}
