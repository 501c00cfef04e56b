//! `AtomicData` wire format.
//!
//! `[u8 kind][payload]`, kind 0=int32, 1=float32, 2=string, 3=map.
//! Strings and maps are `[u32 len][utf8]`; map text is key-sorted JSON.

use super::wire::{WireReader, WireWriter};
use super::{CodecError, CodecResult};
use crate::model::atomic_data::AtomicData;
use crate::model::value::Payload;
use std::collections::BTreeMap;

pub const KIND_INT: u8 = 0;
pub const KIND_FLOAT: u8 = 1;
pub const KIND_STRING: u8 = 2;
pub const KIND_MAP: u8 = 3;

pub(crate) fn encode_data(data: &AtomicData) -> CodecResult<Vec<u8>> {
    let mut writer = WireWriter::with_capacity(encoded_len_hint(data.payload()));
    write_payload(&mut writer, data.payload())?;
    Ok(writer.into_bytes())
}

pub(crate) fn decode_data(bytes: &[u8]) -> CodecResult<AtomicData> {
    let mut reader = WireReader::new(bytes);
    let payload = read_payload(&mut reader)?;
    reader.finish()?;
    Ok(AtomicData::new(payload))
}

fn write_payload(writer: &mut WireWriter, payload: &Payload) -> CodecResult<()> {
    match payload {
        Payload::Int(value) => {
            writer.put_u8(KIND_INT);
            writer.put_i32(*value);
        }
        Payload::Float(value) => {
            writer.put_u8(KIND_FLOAT);
            writer.put_f32(*value);
        }
        Payload::Text(value) => {
            writer.put_u8(KIND_STRING);
            writer.put_len_prefixed(value.as_bytes())?;
        }
        Payload::Map(entries) => {
            if let Some(value) = payload.first_non_finite() {
                return Err(CodecError::NonFiniteFloat(value));
            }
            let text = serde_json::to_vec(entries)
                .map_err(|err| CodecError::InvalidMapPayload(err.to_string()))?;
            writer.put_u8(KIND_MAP);
            writer.put_len_prefixed(&text)?;
        }
    }
    Ok(())
}

fn read_payload(reader: &mut WireReader<'_>) -> CodecResult<Payload> {
    let payload = match reader.read_u8()? {
        KIND_INT => Payload::Int(reader.read_i32()?),
        KIND_FLOAT => Payload::Float(reader.read_f32()?),
        KIND_STRING => Payload::Text(reader.read_str()?.to_string()),
        KIND_MAP => {
            let text = reader.read_str()?;
            let entries: BTreeMap<String, Payload> = serde_json::from_str(text)
                .map_err(|err| CodecError::InvalidMapPayload(err.to_string()))?;
            Payload::Map(entries)
        }
        other => return Err(CodecError::InvalidKind(other)),
    };
    Ok(payload)
}

fn encoded_len_hint(payload: &Payload) -> usize {
    match payload {
        Payload::Int(_) | Payload::Float(_) => 5,
        Payload::Text(value) => 5 + value.len(),
        Payload::Map(_) => 64,
    }
}
