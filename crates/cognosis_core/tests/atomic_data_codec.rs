use cognosis_core::{Atom, AtomCodec, AtomicData, CodecError, Payload};
use std::collections::BTreeMap;

fn roundtrip(data: &AtomicData) -> AtomicData {
    AtomicData::decode(&data.encode().unwrap()).unwrap()
}

#[test]
fn int_encodes_as_tag_and_big_endian_word() {
    let data = AtomicData::from(42);
    assert_eq!(data.encode().unwrap(), vec![0, 0, 0, 0, 42]);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn negative_int_is_twos_complement() {
    let data = AtomicData::from(-1);
    assert_eq!(data.encode().unwrap(), vec![0, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn string_encodes_with_length_prefix() {
    let data = AtomicData::from("hi");
    assert_eq!(data.encode().unwrap(), vec![2, 0, 0, 0, 2, b'h', b'i']);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn string_length_counts_utf8_bytes() {
    let data = AtomicData::from("¬∧");
    let bytes = data.encode().unwrap();
    assert_eq!(&bytes[..5], &[2, 0, 0, 0, 5]);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn four_byte_string_keeps_its_kind() {
    let data = AtomicData::from("abcd");
    assert_eq!(roundtrip(&data).payload(), &Payload::from("abcd"));
}

#[test]
fn float_roundtrips() {
    let data = AtomicData::from(3.25_f32);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn nan_float_is_carried_bit_for_bit() {
    let bytes = AtomicData::from(f32::NAN).encode().unwrap();
    match AtomicData::decode(&bytes).unwrap().payload() {
        Payload::Float(value) => assert!(value.is_nan()),
        other => panic!("expected float, got {other:?}"),
    }
}

#[test]
fn nested_map_roundtrips_with_sorted_keys() {
    let mut inner = BTreeMap::new();
    inner.insert("depth".to_string(), Payload::Int(2));
    let mut data = AtomicData::empty();
    data.insert("zeta", 1.5_f32);
    data.insert("alpha", "first");
    data.insert("inner", Payload::Map(inner));

    let bytes = data.encode().unwrap();
    assert_eq!(bytes[0], 3);
    let text = std::str::from_utf8(&bytes[5..]).unwrap();
    assert_eq!(text, r#"{"alpha":"first","inner":{"depth":2},"zeta":1.5}"#);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn empty_map_roundtrips() {
    let data = AtomicData::empty();
    assert_eq!(data.encode().unwrap(), vec![3, 0, 0, 0, 2, b'{', b'}']);
    assert_eq!(roundtrip(&data), data);
}

#[test]
fn map_with_non_finite_float_cannot_be_encoded() {
    let mut data = AtomicData::empty();
    data.insert("bad", f32::INFINITY);
    assert!(matches!(
        data.encode().unwrap_err(),
        CodecError::NonFiniteFloat(_)
    ));
}

#[test]
fn truncated_length_prefix_is_reported() {
    let bytes = [2, 0, 0, 0, 10, b'a', b'b'];
    assert_eq!(
        AtomicData::decode(&bytes).unwrap_err(),
        CodecError::TruncatedBuffer {
            needed: 10,
            remaining: 2,
        }
    );
}

#[test]
fn truncated_scalar_is_reported() {
    assert_eq!(
        AtomicData::decode(&[0, 0, 1]).unwrap_err(),
        CodecError::TruncatedBuffer {
            needed: 4,
            remaining: 2,
        }
    );
    assert_eq!(
        AtomicData::decode(&[]).unwrap_err(),
        CodecError::TruncatedBuffer {
            needed: 1,
            remaining: 0,
        }
    );
}

#[test]
fn unknown_tag_is_invalid_kind() {
    assert_eq!(
        AtomicData::decode(&[9, 0, 0, 0, 0]).unwrap_err(),
        CodecError::InvalidKind(9)
    );
}

#[test]
fn trailing_bytes_are_rejected() {
    assert_eq!(
        AtomicData::decode(&[0, 0, 0, 0, 1, 0xAA]).unwrap_err(),
        CodecError::TrailingBytes(1)
    );
}

#[test]
fn explicit_codec_matches_trait_shortcut() {
    let codec = AtomCodec::global();
    let data = AtomicData::from("same");
    assert_eq!(codec.encode_data(&data).unwrap(), data.encode().unwrap());
}

#[test]
fn map_integers_outside_i32_are_rejected() {
    let text = br#"{"a":3000000000}"#;
    let mut bytes = vec![3, 0, 0, 0, text.len() as u8];
    bytes.extend_from_slice(text);

    let err = AtomicData::decode(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::InvalidMapPayload(_)));
}
