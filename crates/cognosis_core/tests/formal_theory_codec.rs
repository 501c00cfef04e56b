use cognosis_core::{
    Atom, AtomCodec, CodecError, Expression, FormalTheory, Operator, OperatorRegistry,
    RegistryError, Value,
};

fn resolved_ids(registry: &OperatorRegistry, theory: &FormalTheory) -> Vec<(String, u32)> {
    let mut ids: Vec<(String, u32)> = ["reflexivity", "symmetry", "transitivity", "transparency"]
        .iter()
        .zip(theory.slots())
        .map(|(slot, operator)| (slot.to_string(), registry.id_of(operator.key()).unwrap()))
        .collect();
    ids.extend(
        theory
            .case_base()
            .iter()
            .map(|(key, operator)| (key.clone(), registry.id_of(operator.key()).unwrap())),
    );
    ids
}

#[test]
fn default_theory_roundtrips_by_operator_id() {
    let registry = OperatorRegistry::global();
    let theory = FormalTheory::default();

    let decoded = FormalTheory::decode(&theory.encode().unwrap()).unwrap();

    assert_eq!(resolved_ids(registry, &decoded), resolved_ids(registry, &theory));
    assert_eq!(decoded, theory);
}

#[test]
fn header_holds_slot_ids_in_fixed_order() {
    let bytes = FormalTheory::default().encode().unwrap();
    assert_eq!(
        &bytes[..16],
        &[0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4]
    );
}

#[test]
fn keys_blob_is_sorted_json_array_followed_by_aligned_ids() {
    let mut theory = FormalTheory::without_cases();
    theory.insert_case("∨", Operator::Disjunction);
    theory.insert_case("a", Operator::IfElseA);
    theory.insert_case("contrapositive", Operator::Contrapositive);

    let bytes = theory.encode().unwrap();
    let blob_len = u32::from_be_bytes(bytes[16..20].try_into().unwrap()) as usize;
    let blob = std::str::from_utf8(&bytes[20..20 + blob_len]).unwrap();
    let keys: Vec<String> = serde_json::from_str(blob).unwrap();
    assert_eq!(keys, vec!["a", "contrapositive", "∨"]);

    let ids: Vec<u32> = bytes[20 + blob_len..]
        .chunks(4)
        .map(|word| u32::from_be_bytes(word.try_into().unwrap()))
        .collect();
    assert_eq!(ids, vec![7, 15, 10]);
}

#[test]
fn encoding_ignores_insertion_order() {
    let mut forward = FormalTheory::without_cases();
    let mut backward = FormalTheory::without_cases();
    let cases = [
        ("⊤", Operator::Top),
        ("⊥", Operator::Bottom),
        ("∧", Operator::Conjunction),
        ("→", Operator::Implication),
        ("¬∧", Operator::Nand),
    ];
    for (key, operator) in cases {
        forward.insert_case(key, operator);
    }
    for (key, operator) in cases.iter().rev() {
        backward.insert_case(*key, *operator);
    }

    assert_eq!(forward.encode().unwrap(), backward.encode().unwrap());
    assert_eq!(
        FormalTheory::default().encode().unwrap(),
        FormalTheory::default().encode().unwrap()
    );
}

#[test]
fn custom_slots_survive_roundtrip() {
    let mut theory = FormalTheory::default();
    theory.symmetry = Operator::Biconditional;
    theory.transparency = Operator::Conjunction;
    theory.remove_case("a");

    let decoded = FormalTheory::decode(&theory.encode().unwrap()).unwrap();
    assert_eq!(decoded.symmetry, Operator::Biconditional);
    assert_eq!(decoded.transparency, Operator::Conjunction);
    assert_eq!(decoded.case("a"), None);
    assert_eq!(decoded, theory);
}

#[test]
fn unknown_case_id_is_fatal() {
    let mut bytes = FormalTheory::default().encode().unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 200;

    assert_eq!(
        FormalTheory::decode(&bytes).unwrap_err(),
        CodecError::Registry(RegistryError::UnknownOperatorId(200))
    );
}

#[test]
fn missing_ids_are_a_malformed_case_base() {
    let mut bytes = FormalTheory::default().encode().unwrap();
    bytes.truncate(bytes.len() - 8);

    assert_eq!(
        FormalTheory::decode(&bytes).unwrap_err(),
        CodecError::MalformedCaseBase { keys: 11, ids: 9 }
    );
}

#[test]
fn extra_ids_are_a_malformed_case_base() {
    let mut bytes = FormalTheory::without_cases().encode().unwrap();
    bytes.extend_from_slice(&9u32.to_be_bytes());

    assert_eq!(
        FormalTheory::decode(&bytes).unwrap_err(),
        CodecError::MalformedCaseBase { keys: 0, ids: 1 }
    );
}

#[test]
fn truncated_header_is_reported() {
    let bytes = FormalTheory::default().encode().unwrap();
    assert!(matches!(
        FormalTheory::decode(&bytes[..10]).unwrap_err(),
        CodecError::TruncatedBuffer { .. }
    ));
}

#[test]
fn truncated_key_blob_is_reported() {
    let bytes = FormalTheory::default().encode().unwrap();
    assert!(matches!(
        FormalTheory::decode(&bytes[..24]).unwrap_err(),
        CodecError::TruncatedBuffer { .. }
    ));
}

#[test]
fn garbage_key_blob_is_rejected() {
    let mut bytes = Vec::new();
    for id in 1u32..=4 {
        bytes.extend_from_slice(&id.to_be_bytes());
    }
    bytes.extend_from_slice(&3u32.to_be_bytes());
    bytes.extend_from_slice(b"{}x");

    assert!(matches!(
        FormalTheory::decode(&bytes).unwrap_err(),
        CodecError::InvalidKeyBlob(_)
    ));
}

#[test]
fn decoding_with_a_borrowed_registry_matches_global() {
    let registry = OperatorRegistry::builtin();
    let codec = AtomCodec::new(&registry);
    let theory = FormalTheory::default();

    let bytes = theory.encode_with(&codec).unwrap();
    assert_eq!(bytes, theory.encode().unwrap());
    assert_eq!(FormalTheory::decode_with(&codec, &bytes).unwrap(), theory);
}

#[test]
fn decoded_theory_executes_and_parses() {
    let theory = FormalTheory::decode(&FormalTheory::default().encode().unwrap()).unwrap();

    let conjunction = theory.parse_expression("∧").operator().unwrap();
    assert_eq!(
        conjunction
            .apply(&[Value::Bool(true), Value::Bool(true)])
            .unwrap(),
        Value::Bool(true)
    );
    assert!(theory.parse_expression("unknown").is_unbound());
    assert_eq!(
        theory
            .execute(&[Value::Operator(Operator::Top), Value::from(2), Value::from(2)])
            .unwrap(),
        Value::from(2)
    );
    assert!(matches!(
        theory.parse_expression("¬"),
        Expression::Operator(Operator::Negation)
    ));
}
