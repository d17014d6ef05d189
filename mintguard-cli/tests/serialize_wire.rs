//! Guard account data layout.

mod common;

use common::{compile, sample_value, MERKLE_ROOT, SYSTEM_PROGRAM, TOKEN_PROGRAM};
use mintguard_cli::serialize::{serialize_configuration, SerializeError};
use mintguard_core::guards::GuardKind;
use mintguard_core::registry::{catalog, WireType};
use serde_json::{json, Map, Value};

#[test]
fn test_empty_configuration() {
    let bytes = serialize_configuration(&compile(json!({}))).unwrap();
    assert_eq!(bytes, vec![0u8; 12]);
}

#[test]
fn test_global_sol_payment_layout() {
    let config = compile(json!({
        "guardConfig": {
            "solPayment": { "lamports": 1_000_000, "destination": SYSTEM_PROGRAM }
        }
    }));
    let bytes = serialize_configuration(&config).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&(1u64 << GuardKind::SolPayment.index()).to_le_bytes());
    expected.extend_from_slice(&1_000_000u64.to_le_bytes());
    expected.extend_from_slice(&[0u8; 32]);
    expected.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_group_mint_limit_layout() {
    let config = compile(json!({
        "groups": [{ "label": "g1", "guards": { "mintLimit": { "id": 1, "limit": 5 } } }]
    }));
    let bytes = serialize_configuration(&config).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&0u64.to_le_bytes());
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(b"g1\0\0\0\0");
    expected.extend_from_slice(&(1u64 << GuardKind::MintLimit.index()).to_le_bytes());
    expected.push(1);
    expected.extend_from_slice(&5u16.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_fields_follow_kind_order_not_document_order() {
    let config = compile(json!({
        "guardConfig": {
            "startDate": { "date": 1_700_000_000 },
            "botTax": { "lamports": 7, "lastInstruction": false }
        }
    }));
    let bytes = serialize_configuration(&config).unwrap();

    let mask = (1u64 << GuardKind::BotTax.index()) | (1u64 << GuardKind::StartDate.index());
    let mut expected = Vec::new();
    expected.extend_from_slice(&mask.to_le_bytes());
    expected.extend_from_slice(&7u64.to_le_bytes());
    expected.push(0);
    expected.extend_from_slice(&1_700_000_000i64.to_le_bytes());
    expected.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_mask_bits_match_on_chain_guard_set() {
    let config = compile(json!({
        "guardConfig": {
            "solPayment": { "lamports": 1, "destination": SYSTEM_PROGRAM },
            "botTax": { "lamports": 1 }
        },
        "groups": [{ "label": "ml", "guards": { "mintLimit": { "id": 1, "limit": 1 } } }]
    }));
    assert_eq!(config.guards.feature_mask(), 0x3);
    assert_eq!(config.groups[0].guards.feature_mask(), 0x200);

    let bytes = serialize_configuration(&config).unwrap();
    assert_eq!(u64::from_le_bytes(bytes[..8].try_into().unwrap()), 0x3);
    // botTax fields come before solPayment fields.
    assert_eq!(u64::from_le_bytes(bytes[8..16].try_into().unwrap()), 1);
    assert_eq!(bytes[16], 1);
    assert_eq!(u64::from_le_bytes(bytes[17..25].try_into().unwrap()), 1);
    assert_eq!(&bytes[25..57], &[0u8; 32]);

    let vanity = compile(json!({ "guardConfig": { "vanityMint": { "regex": "^a" } } }));
    assert_eq!(vanity.guards.feature_mask(), 1u64 << 30);
}

#[test]
fn test_integer_wider_than_field() {
    let config = compile(json!({
        "guardConfig": { "mintLimit": { "id": 300, "limit": 5 } }
    }));
    match serialize_configuration(&config).unwrap_err() {
        SerializeError::IntegerOutOfRange { kind, field, value, wire } => {
            assert_eq!(kind, GuardKind::MintLimit);
            assert_eq!(field, "id");
            assert_eq!(value, "300");
            assert_eq!(wire, WireType::U8);
        }
        other => panic!("Expected IntegerOutOfRange, got {:?}", other),
    }

    let config = compile(json!({
        "guardConfig": {
            "solPayment": { "lamports": "18446744073709551616", "destination": TOKEN_PROGRAM }
        }
    }));
    assert!(matches!(
        serialize_configuration(&config),
        Err(SerializeError::IntegerOutOfRange { wire: WireType::U64, .. })
    ));
}

#[test]
fn test_label_longer_than_six_bytes() {
    let config = compile(json!({ "groups": [{ "label": "public1" }] }));
    let err = serialize_configuration(&config).unwrap_err();
    assert_eq!(err.error_code(), 5002);
    match err {
        SerializeError::LabelTooLong { label, len } => {
            assert_eq!(label, "public1");
            assert_eq!(len, 7);
        }
        other => panic!("Expected LabelTooLong, got {:?}", other),
    }

    let config = compile(json!({ "groups": [{ "label": "public" }] }));
    assert!(serialize_configuration(&config).is_ok());
}

#[test]
fn test_merkle_root_must_be_32_bytes() {
    let config = compile(json!({ "guardConfig": { "allowList": { "merkleRoot": "0xabcd" } } }));
    match serialize_configuration(&config).unwrap_err() {
        SerializeError::InvalidByteLength { field, expected, actual, .. } => {
            assert_eq!(field, "merkleRoot");
            assert_eq!(expected, 32);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected InvalidByteLength, got {:?}", other),
    }

    let config = compile(json!({ "guardConfig": { "allowList": { "merkleRoot": MERKLE_ROOT } } }));
    assert!(serialize_configuration(&config).is_ok());
}

#[test]
fn test_every_kind_serializes() {
    let mut guards = Map::new();
    for def in catalog() {
        let fields: Map<String, Value> = def
            .fields
            .iter()
            .map(|f| (f.name.to_string(), sample_value(f.semantic_type)))
            .collect();
        guards.insert(def.kind.as_str().to_string(), Value::Object(fields));
    }
    let config = compile(json!({ "guardConfig": guards }));
    assert_eq!(config.guards.len(), catalog().len());

    let bytes = serialize_configuration(&config).unwrap();
    let mask = u64::from_le_bytes(bytes[..8].try_into().unwrap());
    assert_eq!(mask.count_ones() as usize, catalog().len());
}
