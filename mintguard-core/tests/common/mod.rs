//! Shared fixtures for core tests.

#![allow(dead_code)]

use mintguard_core::registry::{GuardFieldSpec, SemanticType};
use serde_json::{json, Map, Value};

pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const MERKLE_ROOT: &str = "8f2a1c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9";

/// A valid raw value for a field of the given type.
pub fn sample_value(ty: SemanticType) -> Value {
    match ty {
        SemanticType::PublicKey => json!(TOKEN_PROGRAM),
        SemanticType::UnsignedInteger => json!(1),
        SemanticType::ByteArrayFromHex => json!(MERKLE_ROOT),
        SemanticType::Boolean => json!(true),
        SemanticType::String => json!("^mint"),
        SemanticType::PublicKeyArray => json!([SYSTEM_PROGRAM, TOKEN_PROGRAM]),
        SemanticType::Timestamp => json!(1_700_000_000),
    }
}

/// Raw input with every field of a kind filled in.
pub fn sample_input(fields: &[GuardFieldSpec]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| (f.name.to_string(), sample_value(f.semantic_type)))
        .collect()
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}
