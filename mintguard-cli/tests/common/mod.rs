//! Shared fixtures for CLI tests.

#![allow(dead_code)]

use mintguard_core::assemble::{assemble, CompiledConfiguration};
use mintguard_core::document::GuardDocument;
use mintguard_core::registry::SemanticType;
use serde_json::{json, Value};

pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const MERKLE_ROOT: &str = "8f2a1c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9";

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

pub fn compile(value: Value) -> CompiledConfiguration {
    let document = GuardDocument::from_value(value).unwrap();
    assemble(&document).unwrap()
}
