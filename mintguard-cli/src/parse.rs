//! Field-aware conversion of CLI strings into raw guard input.
//!
//! Flags and prompt answers arrive as text. This turns each one into the JSON
//! value a config file would hold for that field, then leaves validation to
//! the core encoder so both input paths fail the same way.

use std::collections::HashMap;

use mintguard_core::document::RawGuardInput;
use mintguard_core::guards::GuardKind;
use mintguard_core::registry::{GuardFieldSpec, SemanticType};
use serde_json::Value;

use crate::cli::camel_to_kebab;

/// Convert one text value for `field` into a raw JSON value.
///
/// Booleans become JSON booleans only for the exact words `true` and
/// `false`; anything else is passed through as a string and rejected by the
/// encoder. Integers stay strings so large amounts keep full precision.
pub fn parse_field_value(raw: &str, field: &GuardFieldSpec) -> Value {
    match field.semantic_type {
        SemanticType::Boolean => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        },
        SemanticType::PublicKeyArray => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        ),
        SemanticType::PublicKey
        | SemanticType::UnsignedInteger
        | SemanticType::ByteArrayFromHex
        | SemanticType::String
        | SemanticType::Timestamp => Value::String(raw.to_string()),
    }
}

/// Look up the field a flag refers to. Accepts `destination-ata` and
/// `destinationAta` alike.
pub fn field_for_flag(kind: GuardKind, flag: &str) -> Option<&'static GuardFieldSpec> {
    kind.fields()
        .iter()
        .find(|f| f.name == flag || camel_to_kebab(f.name) == flag)
}

/// Build raw guard input from parsed `--flag value` pairs.
///
/// Returns the flags that matched no field alongside the input so the caller
/// can report them.
pub fn raw_from_flags(kind: GuardKind, flags: &HashMap<String, String>) -> (RawGuardInput, Vec<String>) {
    let mut raw = RawGuardInput::new();
    let mut unknown = Vec::new();
    // Walk fields in declaration order so the raw map is stable.
    for field in kind.fields() {
        let value = flags
            .get(field.name)
            .or_else(|| flags.get(&camel_to_kebab(field.name)));
        if let Some(value) = value {
            raw.insert(field.name.to_string(), parse_field_value(value, field));
        }
    }
    for flag in flags.keys() {
        if field_for_flag(kind, flag).is_none() {
            unknown.push(flag.clone());
        }
    }
    unknown.sort();
    (raw, unknown)
}
