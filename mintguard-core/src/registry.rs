//! Guard field registry.
//!
//! The catalog is a static table from guard kind to its ordered field
//! descriptors and its encode function. Both halves of each entry come from
//! one declaration in [`crate::guards`], so a kind cannot have fields without
//! an encoder or the reverse.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::Coerce;
use crate::error::GuardError;
use crate::guards::{Guard, GuardKind, CATALOG};

/// Semantic type of a raw guard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticType {
    PublicKey,
    UnsignedInteger,
    ByteArrayFromHex,
    Boolean,
    String,
    PublicKeyArray,
    Timestamp,
}

impl SemanticType {
    /// Short input hint for help output.
    pub fn hint(&self) -> &'static str {
        match self {
            SemanticType::PublicKey => "BASE58",
            SemanticType::UnsignedInteger => "NUMBER",
            SemanticType::ByteArrayFromHex => "HEX",
            SemanticType::Boolean => "true|false",
            SemanticType::String => "STRING",
            SemanticType::PublicKeyArray => "BASE58,...",
            SemanticType::Timestamp => "UNIX|RFC3339",
        }
    }
}

/// On-chain encoding of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WireType {
    U8,
    U16,
    U32,
    U64,
    I64,
    Bool,
    PublicKey,
    Bytes32,
    Str,
    PublicKeyVec,
}

impl WireType {
    /// Whether values of `semantic` type can be written with this encoding.
    pub fn accepts(&self, semantic: SemanticType) -> bool {
        matches!(
            (self, semantic),
            (
                WireType::U8 | WireType::U16 | WireType::U32 | WireType::U64,
                SemanticType::UnsignedInteger
            ) | (WireType::I64, SemanticType::Timestamp)
                | (WireType::Bool, SemanticType::Boolean)
                | (WireType::PublicKey, SemanticType::PublicKey)
                | (WireType::Bytes32, SemanticType::ByteArrayFromHex)
                | (WireType::Str, SemanticType::String)
                | (WireType::PublicKeyVec, SemanticType::PublicKeyArray)
        )
    }
}

/// One input field of a guard kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardFieldSpec {
    pub name: &'static str,
    pub semantic_type: SemanticType,
    pub required: bool,
    pub wire: WireType,
}

/// A catalog entry: field list plus the encoder built from the same declaration.
#[derive(Clone, Copy)]
pub struct GuardDefinition {
    pub kind: GuardKind,
    pub fields: &'static [GuardFieldSpec],
    pub(crate) decode: fn(&RawFields<'_>) -> Result<Guard, GuardError>,
}

impl fmt::Debug for GuardDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardDefinition")
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Raw field lookup for one guard instance during decoding.
pub(crate) struct RawFields<'a> {
    kind: &'static str,
    raw: &'a Map<String, Value>,
}

impl<'a> RawFields<'a> {
    fn new(kind: &'static str, raw: &'a Map<String, Value>) -> Self {
        Self { kind, raw }
    }

    /// `null` counts as absent.
    pub(crate) fn optional<T: Coerce>(&self, field: &'static str) -> Result<Option<T>, GuardError> {
        match self.raw.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::coerce(value).map(Some).map_err(|source| GuardError::InvalidField {
                kind: self.kind.to_string(),
                field: field.to_string(),
                source,
            }),
        }
    }

    pub(crate) fn required<T: Coerce>(&self, field: &'static str) -> Result<T, GuardError> {
        self.optional(field)?.ok_or_else(|| GuardError::MissingRequiredField {
            kind: self.kind.to_string(),
            field: field.to_string(),
        })
    }
}

/// Every catalog entry, in wire order.
pub fn catalog() -> &'static [GuardDefinition] {
    CATALOG
}

pub fn definition(kind: &str) -> Result<&'static GuardDefinition, GuardError> {
    CATALOG
        .iter()
        .find(|def| def.kind.as_str() == kind)
        .ok_or_else(|| GuardError::UnknownGuardKind { kind: kind.to_string() })
}

/// Ordered field descriptors for a guard kind.
pub fn fields_for(kind: &str) -> Result<&'static [GuardFieldSpec], GuardError> {
    definition(kind).map(|def| def.fields)
}

/// Encode one guard instance from its raw fields.
///
/// Fields not declared for the kind are ignored, so documents written for a
/// newer catalog still load. Use [`unknown_fields`] to report them.
pub fn encode(kind: &str, raw: &Map<String, Value>) -> Result<Guard, GuardError> {
    let def = definition(kind)?;
    (def.decode)(&RawFields::new(def.kind.as_str(), raw))
}

/// Keys of `raw` that the kind does not declare, in input order.
pub fn unknown_fields(kind: &str, raw: &Map<String, Value>) -> Result<Vec<String>, GuardError> {
    let fields = fields_for(kind)?;
    Ok(raw
        .keys()
        .filter(|key| !fields.iter().any(|f| f.name == key.as_str()))
        .cloned()
        .collect())
}

/// Check the catalog's internal consistency.
///
/// Entries must appear in [`GuardKind`] order with unique names, every field
/// must have a wire encoding compatible with its semantic type, and field names
/// must be unique within a kind.
pub fn verify_catalog() -> Result<(), String> {
    if CATALOG.len() != GuardKind::ALL.len() {
        return Err(format!(
            "catalog has {} entries but {} guard kinds are declared",
            CATALOG.len(),
            GuardKind::ALL.len()
        ));
    }
    for (index, def) in CATALOG.iter().enumerate() {
        if def.kind.index() != index || GuardKind::ALL[index] != def.kind {
            return Err(format!("guard '{}' is out of order at {}", def.kind, index));
        }
        if GuardKind::parse(def.kind.as_str()) != Some(def.kind) {
            return Err(format!("guard '{}' does not resolve to itself", def.kind));
        }
        if def.fields.is_empty() {
            return Err(format!("guard '{}' declares no fields", def.kind));
        }
        for (i, field) in def.fields.iter().enumerate() {
            if !field.wire.accepts(field.semantic_type) {
                return Err(format!(
                    "guard '{}' field '{}': {:?} cannot be written as {:?}",
                    def.kind, field.name, field.semantic_type, field.wire
                ));
            }
            if def.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(format!("guard '{}' declares '{}' twice", def.kind, field.name));
            }
        }
    }
    Ok(())
}
