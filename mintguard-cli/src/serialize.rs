//! Candy-guard wire serialization of a compiled configuration.
//!
//! Layout, all little-endian borsh primitives:
//!
//! ```text
//! guard set := feature_mask: u64, then each enabled guard's fields in kind order
//! config    := guard set (global), group_count: u32, { label: [u8; 6], guard set }*
//! ```

use borsh::BorshSerialize;
use mintguard_core::assemble::{CompiledConfiguration, TypedGuardSet};
use mintguard_core::guards::GuardKind;
use mintguard_core::registry::{GuardFieldSpec, WireType};
use mintguard_core::types::{FieldValue, UnsignedInt};
use thiserror::Error;

/// Fixed on-chain width of a group label.
pub const MAX_LABEL_LENGTH: usize = 6;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("guard '{kind}' field '{field}': {value} does not fit in {wire:?}")]
    IntegerOutOfRange {
        kind: GuardKind,
        field: &'static str,
        value: String,
        wire: WireType,
    },

    #[error("guard '{kind}' field '{field}': expected {expected} bytes, got {actual}")]
    InvalidByteLength {
        kind: GuardKind,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("group label '{label}' is {len} bytes, max {}", MAX_LABEL_LENGTH)]
    LabelTooLong { label: String, len: usize },

    #[error("guard '{kind}' field '{field}' has no {wire:?} encoding")]
    WireMismatch {
        kind: GuardKind,
        field: &'static str,
        wire: WireType,
    },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl SerializeError {
    pub fn error_code(&self) -> u32 {
        match self {
            SerializeError::IntegerOutOfRange { .. } => 5000,
            SerializeError::InvalidByteLength { .. } => 5001,
            SerializeError::LabelTooLong { .. } => 5002,
            SerializeError::WireMismatch { .. } => 5003,
            SerializeError::Io(_) => 5004,
        }
    }
}

/// Serialize the whole configuration to guard account data.
pub fn serialize_configuration(config: &CompiledConfiguration) -> Result<Vec<u8>, SerializeError> {
    let mut out = Vec::new();
    write_guard_set(&mut out, &config.guards)?;
    (config.groups.len() as u32).serialize(&mut out)?;
    for group in &config.groups {
        write_label(&mut out, &group.label)?;
        write_guard_set(&mut out, &group.guards)?;
    }
    Ok(out)
}

pub fn write_guard_set(out: &mut Vec<u8>, set: &TypedGuardSet) -> Result<(), SerializeError> {
    set.feature_mask().serialize(out)?;
    for guard in set.iter() {
        let kind = guard.kind();
        for (spec, value) in kind.fields().iter().zip(guard.field_values()) {
            write_field(out, kind, spec, value)?;
        }
    }
    Ok(())
}

fn write_label(out: &mut Vec<u8>, label: &str) -> Result<(), SerializeError> {
    let bytes = label.as_bytes();
    if bytes.len() > MAX_LABEL_LENGTH {
        return Err(SerializeError::LabelTooLong {
            label: label.to_string(),
            len: bytes.len(),
        });
    }
    let mut padded = [0u8; MAX_LABEL_LENGTH];
    padded[..bytes.len()].copy_from_slice(bytes);
    out.extend_from_slice(&padded);
    Ok(())
}

fn write_field(
    out: &mut Vec<u8>,
    kind: GuardKind,
    spec: &GuardFieldSpec,
    value: FieldValue<'_>,
) -> Result<(), SerializeError> {
    let out_of_range = |n: &UnsignedInt| SerializeError::IntegerOutOfRange {
        kind,
        field: spec.name,
        value: n.to_string(),
        wire: spec.wire,
    };
    match (spec.wire, value) {
        (WireType::U8, FieldValue::Integer(n)) => n.to_u8().ok_or_else(|| out_of_range(n))?.serialize(out)?,
        (WireType::U16, FieldValue::Integer(n)) => n.to_u16().ok_or_else(|| out_of_range(n))?.serialize(out)?,
        (WireType::U32, FieldValue::Integer(n)) => n.to_u32().ok_or_else(|| out_of_range(n))?.serialize(out)?,
        (WireType::U64, FieldValue::Integer(n)) => n.to_u64().ok_or_else(|| out_of_range(n))?.serialize(out)?,
        (WireType::U64, FieldValue::Sol(amount)) => amount
            .lamports
            .to_u64()
            .ok_or_else(|| out_of_range(&amount.lamports))?
            .serialize(out)?,
        (WireType::I64, FieldValue::Timestamp(t)) => t.unix_seconds().serialize(out)?,
        (WireType::Bool, FieldValue::Bool(b)) => b.serialize(out)?,
        (WireType::PublicKey, FieldValue::PublicKey(key)) => out.extend_from_slice(key.as_bytes()),
        (WireType::Bytes32, FieldValue::Bytes(bytes)) => {
            let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| SerializeError::InvalidByteLength {
                kind,
                field: spec.name,
                expected: 32,
                actual: bytes.as_slice().len(),
            })?;
            out.extend_from_slice(&arr);
        }
        (WireType::Str, FieldValue::Str(s)) => s.serialize(out)?,
        (WireType::PublicKeyVec, FieldValue::PublicKeys(keys)) => {
            (keys.len() as u32).serialize(out)?;
            for key in keys {
                out.extend_from_slice(key.as_bytes());
            }
        }
        (wire, _) => {
            return Err(SerializeError::WireMismatch {
                kind,
                field: spec.name,
                wire,
            })
        }
    }
    Ok(())
}
