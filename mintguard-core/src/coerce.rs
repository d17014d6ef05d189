//! Conversion of raw JSON scalars into semantic guard types.
//!
//! Every function here is pure and total over its documented failures: bad
//! input comes back as a [`CoercionError`], never a panic.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde_json::Value;

use crate::error::CoercionError;
use crate::registry::SemanticType;
use crate::types::{HexBytes, PublicKey, SolAmount, Timestamp, UnsignedInt};

/// Largest integer a JSON float carries without losing precision.
const MAX_SAFE_FLOAT_INT: f64 = 9_007_199_254_740_991.0;

/// Render a raw value for an error message.
fn repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn to_public_key(value: &Value) -> Result<PublicKey, CoercionError> {
    let s = value.as_str().ok_or_else(|| CoercionError::InvalidPublicKey {
        value: repr(value),
        reason: "expected a base58 string".to_string(),
    })?;
    PublicKey::from_str(s).map_err(|reason| CoercionError::InvalidPublicKey {
        value: s.to_string(),
        reason,
    })
}

/// Accepts JSON integers and decimal digit strings. Large values should be
/// passed as strings; floats are accepted only when integral and exact.
pub fn to_unsigned_big_int(value: &Value) -> Result<UnsignedInt, CoercionError> {
    let invalid = || CoercionError::InvalidInteger { value: repr(value) };
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(UnsignedInt::from(v));
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= MAX_SAFE_FLOAT_INT => {
                    Ok(UnsignedInt::from(f as u64))
                }
                _ => Err(invalid()),
            }
        }
        Value::String(s) => {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            BigUint::parse_bytes(s.as_bytes(), 10)
                .map(UnsignedInt::new)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

pub fn to_byte_array_from_hex(value: &Value) -> Result<HexBytes, CoercionError> {
    let s = value.as_str().ok_or_else(|| CoercionError::InvalidHex {
        value: repr(value),
        reason: "expected a hex string".to_string(),
    })?;
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits)
        .map(HexBytes::new)
        .map_err(|e| CoercionError::InvalidHex {
            value: s.to_string(),
            reason: e.to_string(),
        })
}

/// Native booleans only; `"true"` is rejected.
pub fn to_boolean(value: &Value) -> Result<bool, CoercionError> {
    value.as_bool().ok_or_else(|| CoercionError::InvalidBoolean { value: repr(value) })
}

pub fn to_string_value(value: &Value) -> Result<String, CoercionError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CoercionError::InvalidString { value: repr(value) })
}

/// Accepts a JSON array of keys or a comma-separated string.
pub fn to_public_key_array(value: &Value) -> Result<Vec<PublicKey>, CoercionError> {
    let elements: Vec<Value> = match value {
        Value::Array(items) => items.clone(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => s
            .split(',')
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
        other => {
            return Err(CoercionError::InvalidPublicKey {
                value: repr(other),
                reason: "expected an array or comma-separated string of base58 keys".to_string(),
            })
        }
    };
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            to_public_key(element).map_err(|_| CoercionError::InvalidPublicKeyArrayElement {
                index,
                value: repr(element),
            })
        })
        .collect()
}

/// Unix seconds (number or digit string) or an RFC 3339 date.
///
/// Instants before the unix epoch are rejected in every form, so `"-5"` and
/// `1969-12-31T23:59:59Z` both fail.
pub fn to_timestamp(value: &Value) -> Result<Timestamp, CoercionError> {
    let invalid = || CoercionError::InvalidTimestamp { value: repr(value) };
    let timestamp = match value {
        Value::Number(n) => n.as_i64().and_then(Timestamp::from_unix_seconds),
        Value::String(s) => match s.parse::<i64>() {
            Ok(secs) => Timestamp::from_unix_seconds(secs),
            Err(_) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| Timestamp::new(dt.with_timezone(&Utc))),
        },
        _ => None,
    };
    timestamp.filter(|t| t.unix_seconds() >= 0).ok_or_else(invalid)
}

/// Converts a raw value into a typed guard field.
pub trait Coerce: Sized {
    const SEMANTIC: SemanticType;

    fn coerce(value: &Value) -> Result<Self, CoercionError>;
}

impl Coerce for PublicKey {
    const SEMANTIC: SemanticType = SemanticType::PublicKey;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_public_key(value)
    }
}

impl Coerce for UnsignedInt {
    const SEMANTIC: SemanticType = SemanticType::UnsignedInteger;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_unsigned_big_int(value)
    }
}

impl Coerce for HexBytes {
    const SEMANTIC: SemanticType = SemanticType::ByteArrayFromHex;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_byte_array_from_hex(value)
    }
}

impl Coerce for bool {
    const SEMANTIC: SemanticType = SemanticType::Boolean;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_boolean(value)
    }
}

impl Coerce for String {
    const SEMANTIC: SemanticType = SemanticType::String;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_string_value(value)
    }
}

impl Coerce for Vec<PublicKey> {
    const SEMANTIC: SemanticType = SemanticType::PublicKeyArray;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_public_key_array(value)
    }
}

impl Coerce for Timestamp {
    const SEMANTIC: SemanticType = SemanticType::Timestamp;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_timestamp(value)
    }
}

impl Coerce for SolAmount {
    const SEMANTIC: SemanticType = SemanticType::UnsignedInteger;

    fn coerce(value: &Value) -> Result<Self, CoercionError> {
        to_unsigned_big_int(value).map(SolAmount::from_lamports)
    }
}
