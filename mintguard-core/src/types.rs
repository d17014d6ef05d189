//! Typed values produced by coercion.
//!
//! These are the leaves of a compiled configuration. Each serializes to the
//! preview JSON form: keys as base58, integers as decimal strings, bytes as
//! hex, timestamps as unix seconds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer};

/// Lamports per SOL, used for display conversion only.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// A 32-byte account address, written as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty string".to_string());
        }
        let bytes = bs58::decode(s).into_vec().map_err(|e| e.to_string())?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| format!("decoded to {} bytes, expected 32", bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Arbitrary-precision unsigned integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnsignedInt(BigUint);

impl UnsignedInt {
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn to_u8(&self) -> Option<u8> {
        self.0.to_u8()
    }

    pub fn to_u16(&self) -> Option<u16> {
        self.0.to_u16()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.0.to_u32()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl From<u64> for UnsignedInt {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for UnsignedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for UnsignedInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Bytes decoded from a hex string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HexBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Serialize for HexBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

/// A point in time, second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(#[serde(with = "chrono::serde::ts_seconds")] DateTime<Utc>);

impl Timestamp {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn from_unix_seconds(secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(Self)
    }

    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// A lamport amount together with its SOL display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolAmount {
    pub lamports: UnsignedInt,
    pub sol: String,
}

impl SolAmount {
    pub fn from_lamports(lamports: UnsignedInt) -> Self {
        let per_sol = BigUint::from(LAMPORTS_PER_SOL);
        let whole = lamports.as_biguint() / &per_sol;
        // Remainder is below 10^9, so it always fits.
        let frac = (lamports.as_biguint() % &per_sol).to_u64().unwrap_or(0);
        let sol = if frac == 0 {
            whole.to_string()
        } else {
            let digits = format!("{:09}", frac);
            format!("{}.{}", whole, digits.trim_end_matches('0'))
        };
        Self { lamports, sol }
    }
}

impl fmt::Display for SolAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SOL ({} lamports)", self.sol, self.lamports)
    }
}

/// Borrowed view of one typed guard field, in catalog field order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    PublicKey(&'a PublicKey),
    Integer(&'a UnsignedInt),
    Bytes(&'a HexBytes),
    Bool(bool),
    Str(&'a str),
    PublicKeys(&'a [PublicKey]),
    Timestamp(&'a Timestamp),
    Sol(&'a SolAmount),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::PublicKey(k) => write!(f, "{}", k),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Bytes(b) => write!(f, "{}", b),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Str(s) => write!(f, "\"{}\"", s),
            FieldValue::PublicKeys(keys) => {
                let strs: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                write!(f, "[{}]", strs.join(", "))
            }
            FieldValue::Timestamp(t) => write!(f, "{} ({})", t, t.unix_seconds()),
            FieldValue::Sol(amount) => write!(f, "{}", amount),
        }
    }
}

/// Exposes a typed field as a [`FieldValue`].
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for PublicKey {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::PublicKey(self)
    }
}

impl AsFieldValue for UnsignedInt {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Integer(self)
    }
}

impl AsFieldValue for HexBytes {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bytes(self)
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl AsFieldValue for Vec<PublicKey> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::PublicKeys(self)
    }
}

impl AsFieldValue for Timestamp {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Timestamp(self)
    }
}

impl AsFieldValue for SolAmount {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Sol(self)
    }
}
