//! Structured error types for guard configuration.
//!
//! Every failure in the core is a classified value: coercion errors describe
//! what was wrong with a single raw value, guard errors add the guard kind and
//! field, and assembly errors add where in the document the guard lived.

use std::fmt;

use thiserror::Error;

/// Failure converting one raw JSON value into its semantic type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("invalid public key '{value}': {reason}")]
    InvalidPublicKey { value: String, reason: String },

    #[error("invalid unsigned integer '{value}'")]
    InvalidInteger { value: String },

    #[error("invalid hex '{value}': {reason}")]
    InvalidHex { value: String, reason: String },

    #[error("expected a boolean, got {value}")]
    InvalidBoolean { value: String },

    #[error("invalid public key at index {index}: '{value}'")]
    InvalidPublicKeyArrayElement { index: usize, value: String },

    #[error("expected a string, got {value}")]
    InvalidString { value: String },

    #[error("invalid timestamp '{value}': expected unix seconds or RFC 3339")]
    InvalidTimestamp { value: String },
}

/// Failure encoding a single guard instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("unknown guard kind '{kind}'")]
    UnknownGuardKind { kind: String },

    #[error("guard '{kind}' is missing required field '{field}'")]
    MissingRequiredField { kind: String, field: String },

    #[error("guard '{kind}' field '{field}': {source}")]
    InvalidField {
        kind: String,
        field: String,
        #[source]
        source: CoercionError,
    },

    /// A truthy value that is not an object, e.g. `"solPayment": true`.
    #[error("guard '{kind}' must be an object of fields, got {value}")]
    NotAnObject { kind: String, value: String },
}

/// Where in a document a guard was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardScope {
    Global,
    Group { label: String },
}

impl fmt::Display for GuardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardScope::Global => write!(f, "global guards"),
            GuardScope::Group { label } => write!(f, "group '{}'", label),
        }
    }
}

/// Failure assembling a whole document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error("{scope}: {error}")]
    Guard {
        scope: GuardScope,
        #[source]
        error: GuardError,
    },

    #[error("group label '{label}' is used more than once")]
    DuplicateGroupLabel { label: String },

    #[error("group at position {index} has an empty label")]
    EmptyGroupLabel { index: usize },
}

/// Failure reading a raw guard document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed guard document: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoercionError {
    /// Numeric code for client-side handling.
    pub fn error_code(&self) -> u32 {
        match self {
            CoercionError::InvalidPublicKey { .. } => 2000,
            CoercionError::InvalidInteger { .. } => 2001,
            CoercionError::InvalidHex { .. } => 2002,
            CoercionError::InvalidBoolean { .. } => 2003,
            CoercionError::InvalidPublicKeyArrayElement { .. } => 2004,
            CoercionError::InvalidString { .. } => 2005,
            CoercionError::InvalidTimestamp { .. } => 2006,
        }
    }
}

impl GuardError {
    /// Numeric code for client-side handling. Field errors report the code of
    /// the underlying coercion failure.
    pub fn error_code(&self) -> u32 {
        match self {
            GuardError::UnknownGuardKind { .. } => 1000,
            GuardError::MissingRequiredField { .. } => 1001,
            GuardError::NotAnObject { .. } => 1002,
            GuardError::InvalidField { source, .. } => source.error_code(),
        }
    }

    /// The guard kind this error is about.
    pub fn kind(&self) -> &str {
        match self {
            GuardError::UnknownGuardKind { kind }
            | GuardError::MissingRequiredField { kind, .. }
            | GuardError::InvalidField { kind, .. }
            | GuardError::NotAnObject { kind, .. } => kind,
        }
    }

    /// The offending field, when the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            GuardError::MissingRequiredField { field, .. }
            | GuardError::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl AssembleError {
    pub fn error_code(&self) -> u32 {
        match self {
            AssembleError::Guard { error, .. } => error.error_code(),
            AssembleError::DuplicateGroupLabel { .. } => 3000,
            AssembleError::EmptyGroupLabel { .. } => 3001,
        }
    }
}

impl DocumentError {
    pub fn error_code(&self) -> u32 {
        match self {
            DocumentError::Json(_) => 4000,
        }
    }
}
