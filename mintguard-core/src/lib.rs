//! # mintguard core
//!
//! Compiles loosely-typed guard documents into typed candy-guard
//! configurations. No I/O happens here: callers hand in a parsed document and
//! get back a [`CompiledConfiguration`](assemble::CompiledConfiguration).

pub mod error;
pub mod types;
pub mod coerce;
pub mod registry;
pub mod guards;
pub mod document;
pub mod assemble;

pub use assemble::assemble;
pub use registry::{encode, fields_for};

pub mod prelude {
    pub use crate::assemble::{assemble, CompiledConfiguration, GuardGroup, TypedGuardSet};
    pub use crate::document::{GuardDocument, RawGroup, RawGuardInput};
    pub use crate::error::{AssembleError, CoercionError, DocumentError, GuardError, GuardScope};
    pub use crate::guards::{Guard, GuardKind};
    pub use crate::registry::{encode, fields_for, GuardFieldSpec, SemanticType, WireType};
    pub use crate::types::{FieldValue, HexBytes, PublicKey, SolAmount, Timestamp, UnsignedInt};
}
