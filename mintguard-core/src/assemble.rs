//! Configuration assembly: raw document in, typed guard tree out.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::GuardDocument;
use crate::error::{AssembleError, GuardError, GuardScope};
use crate::guards::{Guard, GuardKind};
use crate::registry;

/// Configured guards of one set, keyed and iterated in wire order.
/// A kind with no entry is not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypedGuardSet(BTreeMap<GuardKind, Guard>);

impl TypedGuardSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guard, returning the one it replaced.
    pub fn insert(&mut self, guard: Guard) -> Option<Guard> {
        self.0.insert(guard.kind(), guard)
    }

    pub fn get(&self, kind: GuardKind) -> Option<&Guard> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: GuardKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Guard> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature mask with one bit per configured kind.
    pub fn feature_mask(&self) -> u64 {
        self.0.keys().fold(0u64, |mask, kind| mask | (1u64 << kind.index()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardGroup {
    pub label: String,
    pub guards: TypedGuardSet,
}

/// The compiled guard tree handed to the transaction builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledConfiguration {
    pub guards: TypedGuardSet,
    pub groups: Vec<GuardGroup>,
}

impl CompiledConfiguration {
    pub fn group(&self, label: &str) -> Option<&GuardGroup> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// `null`, `false`, `0` and `""` declare a guard as disabled.
fn is_disabled(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Encode every entry of a raw guard map.
///
/// Kind names are checked even for disabled entries, so a misspelled kind
/// never passes silently.
pub fn assemble_guard_set(raw: &Map<String, Value>) -> Result<TypedGuardSet, GuardError> {
    let mut set = TypedGuardSet::new();
    for (kind, value) in raw {
        registry::definition(kind)?;
        if is_disabled(value) {
            debug!(kind = %kind, "guard disabled");
            continue;
        }
        let fields = value.as_object().ok_or_else(|| GuardError::NotAnObject {
            kind: kind.clone(),
            value: value.to_string(),
        })?;
        let guard = registry::encode(kind, fields)?;
        debug!(kind = %kind, "guard encoded");
        set.insert(guard);
    }
    Ok(set)
}

/// Compile a raw document into a typed configuration.
///
/// Pure: the same document always yields the same configuration. Any guard
/// failure aborts the whole assembly. Group labels must be non-empty and
/// unique; group order is kept.
pub fn assemble(document: &GuardDocument) -> Result<CompiledConfiguration, AssembleError> {
    let guards = assemble_guard_set(&document.guard_config).map_err(|error| AssembleError::Guard {
        scope: GuardScope::Global,
        error,
    })?;

    let mut labels = HashSet::new();
    let mut groups = Vec::with_capacity(document.groups.len());
    for (index, group) in document.groups.iter().enumerate() {
        if group.label.is_empty() {
            return Err(AssembleError::EmptyGroupLabel { index });
        }
        if !labels.insert(group.label.as_str()) {
            return Err(AssembleError::DuplicateGroupLabel {
                label: group.label.clone(),
            });
        }
        let set = assemble_guard_set(&group.guards).map_err(|error| AssembleError::Guard {
            scope: GuardScope::Group {
                label: group.label.clone(),
            },
            error,
        })?;
        groups.push(GuardGroup {
            label: group.label.clone(),
            guards: set,
        });
    }

    debug!(
        global = guards.len(),
        groups = groups.len(),
        "assembled guard configuration"
    );
    Ok(CompiledConfiguration { guards, groups })
}
