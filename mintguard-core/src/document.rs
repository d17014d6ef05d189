//! Raw guard document: the untyped input to assembly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;

/// Untyped field values for one guard instance.
pub type RawGuardInput = Map<String, Value>;

/// A guard document as read from a config file or built by the wizard.
///
/// ```json
/// {
///   "guardConfig": { "solPayment": { "lamports": 1000000, "destination": "..." } },
///   "groups": [ { "label": "early", "guards": { "mintLimit": { "id": 1, "limit": 5 } } } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardDocument {
    #[serde(
        rename = "guardConfig",
        alias = "guards",
        default,
        deserialize_with = "null_as_default"
    )]
    pub guard_config: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<RawGroup>,
}

/// A named group of raw guards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGroup {
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guards: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl GuardDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Set a global guard, replacing any previous entry for the kind.
    pub fn with_guard(mut self, kind: impl Into<String>, raw: RawGuardInput) -> Self {
        self.guard_config.insert(kind.into(), Value::Object(raw));
        self
    }

    pub fn with_group(mut self, group: RawGroup) -> Self {
        self.groups.push(group);
        self
    }
}

impl RawGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            guards: Map::new(),
        }
    }

    pub fn with_guard(mut self, kind: impl Into<String>, raw: RawGuardInput) -> Self {
        self.guards.insert(kind.into(), Value::Object(raw));
        self
    }
}
