//! Registry document parsing — the data boundary of the core.
//!
//! A registry document is the versioned JSON payload carrying the full entry
//! set, however it was sourced (bundled file, file-per-entry concatenation,
//! API response). Both shapes are accepted:
//!
//! - **Array**: `{ "servers": [{ "id": "com.example/a", ... }] }`
//! - **Keyed object**: `{ "servers": { "com.example/a": { ... } } }`
//!
//! Parsing only establishes document structure and the ordered candidate
//! sequence; per-entry validation belongs to [`RegistryIndex::build`].
//!
//! [`RegistryIndex::build`]: super::index::RegistryIndex::build

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Document schema version written by registry tooling.
pub const REGISTRY_SCHEMA_VERSION: &str = "1.0";

/// Descriptive metadata about the registry as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Registry name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Registry description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registry maintainer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,

    /// Registry URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Last updated timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Structural problem with a registry document. Distinct from
/// [`ValidationError`](super::validation::ValidationError): these describe
/// the carrier, not any individual entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Malformed JSON. Carries the parser message so document errors stay
    /// comparable in tests, like every other error type in this crate.
    #[error("invalid registry document: {0}")]
    Json(String),

    #[error("registry document must be a JSON object")]
    NotAnObject,

    #[error("registry document field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("registry document is missing the 'servers' field")]
    MissingServers,

    #[error("'servers' must be an array of entries or an id-keyed object")]
    InvalidServers,

    #[error("server keyed as '{key}' must be a JSON object")]
    KeyedNotAnObject { key: String },

    #[error("server keyed as '{key}' declares a different id '{id}'")]
    KeyedIdMismatch { key: String, id: String },
}

/// A parsed registry document: version, metadata, and the ordered candidate
/// sequence awaiting validation.
#[derive(Debug, Clone)]
pub struct RegistryDocument {
    /// Document schema version (defaults to [`REGISTRY_SCHEMA_VERSION`]).
    pub version: String,

    /// Registry metadata.
    pub metadata: DocumentMetadata,

    /// Raw candidates in document order. For the keyed form, key order is
    /// document order (serde_json's preserve_order feature).
    servers: Vec<Value>,
}

impl RegistryDocument {
    /// Parse a registry document from JSON text.
    pub fn parse(json: &str) -> Result<Self, DocumentError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DocumentError::Json(e.to_string()))?;
        let Some(obj) = value.as_object() else {
            return Err(DocumentError::NotAnObject);
        };

        let version = match obj.get("version") {
            None => REGISTRY_SCHEMA_VERSION.to_string(),
            Some(Value::String(v)) => v.clone(),
            Some(_) => {
                return Err(DocumentError::InvalidField {
                    field: "version",
                    expected: "a string",
                })
            }
        };

        let metadata = match obj.get("metadata") {
            None => DocumentMetadata::default(),
            Some(m) => serde_json::from_value(m.clone()).map_err(|_| {
                DocumentError::InvalidField {
                    field: "metadata",
                    expected: "a metadata object",
                }
            })?,
        };

        let servers = match obj.get("servers") {
            None => return Err(DocumentError::MissingServers),
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Object(keyed)) => keyed
                .iter()
                .map(|(key, value)| reconcile_keyed(key, value))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(DocumentError::InvalidServers),
        };

        debug!(
            version = %version,
            servers = servers.len(),
            "parsed registry document"
        );

        Ok(Self {
            version,
            metadata,
            servers,
        })
    }

    /// Raw candidates in document order.
    pub fn candidates(&self) -> &[Value] {
        &self.servers
    }
}

/// Fold a keyed entry into candidate form: the key supplies a missing inner
/// `id`; a present inner `id` must agree with it.
fn reconcile_keyed(key: &str, value: &Value) -> Result<Value, DocumentError> {
    let Some(obj) = value.as_object() else {
        return Err(DocumentError::KeyedNotAnObject {
            key: key.to_string(),
        });
    };

    match obj.get("id") {
        Some(Value::String(id)) if id != key => Err(DocumentError::KeyedIdMismatch {
            key: key.to_string(),
            id: id.clone(),
        }),
        Some(_) => Ok(value.clone()),
        None => {
            // Keep id first so serialized candidates read naturally.
            let mut filled = serde_json::Map::new();
            filled.insert("id".to_string(), Value::String(key.to_string()));
            for (k, v) in obj {
                filled.insert(k.clone(), v.clone());
            }
            Ok(Value::Object(filled))
        }
    }
}
