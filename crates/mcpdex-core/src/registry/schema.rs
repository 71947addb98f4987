//! Canonical JSON Schema export for the registry entry shape.
//!
//! The exported document is what IDEs, CI, and external validators see, so it
//! has to mirror the validator exactly. Two deliberate choices keep it
//! portable for heterogeneous consumers:
//!
//! - the launch-config union is an explicit `oneOf` of mutually exclusive
//!   shapes keyed by a `transport` const, each closed with
//!   `additionalProperties: false`, so a document mixing `command` and `url`
//!   is rejected by the artifact itself;
//! - the document is fully self-contained: no `$ref`/`$defs`, the remote
//!   shape is inlined at both the `http` and `sse` branches.
//!
//! Export never depends on any particular entry. The only failure mode is an
//! internal inconsistency between this document and the validator's field
//! tables, which is a defect in this crate.

use serde_json::{json, Value};

use super::types::TransportKind;
use super::validation::{
    ENTRY_OPTIONAL_FIELDS, ENTRY_REQUIRED_FIELDS, ID_PATTERN, REMOTE_FIELDS, RUNTIME_VALUES,
    STDIO_FIELDS,
};

/// Dialect of the exported document.
pub const SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Canonical identifier of the published artifact.
pub const SCHEMA_ID: &str = "https://mcpdex.dev/schemas/registry-entry.schema.json";

/// Internal inconsistency between the exported document and the entry schema
/// definition. Surfaced only during export; never caused by data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema definition inconsistency: {0}")]
pub struct SchemaError(String);

/// Export the registry entry schema as a self-contained JSON Schema document.
///
/// Deterministic: the same definition always yields the same document (key
/// order is construction order, which is fixed).
pub fn export_schema() -> Result<Value, SchemaError> {
    let doc = build_document();
    verify_document(&doc)?;
    Ok(doc)
}

/// The published artifact form: pretty-printed JSON plus a trailing newline,
/// regenerable byte-identically.
pub fn export_schema_string() -> Result<String, SchemaError> {
    let doc = export_schema()?;
    let mut out = serde_json::to_string_pretty(&doc)
        .map_err(|e| SchemaError(format!("serialization failed: {e}")))?;
    out.push('\n');
    Ok(out)
}

fn build_document() -> Value {
    json!({
        "$schema": SCHEMA_DRAFT,
        "$id": SCHEMA_ID,
        "title": "Registry entry",
        "description": "One catalog record describing how to launch or connect to an MCP tool server.",
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "minLength": 1,
                "pattern": ID_PATTERN,
                "description": "Stable, registry-unique identifier."
            },
            "name": {
                "type": "string",
                "minLength": 1,
                "description": "Human-readable display name."
            },
            "description": {
                "type": "string",
                "minLength": 1
            },
            "config": launch_config_schema(),
            "package": {
                "type": "string",
                "description": "Package manager reference, when one applies."
            },
            "runtime": {
                "type": "string",
                "enum": RUNTIME_VALUES,
                "description": "Execution environment, informational only."
            },
            "repository": {
                "type": "string",
                "format": "uri"
            },
            "homepage": {
                "type": "string",
                "format": "uri"
            },
            "author": {
                "type": "string"
            },
            "categories": {
                "type": "array",
                "items": { "type": "string" },
                "uniqueItems": true,
                "description": "Open vocabulary, conventionally reused across entries."
            },
            "requiredEnvVars": {
                "type": "array",
                "items": { "type": "string" },
                "uniqueItems": true,
                "description": "Environment variables the server needs at runtime. Values are supplied at install time, never by the registry."
            }
        },
        "required": ENTRY_REQUIRED_FIELDS,
        "additionalProperties": false
    })
}

/// The launch-config union as an explicit alternation. One branch per
/// discriminant value; the remote shape is repeated verbatim under `http` and
/// `sse` rather than shared through a reference.
fn launch_config_schema() -> Value {
    let branches: Vec<Value> = TransportKind::ALL
        .iter()
        .map(|kind| match kind {
            TransportKind::Stdio => stdio_schema(),
            TransportKind::Http | TransportKind::Sse => remote_schema(*kind),
        })
        .collect();

    json!({
        "description": "How to launch or connect to the server. Exactly one variant, keyed by 'transport'.",
        "oneOf": branches
    })
}

fn stdio_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "transport": { "const": "stdio" },
            "command": {
                "type": "string",
                "minLength": 1,
                "description": "Command the installer spawns."
            },
            "args": {
                "type": "array",
                "items": { "type": "string" }
            },
            "env": {
                "type": "object",
                "additionalProperties": { "type": "string" },
                "description": "Environment defaults; values are placeholders filled at install time."
            }
        },
        "required": ["transport", "command"],
        "additionalProperties": false
    })
}

fn remote_schema(kind: TransportKind) -> Value {
    json!({
        "type": "object",
        "properties": {
            "transport": { "const": kind.as_str() },
            "url": {
                "type": "string",
                "format": "uri",
                "description": "Absolute URL of the server endpoint."
            },
            "headers": {
                "type": "object",
                "additionalProperties": { "type": "string" }
            }
        },
        "required": ["transport", "url"],
        "additionalProperties": false
    })
}

/// Cross-check the built document against the validator's field tables.
/// Any mismatch here means the exporter and the validator drifted apart.
fn verify_document(doc: &Value) -> Result<(), SchemaError> {
    let properties = doc
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError("document has no properties object".into()))?;

    for field in ENTRY_REQUIRED_FIELDS.iter().chain(ENTRY_OPTIONAL_FIELDS.iter()) {
        if !properties.contains_key(*field) {
            return Err(SchemaError(format!("entry field '{field}' is not described")));
        }
    }
    if properties.len() != ENTRY_REQUIRED_FIELDS.len() + ENTRY_OPTIONAL_FIELDS.len() {
        return Err(SchemaError("document describes fields outside the entry schema".into()));
    }
    if doc.get("required") != Some(&json!(ENTRY_REQUIRED_FIELDS)) {
        return Err(SchemaError("required list does not match the entry schema".into()));
    }
    if doc.get("additionalProperties") != Some(&Value::Bool(false)) {
        return Err(SchemaError("entry shape is not closed".into()));
    }

    let branches = properties
        .get("config")
        .and_then(|c| c.get("oneOf"))
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError("config is not an explicit alternation".into()))?;

    if branches.len() != TransportKind::ALL.len() {
        return Err(SchemaError(format!(
            "expected {} config branches, found {}",
            TransportKind::ALL.len(),
            branches.len()
        )));
    }

    for (kind, branch) in TransportKind::ALL.iter().zip(branches) {
        verify_branch(*kind, branch)?;
    }

    Ok(())
}

fn verify_branch(kind: TransportKind, branch: &Value) -> Result<(), SchemaError> {
    let discriminant = branch
        .get("properties")
        .and_then(|p| p.get("transport"))
        .and_then(|t| t.get("const"))
        .and_then(Value::as_str);
    if discriminant != Some(kind.as_str()) {
        return Err(SchemaError(format!(
            "branch for transport '{kind}' does not pin its discriminant"
        )));
    }

    let allowed: &[&str] = match kind {
        TransportKind::Stdio => &STDIO_FIELDS,
        TransportKind::Http | TransportKind::Sse => &REMOTE_FIELDS,
    };
    let branch_fields = branch
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError(format!("branch for '{kind}' has no properties")))?;
    if branch_fields.len() != allowed.len() || !allowed.iter().all(|f| branch_fields.contains_key(*f)) {
        return Err(SchemaError(format!(
            "branch for '{kind}' does not match the validator's field table"
        )));
    }

    let required = branch.get("required").and_then(Value::as_array);
    let expects_required = match kind {
        TransportKind::Stdio => json!(["transport", "command"]),
        TransportKind::Http | TransportKind::Sse => json!(["transport", "url"]),
    };
    if required != expects_required.as_array() {
        return Err(SchemaError(format!(
            "branch for '{kind}' has the wrong required list"
        )));
    }

    if branch.get("additionalProperties") != Some(&Value::Bool(false)) {
        return Err(SchemaError(format!("branch for '{kind}' is not closed")));
    }

    // Self-contained: consumers with no reference resolution must still be
    // able to use the artifact.
    if branch.to_string().contains("$ref") {
        return Err(SchemaError(format!("branch for '{kind}' uses a reference")));
    }

    Ok(())
}
