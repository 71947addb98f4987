//! Structural validation of raw entry candidates.
//!
//! Candidates arrive as untyped JSON. The validator walks the raw value
//! instead of leaning on serde directly so that it can collect every
//! violation in one pass, reject unknown fields (closed schema), and name
//! discriminant violations precisely. Only a candidate that survives the walk
//! is handed to serde for the final typed decode.

use serde_json::{Map, Value};
use std::collections::HashSet;
use url::Url;

use super::types::{RegistryEntry, TransportKind};

/// Fields every entry must carry.
pub const ENTRY_REQUIRED_FIELDS: [&str; 4] = ["id", "name", "description", "config"];

/// Optional entry fields. Anything outside required + optional is rejected.
pub const ENTRY_OPTIONAL_FIELDS: [&str; 7] = [
    "package",
    "runtime",
    "repository",
    "homepage",
    "author",
    "categories",
    "requiredEnvVars",
];

/// Config fields allowed for the stdio variant.
pub const STDIO_FIELDS: [&str; 4] = ["transport", "command", "args", "env"];

/// Config fields allowed for the http/sse variants.
pub const REMOTE_FIELDS: [&str; 3] = ["transport", "url", "headers"];

/// Wire values of the `runtime` enum.
pub const RUNTIME_VALUES: [&str; 4] = ["node", "python", "docker", "other"];

/// Characters permitted in an entry id, as a JSON Schema pattern. The
/// validator enforces the same set via [`is_slug_safe`].
pub const ID_PATTERN: &str = "^[A-Za-z0-9._/-]+$";

/// A single rule violation found while validating a candidate or assembling
/// the registry. `entry` is the candidate's id when it has one, otherwise its
/// zero-based position rendered as `#<n>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Candidate is not a JSON object at all.
    #[error("entry {entry}: candidate must be a JSON object")]
    NotAnObject { entry: String },

    /// A required field is absent.
    #[error("entry {entry}: missing required field '{field}'")]
    MissingField { entry: String, field: String },

    /// A field holds the wrong JSON kind.
    #[error("entry {entry}: field '{field}' must be {expected}")]
    InvalidType {
        entry: String,
        field: String,
        expected: &'static str,
    },

    /// A required string field is empty.
    #[error("entry {entry}: field '{field}' must not be empty")]
    EmptyField { entry: String, field: String },

    /// The entry carries a field outside the closed schema.
    #[error("entry {entry}: unknown field '{field}'")]
    UnknownField { entry: String, field: String },

    /// A field value fails a lexical rule (slug safety, enum membership,
    /// absolute-URL syntax).
    #[error("entry {entry}: field '{field}' {reason}: '{value}'")]
    InvalidValue {
        entry: String,
        field: String,
        value: String,
        reason: &'static str,
    },

    /// The config mixes fields across launch variants.
    #[error("entry {entry}: field '{field}' is not allowed for transport '{transport}'")]
    DisallowedField {
        entry: String,
        field: String,
        transport: TransportKind,
    },

    /// The config declares a transport outside the known discriminants.
    #[error("entry {entry}: unknown transport '{value}'")]
    UnknownTransport { entry: String, value: String },

    /// A value repeats inside a field declared unique (categories,
    /// requiredEnvVars).
    #[error("entry {entry}: duplicate value '{value}' in '{field}'")]
    DuplicateValue {
        entry: String,
        field: String,
        value: String,
    },

    /// Two candidates in the same batch share an id.
    #[error("duplicate id '{id}' (entries {first} and {second})")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    /// Catch-all for a typed decode failure after a clean structural walk.
    /// Reaching this is a defect in the walk itself.
    #[error("entry {entry}: {message}")]
    Shape { entry: String, message: String },
}

/// Validate one raw candidate against the entry schema.
///
/// Pure and total: never panics on malformed input, and returns the complete
/// list of violations rather than the first one, so a caller can report every
/// problem in a single pass.
pub fn validate(candidate: &Value) -> Result<RegistryEntry, Vec<ValidationError>> {
    validate_at(candidate, 0)
}

/// Validate a candidate at a known batch position (used for the error label
/// when the candidate has no usable id).
pub(crate) fn validate_at(
    candidate: &Value,
    position: usize,
) -> Result<RegistryEntry, Vec<ValidationError>> {
    let label = entry_label(candidate, position);

    let Some(obj) = candidate.as_object() else {
        return Err(vec![ValidationError::NotAnObject { entry: label }]);
    };

    let mut errors = Vec::new();

    for key in obj.keys() {
        if !ENTRY_REQUIRED_FIELDS.contains(&key.as_str())
            && !ENTRY_OPTIONAL_FIELDS.contains(&key.as_str())
        {
            errors.push(ValidationError::UnknownField {
                entry: label.clone(),
                field: key.clone(),
            });
        }
    }

    if let Some(id) = require_string(obj, "id", &label, &mut errors) {
        if !id.is_empty() && !is_slug_safe(id) {
            errors.push(ValidationError::InvalidValue {
                entry: label.clone(),
                field: "id".into(),
                value: id.to_string(),
                reason: "must be URL/slug-safe",
            });
        }
    }
    require_string(obj, "name", &label, &mut errors);
    require_string(obj, "description", &label, &mut errors);

    match obj.get("config") {
        Some(Value::Object(config)) => validate_config(config, &label, &mut errors),
        Some(_) => errors.push(ValidationError::InvalidType {
            entry: label.clone(),
            field: "config".into(),
            expected: "an object",
        }),
        None => errors.push(ValidationError::MissingField {
            entry: label.clone(),
            field: "config".into(),
        }),
    }

    optional_string(obj, "package", &label, &mut errors);
    optional_string(obj, "author", &label, &mut errors);

    if let Some(runtime) = optional_string(obj, "runtime", &label, &mut errors) {
        if !RUNTIME_VALUES.contains(&runtime) {
            errors.push(ValidationError::InvalidValue {
                entry: label.clone(),
                field: "runtime".into(),
                value: runtime.to_string(),
                reason: "must be one of node, python, docker, other",
            });
        }
    }

    for field in ["repository", "homepage"] {
        if let Some(value) = optional_string(obj, field, &label, &mut errors) {
            check_absolute_url(value, field, &label, &mut errors);
        }
    }

    validate_string_set(obj, "categories", &label, &mut errors);
    validate_string_set(obj, "requiredEnvVars", &label, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    // The walk above covers every field and kind, so the typed decode cannot
    // fail for well-formed input; a failure here is a bug in the walk.
    match serde_json::from_value::<RegistryEntry>(candidate.clone()) {
        Ok(entry) => Ok(entry),
        Err(e) => Err(vec![ValidationError::Shape {
            entry: label,
            message: e.to_string(),
        }]),
    }
}

/// Validate the launch config object, enforcing the discriminant rule:
/// stdio carries command/args/env, http/sse carry url/headers, and fields
/// from the other variant are violations in their own right.
fn validate_config(config: &Map<String, Value>, label: &str, errors: &mut Vec<ValidationError>) {
    let transport = match config.get("transport") {
        Some(Value::String(s)) => match TransportKind::from_str_opt(s) {
            Some(kind) => kind,
            None => {
                errors.push(ValidationError::UnknownTransport {
                    entry: label.to_string(),
                    value: s.clone(),
                });
                return;
            }
        },
        Some(_) => {
            errors.push(ValidationError::InvalidType {
                entry: label.to_string(),
                field: "config.transport".into(),
                expected: "a string",
            });
            return;
        }
        None => {
            errors.push(ValidationError::MissingField {
                entry: label.to_string(),
                field: "config.transport".into(),
            });
            return;
        }
    };

    let (allowed, disallowed): (&[&str], &[&str]) = match transport {
        TransportKind::Stdio => (&STDIO_FIELDS[..], &REMOTE_FIELDS[1..]),
        TransportKind::Http | TransportKind::Sse => (&REMOTE_FIELDS[..], &STDIO_FIELDS[1..]),
    };

    for key in config.keys() {
        if disallowed.contains(&key.as_str()) {
            errors.push(ValidationError::DisallowedField {
                entry: label.to_string(),
                field: format!("config.{key}"),
                transport,
            });
        } else if !allowed.contains(&key.as_str()) {
            errors.push(ValidationError::UnknownField {
                entry: label.to_string(),
                field: format!("config.{key}"),
            });
        }
    }

    match transport {
        TransportKind::Stdio => {
            require_string_in(config, "command", "config.command", label, errors);
            if let Some(args) = config.get("args") {
                check_string_array(args, "config.args", label, errors);
            }
            if let Some(env) = config.get("env") {
                check_string_map(env, "config.env", label, errors);
            }
        }
        TransportKind::Http | TransportKind::Sse => {
            if let Some(url) = require_string_in(config, "url", "config.url", label, errors) {
                check_absolute_url(url, "config.url", label, errors);
            }
            if let Some(headers) = config.get("headers") {
                check_string_map(headers, "config.headers", label, errors);
            }
        }
    }
}

fn entry_label(candidate: &Value, position: usize) -> String {
    match candidate.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("#{position}"),
    }
}

fn is_slug_safe(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/'))
}

/// Look up a required, non-empty string field on the entry itself.
fn require_string<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    require_string_in(obj, field, field, label, errors)
}

/// Look up a required, non-empty string under a reported field path.
fn require_string_in<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    match obj.get(key) {
        Some(Value::String(s)) => {
            if s.is_empty() {
                errors.push(ValidationError::EmptyField {
                    entry: label.to_string(),
                    field: path.to_string(),
                });
            }
            Some(s.as_str())
        }
        Some(_) => {
            errors.push(ValidationError::InvalidType {
                entry: label.to_string(),
                field: path.to_string(),
                expected: "a string",
            });
            None
        }
        None => {
            errors.push(ValidationError::MissingField {
                entry: label.to_string(),
                field: path.to_string(),
            });
            None
        }
    }
}

/// Look up an optional string field; absence is fine, a non-string is not.
fn optional_string<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    match obj.get(field) {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            errors.push(ValidationError::InvalidType {
                entry: label.to_string(),
                field: field.to_string(),
                expected: "a string",
            });
            None
        }
        None => None,
    }
}

fn check_absolute_url(value: &str, field: &str, label: &str, errors: &mut Vec<ValidationError>) {
    // Url::parse without a base accepts absolute URLs only.
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidValue {
            entry: label.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be an absolute URL",
        });
    }
}

fn check_string_array(value: &Value, field: &str, label: &str, errors: &mut Vec<ValidationError>) {
    match value.as_array() {
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errors.push(ValidationError::InvalidType {
                        entry: label.to_string(),
                        field: format!("{field}[{i}]"),
                        expected: "a string",
                    });
                }
            }
        }
        None => errors.push(ValidationError::InvalidType {
            entry: label.to_string(),
            field: field.to_string(),
            expected: "an array of strings",
        }),
    }
}

fn check_string_map(value: &Value, field: &str, label: &str, errors: &mut Vec<ValidationError>) {
    match value.as_object() {
        Some(map) => {
            for (key, item) in map {
                if !item.is_string() {
                    errors.push(ValidationError::InvalidType {
                        entry: label.to_string(),
                        field: format!("{field}.{key}"),
                        expected: "a string",
                    });
                }
            }
        }
        None => errors.push(ValidationError::InvalidType {
            entry: label.to_string(),
            field: field.to_string(),
            expected: "an object with string values",
        }),
    }
}

/// Validate an array-of-unique-strings field (categories, requiredEnvVars).
fn validate_string_set(
    obj: &Map<String, Value>,
    field: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) {
    let Some(value) = obj.get(field) else {
        return;
    };
    check_string_array(value, field, label, errors);
    if let Some(items) = value.as_array() {
        let mut seen = HashSet::new();
        for item in items.iter().filter_map(Value::as_str) {
            if !seen.insert(item) {
                errors.push(ValidationError::DuplicateValue {
                    entry: label.to_string(),
                    field: field.to_string(),
                    value: item.to_string(),
                });
            }
        }
    }
}
