//! # Mcpdex Core Library
//!
//! Schema, validation, and lookup logic for the Mcpdex catalog of MCP tool
//! servers. The CLI installer and the web directory consume this crate; both
//! see the same validated, immutable view of the entry set.
//!
//! ## Modules
//!
//! - `registry` - entry schema, validation, JSON Schema export, and the
//!   queryable index

pub mod registry;

// Re-export commonly used types
pub use registry::{
    export_schema, export_schema_string, validate, LaunchConfig, RegistryDocument, RegistryEntry,
    RegistryIndex, Runtime, SchemaError, TransportKind, ValidationError,
};
