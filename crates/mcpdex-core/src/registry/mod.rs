//! MCP server registry: entry schema, validation, schema export, and the
//! queryable index.
//!
//! Entries are validated once at assembly time; the built
//! [`RegistryIndex`] is immutable and the single source of truth for the CLI
//! installer and the web directory. The published JSON Schema artifact is
//! derived from the same definition via [`export_schema`].

mod document;
mod index;
mod schema;
mod types;
mod validation;

pub use document::*;
pub use index::*;
pub use schema::*;
pub use types::*;
pub use validation::*;
