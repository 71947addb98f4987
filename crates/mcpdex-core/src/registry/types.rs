//! Core types for the Mcpdex server registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Transport discriminant for connecting to MCP servers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Local process via stdio
    Stdio,
    /// Remote server via Streamable HTTP
    Http,
    /// Remote server via Server-Sent Events
    Sse,
}

impl TransportKind {
    /// All discriminant values, in wire order.
    pub const ALL: [TransportKind; 3] = [TransportKind::Stdio, TransportKind::Http, TransportKind::Sse];

    /// Wire value of the discriminant (`"stdio"`, `"http"`, `"sse"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Http => "http",
            TransportKind::Sse => "sse",
        }
    }

    /// Parse a wire value back into a discriminant.
    pub fn from_str_opt(value: &str) -> Option<TransportKind> {
        Self::ALL.iter().copied().find(|k| k.as_str() == value)
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution environment of a locally spawned server. Informational only:
/// consumers use it for display and for picking install instructions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Node,
    Python,
    Docker,
    Other,
}

/// Launch configuration for a server.
///
/// Exactly one variant per entry: either a locally spawned process (stdio) or
/// a network-addressable endpoint (http/sse). The variants share no fields
/// beyond the discriminant, so a config mixing `command` and `url` is
/// unrepresentable here and rejected by validation on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum LaunchConfig {
    /// Local process spawned by the installer
    Stdio {
        /// Command to execute
        command: String,

        /// Command arguments
        #[serde(default)]
        args: Vec<String>,

        /// Environment variables with default/placeholder values.
        /// Values are filled in by the installer, never by the registry.
        #[serde(default)]
        env: HashMap<String, String>,
    },

    /// Remote connection via Streamable HTTP
    Http {
        /// Server URL (absolute)
        url: String,

        /// HTTP headers
        #[serde(default)]
        headers: HashMap<String, String>,
    },

    /// Remote connection via Server-Sent Events
    Sse {
        /// Server URL (absolute)
        url: String,

        /// HTTP headers
        #[serde(default)]
        headers: HashMap<String, String>,
    },
}

impl LaunchConfig {
    /// Get the transport discriminant
    pub fn transport(&self) -> TransportKind {
        match self {
            Self::Stdio { .. } => TransportKind::Stdio,
            Self::Http { .. } => TransportKind::Http,
            Self::Sse { .. } => TransportKind::Sse,
        }
    }

    /// Whether this config spawns a local process
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Stdio { .. })
    }

    /// Whether this config connects to a remote endpoint
    pub fn is_remote(&self) -> bool {
        !self.is_local()
    }

    /// Environment defaults declared by the local variant, if any
    pub fn env(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Stdio { env, .. } => Some(env),
            Self::Http { .. } | Self::Sse { .. } => None,
        }
    }
}

/// One catalog record describing how to launch or connect to an MCP server.
///
/// Entries are authored statically and validated once when the registry is
/// assembled; an entry held by a [`RegistryIndex`](crate::registry::RegistryIndex)
/// has already passed every check and is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    /// Stable, registry-unique identifier (slug-safe, e.g. "com.example/search")
    pub id: String,

    /// Human-readable display name
    pub name: String,

    /// Short free-text description
    pub description: String,

    /// How to start or connect to the server
    pub config: LaunchConfig,

    /// Package manager reference, when one applies (e.g. an npm package name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Execution environment, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Runtime>,

    /// Source repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Homepage URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Author or vendor name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Categories for faceted lookup. Open vocabulary, conventionally reused
    /// across entries; unique within one entry.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Names of environment variables the server needs at runtime
    #[serde(default)]
    pub required_env_vars: Vec<String>,
}

impl RegistryEntry {
    /// Whether the entry carries the given category
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Case-insensitive substring match over name, description, and id.
    /// `query_lower` must already be lowercased.
    pub(crate) fn matches_query(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
            || self.id.to_lowercase().contains(query_lower)
    }

    /// Required env vars that also have a placeholder default in `config.env`.
    ///
    /// The overlap is advisory metadata: the values in `config.env` are
    /// placeholders filled in at install time, so nothing here requires them
    /// to be non-empty.
    pub fn required_env_overlap(&self) -> Vec<&str> {
        match self.config.env() {
            Some(env) => self
                .required_env_vars
                .iter()
                .filter(|name| env.contains_key(name.as_str()))
                .map(|name| name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }
}
