//! Shared fixtures for Mcpdex integration tests.

use serde_json::{json, Value};

/// Install a compact tracing subscriber for tests that want log output.
/// Safe to call from multiple tests; only the first call wins.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .try_init();
}

/// The stdio entry from the catalog's documentation examples.
pub fn stdio_entry() -> Value {
    json!({
        "id": "a",
        "name": "A",
        "description": "d",
        "config": {
            "transport": "stdio",
            "command": "npx",
            "args": ["-y", "a"],
            "env": {}
        },
        "categories": ["x"],
        "requiredEnvVars": []
    })
}

/// The http counterpart of [`stdio_entry`].
pub fn http_entry() -> Value {
    json!({
        "id": "b",
        "name": "B",
        "description": "d",
        "config": {
            "transport": "http",
            "url": "https://e.co",
            "headers": {}
        },
        "categories": [],
        "requiredEnvVars": []
    })
}

/// A fuller, realistic stdio entry with metadata and env placeholders.
pub fn github_entry() -> Value {
    json!({
        "id": "io.github.github/github-mcp-server",
        "name": "GitHub",
        "description": "Repository, issue, and pull request tools",
        "config": {
            "transport": "stdio",
            "command": "docker",
            "args": ["run", "-i", "--rm", "-e", "GITHUB_PERSONAL_ACCESS_TOKEN", "ghcr.io/github/github-mcp-server"],
            "env": {"GITHUB_PERSONAL_ACCESS_TOKEN": "${GITHUB_PERSONAL_ACCESS_TOKEN}"}
        },
        "runtime": "docker",
        "repository": "https://github.com/github/github-mcp-server",
        "author": "GitHub",
        "categories": ["developer-tools", "version-control"],
        "requiredEnvVars": ["GITHUB_PERSONAL_ACCESS_TOKEN"]
    })
}

/// An sse remote entry.
pub fn sse_entry() -> Value {
    json!({
        "id": "com.cloudflare/docs",
        "name": "Cloudflare Docs",
        "description": "Search Cloudflare documentation",
        "config": {
            "transport": "sse",
            "url": "https://docs.mcp.cloudflare.com/sse",
            "headers": {"Authorization": "Bearer ${CF_TOKEN}"}
        },
        "homepage": "https://developers.cloudflare.com",
        "categories": ["search"],
        "requiredEnvVars": ["CF_TOKEN"]
    })
}
