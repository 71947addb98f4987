//! Immutable registry index assembled from the full candidate set.

use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

use super::document::RegistryDocument;
use super::types::RegistryEntry;
use super::validation::{validate_at, ValidationError};

/// The validated, queryable catalog.
///
/// Built once from the full entry set and immutable afterwards: every query
/// takes `&self`, so a built index is safe to share across threads with no
/// locking. There is no add/remove path; changing the catalog means
/// re-validating and re-building the whole set.
#[derive(Debug, Clone)]
pub struct RegistryIndex {
    /// Entries in insertion order. Category and search results preserve it.
    entries: Vec<RegistryEntry>,
    /// id → position in `entries`.
    by_id: HashMap<String, usize>,
}

impl RegistryIndex {
    /// Validate every candidate and assemble the index.
    ///
    /// All-or-nothing: any shape or discriminant violation, or any id
    /// collision, fails the whole batch and returns every collected error.
    /// The registry is a curated, reviewed artifact; a partial catalog is
    /// strictly worse than a hard failure with a full report.
    pub fn build(candidates: &[Value]) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut entries = Vec::with_capacity(candidates.len());
        // First occurrence of each raw id, for collision reporting. Raw so
        // that a collision is reported even when the entries are otherwise
        // invalid.
        let mut first_seen: HashMap<&str, usize> = HashMap::new();

        for (position, candidate) in candidates.iter().enumerate() {
            if let Some(id) = candidate.get("id").and_then(Value::as_str) {
                if !id.is_empty() {
                    if let Some(&first) = first_seen.get(id) {
                        errors.push(ValidationError::DuplicateId {
                            id: id.to_string(),
                            first: format!("#{first}"),
                            second: format!("#{position}"),
                        });
                    } else {
                        first_seen.insert(id, position);
                    }
                }
            }

            match validate_at(candidate, position) {
                Ok(entry) => entries.push(entry),
                Err(mut candidate_errors) => errors.append(&mut candidate_errors),
            }
        }

        if !errors.is_empty() {
            warn!(
                candidates = candidates.len(),
                errors = errors.len(),
                "registry build failed"
            );
            return Err(errors);
        }

        let by_id = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.id.clone(), position))
            .collect();

        info!(entries = entries.len(), "registry built");
        Ok(Self { entries, by_id })
    }

    /// Assemble the index from a parsed registry document.
    pub fn from_document(document: &RegistryDocument) -> Result<Self, Vec<ValidationError>> {
        Self::build(document.candidates())
    }

    /// Exact-match lookup by id.
    pub fn get_by_id(&self, id: &str) -> Option<&RegistryEntry> {
        self.by_id.get(id).map(|&position| &self.entries[position])
    }

    /// All entries carrying the given category, in insertion order.
    pub fn get_by_category(&self, category: &str) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|e| e.has_category(category))
            .collect()
    }

    /// Case-insensitive substring search over name, description, and id.
    /// Insertion order; no relevance ranking — that belongs to a consumer's
    /// UI layer.
    pub fn search(&self, query: &str) -> Vec<&RegistryEntry> {
        let query_lower = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.matches_query(&query_lower))
            .collect()
    }

    /// Number of entries in the catalog.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}
