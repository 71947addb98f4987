//! Registry assembly and query behavior.
//!
//! Covers the build contract (all-or-nothing, complete error reporting,
//! identity collisions) and the read API (identity, category, and text
//! lookups over the immutable index).

use pretty_assertions::assert_eq;
use serde_json::json;

use mcpdex_core::registry::{RegistryIndex, ValidationError};
use tests::{github_entry, http_entry, sse_entry, stdio_entry};

#[test]
fn two_entry_catalog_builds_and_answers_every_query() {
    let candidates = vec![stdio_entry(), http_entry()];
    let index = RegistryIndex::build(&candidates).unwrap();

    assert_eq!(index.count(), 2);

    let a = index.get_by_id("a").unwrap();
    assert_eq!(a.name, "A");
    assert!(a.config.is_local());
    assert!(index.get_by_id("b").unwrap().config.is_remote());

    let by_category: Vec<&str> = index
        .get_by_category("x")
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(by_category, vec!["a"]);

    let hits: Vec<&str> = index.search("A").iter().map(|e| e.id.as_str()).collect();
    assert_eq!(hits, vec!["a"]);
}

#[test]
fn every_accepted_entry_is_reachable_by_its_id() {
    let candidates = vec![stdio_entry(), http_entry(), github_entry(), sse_entry()];
    let index = RegistryIndex::build(&candidates).unwrap();

    assert_eq!(index.count(), candidates.len());
    for candidate in &candidates {
        let id = candidate["id"].as_str().unwrap();
        let entry = index.get_by_id(id).unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(serde_json::to_value(entry).unwrap(), *candidate);
    }
}

#[test]
fn duplicate_ids_fail_the_batch_with_one_collision_error() {
    let errors = RegistryIndex::build(&[stdio_entry(), stdio_entry()]).unwrap_err();

    assert_eq!(
        errors,
        vec![ValidationError::DuplicateId {
            id: "a".into(),
            first: "#0".into(),
            second: "#1".into(),
        }]
    );
}

#[test]
fn stdio_entry_carrying_a_url_is_a_discriminant_violation() {
    let mut bad = stdio_entry();
    bad["config"]["url"] = json!("https://e.co");

    let errors = RegistryIndex::build(&[bad, http_entry()]).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ValidationError::DisallowedField { field, .. } if field == "config.url"
    ));
}

#[test]
fn remote_entry_carrying_a_command_is_a_discriminant_violation() {
    let mut bad = http_entry();
    bad["config"]["command"] = json!("npx");

    let errors = RegistryIndex::build(&[bad]).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ValidationError::DisallowedField { field, .. } if field == "config.command"
    ));
}

#[test]
fn one_bad_candidate_poisons_the_whole_batch() {
    let bad = json!({
        "name": "No id",
        "description": "d",
        "config": {"transport": "stdio", "command": "npx"}
    });

    // Good entries alongside a bad one: nothing is published.
    let errors = RegistryIndex::build(&[stdio_entry(), bad, http_entry()]).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::MissingField {
            entry: "#1".into(),
            field: "id".into(),
        }]
    );
}

#[test]
fn a_failed_build_reports_every_violation_across_candidates() {
    let mut first = stdio_entry();
    first["config"]["command"] = json!("");
    let mut second = http_entry();
    second["config"]["url"] = json!("not a url");

    let errors = RegistryIndex::build(&[first, second]).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(
        |e| matches!(e, ValidationError::EmptyField { entry, field } if entry == "a" && field == "config.command")
    ));
    assert!(errors.iter().any(
        |e| matches!(e, ValidationError::InvalidValue { entry, field, .. } if entry == "b" && field == "config.url")
    ));
}

#[test]
fn queries_are_pure_and_idempotent() {
    let index = RegistryIndex::build(&[stdio_entry(), http_entry(), github_entry()]).unwrap();

    let first: Vec<String> = index.search("github").iter().map(|e| e.id.clone()).collect();
    let second: Vec<String> = index.search("github").iter().map(|e| e.id.clone()).collect();
    assert_eq!(first, second);

    let by_cat_first: Vec<String> = index
        .get_by_category("developer-tools")
        .iter()
        .map(|e| e.id.clone())
        .collect();
    let by_cat_second: Vec<String> = index
        .get_by_category("developer-tools")
        .iter()
        .map(|e| e.id.clone())
        .collect();
    assert_eq!(by_cat_first, by_cat_second);
    assert_eq!(index.count(), 3);
}

#[test]
fn search_matches_name_description_and_id_case_insensitively() {
    let index = RegistryIndex::build(&[github_entry(), sse_entry()]).unwrap();

    // name
    assert_eq!(index.search("GITHUB").len(), 1);
    // description substring
    assert_eq!(index.search("pull request").len(), 1);
    // id substring
    assert_eq!(index.search("cloudflare/docs").len(), 1);
    // miss
    assert!(index.search("postgres").is_empty());
}

#[test]
fn built_index_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RegistryIndex>();

    let index = RegistryIndex::build(&[stdio_entry(), http_entry()]).unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(index.count(), 2);
                assert!(index.get_by_id("a").is_some());
            });
        }
    });
}
