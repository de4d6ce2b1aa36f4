//! Tests for the JSON form of scope trees and for validating trees that
//! bypassed the builder

mod common;

use octofhir_cql_diagnostics::{CQL0109, CQL0121, CQL0122, CQL0123, CQL0124, Severity};
use octofhir_cql_library::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_includes_serialize_as_ordered_entries() {
    let measure = common::measure();
    let value = serde_json::to_value(&measure).unwrap();

    let includes = value["includes"].as_array().unwrap();
    assert_eq!(includes.len(), 2);
    assert_eq!(includes[0]["alias"], "Global");
    assert_eq!(includes[0]["libraryName"], "Globals");
    assert_eq!(includes[0]["version"], "1.0.000");
    assert_eq!(includes[0]["library"]["name"], "Globals");
    assert_eq!(includes[1]["alias"], "FHIRHelpers");

    // Nested includes keep their own entries
    assert_eq!(includes[0]["library"]["includes"][0]["alias"], "Common");
}

#[test]
fn test_deserialized_tree_matches_built_tree() {
    let measure = common::measure();
    let text = serde_json::to_string_pretty(&measure).unwrap();
    let restored: LibraryScope = serde_json::from_str(&text).unwrap();

    assert_eq!(restored, measure);
    let keys: Vec<_> = restored.includes.keys().map(|k| k.alias.as_str()).collect();
    assert_eq!(keys, vec!["Global", "FHIRHelpers"]);
}

#[test]
fn test_minimal_document_uses_defaults() {
    let scope: LibraryScope = serde_json::from_value(json!({
        "name": "Measure",
        "version": "1.0.000",
        "codes": [
            { "name": "Active", "id": "active", "codeSystemName": "ConditionClinicalStatusCodes" }
        ]
    }))
    .unwrap();

    assert_eq!(scope.formatted_name(), "Measure-1.0.000");
    assert!(scope.includes.is_empty());
    assert!(!scope.codes[0].includes_version);
    assert_eq!(scope.line_count, 0);
    assert!(scope.resolver().resolve_code("Active").is_some());
}

#[test]
fn test_repeated_include_key_keeps_first_library() {
    let scope: LibraryScope = serde_json::from_value(json!({
        "name": "Measure",
        "version": "1.0.000",
        "includes": [
            { "alias": "G", "libraryName": "Globals", "version": "1", "library": {
                "name": "Globals", "version": "1",
                "valueSets": [{ "name": "Encounter", "oid": "first" }]
            }},
            { "alias": "G", "libraryName": "Globals", "version": "1", "library": {
                "name": "Globals", "version": "1",
                "valueSets": [{ "name": "Encounter", "oid": "second" }]
            }}
        ]
    }))
    .unwrap();

    assert_eq!(scope.includes.len(), 1);
    let value_set = scope.resolver().resolve_value_set("Globals-1|G|Encounter").unwrap();
    assert_eq!(value_set.oid, "first");
}

#[test]
fn test_aggregated_copies_serialize_alias() {
    let measure = common::measure();
    let functions = measure.resolver().aggregate_included_functions();
    let value = serde_json::to_value(&functions[0]).unwrap();

    assert_eq!(value["alias"], "Global");
    assert_eq!(value["isFunction"], true);
    assert!(value.get("parentLibrary").is_none());
}

#[test]
fn test_builder_rejects_repeated_include_key() {
    let err = LibraryScopeBuilder::new("Measure", "1.0.000")
        .include(IncludeKey::new("Global", "Globals", "1.0.000"), common::globals())
        .and_then(|b| b.include(IncludeKey::new("Global", "Globals", "1.0.000"), common::globals()))
        .unwrap_err();

    assert_eq!(err.code(), CQL0121);
    assert!(err.to_string().contains("Globals version '1.0.000' called Global"));
}

#[test]
fn test_validate_reports_broken_invariants() {
    let scope: LibraryScope = serde_json::from_value(json!({
        "name": "Measure",
        "version": "1.0.000",
        "definitions": [
            { "id": "1", "name": "Numerator", "logic": "define Numerator:\n true" },
            { "id": "2", "name": "Numerator", "logic": "define Numerator:\n false" }
        ],
        "functions": [
            { "id": "3", "name": "Helper", "logic": "define function Helper():\n 1" }
        ],
        "includes": [
            { "alias": "G1", "libraryName": "Globals", "version": "1.0.000",
              "library": { "name": "Globals", "version": "1.0.000" } },
            { "alias": "G2", "libraryName": "Globals", "version": "1.0.000",
              "library": { "name": "Globals", "version": "1.0.000" } },
            { "alias": "H", "libraryName": "Helpers", "version": "2.0.0",
              "library": { "name": "Helpers", "version": "1.0.0" } }
        ]
    }))
    .unwrap();

    let diagnostics = validate_scope(&scope);
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![CQL0109, CQL0123, CQL0122, CQL0124]);

    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(diagnostics[1..].iter().all(|d| d.severity == Severity::Warning));
    assert_eq!(
        diagnostics[2].help.as_deref(),
        Some("Qualified references to Globals-1.0.000 resolve to 'G1'")
    );
}

#[test]
fn test_built_measure_validates_clean() {
    assert!(validate_scope(&common::measure()).is_empty());
}
