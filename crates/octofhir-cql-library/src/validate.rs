//! Structural validation of built scope trees
//!
//! Trees that did not go through [`LibraryScopeBuilder`](crate::LibraryScopeBuilder),
//! e.g. deserialized ones, may break the invariants resolution relies on.
//! Validation reports those problems instead of failing; resolution itself
//! stays total either way.

use std::collections::HashSet;

use octofhir_cql_diagnostics::{CQL0109, CQL0122, CQL0123, CQL0124, Diagnostic};

use crate::model::{LibraryScope, SymbolKind};

/// Validate a scope and every library included below it
pub fn validate_scope(scope: &LibraryScope) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_into(scope, &mut diagnostics);
    diagnostics
}

fn validate_into(scope: &LibraryScope, diagnostics: &mut Vec<Diagnostic>) {
    let library = scope.formatted_name();

    for kind in SymbolKind::ALL {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for name in scope.symbol_names(kind) {
            if !seen.insert(name) && reported.insert(name) {
                diagnostics.push(
                    Diagnostic::error(CQL0109, format!("Duplicate {} '{}'", kind, name))
                        .in_library(library.clone()),
                );
            }
        }
    }

    for def in &scope.definitions {
        if def.is_function {
            diagnostics.push(
                Diagnostic::warning(
                    CQL0123,
                    format!("Definition '{}' is flagged as a function", def.name),
                )
                .in_library(library.clone()),
            );
        }
    }
    for function in &scope.functions {
        if !function.is_function {
            diagnostics.push(
                Diagnostic::warning(
                    CQL0123,
                    format!("Function '{}' is not flagged as a function", function.name),
                )
                .in_library(library.clone()),
            );
        }
    }

    let mut first_by_name: Vec<(String, &str)> = Vec::new();
    for (key, included) in &scope.includes {
        let formatted = key.formatted_name();
        match first_by_name.iter().find(|(name, _)| *name == formatted) {
            Some((_, winner)) => diagnostics.push(
                Diagnostic::warning(
                    CQL0122,
                    format!(
                        "Include '{}' shares the name {} with include '{}'",
                        key.alias, formatted, winner
                    ),
                )
                .in_library(library.clone())
                .with_help(format!(
                    "Qualified references to {} resolve to '{}'",
                    formatted, winner
                )),
            ),
            None => first_by_name.push((formatted.clone(), key.alias.as_str())),
        }

        if included.formatted_name() != formatted {
            diagnostics.push(
                Diagnostic::warning(
                    CQL0124,
                    format!(
                        "Include '{}' names {} but holds {}",
                        key.alias,
                        formatted,
                        included.formatted_name()
                    ),
                )
                .in_library(library.clone()),
            );
        }

        validate_into(included, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeRef, Definition, IncludeKey};
    use octofhir_cql_diagnostics::Severity;

    #[test]
    fn test_clean_scope_has_no_diagnostics() {
        let mut root = LibraryScope::new("Measure", "1.0.000");
        root.definitions.push(Definition::new("1", "Numerator", "define Numerator:\n true"));
        root.includes.insert(
            IncludeKey::new("Global", "Globals", "1.0.000"),
            LibraryScope::new("Globals", "1.0.000"),
        );

        assert!(validate_scope(&root).is_empty());
    }

    #[test]
    fn test_duplicate_reported_once_per_name() {
        let mut root = LibraryScope::new("Measure", "1.0.000");
        for id in ["1", "2", "3"] {
            root.definitions.push(Definition::new(id, "Numerator", "define Numerator:\n true"));
        }

        let diagnostics = validate_scope(&root);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CQL0109);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].library.as_deref(), Some("Measure-1.0.000"));
    }

    #[test]
    fn test_nested_library_is_validated() {
        let mut globals = LibraryScope::new("Globals", "1.0.000");
        globals.codes.push(CodeRef::new("Active", "a", "CS"));
        globals.codes.push(CodeRef::new("Active", "b", "CS"));

        let mut root = LibraryScope::new("Measure", "1.0.000");
        root.includes.insert(IncludeKey::new("Global", "Globals", "1.0.000"), globals);

        let diagnostics = validate_scope(&root);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].library.as_deref(), Some("Globals-1.0.000"));
    }
}
