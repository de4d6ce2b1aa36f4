//! Readable expression listings
//!
//! Report builders show a measure's own definitions and the functions it
//! pulls in from included libraries as name/logic pairs. Logic is listed
//! without its `define` header line. Codes are listed with their code
//! system so a report can print the data criteria they stand for.

use serde::Serialize;

use crate::model::{CodeRef, Definition, LibraryScope};

/// One listed expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionListing {
    pub id: String,
    /// Expression name; `Alias.Name` for included functions
    pub name: String,
    pub logic: String,
}

impl ExpressionListing {
    fn from_definition(definition: &Definition) -> Self {
        Self {
            id: definition.id.clone(),
            name: definition.display_name(),
            logic: definition.body().to_string(),
        }
    }
}

/// Definitions declared directly in `scope`, sorted by name
///
/// Definitions carrying a parent library were flattened in from elsewhere and
/// are skipped.
pub fn definition_listing(scope: &LibraryScope) -> Vec<ExpressionListing> {
    let mut listing: Vec<_> = scope
        .definitions
        .iter()
        .filter(|def| def.parent_library.is_none())
        .map(ExpressionListing::from_definition)
        .collect();
    listing.sort_by(|a, b| a.name.cmp(&b.name));
    listing
}

/// Functions of the direct includes as `Alias.Name`, sorted by name
pub fn function_listing(scope: &LibraryScope) -> Vec<ExpressionListing> {
    let mut listing: Vec<_> = scope
        .resolver()
        .aggregate_included_functions()
        .iter()
        .map(ExpressionListing::from_definition)
        .collect();
    listing.sort_by(|a, b| a.name.cmp(&b.name));
    listing
}

/// One listed code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeListing {
    /// Identifier the code is referenced by
    pub name: String,
    pub oid: String,
    pub code_system_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_system_version: Option<String>,
    pub includes_version: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl From<&CodeRef> for CodeListing {
    fn from(code: &CodeRef) -> Self {
        Self {
            name: code.identifier().to_string(),
            oid: code.id.clone(),
            code_system_name: code.code_system_name.clone(),
            code_system_version: code.code_system_version.clone(),
            includes_version: code.includes_version,
            alias: code.alias.clone(),
        }
    }
}

/// Local codes followed by those of the direct includes, sorted by name
/// ignoring case
pub fn code_listing(scope: &LibraryScope) -> Vec<CodeListing> {
    let mut listing: Vec<_> = scope
        .codes
        .iter()
        .map(CodeListing::from)
        .chain(
            scope
                .resolver()
                .aggregate_included_codes()
                .iter()
                .map(CodeListing::from),
        )
        .collect();
    listing.sort_by_cached_key(|code| code.name.to_lowercase());
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IncludeKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_definition_listing_sorted_and_stripped() {
        let mut scope = LibraryScope::new("Measure", "1.0.000");
        scope.definitions.push(Definition::new(
            "2",
            "Numerator",
            "define \"Numerator\":\n  \"Denominator\" and exists \"Visit\"",
        ));
        scope.definitions.push(Definition::new(
            "1",
            "Denominator",
            "define \"Denominator\":\n  true",
        ));
        scope.definitions.push(
            Definition::new("3", "Inherited", "define \"Inherited\":\n  false")
                .with_parent_library("Common-1.0.000"),
        );

        assert_eq!(
            definition_listing(&scope),
            vec![
                ExpressionListing {
                    id: "1".into(),
                    name: "Denominator".into(),
                    logic: "  true".into(),
                },
                ExpressionListing {
                    id: "2".into(),
                    name: "Numerator".into(),
                    logic: "  \"Denominator\" and exists \"Visit\"".into(),
                },
            ]
        );
    }

    #[test]
    fn test_function_listing_uses_alias() {
        let mut helpers = LibraryScope::new("FHIRHelpers", "4.0.001");
        helpers.functions.push(Definition::function(
            "f1",
            "ToString",
            "define function ToString(value String):\n  value.value",
        ));
        helpers.functions.push(Definition::function(
            "f2",
            "ToInterval",
            "define function ToInterval(period FHIR.Period):\n  \
             Interval[period.\"start\", period.\"end\"]",
        ));

        let mut scope = LibraryScope::new("Measure", "1.0.000");
        scope
            .includes
            .insert(IncludeKey::new("FHIRHelpers", "FHIRHelpers", "4.0.001"), helpers);

        let names: Vec<_> = function_listing(&scope).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["FHIRHelpers.ToInterval", "FHIRHelpers.ToString"]);
    }

    #[test]
    fn test_code_listing_merges_local_and_included() {
        let mut globals = LibraryScope::new("Globals", "1.0.000");
        globals.codes.push(
            CodeRef::new("active", "active-id", "ConditionClinicalStatusCodes")
                .with_display_name("Active"),
        );
        globals.codes.push(
            CodeRef::new("Birth date", "21112-8", "LOINC").with_code_system_version("2.69"),
        );

        let mut scope = LibraryScope::new("Measure", "1.0.000");
        scope.codes.push(CodeRef::new("ambulatory", "AMB", "ActCode"));
        scope
            .includes
            .insert(IncludeKey::new("Global", "Globals", "1.0.000"), globals);

        let listing = code_listing(&scope);
        let names: Vec<_> = listing.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Active", "ambulatory", "Birth date"]);

        assert_eq!(listing[0].oid, "active-id");
        assert_eq!(listing[0].alias.as_deref(), Some("Global"));
        assert_eq!(listing[1].alias, None);
        assert!(!listing[1].includes_version);
        assert_eq!(listing[2].code_system_version.as_deref(), Some("2.69"));
        assert!(listing[2].includes_version);
    }
}
