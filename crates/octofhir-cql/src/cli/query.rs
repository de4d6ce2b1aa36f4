//! Resolver query commands

use super::{loader::ScopeLoader, output};
use anyhow::{Context, Result};
use clap::ValueEnum;
use octofhir_cql_library::{
    LibraryScope, SymbolKind, code_listing, definition_listing, function_listing,
};
use serde_json::{Value, json};
use std::path::PathBuf;

/// Symbol list gathered from the direct includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregateKind {
    Definitions,
    Functions,
    Parameters,
    #[value(name = "valuesets")]
    ValueSets,
    Codes,
}

/// Symbol kind as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Definition,
    Function,
    Parameter,
    #[value(name = "valueset")]
    ValueSet,
    Code,
    #[value(name = "codesystem")]
    CodeSystem,
}

impl From<KindArg> for SymbolKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Definition => SymbolKind::Definition,
            KindArg::Function => SymbolKind::Function,
            KindArg::Parameter => SymbolKind::Parameter,
            KindArg::ValueSet => SymbolKind::ValueSet,
            KindArg::Code => SymbolKind::Code,
            KindArg::CodeSystem => SymbolKind::CodeSystem,
        }
    }
}

/// A single resolver query against a loaded scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Code(String),
    ValueSet(String),
    Aggregate(AggregateKind),
    Identifiers(KindArg),
    Names,
    Listing,
}

/// Configuration for query commands
pub struct QueryConfig {
    pub file: PathBuf,
    pub library_paths: Vec<PathBuf>,
    pub format: output::OutputFormat,
    pub output_file: Option<PathBuf>,
}

/// Load the scope named by the config and print the query result
pub fn run(config: QueryConfig, query: Query) -> Result<()> {
    let loader = ScopeLoader::new(config.library_paths);
    log::debug!("Library search paths: {:?}", loader.search_paths());

    let scope = loader
        .load(&config.file)
        .with_context(|| format!("Failed to load scope: {}", config.file.display()))?;

    let value = evaluate(&scope, &query)?;
    if value.is_null() {
        eprintln!("{}", output::format_warning(&format!("No match for {:?}", query)));
    }
    output::print_output(&value, config.format, config.output_file.as_deref())
}

/// Run a query; misses are `null`
pub fn evaluate(scope: &LibraryScope, query: &Query) -> Result<Value> {
    let resolver = scope.resolver();
    let value = match query {
        Query::Code(reference) => serde_json::to_value(resolver.resolve_code(reference))?,
        Query::ValueSet(reference) => {
            serde_json::to_value(resolver.resolve_value_set(reference))?
        }
        Query::Aggregate(kind) => match kind {
            AggregateKind::Definitions => {
                serde_json::to_value(resolver.aggregate_included_definitions())?
            }
            AggregateKind::Functions => {
                serde_json::to_value(resolver.aggregate_included_functions())?
            }
            AggregateKind::Parameters => {
                serde_json::to_value(resolver.aggregate_included_parameters())?
            }
            AggregateKind::ValueSets => {
                serde_json::to_value(resolver.aggregate_included_value_sets())?
            }
            AggregateKind::Codes => serde_json::to_value(resolver.aggregate_included_codes())?,
        },
        Query::Identifiers(kind) => {
            serde_json::to_value(resolver.qualified_identifiers((*kind).into()))?
        }
        Query::Names => serde_json::to_value(resolver.all_expression_names())?,
        Query::Listing => json!({
            "definitions": definition_listing(scope),
            "functions": function_listing(scope),
            "codes": code_listing(scope),
        }),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_cql_library::{CodeRef, Definition, IncludeKey, LibraryScopeBuilder, ValueSetRef};
    use pretty_assertions::assert_eq;

    fn measure() -> LibraryScope {
        let globals = LibraryScopeBuilder::new("Globals", "1.0.000")
            .add_code(CodeRef::new("Active", "active", "CS"))
            .and_then(|b| b.add_value_set(ValueSetRef::new("Inpatient", "2.16.1")))
            .unwrap()
            .build();
        let helpers = LibraryScopeBuilder::new("FHIRHelpers", "4.0.001")
            .add_function(Definition::function(
                "h1",
                "ToInterval",
                "define function ToInterval(period FHIR.Period):\n  null",
            ))
            .unwrap()
            .build();
        LibraryScopeBuilder::new("Measure", "1.0.000")
            .add_definition(Definition::new(
                "m1",
                "Initial Population",
                "define \"Initial Population\":\n  true",
            ))
            .and_then(|b| b.include(IncludeKey::new("Global", "Globals", "1.0.000"), globals))
            .and_then(|b| {
                b.include(IncludeKey::new("FHIRHelpers", "FHIRHelpers", "4.0.001"), helpers)
            })
            .unwrap()
            .build()
    }

    #[test]
    fn test_code_query() {
        let scope = measure();
        let value =
            evaluate(&scope, &Query::Code("Globals-1.0.000|Global|Active".into())).unwrap();
        assert_eq!(value["id"], "active");

        let miss = evaluate(&scope, &Query::Code("DoesNotExist-1.0.000|X|Foo".into())).unwrap();
        assert!(miss.is_null());
    }

    #[test]
    fn test_value_set_query() {
        let scope = measure();
        let value =
            evaluate(&scope, &Query::ValueSet("Globals-1.0.000|Global|Inpatient".into())).unwrap();
        assert_eq!(value["oid"], "2.16.1");
    }

    #[test]
    fn test_aggregate_functions_query() {
        let value = evaluate(&measure(), &Query::Aggregate(AggregateKind::Functions)).unwrap();
        assert_eq!(value[0]["name"], "ToInterval");
        assert_eq!(value[0]["alias"], "FHIRHelpers");
    }

    #[test]
    fn test_identifiers_and_names() {
        let scope = measure();
        let codes = evaluate(&scope, &Query::Identifiers(KindArg::Code)).unwrap();
        assert_eq!(codes, json!([{ "alias": "Global", "name": "Active" }]));

        let names = evaluate(&scope, &Query::Names).unwrap();
        assert_eq!(names, json!(["Initial Population"]));
    }

    #[test]
    fn test_listing_query() {
        let value = evaluate(&measure(), &Query::Listing).unwrap();
        assert_eq!(value["definitions"][0]["logic"], "  true");
        assert_eq!(value["functions"][0]["name"], "FHIRHelpers.ToInterval");
        assert_eq!(
            value["codes"],
            json!([{
                "name": "Active",
                "oid": "active",
                "codeSystemName": "CS",
                "includesVersion": false,
                "alias": "Global"
            }])
        );
    }
}
