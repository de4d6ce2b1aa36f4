//! CQL library scope model and cross-library symbol resolution
//!
//! This crate bundles:
//! - The library scope model, builder and resolver
//! - Structural validation with coded diagnostics
//! - The `cql-scope` command-line tool (with the `cli` feature)
//!
//! # Example
//!
//! ```
//! use octofhir_cql::library::{CodeRef, IncludeKey, LibraryScopeBuilder};
//!
//! let globals = LibraryScopeBuilder::new("Globals", "1.0.000")
//!     .add_code(CodeRef::new("Active", "active", "ConditionClinicalStatusCodes"))?
//!     .build();
//! let measure = LibraryScopeBuilder::new("Measure", "1.0.000")
//!     .include(IncludeKey::new("Global", "Globals", "1.0.000"), globals)?
//!     .build();
//!
//! let code = measure.resolver().resolve_code("Globals-1.0.000|Global|Active");
//! assert_eq!(code.map(|c| c.id.as_str()), Some("active"));
//! # Ok::<(), octofhir_cql::CqlError>(())
//! ```

pub use octofhir_cql_diagnostics as diagnostics;
pub use octofhir_cql_library as library;

// Convenience re-exports
pub use octofhir_cql_diagnostics::{CqlError, Diagnostic, Result};
pub use octofhir_cql_library::{LibraryScope, LibraryScopeBuilder, validate_scope};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
