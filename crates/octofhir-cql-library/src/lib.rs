//! CQL library scope model and cross-library resolution
//!
//! This crate provides:
//! - The symbol table of one compiled CQL library ([`LibraryScope`])
//! - The include tree of libraries it references, keyed by alias and version
//! - Code and value set resolution over `libraryName-version|alias|name` references
//! - One-level aggregation of included symbols, tagged with their include alias
//! - Build-time invariant checks and structural validation
//!
//! # Example
//!
//! ```
//! use octofhir_cql_library::{CodeRef, IncludeKey, LibraryScopeBuilder};
//!
//! let globals = LibraryScopeBuilder::new("Globals", "1.0.000")
//!     .add_code(CodeRef::new("Active", "active", "ConditionClinicalStatusCodes"))?
//!     .build();
//!
//! let measure = LibraryScopeBuilder::new("Measure", "1.0.000")
//!     .using("QI-Core", "4.1.1")
//!     .include(IncludeKey::new("Global", "Globals", "1.0.000"), globals)?
//!     .build();
//!
//! let resolver = measure.resolver();
//! assert!(resolver.resolve_code("Globals-1.0.000|Global|Active").is_some());
//! assert!(resolver.resolve_code("Active").is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod listing;
mod model;
mod reference;
mod resolver;
mod validate;

pub use builder::*;
pub use listing::*;
pub use model::*;
pub use reference::*;
pub use resolver::*;
pub use validate::*;
