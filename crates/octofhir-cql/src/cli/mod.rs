//! CLI functionality for the cql-scope tool
//!
//! - Scope loading from JSON files and library search paths
//! - Resolver queries
//! - Validation
//! - Output formatting

pub mod loader;
pub mod output;
pub mod query;
pub mod validate;
