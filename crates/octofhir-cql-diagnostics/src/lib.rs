//! CQL diagnostics and error handling
//!
//! This crate provides the error handling infrastructure for the CQL library
//! model, including error codes and diagnostic reporting.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for CQL operations
pub type Result<T> = std::result::Result<T, CqlError>;
