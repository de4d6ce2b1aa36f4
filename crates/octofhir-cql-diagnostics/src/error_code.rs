//! CQL error codes following a structured numbering system
//!
//! Error code ranges:
//! - CQL0100-CQL0199: Library model errors (scope construction, includes)
//! - CQL0400-CQL0499: System errors (I/O, file formats)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Library model errors (0100-0199)
    map.insert(103, ErrorInfo::new("Undefined library")
        .with_help("Add the library's directory to the library search path"));
    map.insert(109, ErrorInfo::new("Duplicate definition"));
    map.insert(114, ErrorInfo::new("Circular include"));
    map.insert(121, ErrorInfo::new("Duplicate include"));
    map.insert(122, ErrorInfo::new("Ambiguous include")
        .with_help("Qualified references resolve to the first include registered under this name"));
    map.insert(123, ErrorInfo::new("Misplaced expression"));
    map.insert(124, ErrorInfo::new("Include identity mismatch"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("I/O error"));
    map.insert(404, ErrorInfo::new("File not found"));
    map.insert(406, ErrorInfo::new("Invalid format"));

    map
});

// Library model errors
pub const CQL0103: ErrorCode = ErrorCode::new(103);
pub const CQL0109: ErrorCode = ErrorCode::new(109);
pub const CQL0114: ErrorCode = ErrorCode::new(114);
pub const CQL0121: ErrorCode = ErrorCode::new(121);
pub const CQL0122: ErrorCode = ErrorCode::new(122);
pub const CQL0123: ErrorCode = ErrorCode::new(123);
pub const CQL0124: ErrorCode = ErrorCode::new(124);

// System errors
pub const CQL0400: ErrorCode = ErrorCode::new(400);
pub const CQL0401: ErrorCode = ErrorCode::new(401);
pub const CQL0404: ErrorCode = ErrorCode::new(404);
pub const CQL0406: ErrorCode = ErrorCode::new(406);
