//! CQL error types

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the library tree violates an invariant resolution depends on
    Error,
    /// Warning - resolution stays deterministic but may surprise callers
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message about one library in a scope tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Formatted name (`name-version`) of the library the diagnostic is about
    pub library: Option<String>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            library: None,
            help: code.info().help.map(str::to_string),
        }
    }

    /// Set the library the diagnostic refers to
    pub fn in_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let label = match self.severity {
            Severity::Error => format!("{}[{}]", self.severity, self.code).red().bold(),
            Severity::Warning => format!("{}[{}]", self.severity, self.code).yellow().bold(),
        };
        let mut out = format!("{}: {}", label, self.message);
        if let Some(library) = &self.library {
            out.push_str(&format!("\n  {} {}", "-->".blue().bold(), library.cyan()));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".green().bold(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(library) = &self.library {
            write!(f, " in {}", library)?;
        }
        Ok(())
    }
}

/// Main CQL error type
#[derive(Debug, Clone, Error)]
pub enum CqlError {
    /// Library model error (duplicate symbols, conflicting includes)
    #[error("{code}: {message}")]
    Library {
        code: ErrorCode,
        message: String,
        library: Option<String>,
    },

    /// Error loading a serialized library
    #[error("{code}: {message}")]
    Load {
        code: ErrorCode,
        message: String,
        path: Option<String>,
    },

    /// I/O or internal error outside library loading
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl CqlError {
    /// Create a library model error
    pub fn library(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Library {
            code,
            message: message.into(),
            library: None,
        }
    }

    /// Create a library model error attributed to a library
    pub fn library_in(
        code: ErrorCode,
        message: impl Into<String>,
        library: impl Into<String>,
    ) -> Self {
        Self::Library {
            code,
            message: message.into(),
            library: Some(library.into()),
        }
    }

    /// Create a load error
    pub fn load(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Load {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a system error with the resource it concerns
    pub fn system(
        code: ErrorCode,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Library { code, .. } => *code,
            Self::Load { code, .. } => *code,
            Self::System { code, .. } => *code,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Library { code, message, library } => {
                let diag = Diagnostic::error(*code, message.clone());
                match library {
                    Some(lib) => diag.in_library(lib.clone()),
                    None => diag,
                }
            }
            Self::Load { code, message, path } => {
                let diag = Diagnostic::error(*code, message.clone());
                match path {
                    Some(path) => diag.with_help(format!("while loading {}", path)),
                    None => diag,
                }
            }
            Self::System { code, message, context } => {
                let diag = Diagnostic::error(*code, message.clone());
                match context {
                    Some(ctx) => diag.with_help(ctx.clone()),
                    None => diag,
                }
            }
        }
    }
}
