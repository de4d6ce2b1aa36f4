//! Validate command implementation

use super::{loader::ScopeLoader, output};
use anyhow::{Result, bail};
use colored::Colorize;
use octofhir_cql_diagnostics::{CQL0400, CqlError, Diagnostic, Severity};
use octofhir_cql_library::validate_scope;
use std::path::{Path, PathBuf};

/// Configuration for validate command
pub struct ValidateConfig {
    pub files: Vec<PathBuf>,
    pub strict: bool,
    pub library_paths: Vec<PathBuf>,
}

/// Validation result for a single file
pub struct ValidationResult {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn errors(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Overall outcome of a validate run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub strict: bool,
}

impl ValidationSummary {
    /// Whether the run should exit non-zero
    pub fn failed(&self) -> bool {
        self.errors > 0 || (self.strict && self.warnings > 0)
    }
}

/// Validate scope files and print their diagnostics
pub fn validate(config: ValidateConfig) -> Result<ValidationSummary> {
    if config.files.is_empty() {
        bail!("No files specified for validation");
    }

    let loader = ScopeLoader::new(config.library_paths);
    let results: Vec<_> = config
        .files
        .iter()
        .map(|file| validate_file(&loader, file))
        .collect();

    for result in &results {
        print_validation_result(result);
    }

    let summary = ValidationSummary {
        files: results.len(),
        errors: results.iter().map(ValidationResult::errors).sum(),
        warnings: results.iter().map(ValidationResult::warnings).sum(),
        strict: config.strict,
    };
    print_summary(&summary);
    Ok(summary)
}

/// Validate a single file; load failures become diagnostics
pub fn validate_file(loader: &ScopeLoader, file: &Path) -> ValidationResult {
    log::debug!("Validating: {}", file.display());

    let diagnostics = match loader.load(file) {
        Ok(scope) => validate_scope(&scope),
        Err(e) => {
            let diagnostic = match e.downcast_ref::<CqlError>() {
                Some(err) => err.to_diagnostic(),
                None => Diagnostic::error(CQL0400, format!("{:#}", e)),
            };
            vec![diagnostic]
        }
    };

    ValidationResult {
        file: file.to_path_buf(),
        diagnostics,
    }
}

fn print_validation_result(result: &ValidationResult) {
    let status = if result.errors() == 0 {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };

    println!("{} {}", status, result.file.display().to_string().cyan());
    for diagnostic in &result.diagnostics {
        for line in diagnostic.render_colored().lines() {
            println!("  {}", line);
        }
    }
}

fn print_summary(summary: &ValidationSummary) {
    println!();
    if summary.errors == 0 && summary.warnings == 0 {
        println!(
            "{}",
            output::format_success(&format!(
                "All {} file(s) validated successfully",
                summary.files
            ))
        );
        return;
    }

    let mut parts = Vec::new();
    if summary.errors > 0 {
        parts.push(format!("{} error(s)", summary.errors).red().to_string());
    }
    if summary.warnings > 0 {
        parts.push(format!("{} warning(s)", summary.warnings).yellow().to_string());
    }

    let label = if summary.failed() {
        "Validation failed:".red().bold()
    } else {
        "Validation passed with warnings:".yellow().bold()
    };
    eprintln!("{} Found {}", label, parts.join(", "));

    if summary.strict && summary.warnings > 0 {
        eprintln!("{}", "Strict mode: treating warnings as errors".yellow());
    }
}
