//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use octofhir_cql_diagnostics::{CQL0401, CqlError};
use serde_json::Value;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Table,
}

impl OutputFormat {
    /// Parse a `--format` value; unknown values fall back to pretty JSON
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "json-pretty" => Self::JsonPretty,
            "table" => Self::Table,
            other => {
                log::warn!("Unknown output format '{}', using pretty", other);
                Self::JsonPretty
            }
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let io_error = |action: &str, e: io::Error| {
            CqlError::system(
                CQL0401,
                format!("Failed to {} output file: {}", action, e),
                path.display().to_string(),
            )
        };
        let mut file = File::create(path).map_err(|e| io_error("create", e))?;
        file.write_all(content.as_bytes()).map_err(|e| io_error("write", e))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Format value as table (if possible)
///
/// Arrays of objects become one row per object with the first object's keys
/// as columns; other arrays become numbered lists; objects become key/value
/// tables.
pub fn format_as_table(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Some("(empty list)".to_string());
            }

            if let Some(Value::Object(first)) = items.first() {
                let keys: Vec<String> = first.keys().cloned().collect();
                let mut builder = Builder::default();
                builder.push_record(keys.iter().cloned());
                for item in items {
                    let Value::Object(obj) = item else {
                        return None;
                    };
                    builder.push_record(
                        keys.iter()
                            .map(|k| obj.get(k).map(format_value).unwrap_or_default()),
                    );
                }
                let mut table = builder.build();
                return Some(table.with(Style::modern()).to_string());
            }

            let lines: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, v)| format!("  {}. {}", i + 1, format_value(v)))
                .collect();
            Some(lines.join("\n"))
        }
        Value::Object(obj) => {
            let mut builder = Builder::default();
            builder.push_record(["Key".to_string(), "Value".to_string()]);
            for (k, v) in obj {
                builder.push_record([k.clone(), format_value(v)]);
            }
            let mut table = builder.build();
            Some(table.with(Style::modern()).to_string())
        }
        _ => None,
    }
}

/// Format a simple value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{}} with {} fields", obj.len()),
    }
}

/// Render a value in the requested format
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(value, false),
        OutputFormat::JsonPretty => format_json(value, true),
        OutputFormat::Table => match format_as_table(value) {
            Some(table) => Ok(table),
            None => format_json(value, true),
        },
    }
}

/// Print output in the specified format
pub fn print_output(
    value: &Value,
    format: OutputFormat,
    output_file: Option<&Path>,
) -> Result<()> {
    let content = render(value, format)?;
    write_output(&content, output_file)
}
