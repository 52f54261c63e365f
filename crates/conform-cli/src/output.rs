//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for validation outcomes and schema descriptions.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use conform_core::{FieldRule, FieldType, Schema, ValidationOutcome};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation outcome; `source` names the checked payload
    fn format_outcome(&self, outcome: &ValidationOutcome, source: &str) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_outcome(&self, outcome: &ValidationOutcome, source: &str) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_outcome_human(outcome, source)),
            _ => self.format(outcome),
        }
    }
}

/// One row of a schema description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    /// Dotted path; list items are marked with `[]`
    pub path: String,
    pub type_name: String,
    pub required: bool,
    pub not_empty: bool,
    pub constraints: String,
}

/// Flatten a schema into one row per field, nested fields included
pub fn describe_schema(schema: &Schema) -> Vec<FieldSummary> {
    let mut rows = Vec::new();
    describe_into(schema, "", &mut rows);
    rows
}

fn describe_into(schema: &Schema, prefix: &str, rows: &mut Vec<FieldSummary>) {
    for (name, rule) in schema {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        };

        let type_name = match &rule.field_type {
            None => "-".to_string(),
            Some(FieldType::Scalar(scalar)) => scalar.to_string(),
            Some(FieldType::Object(_)) => "Object".to_string(),
            Some(FieldType::ArrayOf(_)) => "List".to_string(),
        };

        rows.push(FieldSummary {
            path: path.clone(),
            type_name,
            required: rule.required,
            not_empty: rule.rejects_empty(),
            constraints: constraints(rule),
        });

        match &rule.field_type {
            Some(FieldType::Object(inner)) => describe_into(inner, &path, rows),
            Some(FieldType::ArrayOf(inner)) => describe_into(inner, &format!("{}[]", path), rows),
            _ => {}
        }
    }
}

fn constraints(rule: &FieldRule) -> String {
    let mut parts = Vec::new();
    if !rule.options.is_empty() {
        let options: Vec<String> = rule.options.iter().map(format_value_compact).collect();
        parts.push(format!("one of {}", options.join(", ")));
    }
    if let Some(min) = rule.min_length {
        parts.push(format!("min_length {}", min));
    }
    if let Some(max) = rule.max_length {
        parts.push(format!("max_length {}", max));
    }
    if let Some(min) = rule.min_value {
        parts.push(format!("min_value {}", min));
    }
    if let Some(max) = rule.max_value {
        parts.push(format!("max_value {}", max));
    }
    parts.join("; ")
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut logged = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut logged);
        trace!(data = %logged, "Outputting data");

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a validation outcome; always written, even in quiet mode
    pub fn outcome(&mut self, outcome: &ValidationOutcome, source: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            let formatted = self.format.format_outcome(outcome, source)?;
            return self.writeln(formatted.trim_end());
        }

        match outcome.errors() {
            None => {
                let line = format!("✓ {} is valid", source);
                if self.use_color {
                    self.writeln(&line.green().to_string())
                } else {
                    self.writeln(&line)
                }
            }
            Some(errors) => {
                let flat = errors.flatten();
                let header = format!("✗ {} failed validation - {} error(s)", source, flat.len());
                if self.use_color {
                    self.writeln(&header.red().bold().to_string())?;
                    for (path, message) in flat {
                        self.writeln(&format!("  {} {}: {}", "•".red(), path.bold(), message))?;
                    }
                } else {
                    self.writeln(&header)?;
                    for (path, message) in flat {
                        self.writeln(&format!("  • {}: {}", path, message))?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(header_row.trim_end().bold().to_string().as_str())?;
        } else {
            self.writeln(header_row.trim_end())?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Format a validation outcome for human reading, without colors
fn format_outcome_human(outcome: &ValidationOutcome, source: &str) -> String {
    match outcome.errors() {
        None => format!("✓ {} is valid\n", source),
        Some(errors) => {
            let flat = errors.flatten();
            let mut output = format!("✗ {} failed validation - {} error(s)\n", source, flat.len());
            for (path, message) in flat {
                output.push_str(&format!("  • {}: {}\n", path, message));
            }
            output
        }
    }
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
