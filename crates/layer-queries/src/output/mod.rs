//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or, with `--json`, a JSON
//! document for programmatic use.
//!
//! Submodules:
//! - [`color`]: semantic color helpers

pub mod color;

use crate::app::EditForm;
use crate::domain::Query;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{dimmed, error, info, success, warning};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Configuration for text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `LAYER_QUERIES_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_colors = env::var("NO_COLOR").is_err()
            && match env::var("LAYER_QUERIES_COLOR") {
                Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") => false,
                Ok(v) if v.is_empty() || v == "1" || v.eq_ignore_ascii_case("true") => true,
                Ok(v) => {
                    tracing::warn!(
                        env_var = "LAYER_QUERIES_COLOR",
                        value = %v,
                        "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                    );
                    true
                }
                Err(_) => true,
            };

        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)
}

/// Print a list of names, or `placeholder` when it is empty.
pub fn print_names(names: &[String], placeholder: &str, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Json => write_json(&mut handle, &names),
        OutputMode::Text => write_names(&mut handle, names, placeholder, &OutputConfig::from_env()),
    }
}

fn write_names<W: Write>(
    w: &mut W,
    names: &[String],
    placeholder: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    if names.is_empty() {
        return writeln!(w, "{}", dimmed(placeholder, config));
    }
    for name in names {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

/// Print saved queries with their expressions.
pub fn print_queries(queries: &[Query], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Json => write_json(&mut handle, &queries),
        OutputMode::Text => write_queries(&mut handle, queries, &OutputConfig::from_env()),
    }
}

fn write_queries<W: Write>(w: &mut W, queries: &[Query], config: &OutputConfig) -> io::Result<()> {
    if queries.is_empty() {
        return writeln!(w, "{}", dimmed("No saved queries", config));
    }
    let width = queries.iter().map(|q| q.name.chars().count()).max().unwrap_or(0);
    for query in queries {
        let pad = width - query.name.chars().count();
        writeln!(
            w,
            "{}{}  {}",
            info(&query.name, config),
            " ".repeat(pad),
            query.expression
        )?;
    }
    Ok(())
}

/// Print a builder form re-populated from a saved query.
pub fn print_edit_form(form: &EditForm, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Json => write_json(&mut handle, form),
        OutputMode::Text => write_edit_form(&mut handle, form, &OutputConfig::from_env()),
    }
}

fn write_edit_form<W: Write>(w: &mut W, form: &EditForm, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "{} {}", dimmed("Query Name:", config), info(&form.name, config))?;
    writeln!(w, "{} {}", dimmed("Field:     ", config), form.clause.field)?;
    writeln!(w, "{} {}", dimmed("Operator:  ", config), form.clause.operator)?;
    writeln!(w, "{} {}", dimmed("Value:     ", config), form.clause.value)
}

/// Print a one-line success message on stdout.
pub fn print_success(message: &str) {
    println!("{}", success(message, &OutputConfig::from_env()));
}

/// Print a warning on stderr.
pub fn print_warning(message: &str) {
    eprintln!("{}", warning(message, &OutputConfig::from_env()));
}

/// Print a failed command's error on stderr.
pub fn print_error(message: &str) {
    eprintln!("{}", error(message, &OutputConfig::from_env()));
}
