//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for layer-queries using
//! clap's derive API. Each command has its own argument struct.
//!
//! # Commands
//!
//! - `list`: List saved queries
//! - `show`: Print a saved query's expression
//! - `add`: Build a query from field, operator and value and save it
//! - `update`: Replace a saved query's expression
//! - `delete`: Delete a saved query
//! - `edit`: Show a saved query split back into builder inputs
//! - `apply`: Apply a saved query to a layer
//! - `test`: Apply a built expression to a layer without saving it
//! - `clear`: Remove a layer's filter
//! - `layers`, `fields`, `values`: Browse the project
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--dir`: Tool directory holding the query file, project and config
//!
//! # Example
//!
//! ```bash
//! layer-queries add --name austin --field city --operator = --value Austin
//! layer-queries apply austin --layer cities
//! layer-queries values --layer cities --field city --search aus
//! layer-queries clear --layer cities
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{
    AddArgs, ApplyArgs, ClearArgs, DeleteArgs, EditArgs, FieldsArgs, LayersArgs, ListArgs,
    ShowArgs, TestArgs, UpdateArgs, ValuesArgs,
};

pub use validators::{validate_operator, validate_query_name};

use crate::app::App;
use crate::config::{TOOL_DIR_ENV, installation_dir};
use crate::output::{self, OutputMode};

/// layer-queries - saved attribute filters for map layers
///
/// Build, save and apply single-clause filter expressions. Queries are stored
/// in `saved_queries.json` inside the tool directory.
#[derive(Parser, Debug)]
#[command(name = "layer-queries")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Tool directory (defaults to the executable's directory)
    #[arg(long, global = true, env = TOOL_DIR_ENV)]
    pub dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List saved queries
    List(ListArgs),

    /// Print the expression of a saved query
    Show(ShowArgs),

    /// Build a query and save it
    ///
    /// Composes `"field" OP 'value'` and stores it under the given name,
    /// replacing any query already saved under that name.
    Add(AddArgs),

    /// Replace the expression of a saved query
    ///
    /// The expression is stored as given; it is not rebuilt.
    Update(UpdateArgs),

    /// Delete a saved query
    Delete(DeleteArgs),

    /// Show a saved query split back into field, operator and value
    Edit(EditArgs),

    /// Apply a saved query as a layer's filter
    Apply(ApplyArgs),

    /// Apply a built expression to a layer without saving it
    Test(TestArgs),

    /// Remove the filter from a layer
    Clear(ClearArgs),

    /// List the project's layers
    Layers(LayersArgs),

    /// List a layer's fields
    Fields(FieldsArgs),

    /// List the distinct values of a layer's field
    Values(ValuesArgs),
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns clap's error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Open the application for the configured tool directory.
    ///
    /// A saved query file that fails to load is reported as a warning and
    /// the command continues with no saved queries.
    fn open_app(&self) -> Result<App> {
        let tool_dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => installation_dir()?,
        };

        let (app, load_error) = App::from_directory(&tool_dir)?;
        if let Some(e) = load_error {
            output::print_warning(&format!("Failed to load saved queries: {e}"));
        }
        Ok(app)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns the command's error; the binary prints it and exits non-zero.
    pub fn execute(&self) -> Result<()> {
        let mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("layer-queries: saved attribute filters for map layers");
            println!("Use --help for more information");
            return Ok(());
        };

        let mut app = self.open_app()?;

        match command {
            Commands::List(args) => execute::execute_list(&app, args, mode),
            Commands::Show(args) => execute::execute_show(&app, args, mode),
            Commands::Add(args) => execute::execute_add(&mut app, args, mode),
            Commands::Update(args) => execute::execute_update(&mut app, args, mode),
            Commands::Delete(args) => execute::execute_delete(&mut app, args, mode),
            Commands::Edit(args) => execute::execute_edit(&app, args, mode),
            Commands::Apply(args) => execute::execute_apply(&mut app, args, mode),
            Commands::Test(args) => execute::execute_test(&mut app, args, mode),
            Commands::Clear(args) => execute::execute_clear(&mut app, args, mode),
            Commands::Layers(args) => execute::execute_layers(&app, args, mode),
            Commands::Fields(args) => execute::execute_fields(&app, args, mode),
            Commands::Values(args) => execute::execute_values(&app, args, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operator;

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["layer-queries"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["layer-queries", "list", "--json", "--dir", "/opt/lq"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.dir, Some(PathBuf::from("/opt/lq")));
        assert!(matches!(cli.command, Some(Commands::List(_))));
    }

    #[test]
    fn test_parse_add_defaults_operator() {
        let cli = Cli::try_parse_from([
            "layer-queries",
            "add",
            "--name",
            "q1",
            "--field",
            "city",
            "--value",
            "Austin",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.name, "q1");
                assert_eq!(args.operator, Operator::Eq);
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_parse_add_like_operator() {
        let cli = Cli::try_parse_from([
            "layer-queries", "add", "-n", "q", "-f", "name", "-o", "LIKE", "-v", "%ton",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.operator, Operator::Like),
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_parse_add_rejects_bad_operator() {
        let result = Cli::try_parse_from([
            "layer-queries", "add", "-n", "q", "-f", "a", "-o", "<>", "-v", "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_rejects_blank_name() {
        let result = Cli::try_parse_from([
            "layer-queries", "add", "-n", " ", "-f", "a", "-v", "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_apply_requires_layer() {
        assert!(Cli::try_parse_from(["layer-queries", "apply", "q1"]).is_err());
        let cli = Cli::try_parse_from(["layer-queries", "apply", "q1", "-l", "cities"]).unwrap();
        match cli.command {
            Some(Commands::Apply(args)) => {
                assert_eq!(args.name, "q1");
                assert_eq!(args.layer, "cities");
            }
            _ => panic!("Expected Apply command"),
        }
    }

    #[test]
    fn test_parse_values_search_defaults_empty() {
        let cli =
            Cli::try_parse_from(["layer-queries", "values", "-l", "cities", "-f", "city"]).unwrap();
        match cli.command {
            Some(Commands::Values(args)) => assert!(args.search.is_empty()),
            _ => panic!("Expected Values command"),
        }
    }
}
