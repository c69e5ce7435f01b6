//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;

use super::validators::{validate_operator, validate_query_name};
use crate::domain::Operator;

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Show each query's expression next to its name
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Query name
    pub name: String,
}

/// Arguments for the `add` command
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Query name; an existing query with this name is replaced
    #[arg(short, long, value_parser = validate_query_name)]
    pub name: String,

    /// Field (attribute) name
    #[arg(short, long)]
    pub field: String,

    /// Comparison operator: =, >, <, >=, <=, !=, LIKE
    #[arg(short, long, value_parser = validate_operator, default_value = "=")]
    pub operator: Operator,

    /// Value to compare against
    #[arg(short, long)]
    pub value: String,
}

/// Arguments for the `update` command
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Name of the query to update
    pub name: String,

    /// New expression, used verbatim
    #[arg(short, long)]
    pub expression: String,
}

/// Arguments for the `delete` command
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Name of the query to delete
    pub name: String,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug, Clone)]
pub struct EditArgs {
    /// Name of the query to re-open
    pub name: String,
}

/// Arguments for the `apply` command
#[derive(Parser, Debug, Clone)]
pub struct ApplyArgs {
    /// Name of the saved query to apply
    pub name: String,

    /// Layer to filter
    #[arg(short, long)]
    pub layer: String,
}

/// Arguments for the `test` command
#[derive(Parser, Debug, Clone)]
pub struct TestArgs {
    /// Layer to filter
    #[arg(short, long)]
    pub layer: String,

    /// Field (attribute) name
    #[arg(short, long)]
    pub field: String,

    /// Comparison operator: =, >, <, >=, <=, !=, LIKE
    #[arg(short, long, value_parser = validate_operator, default_value = "=")]
    pub operator: Operator,

    /// Value to compare against
    #[arg(short, long)]
    pub value: String,
}

/// Arguments for the `clear` command
#[derive(Parser, Debug, Clone)]
pub struct ClearArgs {
    /// Layer whose filter is removed
    #[arg(short, long)]
    pub layer: String,
}

/// Arguments for the `layers` command
#[derive(Parser, Debug, Clone)]
pub struct LayersArgs {}

/// Arguments for the `fields` command
#[derive(Parser, Debug, Clone)]
pub struct FieldsArgs {
    /// Layer to inspect
    #[arg(short, long)]
    pub layer: String,

    /// Only show fields containing this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,
}

/// Arguments for the `values` command
#[derive(Parser, Debug, Clone)]
pub struct ValuesArgs {
    /// Layer to inspect
    #[arg(short, long)]
    pub layer: String,

    /// Field whose distinct values are listed
    #[arg(short, long)]
    pub field: String,

    /// Only show values containing this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,
}
