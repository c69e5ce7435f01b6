//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;
use serde_json::json;

use super::args::{
    AddArgs, ApplyArgs, ClearArgs, DeleteArgs, EditArgs, FieldsArgs, LayersArgs, ListArgs,
    ShowArgs, TestArgs, UpdateArgs, ValuesArgs,
};
use crate::app::App;
use crate::domain::{Query, UpsertOutcome};
use crate::error::Error;
use crate::host::LayerHost;
use crate::output::{self, OutputMode};

/// Attach a restart warning to save failures; the change did not reach disk.
fn unsaved(err: Error) -> anyhow::Error {
    if matches!(err, Error::Persistence(_)) {
        anyhow::Error::new(err).context("The change was not saved and will not survive a restart")
    } else {
        err.into()
    }
}

/// Execute the list command
pub fn execute_list<H: LayerHost>(app: &App<H>, args: &ListArgs, mode: OutputMode) -> Result<()> {
    let queries: Vec<Query> = app.store().queries().iter().collect();

    match mode {
        OutputMode::Text if !args.long => {
            output::print_names(&app.list_names(), "No saved queries", mode)?;
        }
        _ => output::print_queries(&queries, mode)?,
    }

    Ok(())
}

/// Execute the show command
pub fn execute_show<H: LayerHost>(app: &App<H>, args: &ShowArgs, mode: OutputMode) -> Result<()> {
    let query = app.get(&args.name)?;

    match mode {
        OutputMode::Json => output::print_json(&query)?,
        OutputMode::Text => println!("{}", query.expression),
    }

    Ok(())
}

/// Execute the add command
pub fn execute_add<H: LayerHost>(app: &mut App<H>, args: &AddArgs, mode: OutputMode) -> Result<()> {
    let (query, outcome) = app
        .add_or_update(&args.name, &args.field, args.operator.as_str(), &args.value)
        .map_err(unsaved)?;

    match mode {
        OutputMode::Json => output::print_json(&json!({
            "name": query.name,
            "expression": query.expression,
            "outcome": outcome,
        }))?,
        OutputMode::Text => {
            let verb = match outcome {
                UpsertOutcome::Added => "added",
                UpsertOutcome::Replaced => "updated",
            };
            output::print_success(&format!("Query '{}' {verb}.", query.name));
            println!("  {}", query.expression);
        }
    }

    Ok(())
}

/// Execute the update command
pub fn execute_update<H: LayerHost>(
    app: &mut App<H>,
    args: &UpdateArgs,
    mode: OutputMode,
) -> Result<()> {
    let query = app
        .update(Some(args.name.as_str()), &args.expression)
        .map_err(unsaved)?;

    match mode {
        OutputMode::Json => output::print_json(&query)?,
        OutputMode::Text => output::print_success(&format!("Query '{}' updated.", query.name)),
    }

    Ok(())
}

/// Execute the delete command
pub fn execute_delete<H: LayerHost>(
    app: &mut App<H>,
    args: &DeleteArgs,
    mode: OutputMode,
) -> Result<()> {
    let query = app.delete(Some(args.name.as_str())).map_err(unsaved)?;

    match mode {
        OutputMode::Json => output::print_json(&json!({ "deleted": query.name }))?,
        OutputMode::Text => output::print_success(&format!("Query '{}' deleted.", query.name)),
    }

    Ok(())
}

/// Execute the edit command
pub fn execute_edit<H: LayerHost>(app: &App<H>, args: &EditArgs, mode: OutputMode) -> Result<()> {
    let form = app.load_for_editing(Some(args.name.as_str()))?;
    output::print_edit_form(&form, mode)?;
    Ok(())
}

/// Execute the apply command
pub fn execute_apply<H: LayerHost>(
    app: &mut App<H>,
    args: &ApplyArgs,
    mode: OutputMode,
) -> Result<()> {
    let query = app.apply(Some(args.layer.as_str()), Some(args.name.as_str()))?;

    match mode {
        OutputMode::Json => output::print_json(&json!({
            "layer": args.layer,
            "query": query.name,
            "expression": query.expression,
        }))?,
        OutputMode::Text => output::print_success(&format!(
            "Query '{}' applied to layer '{}'",
            query.name, args.layer
        )),
    }

    Ok(())
}

/// Execute the test command
pub fn execute_test<H: LayerHost>(app: &mut App<H>, args: &TestArgs, mode: OutputMode) -> Result<()> {
    let expression = app.test(
        Some(args.layer.as_str()),
        &args.field,
        args.operator.as_str(),
        &args.value,
    )?;

    match mode {
        OutputMode::Json => output::print_json(&json!({
            "layer": args.layer,
            "expression": expression,
        }))?,
        OutputMode::Text => output::print_success(&format!("Query tested: {expression}")),
    }

    Ok(())
}

/// Execute the clear command
pub fn execute_clear<H: LayerHost>(
    app: &mut App<H>,
    args: &ClearArgs,
    mode: OutputMode,
) -> Result<()> {
    app.clear(Some(args.layer.as_str()))?;

    match mode {
        OutputMode::Json => output::print_json(&json!({ "layer": args.layer, "cleared": true }))?,
        OutputMode::Text => {
            output::print_success(&format!("Filter cleared on layer '{}'", args.layer));
        }
    }

    Ok(())
}

/// Execute the layers command
pub fn execute_layers<H: LayerHost>(app: &App<H>, _args: &LayersArgs, mode: OutputMode) -> Result<()> {
    output::print_names(&app.layers(), "No layers available", mode)?;
    Ok(())
}

/// Execute the fields command
pub fn execute_fields<H: LayerHost>(app: &App<H>, args: &FieldsArgs, mode: OutputMode) -> Result<()> {
    let fields = app.fields(&args.layer, &args.search)?;
    let placeholder = if args.search.is_empty() {
        "No fields available"
    } else {
        "No matching fields"
    };
    output::print_names(&fields, placeholder, mode)?;
    Ok(())
}

/// Execute the values command
pub fn execute_values<H: LayerHost>(app: &App<H>, args: &ValuesArgs, mode: OutputMode) -> Result<()> {
    let values = app.values(&args.layer, &args.field, &args.search)?;
    let placeholder = if args.search.is_empty() {
        "No values available"
    } else {
        "No matching values"
    };
    output::print_names(&values, placeholder, mode)?;
    Ok(())
}
