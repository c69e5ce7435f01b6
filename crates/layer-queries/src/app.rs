//! Application context for query management.
//!
//! [`App`] ties a [`QueryStore`] to a [`LayerHost`] and exposes the actions a
//! query manager offers: build and save, update, delete, apply, test, clear,
//! re-open for editing, and the field/value pickers with search. User
//! selections are plain arguments; `None` means nothing was selected.
//!
//! # Example
//!
//! ```no_run
//! use layer_queries::app::App;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let (mut app, load_error) = App::from_directory(Path::new("/opt/layer-queries"))?;
//!     if let Some(e) = load_error {
//!         eprintln!("{e}");
//!     }
//!     app.add_or_update("austin", "city", "=", "Austin")?;
//!     app.apply(Some("cities"), Some("austin"))?;
//!     Ok(())
//! }
//! ```

use crate::config::Config;
use crate::domain::{FilterClause, Query, UpsertOutcome};
use crate::error::{Error, HostError, Result, ValidationError};
use crate::expression;
use crate::host::{LayerHost, ProjectHost};
use crate::search::filter_by_substring;
use crate::storage::QueryStore;
use serde::Serialize;
use std::path::Path;

/// A saved query re-opened in a builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditForm {
    /// Query name
    pub name: String,

    /// Parsed clause of the stored expression
    #[serde(flatten)]
    pub clause: FilterClause,
}

/// Query manager over a store and a layer host.
#[derive(Debug)]
pub struct App<H = ProjectHost> {
    store: QueryStore,
    host: H,
}

impl App<ProjectHost> {
    /// Create an App from a tool directory.
    ///
    /// Reads `config.yaml`, opens the saved query file and the project file.
    /// A query file that fails to load does not abort startup: the store
    /// starts empty and the load error is returned for reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the project file
    /// cannot be read.
    pub fn from_directory(tool_dir: &Path) -> Result<(Self, Option<Error>)> {
        let config = Config::load_from_dir(tool_dir)?;
        let (store, load_error) = QueryStore::open_or_empty(config.store_path(tool_dir));
        let host = ProjectHost::open(config.project_path(tool_dir))?;
        tracing::debug!(tool_dir = %tool_dir.display(), "Application context ready");
        Ok((Self::new(store, host), load_error))
    }
}

impl<H: LayerHost> App<H> {
    /// Create an App from its parts
    pub fn new(store: QueryStore, host: H) -> Self {
        Self { store, host }
    }

    /// The query store
    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    /// The layer host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Saved query names, in list order.
    pub fn list_names(&self) -> Vec<String> {
        self.store.list_names()
    }

    /// A saved query by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueryNotFound`] if no such query is saved.
    pub fn get(&self, name: &str) -> Result<Query> {
        self.store
            .get(name)
            .ok_or_else(|| Error::QueryNotFound(name.to_string()))
    }

    /// Build an expression from the picker inputs and save it under `name`,
    /// replacing any query with that name.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if any input is empty
    ///   ([`ValidationError::IncompleteQuery`]) or the operator is unknown.
    /// - [`Error::Persistence`] if saving fails; the query is kept in memory.
    pub fn add_or_update(
        &mut self,
        name: &str,
        field: &str,
        operator: &str,
        value: &str,
    ) -> Result<(Query, UpsertOutcome)> {
        if [name, field, value].iter().any(|input| input.is_empty()) {
            return Err(ValidationError::IncompleteQuery.into());
        }
        let expression = expression::build(field, operator, value)?;
        let outcome = self.store.upsert(name, &expression)?;
        Ok((
            Query {
                name: name.to_string(),
                expression,
            },
            outcome,
        ))
    }

    /// Replace the selected query's expression with a hand-edited one.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if nothing is selected or the expression is empty.
    /// - [`Error::QueryNotFound`] if the selected query is not saved.
    /// - [`Error::Persistence`] if saving fails.
    pub fn update(&mut self, selection: Option<&str>, expression: &str) -> Result<Query> {
        let name = require(selection, "query to update")?;
        self.store.update(name, expression)?;
        Ok(Query {
            name: name.to_string(),
            expression: expression.to_string(),
        })
    }

    /// Delete the selected query.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if nothing is selected.
    /// - [`Error::QueryNotFound`] if the selected query is not saved.
    /// - [`Error::Persistence`] if saving fails.
    pub fn delete(&mut self, selection: Option<&str>) -> Result<Query> {
        let name = require(selection, "query to delete")?;
        self.store.delete(name)
    }

    /// Apply the selected query as the filter of the selected layer.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if no layer or no query is selected.
    /// - [`Error::Host`] if the layer does not exist or the host fails.
    /// - [`Error::QueryNotFound`] if the selected query is not saved.
    pub fn apply(&mut self, layer: Option<&str>, selection: Option<&str>) -> Result<Query> {
        let layer = self.require_layer(layer)?;
        let name = require(selection, "query to apply")?;
        let query = self.get(name)?;
        self.host.apply_filter(layer, &query.expression)?;
        Ok(query)
    }

    /// Build an expression and apply it to the layer without saving it.
    ///
    /// Returns the applied expression.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if no layer is selected, the field or value is
    ///   empty ([`ValidationError::MissingFieldOrValue`]), or the operator is
    ///   unknown.
    /// - [`Error::Host`] if the layer does not exist or the host fails.
    pub fn test(
        &mut self,
        layer: Option<&str>,
        field: &str,
        operator: &str,
        value: &str,
    ) -> Result<String> {
        let layer = self.require_layer(layer)?;
        if field.is_empty() || value.is_empty() {
            return Err(ValidationError::MissingFieldOrValue.into());
        }
        let expression = expression::build(field, operator, value)?;
        self.host.apply_filter(layer, &expression)?;
        Ok(expression)
    }

    /// Remove any filter from the selected layer.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if no layer is selected.
    /// - [`Error::Host`] if the layer does not exist or the host fails.
    pub fn clear(&mut self, layer: Option<&str>) -> Result<()> {
        let layer = self.require_layer(layer)?;
        self.host.apply_filter(layer, "")?;
        Ok(())
    }

    /// Re-open a saved query as builder inputs.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if nothing is selected or the stored expression
    ///   is not a single builder clause.
    /// - [`Error::QueryNotFound`] if the selected query is not saved.
    pub fn load_for_editing(&self, selection: Option<&str>) -> Result<EditForm> {
        let name = require(selection, "query to edit")?;
        let query = self.get(name)?;
        let clause = expression::parse(&query.expression)?;
        Ok(EditForm {
            name: query.name,
            clause,
        })
    }

    /// Layer names offered by the host.
    pub fn layers(&self) -> Vec<String> {
        self.host.list_layers()
    }

    /// Fields of `layer` containing `search` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Host`] if the layer does not exist.
    pub fn fields(&self, layer: &str, search: &str) -> Result<Vec<String>> {
        let fields = self.host.list_fields(layer)?;
        Ok(owned(filter_by_substring(&fields, search)))
    }

    /// Distinct values of `field` on `layer` containing `search` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Host`] if the layer or field does not exist.
    pub fn values(&self, layer: &str, field: &str, search: &str) -> Result<Vec<String>> {
        let values = self.host.list_unique_values(layer, field)?;
        Ok(owned(filter_by_substring(&values, search)))
    }

    fn require_layer<'a>(&self, layer: Option<&'a str>) -> Result<&'a str> {
        let layer = require(layer, "valid layer")?;
        if !self.host.has_layer(layer) {
            return Err(HostError::LayerNotFound(layer.to_string()).into());
        }
        Ok(layer)
    }
}

fn require<'a>(selection: Option<&'a str>, what: &'static str) -> Result<&'a str> {
    selection
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::MissingSelection(what).into())
}

fn owned(items: Vec<&str>) -> Vec<String> {
    items.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operator;
    use crate::host::Layer;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        let layer = Layer::new("cities", &["city", "state"])
            .with_feature(json!({"city": "Austin", "state": "TX"}))
            .with_feature(json!({"city": "Boston", "state": "MA"}));
        App::new(
            QueryStore::new(dir.path().join("saved_queries.json")),
            ProjectHost::new(vec![layer]),
        )
    }

    #[test]
    fn add_or_update_builds_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let (query, outcome) = app.add_or_update("tx", "state", "=", "TX").unwrap();
        assert_eq!(outcome, UpsertOutcome::Added);
        assert_eq!(query.expression, "\"state\" = 'TX'");
        assert!(app.store().path().exists());

        let (_, outcome) = app.add_or_update("tx", "state", "!=", "TX").unwrap();
        assert_eq!(outcome, UpsertOutcome::Replaced);
        assert_eq!(app.list_names(), vec!["tx"]);
    }

    #[test]
    fn add_or_update_requires_every_input() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        for (name, field, value) in [("", "state", "TX"), ("tx", "", "TX"), ("tx", "state", "")] {
            let err = app.add_or_update(name, field, "=", value).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::IncompleteQuery)
            ));
            assert_eq!(err.to_string(), "Please fill out all fields to create a query");
        }
        assert!(!app.store().path().exists());
    }

    #[test]
    fn test_requires_field_and_value() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        for (field, value) in [("", "Austin"), ("city", "")] {
            let err = app.test(Some("cities"), field, "=", value).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::MissingFieldOrValue)
            ));
            assert_eq!(err.to_string(), "Please select a field and value");
        }
        assert_eq!(app.host().subset_string("cities"), Some(""));
    }

    #[test]
    fn missing_selection_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        for err in [
            app.delete(None).unwrap_err(),
            app.update(None, "\"a\" = 'b'").unwrap_err(),
            app.apply(Some("cities"), None).unwrap_err(),
            app.load_for_editing(Some("")).unwrap_err(),
        ] {
            assert!(
                matches!(err, Error::Validation(ValidationError::MissingSelection(_))),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn apply_sets_layer_subset() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.add_or_update("boston", "city", "=", "Boston").unwrap();

        let query = app.apply(Some("cities"), Some("boston")).unwrap();
        assert_eq!(
            app.host().subset_string("cities"),
            Some(query.expression.as_str())
        );
    }

    #[test]
    fn apply_checks_layer_before_query() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let err = app.apply(None, None).unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid layer");

        let err = app.apply(Some("rivers"), Some("q")).unwrap_err();
        assert!(matches!(err, Error::Host(HostError::LayerNotFound(_))));
    }

    #[test]
    fn apply_unknown_query_leaves_layer_untouched() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let err = app.apply(Some("cities"), Some("ghost")).unwrap_err();
        assert!(matches!(err, Error::QueryNotFound(_)));
        assert_eq!(app.host().subset_string("cities"), Some(""));
    }

    #[test]
    fn test_applies_without_saving_then_clear_resets() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let expr = app.test(Some("cities"), "state", "LIKE", "T%").unwrap();
        assert_eq!(expr, "\"state\" LIKE 'T%'");
        assert_eq!(app.host().subset_string("cities"), Some(expr.as_str()));
        assert!(app.list_names().is_empty());
        assert!(!app.store().path().exists());

        app.clear(Some("cities")).unwrap();
        assert_eq!(app.host().subset_string("cities"), Some(""));
    }

    #[test]
    fn load_for_editing_parses_stored_expression() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.add_or_update("big", "pop", ">=", "1000").unwrap();

        let form = app.load_for_editing(Some("big")).unwrap();
        assert_eq!(form.name, "big");
        assert_eq!(form.clause, FilterClause::new("pop", Operator::Ge, "1000"));
    }

    #[test]
    fn pickers_filter_by_search_text() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        assert_eq!(app.layers(), vec!["cities"]);
        assert_eq!(app.fields("cities", "").unwrap(), vec!["city", "state"]);
        assert_eq!(app.fields("cities", "ST").unwrap(), vec!["state"]);
        assert_eq!(app.values("cities", "city", "bos").unwrap(), vec!["Boston"]);
        assert!(app.values("cities", "city", "dallas").unwrap().is_empty());
    }
}
