//! Domain types for saved layer queries.
//!
//! A query is a named filter expression. The collection maps names to
//! expressions and remembers insertion order, which is the order the query
//! list is presented in.

use crate::error::ValidationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A saved query: a unique name and the filter expression it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Unique name of the query
    pub name: String,

    /// Filter expression applied to a layer
    pub expression: String,
}

/// Stored form of a query inside the persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuery {
    /// Filter expression
    pub expression: String,
}

/// Whether an upsert created a new entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No query with that name existed
    Added,

    /// An existing query was overwritten
    Replaced,
}

/// Name-to-expression mapping, persisted as `{"queries": {name: {"expression": ...}}}`.
///
/// Iteration follows insertion order. Overwriting a name keeps its position;
/// removing a name leaves the relative order of the rest untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCollection {
    #[serde(default)]
    queries: IndexMap<String, StoredQuery>,
}

impl QueryCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the expression stored under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> UpsertOutcome {
        let stored = StoredQuery {
            expression: expression.into(),
        };
        match self.queries.insert(name.into(), stored) {
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Added,
        }
    }

    /// Remove a query, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Query> {
        self.queries
            .shift_remove_entry(name)
            .map(|(name, stored)| Query {
                name,
                expression: stored.expression,
            })
    }

    /// Look up a query by name.
    pub fn get(&self, name: &str) -> Option<Query> {
        self.queries.get(name).map(|stored| Query {
            name: name.to_string(),
            expression: stored.expression.clone(),
        })
    }

    /// Whether a query with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.queries.contains_key(name)
    }

    /// Query names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }

    /// All queries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Query> + '_ {
        self.queries.iter().map(|(name, stored)| Query {
            name: name.clone(),
            expression: stored.expression.clone(),
        })
    }

    /// Number of saved queries
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the collection has no queries
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `=`
    #[default]
    #[serde(rename = "=")]
    Eq,

    /// `>`
    #[serde(rename = ">")]
    Gt,

    /// `<`
    #[serde(rename = "<")]
    Lt,

    /// `>=`
    #[serde(rename = ">=")]
    Ge,

    /// `<=`
    #[serde(rename = "<=")]
    Le,

    /// `!=`
    #[serde(rename = "!=")]
    Ne,

    /// `LIKE`
    #[serde(rename = "LIKE")]
    Like,
}

impl Operator {
    /// Every supported operator, in the order a builder offers them.
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Ne,
        Operator::Like,
    ];

    /// Textual form used inside expressions
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Ne => "!=",
            Operator::Like => "LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidOperator(s.to_string()))
    }
}

/// A single `field operator value` comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Attribute name
    pub field: String,

    /// Comparison operator
    pub operator: Operator,

    /// Value compared against, as text
    pub value: String,
}

impl FilterClause {
    /// Create a new clause
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_parses_every_textual_form() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn operator_rejects_unknown_and_lowercase() {
        assert_eq!(
            "like".parse::<Operator>(),
            Err(ValidationError::InvalidOperator("like".to_string()))
        );
        assert!("==".parse::<Operator>().is_err());
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut queries = QueryCollection::new();
        assert_eq!(queries.insert("a", "x"), UpsertOutcome::Added);
        assert_eq!(queries.insert("b", "y"), UpsertOutcome::Added);
        assert_eq!(queries.insert("a", "z"), UpsertOutcome::Replaced);

        assert_eq!(queries.len(), 2);
        assert_eq!(queries.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(queries.get("a").unwrap().expression, "z");
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut queries = QueryCollection::new();
        queries.insert("c", "1");
        queries.insert("a", "2");
        queries.insert("b", "3");

        let removed = queries.remove("a").unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(queries.names().collect::<Vec<_>>(), vec!["c", "b"]);
        assert!(queries.remove("a").is_none());
    }

    #[test]
    fn collection_serializes_to_queries_document() {
        let mut queries = QueryCollection::new();
        queries.insert("q1", "\"city\" = 'Austin'");

        let json = serde_json::to_value(&queries).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"queries": {"q1": {"expression": "\"city\" = 'Austin'"}}})
        );
    }

    #[test]
    fn document_without_queries_key_is_empty() {
        let queries: QueryCollection = serde_json::from_str("{}").unwrap();
        assert!(queries.is_empty());
    }
}
