//! Single-clause filter expressions.
//!
//! Expressions have the fixed shape `"field" OP 'value'`, which is what the
//! host's subset-filter contract accepts. Nothing else is composed here: no
//! AND/OR, ranges or nesting.
//!
//! [`parse`] is only an inverse of [`build`] for re-populating a builder. It
//! splits on the first two whitespace runs and trims quote characters, so a
//! field containing whitespace, or a value that itself starts or ends with a
//! single quote, does not survive the trip. Saved files carry no format
//! version, so the quoting stays as it is.

use crate::domain::{FilterClause, Operator};
use crate::error::ValidationError;

/// Build an expression from a field, the textual form of an operator and a value.
///
/// # Errors
///
/// Returns [`ValidationError`] if `field` or `value` is empty or `operator`
/// is not one of `=`, `>`, `<`, `>=`, `<=`, `!=`, `LIKE`.
///
/// # Examples
///
/// ```
/// use layer_queries::expression::build;
///
/// let expr = build("city", "=", "Austin").unwrap();
/// assert_eq!(expr, "\"city\" = 'Austin'");
/// ```
pub fn build(field: &str, operator: &str, value: &str) -> Result<String, ValidationError> {
    validate_operands(field, value)?;
    let operator: Operator = operator.parse()?;
    render(&FilterClause::new(field, operator, value))
}

/// Build an expression from an already-typed clause.
///
/// # Errors
///
/// Returns [`ValidationError`] if the clause's field or value is empty.
pub fn render(clause: &FilterClause) -> Result<String, ValidationError> {
    validate_operands(&clause.field, &clause.value)?;
    Ok(format!(
        "\"{}\" {} '{}'",
        clause.field, clause.operator, clause.value
    ))
}

/// Split an expression back into its field, operator and value.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedExpression`] when the expression has
/// fewer than three whitespace-separated parts, and
/// [`ValidationError::InvalidOperator`] when the middle part is not a
/// supported operator.
///
/// # Examples
///
/// ```
/// use layer_queries::domain::Operator;
/// use layer_queries::expression::parse;
///
/// let clause = parse("\"pop\" >= '1000'").unwrap();
/// assert_eq!(clause.field, "pop");
/// assert_eq!(clause.operator, Operator::Ge);
/// assert_eq!(clause.value, "1000");
/// ```
pub fn parse(expression: &str) -> Result<FilterClause, ValidationError> {
    let malformed = || ValidationError::MalformedExpression(expression.to_string());

    let (field, rest) = expression
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;
    let (operator, value) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;

    let operator: Operator = operator.parse()?;
    let value = value.trim_start();

    Ok(FilterClause {
        field: field.trim_matches('"').to_string(),
        operator,
        value: value.trim_matches('\'').to_string(),
    })
}

fn validate_operands(field: &str, value: &str) -> Result<(), ValidationError> {
    if field.is_empty() {
        return Err(ValidationError::EmptyField);
    }
    if value.is_empty() {
        return Err(ValidationError::EmptyValue);
    }
    Ok(())
}
