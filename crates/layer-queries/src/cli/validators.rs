//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::Operator;

/// Validate a comparison operator.
///
/// Delegates to [`Operator`]'s parser so the CLI and the expression builder
/// accept exactly the same set.
pub fn validate_operator(s: &str) -> Result<Operator, String> {
    s.trim().parse::<Operator>().map_err(|e| e.to_string())
}

/// Validate a query name.
///
/// Names are used verbatim as keys in the saved query file; only emptiness
/// and control characters are rejected.
pub fn validate_query_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Query name cannot be empty".to_string());
    }

    if let Some(pos) = s.chars().position(char::is_control) {
        return Err(format!(
            "Query name contains invalid control character at position {pos}"
        ));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("=", Operator::Eq)]
    #[case(">=", Operator::Ge)]
    #[case(" != ", Operator::Ne)]
    #[case("LIKE", Operator::Like)]
    fn operator_accepts_supported_forms(#[case] input: &str, #[case] expected: Operator) {
        assert_eq!(validate_operator(input), Ok(expected));
    }

    #[rstest]
    #[case("==")]
    #[case("like")]
    #[case("")]
    fn operator_rejects_unsupported_forms(#[case] input: &str) {
        let err = validate_operator(input).unwrap_err();
        assert!(err.contains("Invalid operator"));
    }

    #[test]
    fn query_name_keeps_inner_spaces() {
        assert_eq!(
            validate_query_name("Austin only"),
            Ok("Austin only".to_string())
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn query_name_rejects_blank(#[case] input: &str) {
        assert_eq!(
            validate_query_name(input),
            Err("Query name cannot be empty".to_string())
        );
    }

    #[test]
    fn query_name_rejects_control_characters() {
        let err = validate_query_name("bad\nname").unwrap_err();
        assert!(err.contains("position 3"));
    }
}
