//! Substring search over field and value lists.
//!
//! Used to narrow a picker while the user types. Results are recomputed from
//! the full list on every call and never stored.

/// Items containing `needle`, compared case-insensitively, in input order.
///
/// An empty needle matches everything.
///
/// # Examples
///
/// ```
/// use layer_queries::search::filter_by_substring;
///
/// let fields = ["CITY_NAME", "population", "County"];
/// assert_eq!(filter_by_substring(&fields, "cit"), vec!["CITY_NAME"]);
/// assert_eq!(filter_by_substring(&fields, "c"), vec!["CITY_NAME", "County"]);
/// ```
pub fn filter_by_substring<'a, S: AsRef<str>>(items: &'a [S], needle: &str) -> Vec<&'a str> {
    let needle = needle.to_lowercase();
    items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| item.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_needle_returns_all_items() {
        let values = vec!["Austin".to_string(), "Dallas".to_string()];
        assert_eq!(filter_by_substring(&values, ""), vec!["Austin", "Dallas"]);
    }

    #[test]
    fn match_is_case_insensitive_both_ways() {
        let values = ["austin", "DALLAS", "El Paso"];
        assert_eq!(filter_by_substring(&values, "AUS"), vec!["austin"]);
        assert_eq!(filter_by_substring(&values, "las"), vec!["DALLAS"]);
        assert_eq!(filter_by_substring(&values, "l p"), vec!["El Paso"]);
    }

    #[test]
    fn no_match_is_empty() {
        let values = ["Austin"];
        assert!(filter_by_substring(&values, "houston").is_empty());
    }

    #[test]
    fn input_order_is_preserved() {
        let values = ["b-one", "a-one", "c-one"];
        assert_eq!(
            filter_by_substring(&values, "one"),
            vec!["b-one", "a-one", "c-one"]
        );
    }
}
