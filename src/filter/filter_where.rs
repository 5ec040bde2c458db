use crate::database::models::City;

use super::types::SqlResult;

/// A single predicate over cities. Predicates in a filter are ANDed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityPredicate {
    /// Exact, case-sensitive name equality.
    NameEquals(String),
    /// Name or description contains the term, ignoring ASCII case.
    Search(String),
}

impl CityPredicate {
    pub fn matches(&self, city: &City) -> bool {
        match self {
            CityPredicate::NameEquals(name) => city.name == *name,
            CityPredicate::Search(term) => {
                contains_ignore_case(&city.name, term)
                    || city
                        .description
                        .as_deref()
                        .is_some_and(|d| contains_ignore_case(d, term))
            }
        }
    }

    fn to_sql(&self, params: &mut Vec<String>) -> String {
        match self {
            CityPredicate::NameEquals(name) => {
                params.push(name.clone());
                "\"name\" = ?".to_string()
            }
            CityPredicate::Search(term) => {
                params.push(term.clone());
                params.push(term.clone());
                "(instr(lower(\"name\"), lower(?)) > 0 OR (\"description\" IS NOT NULL AND instr(lower(\"description\"), lower(?)) > 0))".to_string()
            }
        }
    }
}

/// Folds ASCII letters only, the same rule as SQLite's `lower()`, so both
/// stores agree on which cities match.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

pub struct FilterWhere;

impl FilterWhere {
    pub fn generate(predicates: &[CityPredicate]) -> SqlResult {
        let mut params = Vec::new();
        let conditions: Vec<String> = predicates.iter().map(|p| p.to_sql(&mut params)).collect();
        let query = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        };
        SqlResult { query, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> City {
        City::new(3, "Paris", Some("The one with the big tower."))
    }

    #[test]
    fn name_equality_is_case_sensitive() {
        assert!(CityPredicate::NameEquals("Paris".into()).matches(&paris()));
        assert!(!CityPredicate::NameEquals("paris".into()).matches(&paris()));
        assert!(!CityPredicate::NameEquals("Par".into()).matches(&paris()));
    }

    #[test]
    fn search_looks_at_name_and_description() {
        assert!(CityPredicate::Search("par".into()).matches(&paris()));
        assert!(CityPredicate::Search("TOWER".into()).matches(&paris()));
        assert!(!CityPredicate::Search("cathedral".into()).matches(&paris()));
    }

    #[test]
    fn search_folds_ascii_case_only() {
        let evora = City::new(7, "Évora", None);
        assert!(CityPredicate::Search("VORA".into()).matches(&evora));
        assert!(CityPredicate::Search("Év".into()).matches(&evora));
        assert!(!CityPredicate::Search("év".into()).matches(&evora));
    }

    #[test]
    fn search_tolerates_missing_description() {
        let city = City::new(9, "Ghent", None);
        assert!(!CityPredicate::Search("tower".into()).matches(&city));
        assert!(CityPredicate::Search("gh".into()).matches(&city));
    }

    #[test]
    fn generates_parameterized_sql() {
        let sql = FilterWhere::generate(&[
            CityPredicate::NameEquals("Paris".into()),
            CityPredicate::Search("tower".into()),
        ]);
        assert!(sql.query.starts_with("\"name\" = ? AND ("));
        assert_eq!(sql.params, vec!["Paris", "tower", "tower"]);
    }

    #[test]
    fn empty_where_is_tautology() {
        let sql = FilterWhere::generate(&[]);
        assert_eq!(sql.query, "1=1");
        assert!(sql.params.is_empty());
    }
}
