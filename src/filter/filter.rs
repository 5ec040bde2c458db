use crate::database::models::City;

use super::filter_where::{CityPredicate, FilterWhere};
use super::types::SqlResult;

/// Composable set of city predicates.
///
/// Blank inputs are ignored and values are trimmed before use, so a
/// filter built from raw query parameters never carries an empty term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    predicates: Vec<CityPredicate>,
}

impl CityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        if let Some(name) = non_blank(name) {
            self.predicates.push(CityPredicate::NameEquals(name));
        }
        self
    }

    pub fn search(mut self, search_query: Option<&str>) -> Self {
        if let Some(term) = non_blank(search_query) {
            self.predicates.push(CityPredicate::Search(term));
        }
        self
    }

    pub fn predicates(&self) -> &[CityPredicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, city: &City) -> bool {
        self.predicates.iter().all(|p| p.matches(city))
    }

    pub fn to_where_sql(&self) -> SqlResult {
        FilterWhere::generate(&self.predicates)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
