use std::cmp::Ordering;

use crate::database::models::City;

/// Ordering for city listings: name ascending, ties broken by id so that
/// paging through a listing is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CityOrder;

impl CityOrder {
    pub fn compare(&self, a: &City, b: &City) -> Ordering {
        a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
    }

    pub fn sort(&self, cities: &mut [City]) {
        cities.sort_by(|a, b| self.compare(a, b));
    }

    pub fn to_sql(&self) -> &'static str {
        "ORDER BY \"name\" ASC, \"id\" ASC"
    }
}
