use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{City, NewPointOfInterest, PointOfInterest};
use crate::filter::{CityFilter, CityOrder, Page};

/// A staged mutation, applied by [`EntityStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    AddPointOfInterest { city_id: i64, point: NewPointOfInterest },
    UpdatePointOfInterest(PointOfInterest),
    DeletePointOfInterest { city_id: i64, id: i64 },
}

/// Storage backend for cities and their points of interest.
///
/// Reads see committed state only. Cities returned by the city queries
/// never carry their points of interest; callers load those separately.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn count_cities(&self, filter: &CityFilter) -> Result<i64, DatabaseError>;

    /// Filter, then order, then page. `page = None` returns every match.
    async fn select_cities(
        &self,
        filter: &CityFilter,
        order: &CityOrder,
        page: Option<&Page>,
    ) -> Result<Vec<City>, DatabaseError>;

    async fn find_city(&self, id: i64) -> Result<Option<City>, DatabaseError>;

    async fn city_exists(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Points of interest of a city in id order. Empty when the city is unknown.
    async fn points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError>;

    async fn find_point_of_interest(
        &self,
        city_id: i64,
        id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError>;

    /// Apply every change or none of them. The result has one entry per
    /// change, holding the identity assigned to each addition.
    async fn apply(&self, changes: &[Change]) -> Result<Vec<Option<i64>>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
