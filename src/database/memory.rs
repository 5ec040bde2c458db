use async_trait::async_trait;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{City, PointOfInterest};
use super::seed::seed_cities;
use super::store::{Change, EntityStore};
use crate::filter::{CityFilter, CityOrder, Page};

#[derive(Debug, Clone)]
struct MemoryState {
    cities: Vec<City>,
    next_point_id: i64,
}

impl MemoryState {
    fn city(&self, id: i64) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    fn city_mut(&mut self, id: i64) -> Result<&mut City, DatabaseError> {
        self.cities
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DatabaseError::CityNotFound(id))
    }

    fn apply(&mut self, change: &Change) -> Result<Option<i64>, DatabaseError> {
        match change {
            Change::AddPointOfInterest { city_id, point } => {
                let id = self.next_point_id;
                let city = self.city_mut(*city_id)?;
                city.points_of_interest
                    .push(point.clone().into_point_of_interest(id, *city_id));
                self.next_point_id += 1;
                Ok(Some(id))
            }
            Change::UpdatePointOfInterest(updated) => {
                let city = self.city_mut(updated.city_id)?;
                let existing = city
                    .points_of_interest
                    .iter_mut()
                    .find(|p| p.id == updated.id)
                    .ok_or(DatabaseError::PointOfInterestNotFound {
                        city_id: updated.city_id,
                        id: updated.id,
                    })?;
                existing.name = updated.name.clone();
                existing.description = updated.description.clone();
                Ok(None)
            }
            Change::DeletePointOfInterest { city_id, id } => {
                let city = self.city_mut(*city_id)?;
                let position = city
                    .points_of_interest
                    .iter()
                    .position(|p| p.id == *id)
                    .ok_or(DatabaseError::PointOfInterestNotFound {
                        city_id: *city_id,
                        id: *id,
                    })?;
                city.points_of_interest.remove(position);
                Ok(None)
            }
        }
    }
}

/// Store that keeps the whole dataset in process memory.
///
/// Point-of-interest ids come from a counter that only moves forward, so
/// an id is never handed out twice even after deletion.
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new(cities: Vec<City>) -> Self {
        let next_point_id = cities
            .iter()
            .flat_map(|c| c.points_of_interest.iter().map(|p| p.id))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: RwLock::new(MemoryState {
                cities,
                next_point_id,
            }),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_cities())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn count_cities(&self, filter: &CityFilter) -> Result<i64, DatabaseError> {
        let state = self.state.read().await;
        let count = state.cities.iter().filter(|c| filter.matches(c)).count();
        Ok(count as i64)
    }

    async fn select_cities(
        &self,
        filter: &CityFilter,
        order: &CityOrder,
        page: Option<&Page>,
    ) -> Result<Vec<City>, DatabaseError> {
        let state = self.state.read().await;
        let mut cities: Vec<City> = state
            .cities
            .iter()
            .filter(|c| filter.matches(c))
            .map(City::without_points_of_interest)
            .collect();
        order.sort(&mut cities);
        Ok(match page {
            Some(page) => page.slice(cities),
            None => cities,
        })
    }

    async fn find_city(&self, id: i64) -> Result<Option<City>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.city(id).map(City::without_points_of_interest))
    }

    async fn city_exists(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.state.read().await.city(id).is_some())
    }

    async fn points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
        let state = self.state.read().await;
        let mut points = state
            .city(city_id)
            .map(|c| c.points_of_interest.clone())
            .unwrap_or_default();
        points.sort_by_key(|p| p.id);
        Ok(points)
    }

    async fn find_point_of_interest(
        &self,
        city_id: i64,
        id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .city(city_id)
            .and_then(|c| c.points_of_interest.iter().find(|p| p.id == id))
            .cloned())
    }

    async fn apply(&self, changes: &[Change]) -> Result<Vec<Option<i64>>, DatabaseError> {
        let mut state = self.state.write().await;
        // Work on a copy so a failing change leaves the live state untouched.
        let mut next = state.clone();
        let assigned = changes
            .iter()
            .map(|change| next.apply(change))
            .collect::<Result<Vec<_>, _>>()?;
        *state = next;
        Ok(assigned)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewPointOfInterest;

    #[tokio::test]
    async fn seeded_store_lists_cities_by_name() {
        let store = MemoryStore::seeded();
        let cities = store
            .select_cities(&CityFilter::new(), &CityOrder::default(), None)
            .await
            .unwrap();
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Antwerp", "New York City", "Paris"]);
        assert!(cities.iter().all(|c| c.points_of_interest.is_empty()));
    }

    #[tokio::test]
    async fn additions_get_increasing_ids_that_are_not_reused() {
        let store = MemoryStore::seeded();
        let assigned = store
            .apply(&[Change::AddPointOfInterest {
                city_id: 2,
                point: NewPointOfInterest::new("MAS", None),
            }])
            .await
            .unwrap();
        assert_eq!(assigned, vec![Some(7)]);

        store
            .apply(&[Change::DeletePointOfInterest { city_id: 2, id: 7 }])
            .await
            .unwrap();
        let assigned = store
            .apply(&[Change::AddPointOfInterest {
                city_id: 2,
                point: NewPointOfInterest::new("Rubens House", None),
            }])
            .await
            .unwrap();
        assert_eq!(assigned, vec![Some(8)]);
    }

    #[tokio::test]
    async fn failing_batch_applies_nothing() {
        let store = MemoryStore::seeded();
        let result = store
            .apply(&[
                Change::DeletePointOfInterest { city_id: 1, id: 1 },
                Change::DeletePointOfInterest { city_id: 1, id: 99 },
            ])
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::PointOfInterestNotFound { city_id: 1, id: 99 })
        ));
        assert!(store.find_point_of_interest(1, 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn adding_to_unknown_city_fails() {
        let store = MemoryStore::seeded();
        let result = store
            .apply(&[Change::AddPointOfInterest {
                city_id: 42,
                point: NewPointOfInterest::new("Nowhere", None),
            }])
            .await;
        assert!(matches!(result, Err(DatabaseError::CityNotFound(42))));
    }

    #[tokio::test]
    async fn point_lookup_is_scoped_to_its_city() {
        let store = MemoryStore::seeded();
        assert!(store.find_point_of_interest(3, 5).await.unwrap().is_some());
        assert!(store.find_point_of_interest(1, 5).await.unwrap().is_none());
    }
}
