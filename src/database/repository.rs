use std::sync::Arc;

use tracing::{debug, error};

use super::manager::DatabaseError;
use super::models::{City, NewPointOfInterest, PointOfInterest};
use super::store::{Change, EntityStore};
use crate::filter::{CityFilter, CityOrder, CityQuery, PaginationMetadata};

/// Handle for a point of interest staged by [`CityInfoRepository::add_point_of_interest`].
/// Resolve it with [`CityInfoRepository::assigned_id`] after a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPoint {
    batch: u64,
    index: usize,
}

/// Request-scoped unit of work over an [`EntityStore`].
///
/// Reads go straight to the store. Writes are staged in memory and only
/// reach the store on [`commit`](Self::commit), which is also where new
/// points of interest receive their ids.
pub struct CityInfoRepository {
    store: Arc<dyn EntityStore>,
    pending: Vec<Change>,
    assigned: Vec<Option<i64>>,
    committed_batches: u64,
}

impl CityInfoRepository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            pending: Vec::new(),
            assigned: Vec::new(),
            committed_batches: 0,
        }
    }

    /// Every city ordered by name, without points of interest.
    pub async fn get_cities(&self) -> Result<Vec<City>, DatabaseError> {
        self.store
            .select_cities(&CityFilter::new(), &CityOrder::default(), None)
            .await
    }

    /// One page of cities matching `query`. The metadata counts the whole
    /// filtered set, not just the returned page.
    pub async fn get_cities_page(
        &self,
        query: &CityQuery,
    ) -> Result<(Vec<City>, PaginationMetadata), DatabaseError> {
        let total_item_count = self.store.count_cities(&query.filter).await?;
        let cities = self
            .store
            .select_cities(&query.filter, &query.order, Some(&query.page))
            .await?;
        Ok((cities, query.page.metadata(total_item_count)))
    }

    pub async fn get_city(
        &self,
        city_id: i64,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, DatabaseError> {
        let Some(city) = self.store.find_city(city_id).await? else {
            return Ok(None);
        };
        if !include_points_of_interest {
            return Ok(Some(city));
        }
        let points = self.store.points_of_interest(city_id).await?;
        Ok(Some(city.with_points_of_interest(points)))
    }

    pub async fn city_exists(&self, city_id: i64) -> Result<bool, DatabaseError> {
        self.store.city_exists(city_id).await
    }

    pub async fn get_points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
        self.store.points_of_interest(city_id).await
    }

    pub async fn get_point_of_interest(
        &self,
        city_id: i64,
        point_id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        self.store.find_point_of_interest(city_id, point_id).await
    }

    /// Stage a new point of interest for `city_id`.
    ///
    /// Does nothing and returns `None` when the city does not exist; callers
    /// are expected to have checked with [`city_exists`](Self::city_exists).
    pub async fn add_point_of_interest(
        &mut self,
        city_id: i64,
        point: NewPointOfInterest,
    ) -> Result<Option<PendingPoint>, DatabaseError> {
        if !self.store.city_exists(city_id).await? {
            debug!("Skipping point of interest for missing city {}", city_id);
            return Ok(None);
        }
        let handle = PendingPoint {
            batch: self.committed_batches,
            index: self.pending.len(),
        };
        self.pending.push(Change::AddPointOfInterest { city_id, point });
        Ok(Some(handle))
    }

    /// Stage a full overwrite of an existing point of interest.
    pub fn update_point_of_interest(&mut self, point: PointOfInterest) {
        debug!("Staging update of point of interest {}", point.id);
        self.pending.push(Change::UpdatePointOfInterest(point));
    }

    pub fn delete_point_of_interest(&mut self, point: &PointOfInterest) {
        debug!("Staging delete of point of interest {}", point.id);
        self.pending.push(Change::DeletePointOfInterest {
            city_id: point.city_id,
            id: point.id,
        });
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Write all staged changes in one atomic step.
    ///
    /// Returns `true` when the store accepted the batch or there was nothing
    /// to write, `false` when the store rejected it. Staged changes survive a
    /// failed commit.
    pub async fn commit(&mut self) -> bool {
        if self.pending.is_empty() {
            return true;
        }
        match self.store.apply(&self.pending).await {
            Ok(assigned) => {
                debug!("Committed {} change(s)", self.pending.len());
                self.pending.clear();
                self.assigned = assigned;
                self.committed_batches += 1;
                true
            }
            Err(e) => {
                error!("Commit failed: {}", e);
                false
            }
        }
    }

    /// Identity the store gave to a staged point in the most recent commit.
    pub fn assigned_id(&self, pending: PendingPoint) -> Option<i64> {
        if pending.batch + 1 != self.committed_batches {
            return None;
        }
        self.assigned.get(pending.index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::filter::{CityQueryParams, Page};
    use crate::config::QueryConfig;
    use async_trait::async_trait;

    fn repository() -> CityInfoRepository {
        CityInfoRepository::new(Arc::new(MemoryStore::seeded()))
    }

    fn query(name: Option<&str>, search: Option<&str>, page_number: i64, page_size: i64) -> CityQuery {
        CityQueryParams {
            name: name.map(str::to_string),
            search_query: search.map(str::to_string),
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
        .into_query(&QueryConfig::default())
        .unwrap()
    }

    /// Delegates reads to a seeded memory store and rejects every write.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl EntityStore for ReadOnlyStore {
        async fn count_cities(&self, filter: &CityFilter) -> Result<i64, DatabaseError> {
            self.0.count_cities(filter).await
        }
        async fn select_cities(
            &self,
            filter: &CityFilter,
            order: &CityOrder,
            page: Option<&Page>,
        ) -> Result<Vec<City>, DatabaseError> {
            self.0.select_cities(filter, order, page).await
        }
        async fn find_city(&self, id: i64) -> Result<Option<City>, DatabaseError> {
            self.0.find_city(id).await
        }
        async fn city_exists(&self, id: i64) -> Result<bool, DatabaseError> {
            self.0.city_exists(id).await
        }
        async fn points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
            self.0.points_of_interest(city_id).await
        }
        async fn find_point_of_interest(
            &self,
            city_id: i64,
            id: i64,
        ) -> Result<Option<PointOfInterest>, DatabaseError> {
            self.0.find_point_of_interest(city_id, id).await
        }
        async fn apply(&self, _changes: &[Change]) -> Result<Vec<Option<i64>>, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn health_check(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn search_scenario_returns_only_matching_city() {
        let store = MemoryStore::new(vec![City::new(1, "Antwerp", None), City::new(2, "Paris", None)]);
        let repo = CityInfoRepository::new(Arc::new(store));

        let (cities, metadata) = repo.get_cities_page(&query(None, Some("par"), 1, 10)).await.unwrap();

        assert_eq!(cities, vec![City::new(2, "Paris", None)]);
        assert_eq!(metadata.total_item_count, 1);
        assert_eq!(metadata.total_page_count, 1);
    }

    #[tokio::test]
    async fn metadata_reflects_filtered_set() {
        let repo = repository();
        let (cities, metadata) = repo.get_cities_page(&query(None, Some("big"), 1, 1)).await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(metadata.total_item_count, 2);
        assert_eq!(metadata.total_page_count, 2);
        assert_eq!(metadata.page_size, 1);
    }

    #[tokio::test]
    async fn consecutive_pages_are_disjoint_and_ordered() {
        let repo = repository();
        let (first, _) = repo.get_cities_page(&query(None, None, 1, 2)).await.unwrap();
        let (second, metadata) = repo.get_cities_page(&query(None, None, 2, 2)).await.unwrap();

        let all = repo.get_cities().await.unwrap();
        let joined: Vec<_> = first.iter().chain(second.iter()).cloned().collect();
        assert_eq!(joined, all);
        assert_eq!(metadata.total_page_count, 2);
    }

    #[tokio::test]
    async fn page_beyond_end_is_empty_with_true_totals() {
        let repo = repository();
        let (cities, metadata) = repo.get_cities_page(&query(None, None, 5, 10)).await.unwrap();
        assert!(cities.is_empty());
        assert_eq!(metadata.total_item_count, 3);
        assert_eq!(metadata.current_page, 5);
    }

    #[tokio::test]
    async fn get_city_includes_children_only_on_request() {
        let repo = repository();
        let bare = repo.get_city(1, false).await.unwrap().unwrap();
        let full = repo.get_city(1, true).await.unwrap().unwrap();
        assert!(bare.points_of_interest.is_empty());
        assert_eq!(full.points_of_interest.len(), 2);
        assert!(repo.get_city(99, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn adding_to_missing_city_is_silent_noop() {
        let mut repo = repository();
        let staged = repo
            .add_point_of_interest(99, NewPointOfInterest::new("Ghost", None))
            .await
            .unwrap();
        assert!(staged.is_none());
        assert!(!repo.has_changes());
        assert!(repo.commit().await);
        assert!(repo.get_points_of_interest(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_are_assigned_at_commit() {
        let mut repo = repository();
        let staged = repo
            .add_point_of_interest(2, NewPointOfInterest::new("MAS", Some("Museum on the stream.")))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(repo.assigned_id(staged), None);
        assert_eq!(repo.get_points_of_interest(2).await.unwrap().len(), 2);

        assert!(repo.commit().await);
        let id = repo.assigned_id(staged).unwrap();
        let stored = repo.get_point_of_interest(2, id).await.unwrap().unwrap();
        assert_eq!(stored.name, "MAS");
    }

    #[tokio::test]
    async fn uncommitted_changes_are_lost() {
        let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::seeded());
        {
            let mut repo = CityInfoRepository::new(store.clone());
            let point = repo.get_point_of_interest(1, 1).await.unwrap().unwrap();
            repo.delete_point_of_interest(&point);
        }
        let repo = CityInfoRepository::new(store);
        assert!(repo.get_point_of_interest(1, 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleted_point_is_gone_after_commit() {
        let mut repo = repository();
        let point = repo.get_point_of_interest(3, 6).await.unwrap().unwrap();
        repo.delete_point_of_interest(&point);
        assert!(repo.commit().await);
        assert!(repo.get_point_of_interest(3, 6).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_with_nothing_staged_succeeds() {
        let mut repo = repository();
        assert!(repo.commit().await);
    }

    #[tokio::test]
    async fn rejected_commit_reports_false_and_keeps_changes() {
        let mut repo = CityInfoRepository::new(Arc::new(ReadOnlyStore(MemoryStore::seeded())));
        let mut point = repo.get_point_of_interest(1, 2).await.unwrap().unwrap();
        point.name = "Chrysler Building".to_string();
        repo.update_point_of_interest(point);

        assert!(!repo.commit().await);
        assert!(repo.has_changes());
        let stored = repo.get_point_of_interest(1, 2).await.unwrap().unwrap();
        assert_eq!(stored.name, "Empire State Building");
    }
}
