use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use super::manager::DatabaseError;
use super::models::{City, PointOfInterest};
use super::store::{Change, EntityStore};
use crate::filter::{CityFilter, CityOrder, Page};

/// Store backed by a SQLite database through sqlx.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn city_from_row(row: &SqliteRow) -> Result<City, sqlx::Error> {
    Ok(City {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        points_of_interest: Vec::new(),
    })
}

fn point_from_row(row: &SqliteRow) -> Result<PointOfInterest, sqlx::Error> {
    Ok(PointOfInterest {
        id: row.try_get("id")?,
        city_id: row.try_get("city_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn count_cities(&self, filter: &CityFilter) -> Result<i64, DatabaseError> {
        let where_sql = filter.to_where_sql();
        let sql = format!("SELECT COUNT(*) AS count FROM \"cities\" WHERE {}", where_sql.query);

        let mut q = sqlx::query(&sql);
        for p in where_sql.params.iter() {
            q = q.bind(p.as_str());
        }
        let row = q.fetch_one(&self.pool).await?;
        Ok(row.try_get("count")?)
    }

    async fn select_cities(
        &self,
        filter: &CityFilter,
        order: &CityOrder,
        page: Option<&Page>,
    ) -> Result<Vec<City>, DatabaseError> {
        let where_sql = filter.to_where_sql();
        let mut sql = format!(
            "SELECT \"id\", \"name\", \"description\" FROM \"cities\" WHERE {} {}",
            where_sql.query,
            order.to_sql()
        );
        if page.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let mut q = sqlx::query(&sql);
        for p in where_sql.params.iter() {
            q = q.bind(p.as_str());
        }
        if let Some(page) = page {
            q = q.bind(page.limit()).bind(page.offset());
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(city_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn find_city(&self, id: i64) -> Result<Option<City>, DatabaseError> {
        let row = sqlx::query("SELECT \"id\", \"name\", \"description\" FROM \"cities\" WHERE \"id\" = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(city_from_row).transpose()?)
    }

    async fn city_exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM \"cities\" WHERE \"id\" = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists != 0)
    }

    async fn points_of_interest(&self, city_id: i64) -> Result<Vec<PointOfInterest>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT \"id\", \"city_id\", \"name\", \"description\" FROM \"points_of_interest\" WHERE \"city_id\" = ? ORDER BY \"id\"",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(point_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn find_point_of_interest(
        &self,
        city_id: i64,
        id: i64,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        let row = sqlx::query(
            "SELECT \"id\", \"city_id\", \"name\", \"description\" FROM \"points_of_interest\" WHERE \"city_id\" = ? AND \"id\" = ?",
        )
        .bind(city_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(point_from_row).transpose()?)
    }

    async fn apply(&self, changes: &[Change]) -> Result<Vec<Option<i64>>, DatabaseError> {
        // Dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await?;
        let mut assigned = Vec::with_capacity(changes.len());

        for change in changes {
            match change {
                Change::AddPointOfInterest { city_id, point } => {
                    let exists: i64 =
                        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM \"cities\" WHERE \"id\" = ?)")
                            .bind(*city_id)
                            .fetch_one(&mut *tx)
                            .await?;
                    if exists == 0 {
                        return Err(DatabaseError::CityNotFound(*city_id));
                    }
                    let result = sqlx::query(
                        "INSERT INTO \"points_of_interest\" (\"city_id\", \"name\", \"description\") VALUES (?, ?, ?)",
                    )
                    .bind(*city_id)
                    .bind(point.name.as_str())
                    .bind(point.description.as_deref())
                    .execute(&mut *tx)
                    .await?;
                    assigned.push(Some(result.last_insert_rowid()));
                }
                Change::UpdatePointOfInterest(updated) => {
                    let result = sqlx::query(
                        "UPDATE \"points_of_interest\" SET \"name\" = ?, \"description\" = ? WHERE \"id\" = ? AND \"city_id\" = ?",
                    )
                    .bind(updated.name.as_str())
                    .bind(updated.description.as_deref())
                    .bind(updated.id)
                    .bind(updated.city_id)
                    .execute(&mut *tx)
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(DatabaseError::PointOfInterestNotFound {
                            city_id: updated.city_id,
                            id: updated.id,
                        });
                    }
                    assigned.push(None);
                }
                Change::DeletePointOfInterest { city_id, id } => {
                    let result = sqlx::query(
                        "DELETE FROM \"points_of_interest\" WHERE \"id\" = ? AND \"city_id\" = ?",
                    )
                    .bind(*id)
                    .bind(*city_id)
                    .execute(&mut *tx)
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(DatabaseError::PointOfInterestNotFound {
                            city_id: *city_id,
                            id: *id,
                        });
                    }
                    assigned.push(None);
                }
            }
        }

        tx.commit().await?;
        Ok(assigned)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
