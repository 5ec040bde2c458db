use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use super::memory::MemoryStore;
use super::models::City;
use super::seed::seed_cities;
use super::sqlite::SqliteStore;
use super::store::EntityStore;
use crate::config::DatabaseConfig;

/// Errors from the entity stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("City {0} not found")]
    CityNotFound(i64),

    #[error("Point of interest {id} not found in city {city_id}")]
    PointOfInterestNotFound { city_id: i64, id: i64 },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens SQLite pools and prepares the schema.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Pick the backend named by `config.url`: the in-process store for
    /// `memory`, SQLite for anything else.
    pub async fn build_store(config: &DatabaseConfig) -> Result<Arc<dyn EntityStore>, DatabaseError> {
        let seed = if config.seed_on_startup { seed_cities() } else { Vec::new() };

        if config.uses_memory_store() {
            info!("Using in-memory store with {} cities", seed.len());
            return Ok(Arc::new(MemoryStore::new(seed)));
        }

        let store = Self::open_store(config, &seed).await?;
        Ok(Arc::new(store))
    }

    /// Connect, create the schema if missing, and seed an empty database
    /// when the config asks for it.
    pub async fn open_store(config: &DatabaseConfig, seed: &[City]) -> Result<SqliteStore, DatabaseError> {
        let pool = Self::connect(config).await?;
        Self::migrate(&pool).await?;
        if config.seed_on_startup {
            Self::seed(&pool, seed).await?;
        }
        Ok(SqliteStore::new(pool))
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl(config.url.clone()))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives as long as its connection, so pin it to one.
        let pool = if Self::is_memory_url(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?
        };

        info!("Opened database pool for: {}", config.url);
        Ok(pool)
    }

    pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "cities" (
                "id" INTEGER PRIMARY KEY AUTOINCREMENT,
                "name" TEXT NOT NULL CHECK (length("name") BETWEEN 1 AND 50),
                "description" TEXT CHECK ("description" IS NULL OR length("description") <= 200)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS "points_of_interest" (
                "id" INTEGER PRIMARY KEY AUTOINCREMENT,
                "city_id" INTEGER NOT NULL REFERENCES "cities" ("id") ON DELETE CASCADE,
                "name" TEXT NOT NULL CHECK (length("name") BETWEEN 1 AND 50),
                "description" TEXT CHECK ("description" IS NULL OR length("description") <= 200)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS "idx_points_of_interest_city"
            ON "points_of_interest" ("city_id")
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Insert `cities` (with their points) when the database holds no cities.
    /// Returns whether anything was inserted.
    pub async fn seed(pool: &SqlitePool, cities: &[City]) -> Result<bool, DatabaseError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM \"cities\"")
            .fetch_one(pool)
            .await?;
        if existing > 0 {
            return Ok(false);
        }

        let mut tx = pool.begin().await?;
        for city in cities {
            sqlx::query("INSERT INTO \"cities\" (\"id\", \"name\", \"description\") VALUES (?, ?, ?)")
                .bind(city.id)
                .bind(city.name.as_str())
                .bind(city.description.as_deref())
                .execute(&mut *tx)
                .await?;
            for point in &city.points_of_interest {
                sqlx::query(
                    "INSERT INTO \"points_of_interest\" (\"id\", \"city_id\", \"name\", \"description\") VALUES (?, ?, ?, ?)",
                )
                .bind(point.id)
                .bind(city.id)
                .bind(point.name.as_str())
                .bind(point.description.as_deref())
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await?;

        info!("Seeded {} cities", cities.len());
        Ok(true)
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}
