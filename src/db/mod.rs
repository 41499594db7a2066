use crate::entities::{location, movie, weather};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::cache::{
    CacheLookup, LocationCached, NewForecast, NewMovie, is_fresh, is_stale,
};
pub use repositories::location::NewLocation;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // A pooled in-memory sqlite would give every connection its own
        // empty database, so pin the pool to a single connection.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    pub async fn find_location(&self, search_query: &str) -> Result<Option<location::Model>> {
        self.location_repo().find_by_query(search_query).await
    }

    pub async fn save_location(&self, new: NewLocation) -> Result<location::Model> {
        self.location_repo().save(new).await
    }

    pub async fn cached_rows<E: LocationCached>(
        &self,
        location_id: i32,
    ) -> Result<CacheLookup<E::Model>> {
        self.cache_repo().lookup::<E>(location_id).await
    }

    pub async fn evict_cached<E: LocationCached>(&self, location_id: i32) -> Result<u64> {
        self.cache_repo().evict::<E>(location_id).await
    }

    pub async fn save_forecasts(
        &self,
        location_id: i32,
        forecasts: &[NewForecast],
    ) -> Result<Vec<weather::Model>> {
        self.cache_repo()
            .insert_forecasts(location_id, forecasts)
            .await
    }

    pub async fn save_movies(
        &self,
        location_id: i32,
        movies: &[NewMovie],
    ) -> Result<Vec<movie::Model>> {
        self.cache_repo().insert_movies(location_id, movies).await
    }
}
