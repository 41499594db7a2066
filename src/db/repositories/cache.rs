use crate::entities::{movie, weather};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Outcome of a location-scoped cache query. The caller decides freshness:
/// on `Hit` it inspects the first row's `created_at` against its own
/// threshold and either serves the rows or evicts and refetches.
#[derive(Debug)]
pub enum CacheLookup<M> {
    Hit(Vec<M>),
    Miss,
}

/// Entities whose rows are cached per location and aged out by deletion.
///
/// Implementing this trait is what admits a table to the lookup/evict
/// protocol; the entity type itself is the table identifier, so no table
/// name ever reaches SQL as interpolated text.
pub trait LocationCached: EntityTrait {
    fn location_column() -> Self::Column;
    fn id_column() -> Self::Column;
    fn created_at(model: &Self::Model) -> &str;
}

impl LocationCached for weather::Entity {
    fn location_column() -> Self::Column {
        weather::Column::LocationId
    }

    fn id_column() -> Self::Column {
        weather::Column::Id
    }

    fn created_at(model: &Self::Model) -> &str {
        &model.created_at
    }
}

impl LocationCached for movie::Entity {
    fn location_column() -> Self::Column {
        movie::Column::LocationId
    }

    fn id_column() -> Self::Column {
        movie::Column::Id
    }

    fn created_at(model: &Self::Model) -> &str {
        &model.created_at
    }
}

/// Whether a cached row set has outlived `max_age_minutes`.
///
/// An unparseable timestamp counts as stale: rows of unknown age are
/// refetched rather than served.
#[must_use]
pub fn is_stale(created_at: &str, max_age_minutes: i64) -> bool {
    DateTime::parse_from_rfc3339(created_at).map_or(true, |ts| {
        Utc::now().signed_duration_since(ts) > Duration::minutes(max_age_minutes)
    })
}

/// Whether a cached row set is still within `max_age_minutes`. All rows in
/// a set share one `created_at`, so the first row speaks for all of them.
#[must_use]
pub fn is_fresh<E: LocationCached>(rows: &[E::Model], max_age_minutes: i64) -> bool {
    rows.first()
        .is_some_and(|row| !is_stale(E::created_at(row), max_age_minutes))
}

pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All cached rows for one location, in insertion order.
    pub async fn lookup<E: LocationCached>(
        &self,
        location_id: i32,
    ) -> Result<CacheLookup<E::Model>> {
        let rows = E::find()
            .filter(E::location_column().eq(location_id))
            .order_by_asc(E::id_column())
            .all(&self.conn)
            .await?;

        if rows.is_empty() {
            Ok(CacheLookup::Miss)
        } else {
            Ok(CacheLookup::Hit(rows))
        }
    }

    /// Deletes every cached row for the location. Invalidation is always
    /// deletion, never update.
    pub async fn evict<E: LocationCached>(&self, location_id: i32) -> Result<u64> {
        let result = E::delete_many()
            .filter(E::location_column().eq(location_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Inserts one row per forecast day, all stamped with the same
    /// `created_at` so the whole set ages together.
    pub async fn insert_forecasts(
        &self,
        location_id: i32,
        forecasts: &[NewForecast],
    ) -> Result<Vec<weather::Model>> {
        let created_at = Utc::now().to_rfc3339();
        let mut saved = Vec::with_capacity(forecasts.len());

        for forecast in forecasts {
            let model = weather::ActiveModel {
                forecast: Set(forecast.forecast.clone()),
                time: Set(forecast.time.clone()),
                created_at: Set(created_at.clone()),
                location_id: Set(location_id),
                ..Default::default()
            }
            .insert(&self.conn)
            .await?;

            saved.push(model);
        }

        Ok(saved)
    }

    pub async fn insert_movies(
        &self,
        location_id: i32,
        movies: &[NewMovie],
    ) -> Result<Vec<movie::Model>> {
        let created_at = Utc::now().to_rfc3339();
        let mut saved = Vec::with_capacity(movies.len());

        for entry in movies {
            let model = movie::ActiveModel {
                title: Set(entry.title.clone()),
                overview: Set(entry.overview.clone()),
                average_votes: Set(entry.average_votes),
                image_url: Set(entry.image_url.clone()),
                popularity: Set(entry.popularity),
                released_on: Set(entry.released_on.clone()),
                created_at: Set(created_at.clone()),
                location_id: Set(location_id),
                ..Default::default()
            }
            .insert(&self.conn)
            .await?;

            saved.push(model);
        }

        Ok(saved)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewForecast {
    pub forecast: String,
    pub time: String,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timestamp_is_not_stale() {
        let now = Utc::now().to_rfc3339();
        assert!(!is_stale(&now, 30));
    }

    #[test]
    fn old_timestamp_is_stale() {
        let old = (Utc::now() - Duration::minutes(45)).to_rfc3339();
        assert!(is_stale(&old, 30));
        assert!(!is_stale(&old, 30 * 1440));
    }

    #[test]
    fn unparseable_timestamp_is_stale() {
        assert!(is_stale("not-a-timestamp", 30));
        assert!(is_stale("", 30));
    }

    #[test]
    fn first_row_speaks_for_the_set() {
        let row = weather::Model {
            id: 1,
            forecast: "Clear.".to_string(),
            time: "Mon Apr 01 2019".to_string(),
            created_at: Utc::now().to_rfc3339(),
            location_id: 1,
        };

        assert!(is_fresh::<weather::Entity>(&[row], 30));
        assert!(!is_fresh::<weather::Entity>(&[], 30));
    }
}
