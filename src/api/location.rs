use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::db::NewLocation;
use crate::entities::location;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Free-text search string, e.g. "98405" or "tacoma".
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct LocationDto {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub id: i32,
}

impl From<location::Model> for LocationDto {
    fn from(model: location::Model) -> Self {
        Self {
            search_query: model.search_query,
            formatted_query: model.formatted_query,
            latitude: model.latitude,
            longitude: model.longitude,
            id: model.id,
        }
    }
}

/// Exact-match cache on the raw query string; a hit never re-geocodes.
/// On miss the first geocoder result wins, and zero results is an error
/// rather than a panic.
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<LocationDto>, ApiError> {
    if let Some(cached) = state.store.find_location(&query.data).await? {
        return Ok(Json(cached.into()));
    }

    let results = state.geocode.geocode(&query.data).await?;
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Geocoding returned no results for {:?}", query.data))?;

    let saved = state
        .store
        .save_location(NewLocation {
            search_query: query.data,
            formatted_query: first.formatted_address,
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        })
        .await?;

    info!("Geocoded {:?} as location {}", saved.search_query, saved.id);

    Ok(Json(saved.into()))
}
