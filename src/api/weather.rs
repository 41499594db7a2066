use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::db::{CacheLookup, NewForecast, is_fresh};
use crate::entities::{prelude::Weather, weather};

use super::{ApiError, AppState};

/// Cached forecasts older than this are evicted and refetched.
const MAX_AGE_MINUTES: i64 = 30;

/// The frontend sends the saved location back as nested `data[...]` keys.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(rename = "data[latitude]")]
    pub latitude: f64,
    #[serde(rename = "data[longitude]")]
    pub longitude: f64,
    #[serde(rename = "data[id]")]
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct ForecastDto {
    pub forecast: String,
    pub time: String,
    pub created_at: String,
}

impl From<weather::Model> for ForecastDto {
    fn from(model: weather::Model) -> Self {
        Self {
            forecast: model.forecast,
            time: model.time,
            created_at: model.created_at,
        }
    }
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Vec<ForecastDto>>, ApiError> {
    match state.store.cached_rows::<Weather>(query.id).await? {
        CacheLookup::Hit(rows) if is_fresh::<Weather>(&rows, MAX_AGE_MINUTES) => {
            debug!("Serving {} cached forecasts for location {}", rows.len(), query.id);
            return Ok(Json(rows.into_iter().map(Into::into).collect()));
        }
        CacheLookup::Hit(_) => {
            state.store.evict_cached::<Weather>(query.id).await?;
        }
        CacheLookup::Miss => {}
    }

    let days = state
        .weather
        .forecast(query.latitude, query.longitude)
        .await?;

    let forecasts: Vec<NewForecast> = days
        .iter()
        .map(|day| NewForecast {
            forecast: day.summary.clone(),
            time: format_forecast_day(day.time),
        })
        .collect();

    let saved = state.store.save_forecasts(query.id, &forecasts).await?;

    Ok(Json(saved.into_iter().map(Into::into).collect()))
}

/// "Mon Apr 01 2019" — the truncated day string the original clients render.
fn format_forecast_day(unix_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(unix_secs, 0)
        .map(|t| t.format("%a %b %d %Y").to_string())
        .unwrap_or_default()
}
