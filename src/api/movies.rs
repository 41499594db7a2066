use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::clients::tmdb::POSTER_BASE_URL;
use crate::db::{CacheLookup, NewMovie, is_fresh};
use crate::entities::{movie, prelude::Movie};

use super::{ApiError, AppState};

/// Movie listings barely move; cached rows live for 30 days.
const MAX_AGE_MINUTES: i64 = 30 * 1440;

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    #[serde(rename = "data[search_query]")]
    pub search_query: String,
    #[serde(rename = "data[id]")]
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: String,
}

impl From<movie::Model> for MovieDto {
    fn from(model: movie::Model) -> Self {
        Self {
            title: model.title,
            overview: model.overview,
            average_votes: model.average_votes,
            image_url: model.image_url,
            popularity: model.popularity,
            released_on: model.released_on,
        }
    }
}

pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MoviesQuery>,
) -> Result<Json<Vec<MovieDto>>, ApiError> {
    match state.store.cached_rows::<Movie>(query.id).await? {
        CacheLookup::Hit(rows) if is_fresh::<Movie>(&rows, MAX_AGE_MINUTES) => {
            debug!("Serving {} cached movies for location {}", rows.len(), query.id);
            return Ok(Json(rows.into_iter().map(Into::into).collect()));
        }
        CacheLookup::Hit(_) => {
            state.store.evict_cached::<Movie>(query.id).await?;
        }
        CacheLookup::Miss => {}
    }

    let results = state.tmdb.search(&query.search_query).await?;

    let movies: Vec<NewMovie> = results
        .into_iter()
        .map(|movie| NewMovie {
            title: movie.title,
            overview: movie.overview,
            average_votes: movie.vote_average,
            image_url: movie
                .poster_path
                .map(|path| format!("{POSTER_BASE_URL}{path}"))
                .unwrap_or_default(),
            popularity: movie.popularity,
            released_on: movie.release_date.unwrap_or_default(),
        })
        .collect();

    let saved = state.store.save_movies(query.id, &movies).await?;

    Ok(Json(saved.into_iter().map(Into::into).collect()))
}
