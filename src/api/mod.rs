use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod error;
mod location;
mod movies;
mod weather;
mod yelp;

pub use error::ApiError;

use crate::clients::{GeocodeClient, TmdbClient, WeatherClient, YelpClient};
use crate::config::Config;
use crate::db::Store;

/// Shared request state: the store pool plus one client per upstream.
/// Everything here is cheap to clone and free of interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub geocode: GeocodeClient,

    pub weather: WeatherClient,

    pub yelp: YelpClient,

    pub tmdb: TmdbClient,
}

pub async fn create_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState {
        store,
        geocode: GeocodeClient::new(&config.geocoding.base_url, &config.geocoding.api_key),
        weather: WeatherClient::new(&config.weather.base_url, &config.weather.api_key),
        yelp: YelpClient::new(&config.yelp.base_url, &config.yelp.api_key),
        tmdb: TmdbClient::new(&config.movies.base_url, &config.movies.api_key),
    }))
}

pub fn router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/location", get(location::get_location))
        .route("/weather", get(weather::get_weather))
        .route("/yelp", get(yelp::get_yelp))
        .route("/movies", get(movies::get_movies))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
