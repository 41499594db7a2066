use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clients::yelp::Business;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct YelpQuery {
    #[serde(rename = "data[search_query]")]
    pub search_query: String,
}

#[derive(Debug, Serialize)]
pub struct BusinessDto {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: String,
}

impl From<Business> for BusinessDto {
    fn from(business: Business) -> Self {
        Self {
            name: business.name,
            image_url: business.image_url,
            price: business.price,
            rating: business.rating,
            url: business.url,
        }
    }
}

/// Stateless passthrough: no cache table backs restaurant results.
pub async fn get_yelp(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YelpQuery>,
) -> Result<Json<Vec<BusinessDto>>, ApiError> {
    let businesses = state.yelp.search(&query.search_query).await?;
    Ok(Json(businesses.into_iter().map(Into::into).collect()))
}
