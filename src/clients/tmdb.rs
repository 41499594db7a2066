use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

/// Fixed poster base; the search API only returns a relative poster path.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieResult>,
}

#[derive(Debug, Deserialize)]
pub struct MovieResult {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    pub release_date: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<MovieResult>> {
        let url = format!(
            "{}/3/search/movie?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Movie API error: {} - {}", status, body);
        }

        let response: SearchResponse = response.json().await?;

        Ok(response.results)
    }
}
