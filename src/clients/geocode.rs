use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Debug, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Forward-geocodes a free-text address. May legitimately return an
    /// empty list; callers decide what zero results means.
    pub async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>> {
        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Geocoding API error: {} - {}", status, body);
        }

        let response: GeocodeResponse = response.json().await?;

        Ok(response.results)
    }
}
