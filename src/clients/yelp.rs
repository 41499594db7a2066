use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    businesses: Vec<Business>,
}

/// Yelp omits price and image for some listings, so those stay optional
/// all the way to the response.
#[derive(Debug, Deserialize)]
pub struct Business {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: Option<f64>,
    pub url: String,
}

#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YelpClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn search(&self, location: &str) -> Result<Vec<Business>> {
        let url = format!(
            "{}/v3/businesses/search?location={}",
            self.base_url,
            urlencoding::encode(location)
        );
        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Yelp API error: {} - {}", status, body);
        }

        let response: SearchResponse = response.json().await?;

        Ok(response.businesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_business_search_response() {
        let json = r#"{
            "businesses": [
                {
                    "name": "Over the Moon Cafe",
                    "image_url": "https://example.com/moon.jpg",
                    "price": "$$",
                    "rating": 4.5,
                    "url": "https://yelp.com/biz/over-the-moon"
                },
                {
                    "name": "No Frills Diner",
                    "url": "https://yelp.com/biz/no-frills"
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.businesses.len(), 2);
        assert_eq!(parsed.businesses[0].price.as_deref(), Some("$$"));
        assert!(parsed.businesses[1].image_url.is_none());
        assert!(parsed.businesses[1].rating.is_none());
    }
}
