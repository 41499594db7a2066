use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Daily {
    data: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastDay {
    /// Unix timestamp (seconds) of the forecast day.
    pub time: i64,
    pub summary: String,
}

#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Daily forecast for a coordinate pair, one entry per day.
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastDay>> {
        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, latitude, longitude
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Weather API error: {} - {}", status, body);
        }

        let response: ForecastResponse = response.json().await?;

        Ok(response.daily.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_forecast_response() {
        let json = r#"{
            "daily": {
                "data": [
                    {"time": 1554076800, "summary": "Partly cloudy throughout the day."},
                    {"time": 1554163200, "summary": "Light rain in the morning."}
                ]
            }
        }"#;

        let parsed: ForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.daily.data.len(), 2);
        assert_eq!(parsed.daily.data[0].time, 1554076800);
        assert_eq!(
            parsed.daily.data[1].summary,
            "Light rain in the morning."
        );
    }
}
