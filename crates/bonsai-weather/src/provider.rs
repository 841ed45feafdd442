//! Current-weather provider backed by an OpenWeatherMap-compatible API.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Observation, WeatherError};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Settings read from process configuration at startup
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Fetches point-in-time observations. Single attempt, no retry.
///
/// The underlying `reqwest::Client` is reference-counted, so clones share a
/// connection pool and concurrent fetches need no coordination.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherProvider {
    /// Build a provider with a default client (no request timeout).
    ///
    /// Fails with `WeatherError::Configuration` when the access key is
    /// missing or blank; no network activity happens in that case.
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        Self::with_client(settings, Client::new())
    }

    /// Build a provider around a caller-configured client, e.g. one with a timeout.
    pub fn with_client(settings: ProviderSettings, client: Client) -> Result<Self, WeatherError> {
        let api_key = settings
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WeatherError::Configuration("weather access key is not set".into()))?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(WeatherError::Configuration("weather base URL is empty".into()));
        }

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Fetch the current observation for a location query such as "Lyon,FR".
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &str) -> Result<Observation, WeatherError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(WeatherError::NotFound(String::new()));
        }

        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Weather location not found: {}", location);
            return Err(WeatherError::NotFound(location.to_string()));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(text);
            tracing::warn!("Weather request failed with {}: {}", status, message);
            return Err(WeatherError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let body: CurrentWeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let condition_text = body
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".into()))?;

        tracing::debug!(
            "Observation for {}: {}°C, {}",
            location,
            body.main.temp,
            condition_text
        );

        Ok(Observation {
            temperature_c: body.main.temp,
            condition_text,
        })
    }
}
