//! OpenWeatherMap current-conditions client
//!
//! Queries the current weather for a single city and converts the reported
//! Kelvin temperature to Celsius. The request is bounded by a timeout; any
//! transport error, non-2xx status or unexpected body is a [`SourceError`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SignalSource;
use crate::error::{Result, SourceError, SourceResult, SupplyRiskError};
use crate::signal::RawWeather;

pub const DEFAULT_WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CITY: &str = "New York";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

const KELVIN_OFFSET: f64 = 273.15;

/// Weather endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenWeatherConfig {
    /// Endpoint URL, without query string
    pub endpoint: String,
    /// City name passed as `q`
    pub city: String,
    /// API key passed as `appid`
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        OpenWeatherConfig {
            endpoint: DEFAULT_WEATHER_URL.to_string(),
            city: DEFAULT_CITY.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OpenWeatherConfig {
    pub fn new(endpoint: &str, city: &str) -> Self {
        OpenWeatherConfig {
            endpoint: endpoint.to_string(),
            city: city.to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Vec<ConditionEntry>,
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    main: String,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

/// Parse a current-weather body into a Celsius observation.
pub fn parse_current_weather(body: &str) -> SourceResult<RawWeather> {
    let current: CurrentWeather = serde_json::from_str(body)?;
    let condition = current
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Malformed("empty weather array".to_string()))?;

    Ok(RawWeather::new(
        condition.main,
        current.main.temp - KELVIN_OFFSET,
    ))
}

/// HTTP weather source
pub struct OpenWeatherSource {
    config: OpenWeatherConfig,
    http_client: reqwest::Client,
}

impl OpenWeatherSource {
    pub fn new(config: OpenWeatherConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("supply-risk/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SupplyRiskError::HttpClient(e.to_string()))?;

        Ok(OpenWeatherSource {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl SignalSource<RawWeather> for OpenWeatherSource {
    fn name(&self) -> &str {
        "openweathermap"
    }

    async fn fetch(&self) -> SourceResult<RawWeather> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::Unavailable("no weather API key configured".to_string()))?;

        debug!(city = %self.config.city, endpoint = %self.config.endpoint, "fetching weather");

        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&[("q", self.config.city.as_str()), ("appid", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_current_weather(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenWeatherConfig::default();
        assert_eq!(config.city, "New York");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = OpenWeatherConfig::new("http://localhost:9/weather", "Vereeniging")
            .with_api_key("k")
            .with_timeout_secs(2);
        assert_eq!(config.endpoint, "http://localhost:9/weather");
        assert_eq!(config.city, "Vereeniging");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn test_parse_converts_kelvin() {
        let body = r#"{"weather":[{"id":800,"main":"Clear"}],"main":{"temp":298.15,"humidity":40}}"#;
        let raw = parse_current_weather(body).unwrap();
        assert_eq!(raw.condition, "Clear");
        assert!((raw.temperature_c - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_missing_main() {
        let body = r#"{"weather":[{"main":"Rain"}]}"#;
        assert!(matches!(
            parse_current_weather(body),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_weather() {
        let body = r#"{"weather":[],"main":{"temp":280.0}}"#;
        assert!(matches!(
            parse_current_weather(body),
            Err(SourceError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unavailable() {
        let source = OpenWeatherSource::new(OpenWeatherConfig::default()).unwrap();
        assert!(matches!(
            source.fetch().await,
            Err(SourceError::Unavailable(_))
        ));
    }
}
