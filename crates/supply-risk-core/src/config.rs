//! Pipeline configuration.
//!
//! `PipelineConfig::default()` is a set of constants. `from_env()` overlays a
//! few environment variables on top and is meant for binaries only.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decision::{default_locations, default_suppliers};
use crate::error::{Result, SupplyRiskError};
use crate::source::openweather::OpenWeatherConfig;
use crate::source::synthetic::{
    ECONOMIC_BAND, ECONOMIC_BASELINE, GEOPOLITICAL_BAND, GEOPOLITICAL_BASELINE,
};

pub const DEFAULT_REGION: &str = "South Africa";
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Baseline and half-band of a synthetic indicator feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub baseline: f64,
    pub band: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub weather: OpenWeatherConfig,
    pub economic: SyntheticConfig,
    pub geopolitical: SyntheticConfig,
    /// Region whose fallback record is preferred
    pub region: String,
    pub suppliers: Vec<String>,
    pub locations: Vec<String>,
    /// Seconds between cycles (used by the scheduler, not the pipeline)
    pub interval_secs: u64,
    /// Seed for synthetic feeds and fallback picks
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            weather: OpenWeatherConfig::default(),
            economic: SyntheticConfig {
                baseline: ECONOMIC_BASELINE,
                band: ECONOMIC_BAND,
            },
            geopolitical: SyntheticConfig {
                baseline: GEOPOLITICAL_BASELINE,
                band: GEOPOLITICAL_BAND,
            },
            region: DEFAULT_REGION.to_string(),
            suppliers: default_suppliers(),
            locations: default_locations(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `SUPPLY_RISK_WEATHER_URL`, `SUPPLY_RISK_CITY`,
    /// `OPENWEATHER_API_KEY` and `SUPPLY_RISK_REGION`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SUPPLY_RISK_WEATHER_URL") {
            config.weather.endpoint = url;
        }
        if let Ok(city) = std::env::var("SUPPLY_RISK_CITY") {
            config.weather.city = city;
        }
        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            config.weather.api_key = Some(key);
        }
        if let Ok(region) = std::env::var("SUPPLY_RISK_REGION") {
            config.region = region;
        }
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Reject configurations a pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(SupplyRiskError::InvalidConfig(
                "interval_secs must be at least 1".to_string(),
            ));
        }
        if self.weather.timeout_secs == 0 {
            return Err(SupplyRiskError::InvalidConfig(
                "weather timeout_secs must be at least 1".to_string(),
            ));
        }
        for (name, cfg) in [("economic", &self.economic), ("geopolitical", &self.geopolitical)] {
            if !cfg.baseline.is_finite() || !cfg.band.is_finite() {
                return Err(SupplyRiskError::InvalidConfig(format!(
                    "{name} baseline and band must be finite"
                )));
            }
            if cfg.band < 0.0 {
                return Err(SupplyRiskError::InvalidConfig(format!(
                    "{name} band must not be negative"
                )));
            }
            // The sampled span and both ends of the range must stay finite.
            let span = 2.0 * cfg.band;
            if !span.is_finite()
                || !(cfg.baseline + cfg.band).is_finite()
                || !(cfg.baseline - cfg.band).is_finite()
            {
                return Err(SupplyRiskError::InvalidConfig(format!(
                    "{name} band {} is too wide around baseline {}",
                    cfg.band, cfg.baseline
                )));
            }
        }
        if self.suppliers.is_empty() {
            return Err(SupplyRiskError::EmptyRotation {
                name: "suppliers".to_string(),
            });
        }
        if self.locations.is_empty() {
            return Err(SupplyRiskError::EmptyRotation {
                name: "locations".to_string(),
            });
        }
        Ok(())
    }
}
