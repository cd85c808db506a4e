//! Local fallback datasets consulted when a primary source fails.
//!
//! The dataset is loaded once at startup and never mutated. A lookup prefers
//! the record for the configured region; without one it picks a global
//! record uniformly at random.

use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::signal::Signal;

/// One raw signal tuple. Any field may be missing in a loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRecord {
    #[serde(rename = "Weather")]
    pub weather: Option<String>,
    #[serde(rename = "Temperature")]
    pub temperature_c: Option<f64>,
    #[serde(rename = "Economic Growth")]
    pub economic_growth: Option<f64>,
    #[serde(rename = "Geopolitical Stability")]
    pub geopolitical_stability: Option<f64>,
}

impl FallbackRecord {
    pub fn new(weather: &str, temperature_c: f64, economic: f64, geopolitical: f64) -> Self {
        Self {
            weather: Some(weather.to_string()),
            temperature_c: Some(temperature_c),
            economic_growth: Some(economic),
            geopolitical_stability: Some(geopolitical),
        }
    }
}

/// Global records plus per-region overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackDataset {
    #[serde(default)]
    pub global: Vec<FallbackRecord>,
    #[serde(default)]
    pub regional: BTreeMap<String, FallbackRecord>,
}

impl FallbackDataset {
    /// Dataset compiled into the binary.
    pub fn builtin() -> Self {
        let global = vec![
            FallbackRecord::new("Clear", 25.3, 2.5, 50.0),
            FallbackRecord::new("Clouds", 22.1, 2.1, 48.0),
            FallbackRecord::new("Rain", 18.4, 1.9, 45.0),
            FallbackRecord::new("Clear", 30.0, 2.7, 55.0),
            FallbackRecord::new("Snow", -5.2, 1.8, 60.0),
        ];

        let mut regional = BTreeMap::new();
        regional.insert(
            "South Africa".to_string(),
            FallbackRecord::new("Clear", 20.0, 3.0, 60.0),
        );
        regional.insert(
            "Vaal".to_string(),
            FallbackRecord::new("Clouds", 22.5, 2.8, 62.0),
        );

        Self { global, regional }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dataset from a JSON file with `global` and `regional` keys.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            global = dataset.global.len(),
            regional = dataset.regional.len(),
            "loaded fallback dataset"
        );
        Ok(dataset)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.regional.is_empty()
    }
}

/// Result of a fallback lookup for one signal kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback<S: Signal> {
    /// Raw value from a record; still needs validation.
    Raw(S::Raw),
    /// No usable record or field; carries the pre-validated safe default.
    Exhausted(S),
}

/// Read-only view over a dataset bound to a region.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    dataset: FallbackDataset,
    region: String,
}

impl FallbackStore {
    pub fn new(dataset: FallbackDataset, region: impl Into<String>) -> Self {
        Self {
            dataset,
            region: region.into(),
        }
    }

    /// Pick the record to fall back on: regional when present, else a random
    /// global record. `None` only when neither exists.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&FallbackRecord> {
        self.dataset
            .regional
            .get(&self.region)
            .or_else(|| self.dataset.global.choose(rng))
    }

    /// Look up the raw fallback for signal `S`.
    pub fn fallback_for<S: Signal, R: Rng + ?Sized>(&self, rng: &mut R) -> Fallback<S> {
        match self.choose(rng).and_then(S::from_record) {
            Some(raw) => Fallback::Raw(raw),
            None => Fallback::Exhausted(S::safe_default()),
        }
    }
}
