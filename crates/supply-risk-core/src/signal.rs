//! Validated environmental signals consumed by the risk evaluator.
//!
//! Each signal type knows how to validate its raw form, how to pull its raw
//! form out of a fallback record, and what its pre-validated safe default is.
//! [`crate::provider::Provider`] is generic over this trait.

use serde::{Deserialize, Serialize};

use crate::fallback::FallbackRecord;
use crate::validation::{
    validate_economic, validate_geopolitical, validate_weather, Validated,
};

/// Which signal a value, failure or fallback belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Weather,
    Economic,
    Geopolitical,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Weather => "weather",
            SignalKind::Economic => "economic",
            SignalKind::Geopolitical => "geopolitical",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse weather condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Unknown,
}

impl WeatherCondition {
    /// Parse a provider condition label. Matching is exact and case-sensitive.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Clear" => Some(WeatherCondition::Clear),
            "Clouds" => Some(WeatherCondition::Clouds),
            "Rain" => Some(WeatherCondition::Rain),
            "Snow" => Some(WeatherCondition::Snow),
            "Unknown" => Some(WeatherCondition::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Unknown => "Unknown",
        }
    }

    /// Binary index fed to the risk model: 1 for clear skies, 2 otherwise.
    pub fn index(&self) -> u8 {
        match self {
            WeatherCondition::Clear => 1,
            _ => 2,
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather observation as delivered by a source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeather {
    pub condition: String,
    pub temperature_c: f64,
}

impl RawWeather {
    pub fn new(condition: impl Into<String>, temperature_c: f64) -> Self {
        Self {
            condition: condition.into(),
            temperature_c,
        }
    }
}

/// Validated weather: temperature always within [-50, 50] °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSignal {
    pub condition: WeatherCondition,
    pub temperature_c: f64,
}

/// Validated economic growth in percent, always within [-10, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EconomicSignal(pub f64);

/// Validated geopolitical stability index, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeopoliticalSignal(pub f64);

/// Behaviour shared by all three signal types.
pub trait Signal: Sized + Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Unvalidated form produced by sources and fallback records.
    type Raw: std::fmt::Debug + Clone + PartialEq + Send + Sync + 'static;

    const KIND: SignalKind;

    fn validate(raw: Self::Raw) -> Validated<Self>;

    /// Extract this signal's field(s) from a fallback record, if present.
    fn from_record(record: &FallbackRecord) -> Option<Self::Raw>;

    /// Pre-validated value used when the fallback store cannot help.
    fn safe_default() -> Self;
}

impl Signal for WeatherSignal {
    type Raw = RawWeather;
    const KIND: SignalKind = SignalKind::Weather;

    fn validate(raw: RawWeather) -> Validated<Self> {
        validate_weather(&raw.condition, raw.temperature_c)
    }

    fn from_record(record: &FallbackRecord) -> Option<RawWeather> {
        let condition = record.weather.as_ref()?;
        let temperature_c = record.temperature_c?;
        Some(RawWeather::new(condition.clone(), temperature_c))
    }

    fn safe_default() -> Self {
        WeatherSignal {
            condition: WeatherCondition::Unknown,
            temperature_c: 20.0,
        }
    }
}

impl Signal for EconomicSignal {
    type Raw = f64;
    const KIND: SignalKind = SignalKind::Economic;

    fn validate(raw: f64) -> Validated<Self> {
        validate_economic(raw)
    }

    fn from_record(record: &FallbackRecord) -> Option<f64> {
        record.economic_growth
    }

    fn safe_default() -> Self {
        EconomicSignal(2.0)
    }
}

impl Signal for GeopoliticalSignal {
    type Raw = f64;
    const KIND: SignalKind = SignalKind::Geopolitical;

    fn validate(raw: f64) -> Validated<Self> {
        validate_geopolitical(raw)
    }

    fn from_record(record: &FallbackRecord) -> Option<f64> {
        record.geopolitical_stability
    }

    fn safe_default() -> Self {
        GeopoliticalSignal(50.0)
    }
}
