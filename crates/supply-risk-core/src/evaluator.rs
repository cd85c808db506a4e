//! Risk evaluation.
//!
//! The first [`WARMUP_SCORES`]`.len()` cycles return scripted scores so that
//! both decision branches are exercised early. After that the score comes
//! from a linear model fitted once, offline, to a four-point training set:
//!
//! | weather index | growth % | stability | label |
//! |---------------|----------|-----------|-------|
//! | 1             | 2.0      | 50        | 0     |
//! | 2             | 1.5      | 60        | 1     |
//! | 3             | 2.8      | 55        | 0     |
//! | 1             | 2.2      | 70        | 0     |
//!
//! Four points and four parameters give an exact least-squares solution,
//! so the coefficients are stored as constants rather than refitted.

use serde::{Deserialize, Serialize};

use crate::signal::{EconomicSignal, GeopoliticalSignal, WeatherSignal};

/// Scripted scores for cycles 1..=4.
pub const WARMUP_SCORES: [f64; 4] = [0.33, 0.66, 0.20, 0.85];

/// Model inputs: `[weather index, economic growth, geopolitical stability]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pub weather_index: f64,
    pub economic: f64,
    pub geopolitical: f64,
}

impl RiskInputs {
    pub fn new(weather_index: f64, economic: f64, geopolitical: f64) -> Self {
        Self {
            weather_index,
            economic,
            geopolitical,
        }
    }

    pub fn from_signals(
        weather: &WeatherSignal,
        economic: EconomicSignal,
        geopolitical: GeopoliticalSignal,
    ) -> Self {
        Self::new(
            f64::from(weather.condition.index()),
            economic.0,
            geopolitical.0,
        )
    }
}

/// Labeled training rows the model constants were derived from.
pub const TRAINING_SET: [(RiskInputs, f64); 4] = [
    (RiskInputs { weather_index: 1.0, economic: 2.0, geopolitical: 50.0 }, 0.0),
    (RiskInputs { weather_index: 2.0, economic: 1.5, geopolitical: 60.0 }, 1.0),
    (RiskInputs { weather_index: 3.0, economic: 2.8, geopolitical: 55.0 }, 0.0),
    (RiskInputs { weather_index: 1.0, economic: 2.2, geopolitical: 70.0 }, 0.0),
];

/// Ordinary least-squares linear model with intercept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub weather: f64,
    pub economic: f64,
    pub geopolitical: f64,
}

impl LinearModel {
    /// Solution of the normal equations for [`TRAINING_SET`].
    pub const TRAINED: LinearModel = LinearModel {
        intercept: 225.0 / 195.0,
        weather: 75.0 / 195.0,
        economic: -200.0 / 195.0,
        geopolitical: 2.0 / 195.0,
    };

    /// Raw, unclamped prediction.
    pub fn predict(&self, x: &RiskInputs) -> f64 {
        self.intercept
            + self.weather * x.weather_index
            + self.economic * x.economic
            + self.geopolitical * x.geopolitical
    }
}

/// Risk score in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

impl RiskScore {
    /// Clamp into [0, 1]. NaN maps to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            RiskScore(0.0)
        } else {
            RiskScore(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Where a score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    WarmUp,
    Model,
}

impl std::fmt::Display for ScoreOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreOrigin::WarmUp => f.write_str("warm_up"),
            ScoreOrigin::Model => f.write_str("model"),
        }
    }
}

/// Score together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: RiskScore,
    pub origin: ScoreOrigin,
}

/// Warm-up script followed by a fixed linear model.
#[derive(Debug, Clone)]
pub struct RiskEvaluator {
    warmup: Vec<f64>,
    model: LinearModel,
}

impl Default for RiskEvaluator {
    fn default() -> Self {
        Self {
            warmup: WARMUP_SCORES.to_vec(),
            model: LinearModel::TRAINED,
        }
    }
}

impl RiskEvaluator {
    pub fn new(warmup: Vec<f64>, model: LinearModel) -> Self {
        Self { warmup, model }
    }

    pub fn warmup_len(&self) -> usize {
        self.warmup.len()
    }

    /// Evaluate for a 1-indexed `cycle`. Cycle 0 is treated as post-warm-up.
    pub fn evaluate(&self, cycle: u64, inputs: &RiskInputs) -> Evaluation {
        let scripted = usize::try_from(cycle)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|i| self.warmup.get(i));

        match scripted {
            Some(&value) => Evaluation {
                score: RiskScore::new(value),
                origin: ScoreOrigin::WarmUp,
            },
            None => Evaluation {
                score: RiskScore::new(self.model.predict(inputs)),
                origin: ScoreOrigin::Model,
            },
        }
    }
}

/// Evaluate with the standard warm-up script and trained model.
pub fn evaluate_risk(cycle: u64, inputs: &RiskInputs) -> RiskScore {
    RiskEvaluator::default().evaluate(cycle, inputs).score
}
