//! Supply Risk Core Library
//!
//! Scores supply-chain disruption risk from three environmental signals and
//! turns the score into a spoken/printed decision.
//!
//! ## Cycle
//!
//! 1. Acquire weather, economic and geopolitical signals. Each provider tries
//!    its primary source, falls back to the local dataset, and validates.
//! 2. Evaluate risk: scripted warm-up scores for the first cycles, a fixed
//!    linear model afterwards.
//! 3. Decide: at or above 0.5 reschedule with the next supplier and explain
//!    the disruption at the next location; otherwise report stable.
//! 4. Notify with the final message and the next location.

pub mod config;
pub mod decision;
pub mod error;
pub mod evaluator;
pub mod fakes;
pub mod fallback;
pub mod metrics;
pub mod notifier;
pub mod obs;
pub mod pipeline;
pub mod provider;
pub mod rotation;
pub mod signal;
pub mod source;
pub mod telemetry;
pub mod validation;

pub use config::{PipelineConfig, SyntheticConfig};
pub use decision::{explain_disruption, Branch, Decision, DecisionLayer, DISRUPTION_THRESHOLD};
pub use error::{Result, SourceError, SourceResult, SupplyRiskError};
pub use evaluator::{
    evaluate_risk, Evaluation, LinearModel, RiskEvaluator, RiskInputs, RiskScore, ScoreOrigin,
    WARMUP_SCORES,
};
pub use fallback::{Fallback, FallbackDataset, FallbackRecord, FallbackStore};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use notifier::{ConsoleNotifier, Notifier, SpeechCommand, SpeechNotifier};
pub use pipeline::{CycleReport, Pipeline, PipelineBuilder, PipelineState};
pub use provider::{AcquireContext, Provider};
pub use rotation::Rotation;
pub use signal::{
    EconomicSignal, GeopoliticalSignal, RawWeather, Signal, SignalKind, WeatherCondition,
    WeatherSignal,
};
pub use source::{OpenWeatherConfig, OpenWeatherSource, SignalSource, SyntheticSource};
pub use telemetry::init_tracing;
pub use validation::{
    validate_economic, validate_geopolitical, validate_weather, Validated, ValidationIssue,
};

/// Announcement emitted once when a scheduler starts.
pub const STARTUP_MESSAGE: &str = "Starting supply chain risk prediction program.";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
