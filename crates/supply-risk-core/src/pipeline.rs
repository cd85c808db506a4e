//! One-cycle pipeline: acquire → validate/fallback → evaluate → decide → notify.
//!
//! A [`Pipeline`] owns all cross-cycle state (cycle counter, rotations,
//! fallback RNG). `run_cycle` takes `&mut self`, so overlapping cycles on
//! one pipeline are impossible. The pipeline does not own a timer; callers
//! invoke `run_cycle` on whatever schedule they like.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::config::PipelineConfig;
use crate::decision::{Decision, DecisionLayer};
use crate::error::Result;
use crate::evaluator::{RiskEvaluator, RiskInputs, RiskScore, ScoreOrigin};
use crate::fallback::{FallbackDataset, FallbackStore};
use crate::metrics::PipelineMetrics;
use crate::notifier::{ConsoleNotifier, Notifier};
use crate::obs;
use crate::provider::{AcquireContext, Provider};
use crate::signal::{EconomicSignal, GeopoliticalSignal, RawWeather, WeatherSignal};
use crate::source::{OpenWeatherSource, SignalSource, SyntheticSource};

/// Cross-cycle state visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Number of cycles started so far (1-indexed after the first cycle)
    pub cycle: u64,
    /// Next supplier to be consumed
    pub supplier_index: usize,
    /// Next location to be consumed
    pub location_index: usize,
}

/// Everything one cycle observed and decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    pub weather: WeatherSignal,
    pub economic: EconomicSignal,
    pub geopolitical: GeopoliticalSignal,
    pub inputs: RiskInputs,
    pub risk: RiskScore,
    pub origin: ScoreOrigin,
    pub decision: Decision,
    pub duration_ms: u64,
}

pub struct Pipeline {
    session_id: String,
    cycle: u64,
    fallback: FallbackStore,
    weather: Provider<WeatherSignal>,
    economic: Provider<EconomicSignal>,
    geopolitical: Provider<GeopoliticalSignal>,
    evaluator: RiskEvaluator,
    decisions: DecisionLayer,
    notifier: Arc<dyn Notifier>,
    metrics: PipelineMetrics,
    rng: StdRng,
}

impl Pipeline {
    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> PipelineState {
        PipelineState {
            cycle: self.cycle,
            supplier_index: self.decisions.suppliers().position(),
            location_index: self.decisions.locations().position(),
        }
    }

    pub fn decisions(&self) -> &DecisionLayer {
        &self.decisions
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Run one full cycle. Never fails: every degraded path has a recovery.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;
        let span = obs::cycle_span(&self.session_id, self.cycle);
        self.run_cycle_inner().instrument(span).await
    }

    async fn run_cycle_inner(&mut self) -> CycleReport {
        let cycle = self.cycle;
        let started = Instant::now();
        obs::emit_cycle_started(cycle);
        self.metrics.inc_cycles();

        let notifier: &dyn Notifier = self.notifier.as_ref();
        let mut ctx = AcquireContext {
            fallback: &self.fallback,
            notifier,
            metrics: &self.metrics,
            rng: &mut self.rng,
        };
        let weather = self.weather.acquire(&mut ctx).await;
        let economic = self.economic.acquire(&mut ctx).await;
        let geopolitical = self.geopolitical.acquire(&mut ctx).await;

        let inputs = RiskInputs::from_signals(&weather, economic, geopolitical);
        let evaluation = self.evaluator.evaluate(cycle, &inputs);
        obs::emit_risk_evaluated(cycle, evaluation.score.value(), evaluation.origin);

        let decision = self.decisions.decide(evaluation.score, notifier);
        if decision.supplier.is_some() {
            self.metrics.inc_reschedules();
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        obs::emit_cycle_finished(cycle, duration_ms, decision.branch);

        CycleReport {
            cycle,
            timestamp: Utc::now(),
            weather,
            economic,
            geopolitical,
            inputs,
            risk: evaluation.score,
            origin: evaluation.origin,
            decision,
            duration_ms,
        }
    }
}

/// Assembles a [`Pipeline`]. Unset sources default to the HTTP weather
/// client and synthetic indicator feeds described by the config.
pub struct PipelineBuilder {
    config: PipelineConfig,
    dataset: FallbackDataset,
    notifier: Option<Arc<dyn Notifier>>,
    weather: Option<Box<dyn SignalSource<RawWeather>>>,
    economic: Option<Box<dyn SignalSource<f64>>>,
    geopolitical: Option<Box<dyn SignalSource<f64>>>,
    evaluator: RiskEvaluator,
    state: Option<PipelineState>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            dataset: FallbackDataset::builtin(),
            notifier: None,
            weather: None,
            economic: None,
            geopolitical: None,
            evaluator: RiskEvaluator::default(),
            state: None,
        }
    }

    pub fn with_dataset(mut self, dataset: FallbackDataset) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_weather_source(mut self, source: impl SignalSource<RawWeather> + 'static) -> Self {
        self.weather = Some(Box::new(source));
        self
    }

    pub fn with_economic_source(mut self, source: impl SignalSource<f64> + 'static) -> Self {
        self.economic = Some(Box::new(source));
        self
    }

    pub fn with_geopolitical_source(mut self, source: impl SignalSource<f64> + 'static) -> Self {
        self.geopolitical = Some(Box::new(source));
        self
    }

    pub fn with_evaluator(mut self, evaluator: RiskEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Resume from a previously observed state instead of a fresh one.
    pub fn with_state(mut self, state: PipelineState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let config = self.config;
        config.validate()?;

        // Independent streams per consumer, derived from one seed.
        let seed = config.seed;
        let derive = |offset: u64| seed.map(|s| s.wrapping_add(offset));

        let weather: Box<dyn SignalSource<RawWeather>> = match self.weather {
            Some(source) => source,
            None => Box::new(OpenWeatherSource::new(config.weather.clone())?),
        };
        let economic: Box<dyn SignalSource<f64>> = self.economic.unwrap_or_else(|| {
            Box::new(SyntheticSource::new(
                "synthetic-economic",
                config.economic.baseline,
                config.economic.band,
                derive(0),
            ))
        });
        let geopolitical: Box<dyn SignalSource<f64>> = self.geopolitical.unwrap_or_else(|| {
            Box::new(SyntheticSource::new(
                "synthetic-geopolitical",
                config.geopolitical.baseline,
                config.geopolitical.band,
                derive(1),
            ))
        });
        let rng = match derive(2) {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut decisions =
            DecisionLayer::new(config.suppliers.clone(), config.locations.clone())?;
        let cycle = match self.state {
            Some(state) => {
                decisions.restore(state.supplier_index, state.location_index);
                state.cycle
            }
            None => 0,
        };
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(ConsoleNotifier));

        Ok(Pipeline {
            session_id: uuid::Uuid::new_v4().to_string(),
            cycle,
            fallback: FallbackStore::new(self.dataset, config.region.clone()),
            weather: Provider::from_boxed(weather),
            economic: Provider::from_boxed(economic),
            geopolitical: Provider::from_boxed(geopolitical),
            evaluator: self.evaluator,
            decisions,
            notifier,
            metrics: PipelineMetrics::new(),
            rng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Branch;
    use crate::fakes::{FailingSource, FixedSource, RecordingNotifier};
    use crate::signal::WeatherCondition;

    fn fixed_pipeline(notifier: Arc<RecordingNotifier>) -> Pipeline {
        Pipeline::builder(PipelineConfig::default().with_seed(5))
            .with_weather_source(FixedSource::new(RawWeather::new("Clouds", 15.0)))
            .with_economic_source(FixedSource::new(2.0))
            .with_geopolitical_source(FixedSource::new(55.0))
            .with_notifier(notifier)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_state_starts_at_zero() {
        let pipeline = fixed_pipeline(Arc::new(RecordingNotifier::new()));
        assert_eq!(
            pipeline.state(),
            PipelineState {
                cycle: 0,
                supplier_index: 0,
                location_index: 0
            }
        );
        assert!(!pipeline.session_id().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_counter_increments() {
        let mut pipeline = fixed_pipeline(Arc::new(RecordingNotifier::new()));
        for expected in 1..=6 {
            let report = pipeline.run_cycle().await;
            assert_eq!(report.cycle, expected);
            assert_eq!(pipeline.state().cycle, expected);
        }
        assert_eq!(pipeline.metrics().snapshot().cycles, 6);
    }

    #[tokio::test]
    async fn test_report_carries_validated_signals() {
        let mut pipeline = fixed_pipeline(Arc::new(RecordingNotifier::new()));
        let report = pipeline.run_cycle().await;
        assert_eq!(report.weather.condition, WeatherCondition::Clouds);
        assert_eq!(report.economic, EconomicSignal(2.0));
        assert_eq!(report.geopolitical, GeopoliticalSignal(55.0));
        assert_eq!(report.inputs, RiskInputs::new(2.0, 2.0, 55.0));
        assert_eq!(report.origin, ScoreOrigin::WarmUp);
    }

    #[tokio::test]
    async fn test_post_warmup_uses_model() {
        let mut pipeline = fixed_pipeline(Arc::new(RecordingNotifier::new()));
        for _ in 0..4 {
            pipeline.run_cycle().await;
        }
        let report = pipeline.run_cycle().await;
        assert_eq!(report.origin, ScoreOrigin::Model);
        assert!((report.risk.value() - 85.0 / 195.0).abs() < 1e-9);
        assert_eq!(report.decision.branch, Branch::Stable);
    }

    #[tokio::test]
    async fn test_failing_sources_complete_cycle() {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut pipeline = Pipeline::builder(PipelineConfig::default().with_seed(1))
            .with_weather_source(FailingSource::new("timeout"))
            .with_economic_source(FailingSource::new("timeout"))
            .with_geopolitical_source(FailingSource::new("timeout"))
            .with_notifier(notifier.clone())
            .build()
            .unwrap();

        let report = pipeline.run_cycle().await;
        assert_eq!(report.weather.condition, WeatherCondition::Clear);
        assert_eq!(report.weather.temperature_c, 20.0);
        assert_eq!(report.economic, EconomicSignal(3.0));
        assert_eq!(report.geopolitical, GeopoliticalSignal(60.0));

        // three failure notices then the final message
        let messages = notifier.messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].starts_with("Unable to access weather data online"));
        assert!(messages[1].starts_with("Unable to access economic data online"));
        assert!(messages[2].starts_with("Unable to access geopolitical data online"));
        assert_eq!(pipeline.metrics().snapshot().source_failures, 3);
    }

    #[tokio::test]
    async fn test_resume_from_state() {
        let state = PipelineState {
            cycle: 7,
            supplier_index: 2,
            location_index: 11,
        };
        let mut pipeline = Pipeline::builder(PipelineConfig::default().with_seed(5))
            .with_weather_source(FixedSource::new(RawWeather::new("Clear", 15.0)))
            .with_economic_source(FixedSource::new(2.0))
            .with_geopolitical_source(FixedSource::new(55.0))
            .with_notifier(Arc::new(RecordingNotifier::new()))
            .with_state(state)
            .build()
            .unwrap();

        assert_eq!(
            pipeline.state(),
            PipelineState {
                cycle: 7,
                supplier_index: 2,
                location_index: 2
            }
        );
        let report = pipeline.run_cycle().await;
        assert_eq!(report.cycle, 8);
        assert_eq!(report.decision.final_location, "Vaal Dam Road");
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            suppliers: vec![],
            ..PipelineConfig::default()
        };
        let result = Pipeline::builder(config)
            .with_weather_source(FailingSource::new("unused"))
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_overflowing_synthetic_band_rejected_at_build() {
        let config = PipelineConfig {
            economic: crate::config::SyntheticConfig {
                baseline: 2.5,
                band: 1e308,
            },
            ..PipelineConfig::default().with_seed(1)
        };
        let result = Pipeline::builder(config)
            .with_weather_source(FixedSource::new(RawWeather::new("Clear", 20.0)))
            .with_notifier(Arc::new(RecordingNotifier::new()))
            .build();
        assert!(matches!(
            result,
            Err(crate::error::SupplyRiskError::InvalidConfig(_))
        ));
    }
}
