//! supply-riskd - supply-chain risk scheduler
//!
//! Runs one pipeline cycle per period: acquire signals, score risk, decide
//! and notify. The first cycle starts one period after launch; cycles never
//! overlap. Stops after `--cycles` cycles or on Ctrl-C.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, Level};

use supply_risk_core::{
    ConsoleNotifier, CycleReport, FallbackDataset, Notifier, Pipeline, PipelineConfig,
    SpeechCommand, SpeechNotifier, STARTUP_MESSAGE,
};

/// Counters are flushed to the log every this many cycles.
const METRICS_FLUSH_EVERY: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "supply-riskd")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Supply-chain disruption risk scheduler", long_about = None)]
struct Cli {
    /// Seconds between cycles
    #[arg(long)]
    interval_secs: Option<u64>,

    /// City queried for current weather
    #[arg(long)]
    city: Option<String>,

    /// OpenWeatherMap API key (falls back to OPENWEATHER_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Weather endpoint URL
    #[arg(long)]
    weather_url: Option<String>,

    /// Region used to select fallback data
    #[arg(long)]
    region: Option<String>,

    /// JSON file replacing the built-in fallback dataset
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Stop after this many cycles
    #[arg(long)]
    cycles: Option<u64>,

    /// Run a single cycle immediately and exit
    #[arg(long, conflicts_with = "cycles")]
    once: bool,

    /// Seed for synthetic feeds and fallback selection
    #[arg(long)]
    seed: Option<u64>,

    /// Also speak every message through espeak
    #[arg(long)]
    speak: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines and cycle reports
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    supply_risk_core::init_tracing(cli.json, level);

    let config = apply_overrides(PipelineConfig::from_env(), &cli);
    let dataset = match &cli.fallback {
        Some(path) => FallbackDataset::from_json_file(path)
            .with_context(|| format!("Failed to load fallback dataset {}", path.display()))?,
        None => FallbackDataset::builtin(),
    };

    let notifier: Arc<dyn Notifier> = if cli.speak {
        Arc::new(SpeechNotifier::new(ConsoleNotifier, SpeechCommand::default()))
    } else {
        Arc::new(ConsoleNotifier)
    };

    let period = config.interval();
    let mut pipeline = Pipeline::builder(config)
        .with_dataset(dataset)
        .with_notifier(notifier.clone())
        .build()
        .context("Failed to build risk pipeline")?;

    info!(
        version = supply_risk_core::VERSION,
        session_id = %pipeline.session_id(),
        interval_secs = period.as_secs(),
        "supply-riskd started"
    );
    notifier.notify(STARTUP_MESSAGE);

    let json = cli.json;
    if cli.once {
        let report = pipeline.run_cycle().await;
        log_report(&report, json);
    } else {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let completed = run_schedule(&mut pipeline, period, cli.cycles, shutdown, |report| {
            log_report(report, json)
        })
        .await;
        info!(completed, "scheduler stopped");
    }

    pipeline.metrics().flush();
    Ok(())
}

/// Overlay command-line flags on an environment-derived config.
fn apply_overrides(mut config: PipelineConfig, cli: &Cli) -> PipelineConfig {
    if let Some(secs) = cli.interval_secs {
        config.interval_secs = secs;
    }
    if let Some(city) = &cli.city {
        config.weather.city = city.clone();
    }
    if let Some(key) = &cli.api_key {
        config.weather.api_key = Some(key.clone());
    }
    if let Some(url) = &cli.weather_url {
        config.weather.endpoint = url.clone();
    }
    if let Some(region) = &cli.region {
        config.region = region.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config
}

/// Drive `pipeline` once per `period` until `max_cycles` cycles completed or
/// `shutdown` resolves. Returns the number of completed cycles.
///
/// The first tick fires one period after the call. A cycle that overruns the
/// period delays the following tick instead of bursting to catch up.
async fn run_schedule<F, R>(
    pipeline: &mut Pipeline,
    period: Duration,
    max_cycles: Option<u64>,
    shutdown: F,
    mut on_report: R,
) -> u64
where
    F: Future<Output = ()>,
    R: FnMut(&CycleReport),
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut completed = 0u64;
    loop {
        if max_cycles.is_some_and(|max| completed >= max) {
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!(event = "scheduler.shutdown", completed, "shutdown requested");
                break;
            }
            _ = ticker.tick() => {}
        }

        let report = pipeline.run_cycle().await;
        completed += 1;
        on_report(&report);

        if completed % METRICS_FLUSH_EVERY == 0 {
            pipeline.metrics().flush();
        }
    }
    completed
}

fn log_report(report: &CycleReport, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => info!(event = "cycle.report", report = %line),
            Err(e) => tracing::warn!(error = %e, "failed to serialize cycle report"),
        }
    } else {
        info!(
            event = "cycle.report",
            cycle = report.cycle,
            risk = %report.risk,
            origin = %report.origin,
            branch = %report.decision.branch,
            location = %report.decision.final_location,
        );
    }
}
