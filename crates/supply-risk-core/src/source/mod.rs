//! Primary signal sources.
//!
//! A source produces a raw, unvalidated value or a [`SourceError`]. Sources
//! never fall back on their own; that is the provider's job.

pub mod openweather;
pub mod synthetic;

use async_trait::async_trait;

use crate::error::SourceResult;

pub use openweather::{OpenWeatherConfig, OpenWeatherSource};
pub use synthetic::SyntheticSource;

/// Primary acquisition of one raw signal.
#[async_trait]
pub trait SignalSource<R: Send>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch a raw value. Must be bounded in time.
    async fn fetch(&self) -> SourceResult<R>;
}
