//! Synthetic indicator feed: a baseline perturbed by uniform noise.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SignalSource;
use crate::error::{SourceError, SourceResult};

/// Economic growth baseline and half-band, in percent.
pub const ECONOMIC_BASELINE: f64 = 2.5;
pub const ECONOMIC_BAND: f64 = 0.5;

/// Geopolitical stability baseline and half-band.
pub const GEOPOLITICAL_BASELINE: f64 = 50.0;
pub const GEOPOLITICAL_BAND: f64 = 5.0;

/// Produces `baseline + U(-band, band)` on every fetch.
pub struct SyntheticSource {
    name: String,
    baseline: f64,
    band: f64,
    rng: Mutex<StdRng>,
}

impl SyntheticSource {
    /// Create a source. With `seed` the sequence of values is reproducible.
    pub fn new(name: &str, baseline: f64, band: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        SyntheticSource {
            name: name.to_string(),
            baseline,
            band: band.abs(),
            rng: Mutex::new(rng),
        }
    }

    pub fn economic(seed: Option<u64>) -> Self {
        Self::new("synthetic-economic", ECONOMIC_BASELINE, ECONOMIC_BAND, seed)
    }

    pub fn geopolitical(seed: Option<u64>) -> Self {
        Self::new(
            "synthetic-geopolitical",
            GEOPOLITICAL_BASELINE,
            GEOPOLITICAL_BAND,
            seed,
        )
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn band(&self) -> f64 {
        self.band
    }
}

#[async_trait]
impl SignalSource<f64> for SyntheticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> SourceResult<f64> {
        if !(2.0 * self.band).is_finite() {
            return Err(SourceError::Unavailable(format!(
                "{} noise band {} is not sampleable",
                self.name, self.band
            )));
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SourceError::Unavailable(format!("{} rng poisoned", self.name)))?;
        Ok(self.baseline + rng.gen_range(-self.band..=self.band))
    }
}
