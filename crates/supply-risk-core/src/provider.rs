//! Signal providers: primary source, then fallback, always validated.
//!
//! A provider call never fails. Source errors and validation substitutions
//! are reported to the notifier and the log, and a value inside the signal's
//! domain is always returned.

use rand::rngs::StdRng;

use crate::fallback::{Fallback, FallbackStore};
use crate::metrics::PipelineMetrics;
use crate::notifier::Notifier;
use crate::obs;
use crate::signal::Signal;
use crate::source::SignalSource;
use crate::validation::Validated;

/// Collaborators a provider needs when it has to degrade.
pub struct AcquireContext<'a> {
    pub fallback: &'a FallbackStore,
    pub notifier: &'a dyn Notifier,
    pub metrics: &'a PipelineMetrics,
    pub rng: &'a mut StdRng,
}

impl AcquireContext<'_> {
    fn accept<S: Signal>(&self, validated: Validated<S>) -> S {
        self.metrics
            .add_validation_defaults(validated.issues.len() as u64);
        for issue in &validated.issues {
            obs::emit_validation_default(S::KIND, issue);
            self.notifier.notify(&issue.to_string());
        }
        validated.value
    }
}

/// Acquires one validated signal of type `S`.
pub struct Provider<S: Signal> {
    source: Box<dyn SignalSource<S::Raw>>,
}

impl<S: Signal> Provider<S> {
    pub fn new(source: impl SignalSource<S::Raw> + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn from_boxed(source: Box<dyn SignalSource<S::Raw>>) -> Self {
        Self { source }
    }

    pub async fn acquire(&self, ctx: &mut AcquireContext<'_>) -> S {
        match self.source.fetch().await {
            Ok(raw) => ctx.accept(S::validate(raw)),
            Err(err) => {
                obs::emit_source_failed(S::KIND, self.source.name(), &err);
                ctx.metrics.inc_source_failures();
                ctx.notifier.notify(&format!(
                    "Unable to access {} data online. Using fallback data. Error: {}",
                    S::KIND,
                    err
                ));
                self.fall_back(ctx)
            }
        }
    }

    fn fall_back(&self, ctx: &mut AcquireContext<'_>) -> S {
        match ctx.fallback.fallback_for::<S, _>(&mut *ctx.rng) {
            Fallback::Raw(raw) => ctx.accept(S::validate(raw)),
            Fallback::Exhausted(default) => {
                obs::emit_fallback_exhausted(S::KIND);
                ctx.metrics.inc_fallbacks_exhausted();
                ctx.notifier.notify(&format!(
                    "Invalid fallback data for {}. Defaulting to safe values.",
                    S::KIND
                ));
                default
            }
        }
    }
}
