//! Atomic counters for pipeline observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`PipelineMetrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. every few cycles).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Per-pipeline counters. No allocations, no locking.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    cycles: AtomicU64,
    source_failures: AtomicU64,
    fallbacks_used: AtomicU64,
    fallbacks_exhausted: AtomicU64,
    validation_defaults: AtomicU64,
    reschedules: AtomicU64,
}

/// Point-in-time copy of all counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub source_failures: u64,
    pub fallbacks_used: u64,
    pub fallbacks_exhausted: u64,
    pub validation_defaults: u64,
    pub reschedules: u64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            cycles: AtomicU64::new(0),
            source_failures: AtomicU64::new(0),
            fallbacks_used: AtomicU64::new(0),
            fallbacks_exhausted: AtomicU64::new(0),
            validation_defaults: AtomicU64::new(0),
            reschedules: AtomicU64::new(0),
        }
    }

    pub fn inc_cycles(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// A primary source failed; the provider switched to fallback.
    pub fn inc_source_failures(&self) {
        self.source_failures.fetch_add(1, Ordering::Relaxed);
        self.fallbacks_used.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "source_failures", "counter incremented");
    }

    /// The fallback store had no usable value; a safe default was used.
    pub fn inc_fallbacks_exhausted(&self) {
        self.fallbacks_exhausted.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "fallbacks_exhausted", "counter incremented");
    }

    pub fn add_validation_defaults(&self, n: u64) {
        if n > 0 {
            self.validation_defaults.fetch_add(n, Ordering::Relaxed);
            tracing::trace!(metric = "validation_defaults", n, "counter incremented");
        }
    }

    pub fn inc_reschedules(&self) {
        self.reschedules.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            source_failures: self.source_failures.load(Ordering::Relaxed),
            fallbacks_used: self.fallbacks_used.load(Ordering::Relaxed),
            fallbacks_exhausted: self.fallbacks_exhausted.load(Ordering::Relaxed),
            validation_defaults: self.validation_defaults.load(Ordering::Relaxed),
            reschedules: self.reschedules.load(Ordering::Relaxed),
        }
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        let s = self.snapshot();
        tracing::info!(
            metric = "flush",
            cycles = s.cycles,
            source_failures = s.source_failures,
            fallbacks_used = s.fallbacks_used,
            fallbacks_exhausted = s.fallbacks_exhausted,
            validation_defaults = s.validation_defaults,
            reschedules = s.reschedules,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        assert_eq!(PipelineMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_source_failure_counts_fallback() {
        let m = PipelineMetrics::new();
        m.inc_source_failures();
        m.inc_source_failures();
        m.inc_fallbacks_exhausted();
        let s = m.snapshot();
        assert_eq!(s.source_failures, 2);
        assert_eq!(s.fallbacks_used, 2);
        assert_eq!(s.fallbacks_exhausted, 1);
    }

    #[test]
    fn test_validation_defaults_accumulate() {
        let m = PipelineMetrics::new();
        m.add_validation_defaults(0);
        m.add_validation_defaults(2);
        m.add_validation_defaults(1);
        assert_eq!(m.snapshot().validation_defaults, 3);
    }

    #[test]
    fn test_flush_does_not_panic() {
        let m = PipelineMetrics::new();
        m.inc_cycles();
        m.inc_reschedules();
        m.flush();
    }
}
