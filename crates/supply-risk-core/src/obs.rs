//! Structured observability hooks for the pipeline cycle.
//!
//! This module provides:
//! - Cycle-scoped tracing spans via [`cycle_span`], attached with
//!   `tracing::Instrument` so they survive `.await` points
//! - Emission functions for cycle start/finish, degraded acquisition,
//!   risk evaluation and the decision taken
//!
//! Filter with `RUST_LOG`; pass `--json` to the daemon for JSON lines.

use tracing::{info, warn};

use crate::decision::Branch;
use crate::evaluator::ScoreOrigin;
use crate::signal::SignalKind;

/// Span tagged with the session and cycle number.
pub fn cycle_span(session_id: &str, cycle: u64) -> tracing::Span {
    tracing::info_span!("supply_risk.cycle", session_id = %session_id, cycle = cycle)
}

pub fn emit_cycle_started(cycle: u64) {
    info!(event = "cycle.started", cycle = cycle);
}

pub fn emit_cycle_finished(cycle: u64, duration_ms: u64, branch: Branch) {
    info!(
        event = "cycle.finished",
        cycle = cycle,
        duration_ms = duration_ms,
        branch = %branch,
    );
}

/// Primary source failed; fallback follows.
pub fn emit_source_failed(kind: SignalKind, source: &str, error: &dyn std::fmt::Display) {
    warn!(event = "source.failed", kind = %kind, source = %source, error = %error);
}

/// Fallback store had no usable value for `kind`.
pub fn emit_fallback_exhausted(kind: SignalKind) {
    warn!(event = "fallback.exhausted", kind = %kind);
}

/// A validator substituted a default.
pub fn emit_validation_default(kind: SignalKind, issue: &dyn std::fmt::Display) {
    warn!(event = "validation.defaulted", kind = %kind, issue = %issue);
}

pub fn emit_risk_evaluated(cycle: u64, score: f64, origin: ScoreOrigin) {
    info!(
        event = "risk.evaluated",
        cycle = cycle,
        score = score,
        origin = %origin,
    );
}

pub fn emit_shipment_rescheduled(supplier: &str, location: &str) {
    info!(event = "shipment.rescheduled", supplier = %supplier, location = %location);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_span_create() {
        let span = cycle_span("session", 1);
        let _entered = span.enter();
        emit_cycle_started(1);
    }
}
