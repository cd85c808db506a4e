//! Decision and action layer.
//!
//! Rotation consumption per cycle:
//! - disrupted: one supplier, two locations (disruption lookup, then the
//!   final "current location" suffix)
//! - stable: no supplier, one location (final suffix only)

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::evaluator::RiskScore;
use crate::notifier::Notifier;
use crate::obs;
use crate::rotation::Rotation;

/// Scores at or above this take the disrupted branch.
pub const DISRUPTION_THRESHOLD: f64 = 0.5;

pub const DEFAULT_SUPPLIERS: [&str; 4] = ["Supplier A", "Supplier B", "Supplier C", "Supplier D"];

pub const DEFAULT_LOCATIONS: [&str; 9] = [
    "Leseding Road",
    "Vaal River Road",
    "Vaal Dam Road",
    "R1 Road",
    "Vereeniging Highway Road",
    "N1 Road",
    "Pretorious Street",
    "West Street Road",
    "Rivonia Road",
];

pub fn default_suppliers() -> Vec<String> {
    DEFAULT_SUPPLIERS.iter().map(|s| s.to_string()).collect()
}

pub fn default_locations() -> Vec<String> {
    DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect()
}

pub const NO_SPECIFIC_DISRUPTION: &str = "No specific disruptions reported for this location.";

const STABLE_SENTENCE: &str = "The supply chain is stable at this location.";
const DISRUPTION_WARNING: &str = "Warning: A potential supply chain disruption is predicted.";

/// Known cause for a location, or the generic sentence.
pub fn explain_disruption(location: &str) -> &'static str {
    match location {
        "Leseding Road" => "There are floods on Leseding Road, which could cause significant delays.",
        "Vaal River Road" => "Muds from recent rains on Vaal River Road may obstruct traffic.",
        "Vaal Dam Road" => "Flooding near Vaal Dam Road could disrupt shipments.",
        "R1 Road" => "Economic shifts are causing increased congestion on R1 Road.",
        "Vereeniging Highway Road" => "Geopolitical tensions in the area are affecting logistics.",
        "N1 Road" => "Natural disasters have led to road closures on N1 Road.",
        "Pretorious Street" => "Flooding on Pretorious Street may impact delivery schedules.",
        "West Street Road" => "Economic shifts are causing instability along West Street Road.",
        "Rivonia Road" => {
            "Heavy traffic due to ongoing construction on Rivonia Road could delay shipments."
        }
        _ => NO_SPECIFIC_DISRUPTION,
    }
}

/// Which path a score takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Disrupted,
    Stable,
}

impl Branch {
    pub fn for_score(score: RiskScore) -> Self {
        if score.value() >= DISRUPTION_THRESHOLD {
            Branch::Disrupted
        } else {
            Branch::Stable
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Disrupted => f.write_str("disrupted"),
            Branch::Stable => f.write_str("stable"),
        }
    }
}

/// Everything one decision consumed and emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub branch: Branch,
    /// Supplier a shipment was rescheduled with (disrupted only).
    pub supplier: Option<String>,
    /// Location used for the disruption explanation (disrupted only).
    pub disruption_location: Option<String>,
    /// Location appended to the final message.
    pub final_location: String,
    /// Final message as sent to the notifier.
    pub message: String,
}

/// Owns the supplier and location rotations.
#[derive(Debug, Clone)]
pub struct DecisionLayer {
    suppliers: Rotation<String>,
    locations: Rotation<String>,
}

impl DecisionLayer {
    pub fn new(suppliers: Vec<String>, locations: Vec<String>) -> Result<Self> {
        Ok(Self {
            suppliers: Rotation::new("suppliers", suppliers)?,
            locations: Rotation::new("locations", locations)?,
        })
    }

    /// Restore rotation cursors, e.g. from a saved [`crate::PipelineState`].
    pub fn restore(&mut self, supplier_index: usize, location_index: usize) {
        self.suppliers.seek(supplier_index);
        self.locations.seek(location_index);
    }

    pub fn suppliers(&self) -> &Rotation<String> {
        &self.suppliers
    }

    pub fn locations(&self) -> &Rotation<String> {
        &self.locations
    }

    /// Threshold the score, act on it, and emit the final message.
    ///
    /// On the disrupted branch the rescheduling notice is emitted before the
    /// final message.
    pub fn decide(&mut self, score: RiskScore, notifier: &dyn Notifier) -> Decision {
        let branch = Branch::for_score(score);
        let mut message = format!(
            "Supply Chain Risk Prediction. The current risk level is {score}. "
        );

        let (supplier, disruption_location) = match branch {
            Branch::Disrupted => {
                message.push_str(DISRUPTION_WARNING);

                let supplier = self.suppliers.next_item().clone();
                notifier.notify(&format!(
                    "Rescheduling shipping or client delivery with {supplier} due to predicted disruptions."
                ));

                let location = self.locations.next_item().clone();
                obs::emit_shipment_rescheduled(&supplier, &location);
                message.push(' ');
                message.push_str(explain_disruption(&location));

                (Some(supplier), Some(location))
            }
            Branch::Stable => {
                message.push_str(STABLE_SENTENCE);
                (None, None)
            }
        };

        let final_location = self.locations.next_item().clone();
        let message = format!("{message} Current location: {final_location}.");
        notifier.notify(&message);

        Decision {
            branch,
            supplier,
            disruption_location,
            final_location,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::RecordingNotifier;

    fn standard_layer() -> DecisionLayer {
        DecisionLayer::new(default_suppliers(), default_locations()).unwrap()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(Branch::for_score(RiskScore::new(0.5)), Branch::Disrupted);
        assert_eq!(Branch::for_score(RiskScore::new(0.4999)), Branch::Stable);
        assert_eq!(Branch::for_score(RiskScore::new(1.0)), Branch::Disrupted);
        assert_eq!(Branch::for_score(RiskScore::new(0.0)), Branch::Stable);
    }

    #[test]
    fn test_every_default_location_has_unique_cause() {
        let causes: std::collections::HashSet<_> =
            DEFAULT_LOCATIONS.iter().map(|l| explain_disruption(l)).collect();
        assert_eq!(causes.len(), DEFAULT_LOCATIONS.len());
        assert!(!causes.contains(NO_SPECIFIC_DISRUPTION));
        assert_eq!(explain_disruption("Main Street"), NO_SPECIFIC_DISRUPTION);
    }

    #[test]
    fn test_stable_consumes_one_location() {
        let mut layer = standard_layer();
        let notifier = RecordingNotifier::new();

        let d = layer.decide(RiskScore::new(0.33), &notifier);
        assert_eq!(d.branch, Branch::Stable);
        assert_eq!(d.supplier, None);
        assert_eq!(d.final_location, "Leseding Road");
        assert_eq!(
            d.message,
            "Supply Chain Risk Prediction. The current risk level is 0.33. \
             The supply chain is stable at this location. Current location: Leseding Road."
        );
        assert_eq!(notifier.messages(), vec![d.message.clone()]);
        assert_eq!(layer.locations().consumed(), 1);
        assert_eq!(layer.suppliers().consumed(), 0);
    }

    #[test]
    fn test_disrupted_consumes_supplier_and_two_locations() {
        let mut layer = standard_layer();
        let notifier = RecordingNotifier::new();

        let d = layer.decide(RiskScore::new(0.85), &notifier);
        assert_eq!(d.branch, Branch::Disrupted);
        assert_eq!(d.supplier.as_deref(), Some("Supplier A"));
        assert_eq!(d.disruption_location.as_deref(), Some("Leseding Road"));
        assert_eq!(d.final_location, "Vaal River Road");
        assert_eq!(
            d.message,
            "Supply Chain Risk Prediction. The current risk level is 0.85. \
             Warning: A potential supply chain disruption is predicted. \
             There are floods on Leseding Road, which could cause significant delays. \
             Current location: Vaal River Road."
        );

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            "Rescheduling shipping or client delivery with Supplier A due to predicted disruptions."
        );
        assert_eq!(messages[1], d.message);

        assert_eq!(layer.suppliers().consumed(), 1);
        assert_eq!(layer.locations().consumed(), 2);
    }

    #[test]
    fn test_suppliers_wrap_after_four() {
        let mut layer = standard_layer();
        let notifier = RecordingNotifier::new();
        let suppliers: Vec<String> = (0..5)
            .map(|_| layer.decide(RiskScore::new(0.9), &notifier).supplier.unwrap())
            .collect();
        assert_eq!(
            suppliers,
            vec!["Supplier A", "Supplier B", "Supplier C", "Supplier D", "Supplier A"]
        );
        assert_eq!(layer.suppliers().position(), 1);
        // 5 disrupted cycles x 2 locations, wrapped over 9
        assert_eq!(layer.locations().position(), 10 % 9);
    }

    #[test]
    fn test_custom_rotations_validated() {
        assert!(DecisionLayer::new(vec![], vec!["X".to_string()]).is_err());
        assert!(DecisionLayer::new(vec!["S".to_string()], vec![]).is_err());

        let mut layer =
            DecisionLayer::new(vec!["S".to_string()], vec!["Main Street".to_string()]).unwrap();
        let d = layer.decide(RiskScore::new(0.7), &RecordingNotifier::new());
        assert!(d.message.contains(NO_SPECIFIC_DISRUPTION));
        assert!(d.message.ends_with("Current location: Main Street."));
    }
}
