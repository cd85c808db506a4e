//! Range and domain validation for raw signal values.
//!
//! Validators never fail. A value outside its domain is replaced by a
//! documented default and the substitution is reported as a
//! [`ValidationIssue`] alongside the value. Reporting the issue to a
//! notifier is left to the caller so these functions stay pure.
//!
//! | signal       | domain       | default   |
//! |--------------|--------------|-----------|
//! | condition    | known labels | `Unknown` |
//! | temperature  | [-50, 50] °C | 0.0       |
//! | economic     | [-10, 10] %  | 0.0       |
//! | geopolitical | [0, 100]     | 50.0      |

use std::ops::RangeInclusive;

use crate::signal::{EconomicSignal, GeopoliticalSignal, WeatherCondition, WeatherSignal};

pub const TEMPERATURE_RANGE_C: RangeInclusive<f64> = -50.0..=50.0;
pub const ECONOMIC_RANGE: RangeInclusive<f64> = -10.0..=10.0;
pub const GEOPOLITICAL_RANGE: RangeInclusive<f64> = 0.0..=100.0;

pub const DEFAULT_TEMPERATURE_C: f64 = 0.0;
pub const DEFAULT_ECONOMIC: f64 = 0.0;
pub const DEFAULT_GEOPOLITICAL: f64 = 50.0;

/// A substitution made during validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    UnknownCondition { label: String },
    TemperatureOutOfRange { value: f64 },
    EconomicOutOfRange { value: f64 },
    GeopoliticalOutOfRange { value: f64 },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::UnknownCondition { label } => write!(
                f,
                "Invalid weather condition detected: {label}. Defaulting to 'Unknown'."
            ),
            ValidationIssue::TemperatureOutOfRange { value } => {
                write!(f, "Temperature out of range: {value}°C. Defaulting to 0°C.")
            }
            ValidationIssue::EconomicOutOfRange { value } => write!(
                f,
                "Economic growth value {value}% is out of range. Defaulting to 0%."
            ),
            ValidationIssue::GeopoliticalOutOfRange { value } => write!(
                f,
                "Geopolitical stability index {value} is out of range. Defaulting to 50."
            ),
        }
    }
}

/// A value guaranteed to be inside its domain, plus any substitutions made.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub issues: Vec<ValidationIssue>,
}

impl<T> Validated<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            issues: Vec::new(),
        }
    }

    /// Whether the raw input was already valid.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate a weather observation. NaN temperatures count as out of range.
pub fn validate_weather(condition: &str, temperature_c: f64) -> Validated<WeatherSignal> {
    let mut issues = Vec::new();

    let condition = WeatherCondition::parse(condition).unwrap_or_else(|| {
        issues.push(ValidationIssue::UnknownCondition {
            label: condition.to_string(),
        });
        WeatherCondition::Unknown
    });

    let temperature_c = if TEMPERATURE_RANGE_C.contains(&temperature_c) {
        temperature_c
    } else {
        issues.push(ValidationIssue::TemperatureOutOfRange {
            value: temperature_c,
        });
        DEFAULT_TEMPERATURE_C
    };

    Validated {
        value: WeatherSignal {
            condition,
            temperature_c,
        },
        issues,
    }
}

/// Validate an economic growth percentage.
pub fn validate_economic(value: f64) -> Validated<EconomicSignal> {
    if ECONOMIC_RANGE.contains(&value) {
        Validated::clean(EconomicSignal(value))
    } else {
        Validated {
            value: EconomicSignal(DEFAULT_ECONOMIC),
            issues: vec![ValidationIssue::EconomicOutOfRange { value }],
        }
    }
}

/// Validate a geopolitical stability index.
pub fn validate_geopolitical(value: f64) -> Validated<GeopoliticalSignal> {
    if GEOPOLITICAL_RANGE.contains(&value) {
        Validated::clean(GeopoliticalSignal(value))
    } else {
        Validated {
            value: GeopoliticalSignal(DEFAULT_GEOPOLITICAL),
            issues: vec![ValidationIssue::GeopoliticalOutOfRange { value }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBES: &[f64] = &[
        f64::NEG_INFINITY,
        -1e9,
        -273.15,
        -100.0,
        -50.0,
        -50.0001,
        -10.0,
        -0.0,
        0.0,
        2.5,
        10.0,
        10.0001,
        50.0,
        50.0001,
        100.0,
        100.5,
        1e12,
        f64::INFINITY,
        f64::NAN,
    ];

    #[test]
    fn test_outputs_always_in_domain() {
        for &v in PROBES {
            let w = validate_weather("Hail", v).value;
            assert!(TEMPERATURE_RANGE_C.contains(&w.temperature_c), "temp {v}");
            assert_eq!(w.condition, WeatherCondition::Unknown);

            assert!(ECONOMIC_RANGE.contains(&validate_economic(v).value.0), "econ {v}");
            assert!(
                GEOPOLITICAL_RANGE.contains(&validate_geopolitical(v).value.0),
                "geo {v}"
            );
        }
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(validate_weather("Clear", -50.0).is_clean());
        assert!(validate_weather("Clear", 50.0).is_clean());
        assert!(validate_economic(-10.0).is_clean());
        assert!(validate_economic(10.0).is_clean());
        assert!(validate_geopolitical(0.0).is_clean());
        assert!(validate_geopolitical(100.0).is_clean());
    }

    #[test]
    fn test_valid_values_unchanged() {
        let first = validate_weather("Rain", 18.4).value;
        let again = validate_weather(first.condition.as_str(), first.temperature_c);
        assert!(again.is_clean());
        assert_eq!(again.value, first);

        let econ = validate_economic(2.7).value;
        assert_eq!(validate_economic(econ.0).value, econ);

        let geo = validate_geopolitical(62.0).value;
        assert_eq!(validate_geopolitical(geo.0).value, geo);
    }

    #[test]
    fn test_unknown_condition_is_itself_valid() {
        let v = validate_weather("Unknown", 20.0);
        assert!(v.is_clean());
        assert_eq!(v.value.condition, WeatherCondition::Unknown);
    }

    #[test]
    fn test_defaults_and_issues() {
        let w = validate_weather("Tornado", 75.0);
        assert_eq!(w.value.condition, WeatherCondition::Unknown);
        assert_eq!(w.value.temperature_c, 0.0);
        assert_eq!(w.issues.len(), 2);
        assert_eq!(
            w.issues[0].to_string(),
            "Invalid weather condition detected: Tornado. Defaulting to 'Unknown'."
        );

        let e = validate_economic(12.5);
        assert_eq!(e.value, EconomicSignal(0.0));
        assert_eq!(
            e.issues,
            vec![ValidationIssue::EconomicOutOfRange { value: 12.5 }]
        );

        let g = validate_geopolitical(-3.0);
        assert_eq!(g.value, GeopoliticalSignal(50.0));
        assert!(g.issues[0].to_string().contains("Defaulting to 50"));
    }

    #[test]
    fn test_nan_temperature_defaults() {
        let w = validate_weather("Clear", f64::NAN);
        assert_eq!(w.value.temperature_c, 0.0);
        assert_eq!(w.value.condition, WeatherCondition::Clear);
        assert_eq!(w.issues.len(), 1);
    }
}
