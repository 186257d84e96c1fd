//! Numeric cutoffs shared by every classifier.
//!
//! The built-in values live in [`ThresholdConfig::DEFAULT`]. Overrides loaded
//! from configuration go through [`ThresholdConfig::validate`], which enforces
//! the ordering each group depends on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Battery cutoffs, percent. Each bucket is inclusive of its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryThresholds {
    pub critical: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for BatteryThresholds {
    fn default() -> Self {
        ThresholdConfig::DEFAULT.battery
    }
}

/// Temperature cutoffs, °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureThresholds {
    pub normal: f64,
    pub warning: f64,
    pub critical: f64,
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        ThresholdConfig::DEFAULT.temperature
    }
}

/// Signal strength cutoffs, percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalThresholds {
    pub poor: f64,
    pub fair: f64,
    pub good: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        ThresholdConfig::DEFAULT.signal
    }
}

/// Allowed distance between a joint's current and target angle, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviationThresholds {
    pub warning: f64,
    pub error: f64,
}

impl Default for DeviationThresholds {
    fn default() -> Self {
        ThresholdConfig::DEFAULT.deviation
    }
}

/// Closed range used by the simulator to generate plausible readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRanges {
    pub battery: SimulationRange,
    pub cpu: SimulationRange,
    pub temperature: SimulationRange,
}

impl Default for SimulationRanges {
    fn default() -> Self {
        ThresholdConfig::DEFAULT.simulation
    }
}

/// The complete threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub battery: BatteryThresholds,
    pub temperature: TemperatureThresholds,
    pub signal: SignalThresholds,
    pub deviation: DeviationThresholds,
    /// Fleet uptime target, percent.
    pub uptime_target: f64,
    pub simulation: SimulationRanges,
}

impl ThresholdConfig {
    pub const DEFAULT: ThresholdConfig = ThresholdConfig {
        battery: BatteryThresholds {
            critical: 20.0,
            low: 40.0,
            medium: 70.0,
            high: 90.0,
        },
        temperature: TemperatureThresholds {
            normal: 45.0,
            warning: 60.0,
            critical: 75.0,
        },
        signal: SignalThresholds {
            poor: 30.0,
            fair: 60.0,
            good: 80.0,
        },
        deviation: DeviationThresholds {
            warning: 5.0,
            error: 10.0,
        },
        uptime_target: 99.5,
        simulation: SimulationRanges {
            battery: SimulationRange {
                min: 15.0,
                max: 100.0,
            },
            cpu: SimulationRange {
                min: 10.0,
                max: 95.0,
            },
            temperature: SimulationRange {
                min: 35.0,
                max: 85.0,
            },
        },
    };

    /// Check that every group is finite and strictly ascending.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let b = &self.battery;
        ascending("battery", &[b.critical, b.low, b.medium, b.high])?;

        let t = &self.temperature;
        ascending("temperature", &[t.normal, t.warning, t.critical])?;

        let s = &self.signal;
        ascending("signal", &[s.poor, s.fair, s.good])?;

        let d = &self.deviation;
        ascending("deviation", &[d.warning, d.error])?;

        if !(0.0..=100.0).contains(&self.uptime_target) {
            return Err(ThresholdError::UptimeTarget(self.uptime_target));
        }

        let sim = &self.simulation;
        for (group, range) in [
            ("simulation.battery", sim.battery),
            ("simulation.cpu", sim.cpu),
            ("simulation.temperature", sim.temperature),
        ] {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(ThresholdError::EmptyRange {
                    group,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        Ok(())
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn ascending(group: &'static str, values: &[f64]) -> Result<(), ThresholdError> {
    if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
        return Err(ThresholdError::NotFinite { group, value });
    }
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(ThresholdError::NotAscending {
                group,
                lower: pair[0],
                upper: pair[1],
            });
        }
    }
    Ok(())
}

/// Errors from [`ThresholdConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("{group} threshold {value} is not a finite number")]
    NotFinite { group: &'static str, value: f64 },

    #[error("{group} thresholds must be strictly ascending ({lower} >= {upper})")]
    NotAscending {
        group: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("uptime target {0} is outside 0..=100")]
    UptimeTarget(f64),

    #[error("{group} range is empty ({min} > {max})")]
    EmptyRange {
        group: &'static str,
        min: f64,
        max: f64,
    },
}
