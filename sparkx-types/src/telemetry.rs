//! Historical telemetry points.

use chrono::{DateTime, Utc};

/// One telemetry sample recorded for a robot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TelemetrySample {
    pub robot_id: String,
    pub recorded_at: DateTime<Utc>,
    /// Battery charge, percent.
    pub battery: f64,
    /// Temperature in °C, when the robot reported one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: Option<f64>,
}

impl TelemetrySample {
    pub fn new(robot_id: impl Into<String>, recorded_at: DateTime<Utc>, battery: f64) -> Self {
        Self {
            robot_id: robot_id.into(),
            recorded_at,
            battery,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}
