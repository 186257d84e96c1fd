//! Per-joint telemetry rows.

use std::fmt;

/// Status as reported by the joint controller.
///
/// This is the upstream flag, not the derived display status. `Error`,
/// `Disabled` and `Warning` are hard faults that override anything inferred
/// from temperature or position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum RawJointStatus {
    Operational,
    Warning,
    Error,
    Disabled,
    Other(String),
}

impl RawJointStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "operational" | "ok" => RawJointStatus::Operational,
            "warning" => RawJointStatus::Warning,
            "error" => RawJointStatus::Error,
            "disabled" => RawJointStatus::Disabled,
            _ => RawJointStatus::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RawJointStatus::Operational => "operational",
            RawJointStatus::Warning => "warning",
            RawJointStatus::Error => "error",
            RawJointStatus::Disabled => "disabled",
            RawJointStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for RawJointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RawJointStatus {
    fn from(value: String) -> Self {
        RawJointStatus::parse(&value)
    }
}

impl From<RawJointStatus> for String {
    fn from(value: RawJointStatus) -> Self {
        value.as_str().to_string()
    }
}

/// One joint's telemetry row.
///
/// Angles are in degrees, torque in N·m, temperature in °C.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct JointReading {
    pub name: String,
    pub current_angle: f64,
    pub target_angle: f64,
    pub torque: f64,
    pub temperature: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub raw_status: Option<RawJointStatus>,
}

impl JointReading {
    /// A reading with all measurements zero and no upstream status.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_angle: 0.0,
            target_angle: 0.0,
            torque: 0.0,
            temperature: 0.0,
            raw_status: None,
        }
    }

    pub fn with_angles(mut self, current: f64, target: f64) -> Self {
        self.current_angle = current;
        self.target_angle = target;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_torque(mut self, torque: f64) -> Self {
        self.torque = torque;
        self
    }

    pub fn with_raw_status(mut self, status: RawJointStatus) -> Self {
        self.raw_status = Some(status);
        self
    }

    /// Absolute distance between the current and target angle.
    pub fn deviation(&self) -> f64 {
        (self.current_angle - self.target_angle).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_status_parse() {
        assert_eq!(RawJointStatus::parse("operational"), RawJointStatus::Operational);
        assert_eq!(RawJointStatus::parse("disabled"), RawJointStatus::Disabled);
        // Only the exact lowercase flag is a hard fault
        assert_eq!(
            RawJointStatus::parse("Error"),
            RawJointStatus::Other("Error".to_string())
        );
        assert_eq!(
            RawJointStatus::parse("calibrating"),
            RawJointStatus::Other("calibrating".to_string())
        );
    }

    #[test]
    fn test_deviation_is_absolute() {
        let joint = JointReading::new("Elbow_Left").with_angles(5.0, 20.0);
        assert_eq!(joint.deviation(), 15.0);

        let joint = JointReading::new("Elbow_Left").with_angles(20.0, 5.0);
        assert_eq!(joint.deviation(), 15.0);
    }
}
