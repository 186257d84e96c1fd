//! Entity classifiers.
//!
//! Each classifier maps one measurement to a discrete category by walking an
//! ordered chain of threshold comparisons; the first comparison that holds
//! wins. All of them are total: negative, out-of-range and NaN inputs fall
//! through the chain to a defined bucket.
//!
//! Two temperature schemes exist side by side and are intentionally not
//! unified:
//!
//! - [`TemperatureBand`] buckets the fleet for the temperature distribution
//!   (`< normal`, `<= warning`, hotter).
//! - [`ComponentStatus::from_temperature`] escalates a single component or
//!   joint (`> warning` is a warning, `> critical` is an error).

use chrono::TimeDelta;
use sparkx_types::{ConnectivityQuality, JointReading, RawJointStatus, RobotStatus};

use super::thresholds::{
    BatteryThresholds, DeviationThresholds, SignalThresholds, TemperatureThresholds,
};

/// Presentation-neutral colour role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Success,
    Primary,
    Warning,
    Destructive,
    Muted,
}

impl Tone {
    /// Suggested hex colour token.
    pub fn hex(&self) -> &'static str {
        match self {
            Tone::Success => "#10b981",
            Tone::Primary => "#3b82f6",
            Tone::Warning => "#f59e0b",
            Tone::Destructive => "#ef4444",
            Tone::Muted => GRAY,
        }
    }
}

/// Fallback colour for anything without an assigned colour.
pub const GRAY: &str = "#6b7280";

// ---------------------------------------------------------------------------
// Battery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BatteryLevel {
    Critical,
    Low,
    Medium,
    Good,
    Excellent,
}

impl BatteryLevel {
    pub const ALL: [BatteryLevel; 5] = [
        BatteryLevel::Critical,
        BatteryLevel::Low,
        BatteryLevel::Medium,
        BatteryLevel::Good,
        BatteryLevel::Excellent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BatteryLevel::Critical => "Critical",
            BatteryLevel::Low => "Low",
            BatteryLevel::Medium => "Medium",
            BatteryLevel::Good => "Good",
            BatteryLevel::Excellent => "Excellent",
        }
    }

    /// Bucket label with its percent range, e.g. `Low (21-40%)`.
    pub fn range_label(&self, t: &BatteryThresholds) -> String {
        let (lo, hi) = match self {
            BatteryLevel::Critical => (0.0, t.critical),
            BatteryLevel::Low => (t.critical + 1.0, t.low),
            BatteryLevel::Medium => (t.low + 1.0, t.medium),
            BatteryLevel::Good => (t.medium + 1.0, t.high),
            BatteryLevel::Excellent => (t.high + 1.0, 100.0),
        };
        format!("{} ({:.0}-{:.0}%)", self.name(), lo, hi)
    }

    pub fn color(&self) -> &'static str {
        match self {
            BatteryLevel::Critical => "#ef4444",
            BatteryLevel::Low => "#f97316",
            BatteryLevel::Medium => "#eab308",
            BatteryLevel::Good => "#22c55e",
            BatteryLevel::Excellent => "#10b981",
        }
    }
}

/// Bucket a battery level. Each bucket includes its upper bound: exactly
/// `critical` is Critical, anything above it up to `low` is Low.
pub fn classify_battery(level: f64, t: &BatteryThresholds) -> BatteryLevel {
    if level <= t.critical {
        BatteryLevel::Critical
    } else if level <= t.low {
        BatteryLevel::Low
    } else if level <= t.medium {
        BatteryLevel::Medium
    } else if level <= t.high {
        BatteryLevel::Good
    } else {
        BatteryLevel::Excellent
    }
}

/// Colour role for a battery reading. Lower bounds are inclusive here.
pub fn battery_tone(level: f64, t: &BatteryThresholds) -> Tone {
    if level >= t.high {
        Tone::Success
    } else if level >= t.medium {
        Tone::Primary
    } else if level >= t.low {
        Tone::Warning
    } else {
        Tone::Destructive
    }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// Robot temperature level used for colouring a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemperatureLevel {
    Normal,
    Warning,
    Critical,
}

pub fn classify_temperature(temp: f64, t: &TemperatureThresholds) -> TemperatureLevel {
    if temp < t.normal {
        TemperatureLevel::Normal
    } else if temp < t.warning {
        TemperatureLevel::Warning
    } else {
        TemperatureLevel::Critical
    }
}

pub fn temperature_tone(temp: f64, t: &TemperatureThresholds) -> Tone {
    match classify_temperature(temp, t) {
        TemperatureLevel::Normal => Tone::Success,
        TemperatureLevel::Warning => Tone::Warning,
        TemperatureLevel::Critical => Tone::Destructive,
    }
}

/// Fleet temperature distribution bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemperatureBand {
    Normal,
    Warm,
    Hot,
}

impl TemperatureBand {
    pub const ALL: [TemperatureBand; 3] = [
        TemperatureBand::Normal,
        TemperatureBand::Warm,
        TemperatureBand::Hot,
    ];

    pub fn classify(temp: f64, t: &TemperatureThresholds) -> Self {
        if temp < t.normal {
            TemperatureBand::Normal
        } else if temp <= t.warning {
            TemperatureBand::Warm
        } else {
            TemperatureBand::Hot
        }
    }

    /// Bucket label with its range, e.g. `Warm (45-60°C)`.
    pub fn range_label(&self, t: &TemperatureThresholds) -> String {
        match self {
            TemperatureBand::Normal => format!("Normal (<{:.0}°C)", t.normal),
            TemperatureBand::Warm => format!("Warm ({:.0}-{:.0}°C)", t.normal, t.warning),
            TemperatureBand::Hot => format!("Hot (>{:.0}°C)", t.warning),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TemperatureBand::Normal => "#10b981",
            TemperatureBand::Warm => "#f59e0b",
            TemperatureBand::Hot => "#ef4444",
        }
    }
}

// ---------------------------------------------------------------------------
// Components and joints
// ---------------------------------------------------------------------------

/// Derived health of a component or joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentStatus {
    Ok,
    Warning,
    Error,
}

impl ComponentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Ok => "ok",
            ComponentStatus::Warning => "warning",
            ComponentStatus::Error => "error",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            ComponentStatus::Ok => Tone::Success,
            ComponentStatus::Warning => Tone::Warning,
            ComponentStatus::Error => Tone::Destructive,
        }
    }

    /// Escalating temperature scheme: above `critical` is an error, above
    /// `warning` is a warning.
    pub fn from_temperature(temp: f64, t: &TemperatureThresholds) -> Self {
        if temp > t.critical {
            ComponentStatus::Error
        } else if temp > t.warning {
            ComponentStatus::Warning
        } else {
            ComponentStatus::Ok
        }
    }
}

/// Classify a joint from its measurements alone.
///
/// Temperature is checked before position deviation, so an overheating
/// joint is reported for its temperature even when it is also off target.
pub fn classify_joint_status(
    temperature: f64,
    current_angle: f64,
    target_angle: f64,
    temp: &TemperatureThresholds,
    deviation: &DeviationThresholds,
) -> ComponentStatus {
    match ComponentStatus::from_temperature(temperature, temp) {
        ComponentStatus::Ok => {}
        hot => return hot,
    }

    let off_by = (current_angle - target_angle).abs();
    if off_by > deviation.error {
        ComponentStatus::Error
    } else if off_by > deviation.warning {
        ComponentStatus::Warning
    } else {
        ComponentStatus::Ok
    }
}

/// Classify a joint reading, honouring the controller's own fault flag
/// before looking at any measurement.
pub fn joint_status(
    joint: &JointReading,
    temp: &TemperatureThresholds,
    deviation: &DeviationThresholds,
) -> ComponentStatus {
    match joint.raw_status {
        Some(RawJointStatus::Error | RawJointStatus::Disabled) => ComponentStatus::Error,
        Some(RawJointStatus::Warning) => ComponentStatus::Warning,
        _ => classify_joint_status(
            joint.temperature,
            joint.current_angle,
            joint.target_angle,
            temp,
            deviation,
        ),
    }
}

// ---------------------------------------------------------------------------
// Signal and connectivity
// ---------------------------------------------------------------------------

/// Link quality implied by a signal strength reading.
pub fn classify_connectivity(signal: f64, t: &SignalThresholds) -> ConnectivityQuality {
    if signal <= t.poor {
        ConnectivityQuality::Poor
    } else if signal <= t.fair {
        ConnectivityQuality::Fair
    } else if signal <= t.good {
        ConnectivityQuality::Good
    } else {
        ConnectivityQuality::Excellent
    }
}

/// Colour role for a signal strength reading.
pub fn classify_signal(signal: f64, t: &SignalThresholds) -> Tone {
    quality_tone(classify_connectivity(signal, t))
}

pub fn quality_tone(quality: ConnectivityQuality) -> Tone {
    match quality {
        ConnectivityQuality::Poor => Tone::Destructive,
        ConnectivityQuality::Fair => Tone::Warning,
        ConnectivityQuality::Good => Tone::Primary,
        ConnectivityQuality::Excellent => Tone::Success,
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub fn status_tone(status: &RobotStatus) -> Tone {
    match status {
        RobotStatus::Online => Tone::Success,
        RobotStatus::Charging => Tone::Primary,
        RobotStatus::Error => Tone::Destructive,
        RobotStatus::Offline | RobotStatus::Unknown(_) => Tone::Muted,
    }
}

/// Colour used for a status in the status distribution.
pub fn status_color(status: &RobotStatus) -> &'static str {
    match status {
        RobotStatus::Online => "#10b981",
        RobotStatus::Charging => "#3b82f6",
        RobotStatus::Error => "#ef4444",
        RobotStatus::Offline | RobotStatus::Unknown(_) => GRAY,
    }
}

/// Liveness of a robot's heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeartbeatStatus {
    Healthy,
    Degraded,
    Missed,
    Offline,
}

impl HeartbeatStatus {
    /// Only an online robot has a heartbeat; beyond that, silence longer
    /// than 30 s is degraded and longer than 60 s is missed.
    pub fn classify(status: &RobotStatus, since_seen: TimeDelta) -> Self {
        let seconds = since_seen.num_milliseconds() as f64 / 1000.0;
        if *status != RobotStatus::Online {
            HeartbeatStatus::Offline
        } else if seconds > 60.0 {
            HeartbeatStatus::Missed
        } else if seconds > 30.0 {
            HeartbeatStatus::Degraded
        } else {
            HeartbeatStatus::Healthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeartbeatStatus::Healthy => "Healthy",
            HeartbeatStatus::Degraded => "Degraded",
            HeartbeatStatus::Missed => "Missed",
            HeartbeatStatus::Offline => "Offline",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            HeartbeatStatus::Healthy => Tone::Success,
            HeartbeatStatus::Degraded => Tone::Warning,
            HeartbeatStatus::Missed => Tone::Destructive,
            HeartbeatStatus::Offline => Tone::Muted,
        }
    }
}

/// Grade of a diagnostic health score (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HealthGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            HealthGrade::Excellent
        } else if score >= 75.0 {
            HealthGrade::Good
        } else if score >= 60.0 {
            HealthGrade::Fair
        } else {
            HealthGrade::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthGrade::Poor => "Poor",
            HealthGrade::Fair => "Fair",
            HealthGrade::Good => "Good",
            HealthGrade::Excellent => "Excellent",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            HealthGrade::Excellent | HealthGrade::Good => Tone::Success,
            HealthGrade::Fair => Tone::Warning,
            HealthGrade::Poor => Tone::Destructive,
        }
    }
}

/// Grade of a network round-trip time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LatencyGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl LatencyGrade {
    pub fn from_millis(ms: f64) -> Self {
        if ms < 20.0 {
            LatencyGrade::Excellent
        } else if ms < 50.0 {
            LatencyGrade::Good
        } else if ms < 100.0 {
            LatencyGrade::Fair
        } else {
            LatencyGrade::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LatencyGrade::Excellent => "Excellent",
            LatencyGrade::Good => "Good",
            LatencyGrade::Fair => "Fair",
            LatencyGrade::Poor => "Poor",
        }
    }
}
