//! Robot snapshot - the latest known state of one robot.

use std::fmt;

use chrono::{DateTime, Utc};

/// Operational status reported for a robot.
///
/// The four named variants are the statuses the dashboard understands.
/// Anything else the backend sends (seed data contains `maintenance` and
/// `idle`) is preserved verbatim in [`RobotStatus::Unknown`] so that it can
/// still be counted and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum RobotStatus {
    Online,
    Charging,
    Offline,
    Error,
    /// Unrecognised status text, kept as received (trimmed).
    Unknown(String),
}

impl RobotStatus {
    /// Parse a status string. Known statuses match their lowercase wire
    /// form exactly; anything else is preserved as unknown.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "online" => RobotStatus::Online,
            "charging" => RobotStatus::Charging,
            "offline" => RobotStatus::Offline,
            "error" => RobotStatus::Error,
            "" => RobotStatus::default(),
            _ => RobotStatus::Unknown(trimmed.to_string()),
        }
    }

    /// The wire form of the status.
    pub fn as_str(&self) -> &str {
        match self {
            RobotStatus::Online => "online",
            RobotStatus::Charging => "charging",
            RobotStatus::Offline => "offline",
            RobotStatus::Error => "error",
            RobotStatus::Unknown(s) => s,
        }
    }

    /// A robot is active when it is online or charging.
    pub fn is_active(&self) -> bool {
        matches!(self, RobotStatus::Online | RobotStatus::Charging)
    }

    /// Display label: the status string with its first letter capitalised.
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for RobotStatus {
    fn default() -> Self {
        RobotStatus::Unknown("unknown".to_string())
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RobotStatus {
    fn from(value: String) -> Self {
        RobotStatus::parse(&value)
    }
}

impl From<RobotStatus> for String {
    fn from(value: RobotStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Qualitative link quality for a radio (wifi or cellular).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum ConnectivityQuality {
    Poor,
    #[default]
    Fair,
    Good,
    Excellent,
}

impl ConnectivityQuality {
    /// Parse a quality label case-insensitively. Unrecognised labels map to
    /// [`ConnectivityQuality::Fair`], which is what the backend reports when
    /// it has no reading.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "poor" => ConnectivityQuality::Poor,
            "good" => ConnectivityQuality::Good,
            "excellent" => ConnectivityQuality::Excellent,
            _ => ConnectivityQuality::Fair,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectivityQuality::Poor => "Poor",
            ConnectivityQuality::Fair => "Fair",
            ConnectivityQuality::Good => "Good",
            ConnectivityQuality::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for ConnectivityQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ConnectivityQuality {
    fn from(value: String) -> Self {
        ConnectivityQuality::parse(&value)
    }
}

impl From<ConnectivityQuality> for String {
    fn from(value: ConnectivityQuality) -> Self {
        value.as_str().to_string()
    }
}

/// Link quality of both radios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connectivity {
    pub wifi: ConnectivityQuality,
    pub cellular: ConnectivityQuality,
}

/// GPS position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One robot's latest known state.
///
/// Percentages (`battery`, `signal`, `cpu_load`) are conceptually in
/// `[0, 100]` but are not clamped: consumers must cope with out-of-range
/// values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RobotSnapshot {
    pub id: String,
    pub name: String,
    pub status: RobotStatus,
    /// Battery charge, percent.
    pub battery: f64,
    /// Signal strength, percent.
    pub signal: f64,
    /// Temperature in °C.
    pub temperature: f64,
    pub location: String,
    pub country: String,
    pub state: String,
    pub region: String,
    /// CPU load, percent.
    pub cpu_load: f64,
    #[cfg_attr(feature = "serde", serde(rename = "gpsCoordinates"))]
    pub gps: GeoPoint,
    pub connectivity: Connectivity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RobotSnapshot {
    /// Start building a snapshot for the robot with the given id.
    pub fn builder(id: impl Into<String>) -> RobotSnapshotBuilder {
        RobotSnapshotBuilder::new(id)
    }
}

/// Builder for [`RobotSnapshot`]. Unset numeric fields are zero and unset
/// text fields are empty.
#[derive(Debug, Clone)]
pub struct RobotSnapshotBuilder {
    robot: RobotSnapshot,
}

impl RobotSnapshotBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            robot: RobotSnapshot {
                id: id.into(),
                name: String::new(),
                status: RobotStatus::default(),
                battery: 0.0,
                signal: 0.0,
                temperature: 0.0,
                location: String::new(),
                country: String::new(),
                state: String::new(),
                region: String::new(),
                cpu_load: 0.0,
                gps: GeoPoint::default(),
                connectivity: Connectivity::default(),
                last_updated: None,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.robot.name = name.into();
        self
    }

    pub fn status(mut self, status: RobotStatus) -> Self {
        self.robot.status = status;
        self
    }

    pub fn battery(mut self, battery: f64) -> Self {
        self.robot.battery = battery;
        self
    }

    pub fn signal(mut self, signal: f64) -> Self {
        self.robot.signal = signal;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.robot.temperature = temperature;
        self
    }

    pub fn cpu_load(mut self, cpu_load: f64) -> Self {
        self.robot.cpu_load = cpu_load;
        self
    }

    /// Set the location hierarchy: site, state, country, region.
    pub fn place(
        mut self,
        location: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        self.robot.location = location.into();
        self.robot.state = state.into();
        self.robot.country = country.into();
        self.robot.region = region.into();
        self
    }

    pub fn gps(mut self, lat: f64, lng: f64) -> Self {
        self.robot.gps = GeoPoint { lat, lng };
        self
    }

    pub fn connectivity(mut self, wifi: ConnectivityQuality, cellular: ConnectivityQuality) -> Self {
        self.robot.connectivity = Connectivity { wifi, cellular };
        self
    }

    pub fn last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.robot.last_updated = Some(at);
        self
    }

    pub fn build(self) -> RobotSnapshot {
        self.robot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_and_unknown() {
        assert_eq!(RobotStatus::parse("online"), RobotStatus::Online);
        assert_eq!(RobotStatus::parse(" charging "), RobotStatus::Charging);
        assert_eq!(RobotStatus::parse("error"), RobotStatus::Error);
        assert_eq!(
            RobotStatus::parse("ERROR"),
            RobotStatus::Unknown("ERROR".to_string())
        );
        assert_eq!(
            RobotStatus::parse("maintenance"),
            RobotStatus::Unknown("maintenance".to_string())
        );
        assert_eq!(RobotStatus::parse(""), RobotStatus::default());
    }

    #[test]
    fn test_status_activity() {
        assert!(RobotStatus::Online.is_active());
        assert!(RobotStatus::Charging.is_active());
        assert!(!RobotStatus::Offline.is_active());
        assert!(!RobotStatus::Error.is_active());
        assert!(!RobotStatus::Unknown("idle".into()).is_active());
    }

    #[test]
    fn test_status_label_capitalises_first_letter() {
        assert_eq!(RobotStatus::Online.label(), "Online");
        assert_eq!(RobotStatus::Unknown("idle".into()).label(), "Idle");
        assert_eq!(RobotStatus::Unknown(String::new()).label(), "");
    }

    #[test]
    fn test_connectivity_parse_defaults_to_fair() {
        assert_eq!(ConnectivityQuality::parse("excellent"), ConnectivityQuality::Excellent);
        assert_eq!(ConnectivityQuality::parse("Poor"), ConnectivityQuality::Poor);
        assert_eq!(ConnectivityQuality::parse("None"), ConnectivityQuality::Fair);
        assert_eq!(ConnectivityQuality::parse(""), ConnectivityQuality::Fair);
    }

    #[test]
    fn test_builder_defaults() {
        let robot = RobotSnapshot::builder("RBT-7").build();
        assert_eq!(robot.id, "RBT-7");
        assert_eq!(robot.battery, 0.0);
        assert!(robot.location.is_empty());
        assert_eq!(robot.connectivity.wifi, ConnectivityQuality::Fair);
        assert!(robot.last_updated.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_wire_names() {
        let robot = RobotSnapshot::builder("RBT-1")
            .status(RobotStatus::Charging)
            .cpu_load(12.5)
            .gps(48.1, 11.5)
            .build();

        let json = serde_json::to_value(&robot).unwrap();
        assert_eq!(json["status"], "charging");
        assert_eq!(json["cpuLoad"], 12.5);
        assert_eq!(json["gpsCoordinates"]["lat"], 48.1);
        assert_eq!(json["connectivity"]["wifi"], "Fair");
    }
}
