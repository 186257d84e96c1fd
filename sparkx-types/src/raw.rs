//! Untrusted rows as the backend sends them, and their conversion into the
//! typed model.
//!
//! Every field is optional and deserialized leniently (see the module-level
//! helpers), so a row with nulls, numeric strings or missing keys still
//! parses. The `into_*` conversions then substitute defaults: `0` for
//! numbers, an empty string for text, [`ConnectivityQuality::Fair`] for
//! link quality and an `unknown` status. Conversion never fails.
//!
//! ```rust
//! use sparkx_types::raw::RawRobotRow;
//! use sparkx_types::RobotStatus;
//!
//! let row: RawRobotRow = serde_json::from_str(
//!     r#"{"id": "RBT-9", "status": "online", "battery": "72.5", "signal": null}"#,
//! ).unwrap();
//! let robot = row.into_snapshot();
//!
//! assert_eq!(robot.status, RobotStatus::Online);
//! assert_eq!(robot.battery, 72.5);
//! assert_eq!(robot.signal, 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::lenient;
use crate::{
    Connectivity, ConnectivityQuality, GeoPoint, JointReading, RawJointStatus, RobotSnapshot,
    RobotStatus, TelemetrySample,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeoPoint {
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConnectivity {
    #[serde(default, deserialize_with = "lenient::text")]
    pub wifi: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cellular: Option<String>,
}

/// A robot row from `GET /api/robots`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRobotRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub battery: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub signal: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cpu_load: Option<f64>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub gps_coordinates: Option<RawGeoPoint>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub connectivity: Option<RawConnectivity>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RawRobotRow {
    pub fn into_snapshot(self) -> RobotSnapshot {
        let gps = self.gps_coordinates.unwrap_or_default();
        let connectivity = self.connectivity.unwrap_or_default();

        RobotSnapshot {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(RobotStatus::parse)
                .unwrap_or_default(),
            battery: self.battery.unwrap_or(0.0),
            signal: self.signal.unwrap_or(0.0),
            temperature: self.temperature.unwrap_or(0.0),
            location: self.location.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            cpu_load: self.cpu_load.unwrap_or(0.0),
            gps: GeoPoint {
                lat: gps.lat.unwrap_or(0.0),
                lng: gps.lng.unwrap_or(0.0),
            },
            connectivity: Connectivity {
                wifi: quality(connectivity.wifi),
                cellular: quality(connectivity.cellular),
            },
            last_updated: self.last_updated,
        }
    }
}

fn quality(raw: Option<String>) -> ConnectivityQuality {
    raw.as_deref()
        .map(ConnectivityQuality::parse)
        .unwrap_or_default()
}

/// A joint row, as embedded in `GET /api/robots/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJointRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub joint_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_position_deg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_position_deg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_torque_nm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
}

impl RawJointRow {
    pub fn into_reading(self) -> JointReading {
        JointReading {
            name: self.joint_name.unwrap_or_default(),
            current_angle: self.current_position_deg.unwrap_or(0.0),
            target_angle: self.target_position_deg.unwrap_or(0.0),
            torque: self.current_torque_nm.unwrap_or(0.0),
            temperature: self.temperature_c.unwrap_or(0.0),
            raw_status: self
                .status
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(RawJointStatus::parse),
        }
    }
}

/// A telemetry row from `GET /api/robots/:id/telemetry`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTelemetryRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub robot_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub battery_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature_c: Option<f64>,
}

impl RawTelemetryRow {
    /// Convert into a sample. Rows without a timestamp cannot be placed in
    /// time and yield `None`.
    pub fn into_sample(self) -> Option<TelemetrySample> {
        let recorded_at = self.recorded_at?;
        Some(TelemetrySample {
            robot_id: self.robot_id.unwrap_or_default(),
            recorded_at,
            battery: self.battery_percentage.unwrap_or(0.0),
            temperature: self.temperature_c,
        })
    }
}

/// The subset of `GET /api/robots/:id` the monitor uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRobotDetail {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default)]
    pub joints: Vec<RawJointRow>,
    #[serde(default)]
    pub telemetry: Vec<RawTelemetryRow>,
}

impl RawRobotDetail {
    pub fn joint_readings(self) -> Vec<JointReading> {
        self.joints.into_iter().map(RawJointRow::into_reading).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_row_converts() {
        let json = r#"{
            "id": "RBT-001",
            "name": "Atlas",
            "status": "charging",
            "battery": 85,
            "signal": 72.5,
            "temperature": 41.2,
            "location": "Warehouse A",
            "country": "USA",
            "state": "CA",
            "region": "North America",
            "cpuLoad": 33,
            "gpsCoordinates": {"lat": 37.77, "lng": -122.41},
            "connectivity": {"wifi": "Excellent", "cellular": "Poor"},
            "lastUpdated": "2024-05-01T12:30:00Z"
        }"#;

        let robot = serde_json::from_str::<RawRobotRow>(json)
            .unwrap()
            .into_snapshot();

        assert_eq!(robot.id, "RBT-001");
        assert_eq!(robot.status, RobotStatus::Charging);
        assert_eq!(robot.battery, 85.0);
        assert_eq!(robot.cpu_load, 33.0);
        assert_eq!(robot.gps.lng, -122.41);
        assert_eq!(robot.connectivity.wifi, ConnectivityQuality::Excellent);
        assert_eq!(robot.connectivity.cellular, ConnectivityQuality::Poor);
        assert!(robot.last_updated.is_some());
    }

    #[test]
    fn test_missing_and_malformed_fields_default() {
        let json = r#"{
            "id": "RBT-002",
            "battery": null,
            "signal": "not a number",
            "temperature": true,
            "location": 42,
            "gpsCoordinates": "somewhere",
            "connectivity": {"wifi": null},
            "lastUpdated": "yesterday"
        }"#;

        let robot = serde_json::from_str::<RawRobotRow>(json)
            .unwrap()
            .into_snapshot();

        assert_eq!(robot.status, RobotStatus::Unknown("unknown".to_string()));
        assert_eq!(robot.battery, 0.0);
        assert_eq!(robot.signal, 0.0);
        assert_eq!(robot.temperature, 0.0);
        assert_eq!(robot.location, "");
        assert_eq!(robot.gps, GeoPoint::default());
        assert_eq!(robot.connectivity.wifi, ConnectivityQuality::Fair);
        assert!(robot.last_updated.is_none());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let row: RawRobotRow = serde_json::from_str(r#"{"status": "maintenance"}"#).unwrap();
        assert_eq!(
            row.into_snapshot().status,
            RobotStatus::Unknown("maintenance".to_string())
        );
    }

    #[test]
    fn test_joint_row_converts() {
        let json = r#"{
            "jointName": "Shoulder_Left",
            "currentPositionDeg": "12.5",
            "targetPositionDeg": 10,
            "currentTorqueNm": null,
            "temperatureC": 48.3,
            "status": "operational"
        }"#;

        let joint = serde_json::from_str::<RawJointRow>(json)
            .unwrap()
            .into_reading();

        assert_eq!(joint.name, "Shoulder_Left");
        assert_eq!(joint.current_angle, 12.5);
        assert_eq!(joint.target_angle, 10.0);
        assert_eq!(joint.torque, 0.0);
        assert_eq!(joint.raw_status, Some(RawJointStatus::Operational));
    }

    #[test]
    fn test_joint_row_without_status() {
        let joint = serde_json::from_str::<RawJointRow>(r#"{"jointName": "Hip", "status": ""}"#)
            .unwrap()
            .into_reading();
        assert_eq!(joint.raw_status, None);
        assert_eq!(joint.temperature, 0.0);
    }

    #[test]
    fn test_detail_extracts_joints_and_ignores_other_fields() {
        let json = r#"{
            "id": "RBT-003",
            "name": "Helios",
            "alerts": [{"id": 1}],
            "joints": [{"jointName": "Neck"}, {"jointName": "Hip"}],
            "telemetry": [{"robotId": "RBT-003", "recordedAt": "2024-05-01T10:00:00Z", "batteryPercentage": 64}]
        }"#;

        let detail: RawRobotDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.telemetry.len(), 1);
        let joints = detail.joint_readings();
        assert_eq!(joints.len(), 2);
        assert_eq!(joints[0].name, "Neck");
    }

    #[test]
    fn test_telemetry_row_requires_timestamp() {
        let row: RawTelemetryRow =
            serde_json::from_str(r#"{"robotId": "RBT-1", "batteryPercentage": 50}"#).unwrap();
        assert!(row.into_sample().is_none());

        let row: RawTelemetryRow = serde_json::from_str(
            r#"{"robotId": "RBT-1", "recordedAt": "2024-05-01T10:15:00Z", "batteryPercentage": 50, "temperatureC": null}"#,
        )
        .unwrap();
        let sample = row.into_sample().unwrap();
        assert_eq!(sample.battery, 50.0);
        assert_eq!(sample.temperature, None);
    }
}
