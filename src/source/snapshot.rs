//! The owned, versioned fleet snapshot handed from a source to consumers,
//! and the JSON payload formats sources read it from.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sparkx_types::raw::{RawJointRow, RawRobotRow, RawTelemetryRow};
use sparkx_types::{JointReading, RobotSnapshot, TelemetrySample};

/// Everything a source knows about the fleet at one point in time.
///
/// Versions increase strictly with every snapshot a source produces, so a
/// consumer can tell a fresh snapshot from a repeat. Snapshots are never
/// mutated after being handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub version: u64,
    pub fetched_at: DateTime<Utc>,
    pub robots: Vec<RobotSnapshot>,
    /// Joint rows per robot id, for the robots whose joints were fetched.
    #[serde(default)]
    pub joints: BTreeMap<String, Vec<JointReading>>,
    #[serde(default)]
    pub telemetry: Vec<TelemetrySample>,
}

impl Default for FleetSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            fetched_at: DateTime::<Utc>::default(),
            robots: Vec::new(),
            joints: BTreeMap::new(),
            telemetry: Vec::new(),
        }
    }
}

impl FleetSnapshot {
    /// A snapshot of `robots` taken now.
    pub fn new(version: u64, robots: Vec<RobotSnapshot>) -> Self {
        Self {
            version,
            fetched_at: Utc::now(),
            robots,
            joints: BTreeMap::new(),
            telemetry: Vec::new(),
        }
    }

    pub fn with_joints(mut self, robot_id: impl Into<String>, joints: Vec<JointReading>) -> Self {
        self.joints.insert(robot_id.into(), joints);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Vec<TelemetrySample>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn robot(&self, id: &str) -> Option<&RobotSnapshot> {
        self.robots.iter().find(|r| r.id == id)
    }

    /// Joint rows for a robot; empty when none were fetched.
    pub fn joints_for(&self, id: &str) -> &[JointReading] {
        self.joints.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Fleet data as read from JSON: either a bare array of robot rows (the
/// `GET /api/robots` response) or an object with `robots`, `joints` keyed by
/// robot id, and `telemetry`.
#[derive(Debug, Clone, Default)]
pub struct FleetPayload {
    pub robots: Vec<RobotSnapshot>,
    pub joints: BTreeMap<String, Vec<JointReading>>,
    pub telemetry: Vec<TelemetrySample>,
}

#[derive(Deserialize)]
struct PayloadObject {
    #[serde(default)]
    robots: Vec<RawRobotRow>,
    #[serde(default)]
    joints: BTreeMap<String, Vec<RawJointRow>>,
    #[serde(default)]
    telemetry: Vec<RawTelemetryRow>,
}

impl FleetPayload {
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;

        let object = if value.is_array() {
            PayloadObject {
                robots: serde_json::from_value(value)?,
                joints: BTreeMap::new(),
                telemetry: Vec::new(),
            }
        } else {
            serde_json::from_value(value)?
        };

        Ok(Self {
            robots: object.robots.into_iter().map(RawRobotRow::into_snapshot).collect(),
            joints: object
                .joints
                .into_iter()
                .map(|(id, rows)| (id, rows.into_iter().map(RawJointRow::into_reading).collect()))
                .collect(),
            telemetry: object
                .telemetry
                .into_iter()
                .filter_map(RawTelemetryRow::into_sample)
                .collect(),
        })
    }

    pub fn into_snapshot(self, version: u64) -> FleetSnapshot {
        FleetSnapshot {
            version,
            fetched_at: Utc::now(),
            robots: self.robots,
            joints: self.joints,
            telemetry: self.telemetry,
        }
    }
}
