//! Joint telemetry mapper.
//!
//! Groups flat per-joint rows into anatomical groups and derives each
//! joint's display status.

use std::collections::HashMap;

use serde::Serialize;
use sparkx_types::JointReading;

use super::classify::{joint_status, ComponentStatus};
use super::thresholds::ThresholdConfig;

/// Anatomical region a joint belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JointRegion {
    Neck,
    Shoulder,
    Elbow,
    Wrist,
    Gripper,
    Hip,
    KneeHigh,
    KneeLow,
    Ankle,
    /// A joint nobody has told us about; it forms its own group.
    Other(String),
}

/// Joint identifiers reported by current robot firmware.
fn known_region(name: &str) -> Option<JointRegion> {
    let region = match name {
        "Neck" => JointRegion::Neck,
        "Shoulder_Left" | "Shoulder_Right" => JointRegion::Shoulder,
        "Elbow_Left" | "Elbow_Right" => JointRegion::Elbow,
        "Wrist_Left" | "Wrist_Right" => JointRegion::Wrist,
        "Gripper_Left" | "Gripper_Right" => JointRegion::Gripper,
        "Hip" => JointRegion::Hip,
        "Knee_High_Left" | "Knee_High_Right" => JointRegion::KneeHigh,
        "Knee_Low_Left" | "Knee_Low_Right" => JointRegion::KneeLow,
        "Ankle_Left" | "Ankle_Right" => JointRegion::Ankle,
        _ => return None,
    };
    Some(region)
}

impl JointRegion {
    /// Resolve a joint name: known identifiers first, then name fragments
    /// in a fixed order. Matching is case-sensitive, and `Neck` and `Hip`
    /// only ever match exactly.
    pub fn of(name: &str) -> Self {
        if let Some(region) = known_region(name) {
            return region;
        }

        if name.contains("Shoulder") {
            JointRegion::Shoulder
        } else if name.contains("Elbow") {
            JointRegion::Elbow
        } else if name.contains("Wrist") {
            JointRegion::Wrist
        } else if name.contains("Gripper") {
            JointRegion::Gripper
        } else if name.contains("Knee_High") {
            JointRegion::KneeHigh
        } else if name.contains("Knee_Low") {
            JointRegion::KneeLow
        } else if name.contains("Ankle") {
            JointRegion::Ankle
        } else {
            JointRegion::Other(name.to_string())
        }
    }

    pub fn group_name(&self) -> String {
        match self {
            JointRegion::Neck => "Neck Joint (3 DOF)".to_string(),
            JointRegion::Shoulder => "Shoulder Joints (6 DOF)".to_string(),
            JointRegion::Elbow => "Elbow Joints (6 DOF)".to_string(),
            JointRegion::Wrist => "Wrist Joints (4 DOF)".to_string(),
            JointRegion::Gripper => "Grippers (2 DOF)".to_string(),
            JointRegion::Hip => "Hip Joint (3 DOF)".to_string(),
            JointRegion::KneeHigh => "Knee High Joints (2 DOF)".to_string(),
            JointRegion::KneeLow => "Knee Low Joints (2 DOF)".to_string(),
            JointRegion::Ankle => "Ankle Joints (4 DOF)".to_string(),
            JointRegion::Other(name) => format!("{} Joint", name),
        }
    }
}

/// A joint ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JointView {
    pub name: String,
    pub angle: f64,
    pub target_angle: f64,
    pub torque: f64,
    pub temperature: f64,
    #[serde(serialize_with = "serialize_status")]
    pub status: ComponentStatus,
}

fn serialize_status<S: serde::Serializer>(status: &ComponentStatus, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(status.as_str())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointGroup {
    pub name: String,
    pub joints: Vec<JointView>,
}

impl JointGroup {
    /// The most severe status among the group's joints.
    pub fn worst_status(&self) -> ComponentStatus {
        self.joints
            .iter()
            .map(|j| j.status)
            .max()
            .unwrap_or(ComponentStatus::Ok)
    }
}

/// Group joint rows by anatomical region.
///
/// Groups appear in the order their first member appears in `readings`;
/// members keep their input order.
pub fn map_joints_to_groups(readings: &[JointReading], thresholds: &ThresholdConfig) -> Vec<JointGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<JointGroup> = Vec::new();

    for reading in readings {
        let group_name = JointRegion::of(&reading.name).group_name();
        let view = JointView {
            name: reading.name.clone(),
            angle: reading.current_angle,
            target_angle: reading.target_angle,
            torque: reading.torque,
            temperature: reading.temperature,
            status: joint_status(reading, &thresholds.temperature, &thresholds.deviation),
        };

        match index.get(&group_name) {
            Some(&i) => groups[i].joints.push(view),
            None => {
                index.insert(group_name.clone(), groups.len());
                groups.push(JointGroup {
                    name: group_name,
                    joints: vec![view],
                });
            }
        }
    }

    groups
}
