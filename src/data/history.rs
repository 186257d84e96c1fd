//! Historical data tracking for sparklines and rate calculations.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use sparkx_types::RobotSnapshot;

use super::fleet::FleetMetrics;

/// Maximum number of historical snapshots to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks fleet and per-robot values across successive snapshots.
#[derive(Debug, Clone)]
pub struct History {
    /// Fleet health percentage per snapshot.
    pub fleet_health: VecDeque<i64>,
    /// Critical alert count per snapshot.
    pub critical_alerts: VecDeque<usize>,
    /// Battery readings per robot (robot id -> readings).
    pub robot_battery: HashMap<String, VecDeque<f64>>,
    /// Timestamps of snapshots for rate calculations.
    pub timestamps: VecDeque<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded<T>(buf: &mut VecDeque<T>, value: T) {
    buf.push_back(value);
    if buf.len() > MAX_HISTORY_SIZE {
        buf.pop_front();
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            fleet_health: VecDeque::new(),
            critical_alerts: VecDeque::new(),
            robot_battery: HashMap::new(),
            timestamps: VecDeque::new(),
        }
    }

    /// Record a new snapshot.
    pub fn record(&mut self, metrics: &FleetMetrics, robots: &[RobotSnapshot], at: Instant) {
        push_bounded(&mut self.fleet_health, metrics.fleet_health);
        push_bounded(&mut self.critical_alerts, metrics.critical_alerts);

        for robot in robots {
            let readings = self.robot_battery.entry(robot.id.clone()).or_default();
            push_bounded(readings, robot.battery);
        }
        // Robots that left the fleet stop contributing.
        self.robot_battery
            .retain(|id, _| robots.iter().any(|r| &r.id == id));

        push_bounded(&mut self.timestamps, at);
    }

    /// Fleet health sparkline (0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn fleet_health_sparkline(&self) -> Vec<u8> {
        normalize_sparkline(self.fleet_health.iter().map(|&v| v as f64))
    }

    /// Battery sparkline for one robot.
    pub fn battery_sparkline(&self, robot_id: &str) -> Vec<u8> {
        self.robot_battery
            .get(robot_id)
            .map(|v| normalize_sparkline(v.iter().copied()))
            .unwrap_or_default()
    }

    /// Battery change of a robot between the last two snapshots, in percent
    /// per minute. Negative while discharging.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn battery_rate(&self, robot_id: &str) -> Option<f64> {
        let readings = self.robot_battery.get(robot_id)?;
        if readings.len() < 2 || self.timestamps.len() < 2 {
            return None;
        }

        let current = *readings.back()?;
        let previous = *readings.get(readings.len() - 2)?;

        let current_time = self.timestamps.back()?;
        let previous_time = self.timestamps.get(self.timestamps.len() - 2)?;
        let elapsed = current_time.duration_since(*previous_time).as_secs_f64();

        if elapsed > 0.0 {
            Some((current - previous) / elapsed * 60.0)
        } else {
            None
        }
    }
}

/// Normalize values to 0-7 across their own min..max range.
fn normalize_sparkline(values: impl Iterator<Item = f64>) -> Vec<u8> {
    let values: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if values.len() < 2 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(1.0);

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) / range * 7.0) as u8;
            normalized.min(7)
        })
        .collect()
}
