//! Everything the dashboard shows about one fleet snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sparkx_types::RobotSnapshot;

use super::distribution::{
    battery_distribution, country_stats, filter_options, location_stats, regional_distribution,
    status_distribution, temperature_distribution, DistributionEntry, FilterOptions, PlaceCount,
};
use super::fleet::{critical_robots, FleetMetrics};
use super::thresholds::ThresholdConfig;
use super::trends::{battery_trends, temperature_trends, BatteryTrendPoint, TemperatureTrendPoint};
use crate::source::FleetSnapshot;

/// A robot that counts toward the critical alert total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalRobot {
    pub id: String,
    pub name: String,
    pub reasons: Vec<&'static str>,
}

/// Derived view of a fleet snapshot. Built fresh for every snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    pub version: u64,
    pub fetched_at: DateTime<Utc>,
    pub metrics: FleetMetrics,
    pub status_distribution: Vec<DistributionEntry>,
    pub battery_distribution: Vec<DistributionEntry>,
    pub temperature_distribution: Vec<DistributionEntry>,
    pub regional_distribution: Vec<DistributionEntry>,
    pub filter_options: FilterOptions,
    pub location_stats: Vec<PlaceCount>,
    pub country_stats: Vec<PlaceCount>,
    pub critical_robots: Vec<CriticalRobot>,
    pub battery_trends: Vec<BatteryTrendPoint>,
    pub temperature_trends: Vec<TemperatureTrendPoint>,
}

impl FleetReport {
    pub fn from_snapshot(snapshot: &FleetSnapshot, thresholds: &ThresholdConfig) -> Self {
        let robots: &[RobotSnapshot] = &snapshot.robots;

        Self {
            version: snapshot.version,
            fetched_at: snapshot.fetched_at,
            metrics: FleetMetrics::compute(robots, thresholds),
            status_distribution: status_distribution(robots),
            battery_distribution: battery_distribution(robots, &thresholds.battery),
            temperature_distribution: temperature_distribution(robots, &thresholds.temperature),
            regional_distribution: regional_distribution(robots),
            filter_options: filter_options(robots),
            location_stats: location_stats(robots),
            country_stats: country_stats(robots),
            critical_robots: critical_robots(robots, thresholds)
                .map(|(robot, reasons)| CriticalRobot {
                    id: robot.id.clone(),
                    name: robot.name.clone(),
                    reasons: reasons.labels(),
                })
                .collect(),
            battery_trends: battery_trends(&snapshot.telemetry, snapshot.fetched_at),
            temperature_trends: temperature_trends(&snapshot.telemetry, snapshot.fetched_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparkx_types::RobotStatus;

    #[test]
    fn test_report_from_snapshot() {
        let robots = vec![
            RobotSnapshot::builder("a")
                .name("Atlas")
                .status(RobotStatus::Error)
                .battery(10.0)
                .place("Dock", "", "USA", "North America")
                .build(),
            RobotSnapshot::builder("b")
                .status(RobotStatus::Online)
                .battery(95.0)
                .place("Dock", "", "USA", "North America")
                .build(),
        ];
        let snapshot = FleetSnapshot::new(3, robots);

        let report = FleetReport::from_snapshot(&snapshot, &ThresholdConfig::DEFAULT);
        assert_eq!(report.version, 3);
        assert_eq!(report.metrics.total, 2);
        assert_eq!(report.metrics.fleet_health, 50);
        assert_eq!(report.status_distribution.len(), 2);
        assert_eq!(report.battery_distribution.len(), 5);
        assert_eq!(report.location_stats[0].count, 2);
        assert_eq!(report.critical_robots.len(), 1);
        assert_eq!(report.critical_robots[0].reasons, vec!["error", "low battery"]);
        assert_eq!(report.battery_trends.len(), 24);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let snapshot = FleetSnapshot::new(1, Vec::new());
        let report = FleetReport::from_snapshot(&snapshot, &ThresholdConfig::DEFAULT);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["metrics"]["fleetHealth"], 0);
        assert_eq!(json["metrics"]["statusCounts"]["online"], 0);
        assert!(json["batteryDistribution"].is_array());
        assert!(json["filterOptions"]["locations"].is_array());
    }
}
