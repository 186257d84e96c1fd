//! Fleet-level summary metrics.
//!
//! [`FleetMetrics::compute`] is recomputed from scratch on every call; it
//! holds no state between calls and never fails, whatever the input.

use serde::Serialize;
use sparkx_types::{RobotSnapshot, RobotStatus};

use super::thresholds::ThresholdConfig;

/// Round to the nearest integer, halves rounding up (towards +∞).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to one decimal place, halves rounding up.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Robot count per status. Sums to the fleet total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub online: usize,
    pub charging: usize,
    pub offline: usize,
    pub error: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.online + self.charging + self.offline + self.error + self.unknown
    }

    fn record(&mut self, status: &RobotStatus) {
        match status {
            RobotStatus::Online => self.online += 1,
            RobotStatus::Charging => self.charging += 1,
            RobotStatus::Offline => self.offline += 1,
            RobotStatus::Error => self.error += 1,
            RobotStatus::Unknown(_) => self.unknown += 1,
        }
    }
}

/// Per-metric fleet averages, rounded to whole numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Averages {
    pub battery: i64,
    pub temperature: i64,
    pub signal: i64,
}

/// Summary of a robot collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetMetrics {
    pub total: usize,
    pub active_robots: usize,
    pub inactive_robots: usize,
    /// Percent of robots that are active, rounded to an integer.
    pub fleet_health: i64,
    /// Percent of robots that are active, to one decimal.
    pub uptime: f64,
    pub critical_alerts: usize,
    pub status_counts: StatusCounts,
    pub averages: Averages,
}

impl FleetMetrics {
    pub fn compute(robots: &[RobotSnapshot], thresholds: &ThresholdConfig) -> Self {
        let total = robots.len();
        let mut status_counts = StatusCounts::default();
        let mut battery_sum = 0.0;
        let mut temperature_sum = 0.0;
        let mut signal_sum = 0.0;

        for robot in robots {
            status_counts.record(&robot.status);
            battery_sum += robot.battery;
            temperature_sum += robot.temperature;
            signal_sum += robot.signal;
        }

        let active = status_counts.online + status_counts.charging;
        let critical_alerts = critical_robots(robots, thresholds).count();

        let divisor = total.max(1) as f64;
        let (fleet_health, uptime) = if total > 0 {
            let share = active as f64 / total as f64 * 100.0;
            (round_half_up(share), round_tenth(share))
        } else {
            (0, 0.0)
        };

        Self {
            total,
            active_robots: active,
            inactive_robots: total - active,
            fleet_health,
            uptime,
            critical_alerts,
            status_counts,
            averages: Averages {
                battery: average(battery_sum, divisor),
                temperature: average(temperature_sum, divisor),
                signal: average(signal_sum, divisor),
            },
        }
    }

    /// Whether uptime meets the configured target.
    pub fn meets_uptime_target(&self, thresholds: &ThresholdConfig) -> bool {
        self.uptime >= thresholds.uptime_target
    }
}

// A NaN sum (from a NaN reading) averages to 0 rather than poisoning the cast.
fn average(sum: f64, divisor: f64) -> i64 {
    let avg = sum / divisor;
    if avg.is_finite() {
        round_half_up(avg)
    } else {
        0
    }
}

/// Why a robot counts toward the critical alert total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CriticalReasons {
    pub error_status: bool,
    pub low_battery: bool,
    pub overheating: bool,
}

impl CriticalReasons {
    pub fn of(robot: &RobotSnapshot, thresholds: &ThresholdConfig) -> Self {
        Self {
            error_status: robot.status == RobotStatus::Error,
            low_battery: robot.battery < thresholds.battery.critical,
            overheating: robot.temperature > thresholds.temperature.warning,
        }
    }

    pub fn any(&self) -> bool {
        self.error_status || self.low_battery || self.overheating
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.error_status {
            labels.push("error");
        }
        if self.low_battery {
            labels.push("low battery");
        }
        if self.overheating {
            labels.push("overheating");
        }
        labels
    }
}

/// Robots that count toward [`FleetMetrics::critical_alerts`], in input order.
pub fn critical_robots<'a>(
    robots: &'a [RobotSnapshot],
    thresholds: &'a ThresholdConfig,
) -> impl Iterator<Item = (&'a RobotSnapshot, CriticalReasons)> + 'a {
    robots.iter().filter_map(move |robot| {
        let reasons = CriticalReasons::of(robot, thresholds);
        reasons.any().then_some((robot, reasons))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: ThresholdConfig = ThresholdConfig::DEFAULT;

    fn robot(id: &str, status: RobotStatus, battery: f64) -> RobotSnapshot {
        RobotSnapshot::builder(id)
            .status(status)
            .battery(battery)
            .temperature(40.0)
            .signal(70.0)
            .build()
    }

    #[test]
    fn test_example_fleet() {
        let robots = vec![
            robot("a", RobotStatus::Online, 85.0),
            robot("b", RobotStatus::Offline, 15.0),
            robot("c", RobotStatus::Charging, 55.0),
        ];

        let m = FleetMetrics::compute(&robots, &T);
        assert_eq!(m.total, 3);
        assert_eq!(m.averages.battery, 52);
        assert_eq!(m.active_robots, 2);
        assert_eq!(m.inactive_robots, 1);
        assert_eq!(m.fleet_health, 67);
        assert_eq!(m.uptime, 66.7);
        // Battery 15 is below the critical cutoff.
        assert_eq!(m.critical_alerts, 1);
    }

    #[test]
    fn test_empty_fleet_is_all_zero() {
        let m = FleetMetrics::compute(&[], &T);
        assert_eq!(m, FleetMetrics::default());
        assert_eq!(m.fleet_health, 0);
        assert_eq!(m.uptime, 0.0);
        assert_eq!(m.averages, Averages::default());
    }

    #[test]
    fn test_status_counts_sum_to_total() {
        let robots = vec![
            robot("a", RobotStatus::Online, 50.0),
            robot("b", RobotStatus::Error, 50.0),
            robot("c", RobotStatus::Unknown("maintenance".into()), 50.0),
            robot("d", RobotStatus::Unknown("idle".into()), 50.0),
            robot("e", RobotStatus::Offline, 50.0),
        ];

        let m = FleetMetrics::compute(&robots, &T);
        assert_eq!(m.status_counts.total(), m.total);
        assert_eq!(m.status_counts.unknown, 2);
        assert_eq!(m.active_robots, 1);
        assert_eq!(m.fleet_health, 20);
    }

    #[test]
    fn test_averages_round_half_up() {
        let robots = vec![
            RobotSnapshot::builder("a").temperature(47.0).signal(64.0).build(),
            RobotSnapshot::builder("b").temperature(48.0).signal(65.0).build(),
        ];

        let m = FleetMetrics::compute(&robots, &T);
        assert_eq!(m.averages.temperature, 48);
        assert_eq!(m.averages.signal, 65);
    }

    #[test]
    fn test_negative_average_rounds_toward_positive() {
        let robots = vec![
            RobotSnapshot::builder("a").temperature(-3.0).build(),
            RobotSnapshot::builder("b").temperature(-2.0).build(),
        ];
        assert_eq!(FleetMetrics::compute(&robots, &T).averages.temperature, -2);
    }

    #[test]
    fn test_critical_alert_reasons() {
        let robots = vec![
            RobotSnapshot::builder("err").status(RobotStatus::Error).battery(80.0).build(),
            RobotSnapshot::builder("low").status(RobotStatus::Online).battery(19.9).build(),
            RobotSnapshot::builder("hot")
                .status(RobotStatus::Online)
                .battery(80.0)
                .temperature(60.5)
                .build(),
            RobotSnapshot::builder("ok")
                .status(RobotStatus::Online)
                .battery(20.0)
                .temperature(60.0)
                .build(),
        ];

        let critical: Vec<_> = critical_robots(&robots, &T).collect();
        let ids: Vec<&str> = critical.iter().map(|(r, _)| r.id.as_str()).collect();
        assert_eq!(ids, vec!["err", "low", "hot"]);
        assert_eq!(critical[1].1.labels(), vec!["low battery"]);
        assert_eq!(FleetMetrics::compute(&robots, &T).critical_alerts, 3);
    }

    #[test]
    fn test_fleet_health_within_bounds() {
        for active in 0..=7 {
            let robots: Vec<_> = (0..7)
                .map(|i| {
                    let status = if i < active {
                        RobotStatus::Online
                    } else {
                        RobotStatus::Offline
                    };
                    robot(&i.to_string(), status, 50.0)
                })
                .collect();
            let m = FleetMetrics::compute(&robots, &T);
            assert!((0..=100).contains(&m.fleet_health));
            assert_eq!(m.fleet_health, round_half_up(100.0 * active as f64 / 7.0));
        }
    }

    #[test]
    fn test_nan_reading_does_not_panic() {
        let robots = vec![RobotSnapshot::builder("a").battery(f64::NAN).build()];
        let m = FleetMetrics::compute(&robots, &T);
        assert_eq!(m.averages.battery, 0);
    }

    #[test]
    fn test_uptime_target() {
        let robots = vec![robot("a", RobotStatus::Online, 50.0)];
        assert!(FleetMetrics::compute(&robots, &T).meets_uptime_target(&T));
        assert!(!FleetMetrics::compute(&[], &T).meets_uptime_target(&T));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let robots = vec![
            robot("a", RobotStatus::Online, 85.0),
            robot("b", RobotStatus::Error, 10.0),
        ];
        assert_eq!(
            FleetMetrics::compute(&robots, &T),
            FleetMetrics::compute(&robots, &T)
        );
    }
}
