//! Fleet aggregation and classification.
//!
//! Everything in this module is a pure function of its inputs: a robot or
//! joint collection plus a [`ThresholdConfig`]. Nothing here reads ambient
//! state, and nothing here fails.
//!
//! ## Submodules
//!
//! - [`thresholds`]: The threshold table every classifier consumes
//! - [`classify`]: Per-measurement classifiers and colour helpers
//! - [`fleet`]: Fleet summary metrics ([`FleetMetrics`])
//! - [`distribution`]: Status, battery, temperature and regional breakdowns
//! - [`joints`]: Grouping of joint rows into anatomical groups
//! - [`filter`]: Exact-match robot filtering
//! - [`trends`]: Hourly battery and temperature trends
//! - [`report`]: All of the above for one snapshot ([`FleetReport`])
//! - [`history`]: Values across snapshots for sparklines and rates
//! - [`age`]: Human-readable ages
//!
//! ## Data Flow
//!
//! ```text
//! FleetSnapshot (from a DataSource)
//!        │
//!        ▼
//! FleetReport::from_snapshot()
//!        │
//!        ├──▶ FleetMetrics, distributions, trends (classified with ThresholdConfig)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod age;
pub mod classify;
pub mod distribution;
pub mod filter;
pub mod fleet;
pub mod history;
pub mod joints;
pub mod report;
pub mod thresholds;
pub mod trends;

pub use classify::{
    battery_tone, classify_battery, classify_connectivity, classify_joint_status, classify_signal,
    classify_temperature, joint_status, status_color, status_tone, temperature_tone, BatteryLevel,
    ComponentStatus, HealthGrade, HeartbeatStatus, LatencyGrade, TemperatureBand,
    TemperatureLevel, Tone,
};
pub use distribution::{
    battery_distribution, country_stats, filter_options, location_stats, regional_distribution,
    status_distribution, temperature_distribution, DistributionEntry, FilterOptions, PlaceCount,
};
pub use filter::RobotFilter;
pub use fleet::{critical_robots, CriticalReasons, FleetMetrics, StatusCounts};
pub use history::History;
pub use joints::{map_joints_to_groups, JointGroup, JointRegion, JointView};
pub use report::{CriticalRobot, FleetReport};
pub use thresholds::{ThresholdConfig, ThresholdError};
pub use trends::{battery_trends, temperature_trends};
