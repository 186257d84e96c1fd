//! # sparkx-monitor
//!
//! Aggregation core and terminal dashboard for a SparkX humanoid robot fleet.
//!
//! The crate turns raw robot, joint and telemetry rows into fleet metrics,
//! distributions, joint groups and hourly trends, all classified against a
//! single configurable [`ThresholdConfig`]. Fleet data arrives as owned,
//! versioned [`FleetSnapshot`]s from a [`DataSource`] and is shown in an
//! interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(metrics) │    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | HttpSource | ChannelSource     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: Thresholds, classifiers, fleet metrics, distributions,
//!   joint grouping, trends and the per-snapshot [`FleetReport`]
//! - **[`source`]**: The [`DataSource`] trait with file, HTTP and channel
//!   implementations
//! - **[`app`]**: Application state, view navigation and selection
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered settings; **[`logging`]**: tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a JSON file of robot rows
//! sparkx --file fleet.json
//!
//! # Poll the fleet backend
//! sparkx --url http://localhost:3001 --region Europe
//!
//! # Write a one-off report and exit
//! sparkx --url http://localhost:3001 --export report.json
//! ```
//!
//! ### Computing metrics directly
//!
//! ```
//! use sparkx_monitor::{FleetMetrics, ThresholdConfig};
//! use sparkx_types::{RobotSnapshot, RobotStatus};
//!
//! let robots = vec![
//!     RobotSnapshot::builder("RBT-001").status(RobotStatus::Online).battery(85.0).build(),
//!     RobotSnapshot::builder("RBT-002").status(RobotStatus::Error).battery(12.0).build(),
//! ];
//!
//! let metrics = FleetMetrics::compute(&robots, &ThresholdConfig::DEFAULT);
//! assert_eq!(metrics.fleet_health, 50);
//! assert_eq!(metrics.critical_alerts, 1);
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use sparkx_monitor::{App, ChannelSource, FleetSnapshot, ThresholdConfig};
//!
//! let (tx, source) = ChannelSource::create("simulator");
//! let mut app = App::new(Box::new(source), ThresholdConfig::default());
//!
//! tx.send(FleetSnapshot::new(1, Vec::new())).unwrap();
//! assert!(app.reload_data());
//! ```
//!
//! ### As a library with HTTP source
//!
//! ```no_run
//! use sparkx_monitor::{App, HttpSource, HttpSourceConfig, ThresholdConfig};
//!
//! # tokio_test::block_on(async {
//! let source = HttpSource::spawn(HttpSourceConfig {
//!     base_url: "http://localhost:3001".to_string(),
//!     ..Default::default()
//! })
//! .unwrap();
//! let app = App::new(Box::new(source), ThresholdConfig::default());
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

pub use app::{App, View};
pub use config::{Settings, SettingsError};
pub use data::{FleetMetrics, FleetReport, RobotFilter, ThresholdConfig, ThresholdError};
pub use source::{
    ChannelSource, DataSource, FetchError, FileSource, FleetClient, FleetSnapshot, HttpSource,
    HttpSourceConfig,
};
