//! # sparkx-types
//!
//! Core data model for SparkX robot fleet telemetry. This crate defines the
//! typed rows that the aggregation core and the dashboard consume: robot
//! snapshots, joint readings, and historical telemetry samples.
//!
//! ## Design Goals
//!
//! - **Typed at the boundary**: raw JSON rows are converted once into
//!   validated types, so downstream code never handles nulls or strings
//!   where numbers belong
//! - **Total conversion**: missing or malformed fields are replaced with safe
//!   defaults instead of failing the whole row
//! - **Optional serialization**: enable the `serde` feature for the wire
//!   format and the raw row parsers
//!
//! ## Features
//!
//! - `serde`: serialization of the typed model and the lenient [`raw`] parsers
//!
//! ## Example
//!
//! ```rust
//! use sparkx_types::{RobotSnapshot, RobotStatus};
//!
//! let robot = RobotSnapshot::builder("RBT-001")
//!     .name("Atlas")
//!     .status(RobotStatus::Online)
//!     .battery(85.0)
//!     .temperature(42.0)
//!     .build();
//!
//! assert!(robot.status.is_active());
//! ```

mod joint;
mod robot;
mod telemetry;

#[cfg(feature = "serde")]
mod lenient;
#[cfg(feature = "serde")]
pub mod raw;

pub use joint::*;
pub use robot::*;
pub use telemetry::*;
