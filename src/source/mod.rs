//! Data source abstraction for receiving fleet snapshots.
//!
//! A source owns the latest fleet state it has fetched and hands it out as
//! an immutable, versioned [`FleetSnapshot`]. Consumers never read ambient
//! state; they keep whatever snapshot they were last given.

mod channel;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::{FetchError, FleetClient, HttpSource, HttpSourceConfig};
pub use snapshot::{FleetPayload, FleetSnapshot};

use std::fmt::Debug;

/// Trait for receiving fleet data from various sources.
///
/// # Example
///
/// ```
/// use sparkx_monitor::{DataSource, FileSource};
///
/// let mut source = FileSource::new("fleet.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} robots (v{})", snapshot.robots.len(), snapshot.version);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if a newer version is available, `None`
    /// otherwise. This method should be non-blocking.
    fn poll(&mut self) -> Option<FleetSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The error from the most recent failed fetch, if it has not been
    /// followed by a successful one.
    fn error(&self) -> Option<String>;

    /// Select the robot whose joint rows should be fetched, or `None` to stop.
    ///
    /// Sources that always carry joint data ignore this.
    fn watch_robot(&mut self, _robot_id: Option<&str>) {}
}
