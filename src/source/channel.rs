//! Channel-based data source.
//!
//! Receives fleet snapshots via a tokio watch channel, for embedding the
//! dashboard in a process that already has the fleet data in hand.

use tokio::sync::watch;

use super::{DataSource, FleetSnapshot};

/// A data source that receives fleet snapshots via a channel.
///
/// The producer owns versioning: it should bump [`FleetSnapshot::version`]
/// on every send.
///
/// # Example
///
/// ```
/// use sparkx_monitor::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("simulator");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<FleetSnapshot>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `source_description` names where snapshots come from
    /// (e.g. "simulator", "fleet-gateway").
    pub fn new(receiver: watch::Receiver<FleetSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair. The sender pushes snapshots; the source is
    /// handed to the dashboard.
    pub fn create(source_description: &str) -> (watch::Sender<FleetSnapshot>, Self) {
        let (tx, rx) = watch::channel(FleetSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<FleetSnapshot> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.receiver.has_changed().is_err() {
            Some("Producer disconnected".to_string())
        } else {
            None
        }
    }
}
