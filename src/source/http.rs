//! HTTP polling source for the fleet REST backend.
//!
//! A background task polls `GET /api/robots` on one interval and, while a
//! robot is being watched, `GET /api/robots/:id` plus its telemetry on a
//! second, shorter interval. Each successful fetch publishes a new
//! [`FleetSnapshot`] version. A failed fetch is logged and recorded as the
//! source error; the previous snapshot stays current and the next tick
//! retries.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use sparkx_types::raw::{RawRobotDetail, RawRobotRow, RawTelemetryRow};
use sparkx_types::{JointReading, RobotSnapshot, TelemetrySample};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{DataSource, FleetSnapshot};
use crate::data::RobotFilter;

/// Errors that can occur when fetching from the fleet backend.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body was not the expected JSON shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

/// Typed client for the fleet REST API.
#[derive(Debug, Clone)]
pub struct FleetClient {
    client: Client,
    base_url: Url,
}

impl FleetClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn robots_request(&self, filter: &RobotFilter) -> Result<RequestBuilder, FetchError> {
        let url = self.endpoint(&["api", "robots"])?;
        let mut request = self.client.get(url);
        let query = filter.query_pairs();
        if !query.is_empty() {
            request = request.query(&query);
        }
        Ok(request)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, FetchError> {
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(what.to_string()));
        }

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// `GET /api/robots`, narrowed by `filter`.
    pub async fn fetch_robots(&self, filter: &RobotFilter) -> Result<Vec<RobotSnapshot>, FetchError> {
        let rows: Vec<RawRobotRow> = self
            .get_json(self.robots_request(filter)?, "robot list")
            .await?;
        Ok(rows.into_iter().map(RawRobotRow::into_snapshot).collect())
    }

    /// Joint rows from `GET /api/robots/:id`.
    pub async fn fetch_joints(&self, robot_id: &str) -> Result<Vec<JointReading>, FetchError> {
        let url = self.endpoint(&["api", "robots", robot_id])?;
        let detail: RawRobotDetail = self
            .get_json(self.client.get(url), &format!("Robot '{}'", robot_id))
            .await?;
        Ok(detail.joint_readings())
    }

    /// `GET /api/robots/:id/telemetry` over the last `hours` hours.
    pub async fn fetch_telemetry(
        &self,
        robot_id: &str,
        hours: u32,
    ) -> Result<Vec<TelemetrySample>, FetchError> {
        let url = self.endpoint(&["api", "robots", robot_id, "telemetry"])?;
        let request = self
            .client
            .get(url)
            .query(&[("hours", hours.to_string()), ("limit", "1000".to_string())]);
        let rows: Vec<RawTelemetryRow> = self
            .get_json(request, &format!("Telemetry for '{}'", robot_id))
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(RawTelemetryRow::into_sample)
            .collect())
    }
}

/// Settings for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub robots_interval: Duration,
    pub detail_interval: Duration,
    pub timeout: Duration,
    pub telemetry_hours: u32,
    pub filter: RobotFilter,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            robots_interval: Duration::from_secs(5),
            detail_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(10),
            telemetry_hours: 24,
            filter: RobotFilter::default(),
        }
    }
}

/// A data source that polls the fleet backend over HTTP.
///
/// Must be created from within a tokio runtime. The polling task stops when
/// the source is dropped.
#[derive(Debug)]
pub struct HttpSource {
    description: String,
    receiver: watch::Receiver<FleetSnapshot>,
    watched: watch::Sender<Option<String>>,
    error: Arc<Mutex<Option<String>>>,
    task: JoinHandle<()>,
}

impl HttpSource {
    pub fn spawn(config: HttpSourceConfig) -> Result<Self, FetchError> {
        let client = FleetClient::new(&config.base_url, config.timeout)?;
        let mut description = format!("http: {}", client.base_url());
        if !config.filter.is_empty() {
            description.push_str(&format!(" [{}]", config.filter.describe()));
        }

        let (tx, receiver) = watch::channel(FleetSnapshot::default());
        let (watched, watched_rx) = watch::channel(None);
        let error = Arc::new(Mutex::new(None));

        let poller = Poller {
            client,
            filter: config.filter,
            telemetry_hours: config.telemetry_hours,
            publish: tx,
            error: error.clone(),
            version: 0,
            robots: Vec::new(),
            joints: BTreeMap::new(),
            telemetry: Vec::new(),
        };

        info!(
            source = %description,
            robots_every = ?config.robots_interval,
            detail_every = ?config.detail_interval,
            "starting fleet poller"
        );
        let task = tokio::spawn(poller.run(
            watched_rx,
            config.robots_interval,
            config.detail_interval,
        ));

        Ok(Self {
            description,
            receiver,
            watched,
            error,
            task,
        })
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<FleetSnapshot> {
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
        self.error.lock().clone()
    }

    fn watch_robot(&mut self, robot_id: Option<&str>) {
        self.watched.send_if_modified(|current| {
            if current.as_deref() == robot_id {
                false
            } else {
                *current = robot_id.map(str::to_string);
                true
            }
        });
    }
}

/// State owned by the background polling task.
struct Poller {
    client: FleetClient,
    filter: RobotFilter,
    telemetry_hours: u32,
    publish: watch::Sender<FleetSnapshot>,
    error: Arc<Mutex<Option<String>>>,
    version: u64,
    robots: Vec<RobotSnapshot>,
    joints: BTreeMap<String, Vec<JointReading>>,
    telemetry: Vec<TelemetrySample>,
}

impl Poller {
    async fn run(
        mut self,
        mut watched: watch::Receiver<Option<String>>,
        robots_every: Duration,
        detail_every: Duration,
    ) {
        let mut robots_tick = interval(robots_every);
        robots_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut detail_tick = interval(detail_every);
        detail_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = robots_tick.tick() => self.refresh_robots().await,
                _ = detail_tick.tick() => {
                    let robot_id = watched.borrow().clone();
                    if let Some(id) = robot_id {
                        self.refresh_detail(&id).await;
                    }
                }
                changed = watched.changed() => {
                    if changed.is_err() {
                        debug!("fleet poller stopping: source dropped");
                        break;
                    }
                    let robot_id = watched.borrow_and_update().clone();
                    self.forget_detail(robot_id.as_deref());
                    detail_tick.reset_immediately();
                }
            }
        }
    }

    async fn refresh_robots(&mut self) {
        match self.client.fetch_robots(&self.filter).await {
            Ok(robots) => {
                debug!(count = robots.len(), "fetched robots");
                self.robots = robots;
                self.publish_snapshot(true);
            }
            Err(e) => self.record_error("robots", e),
        }
    }

    async fn refresh_detail(&mut self, robot_id: &str) {
        let joints = self.client.fetch_joints(robot_id).await;
        let telemetry = self
            .client
            .fetch_telemetry(robot_id, self.telemetry_hours)
            .await;

        let mut changed = false;
        let mut failed = false;
        match joints {
            Ok(joints) => {
                debug!(robot = robot_id, count = joints.len(), "fetched joints");
                self.joints.retain(|id, _| id == robot_id);
                self.joints.insert(robot_id.to_string(), joints);
                changed = true;
            }
            Err(e) => {
                self.record_error("joints", e);
                failed = true;
            }
        }
        match telemetry {
            Ok(samples) => {
                self.telemetry = samples;
                changed = true;
            }
            Err(e) => {
                self.record_error("telemetry", e);
                failed = true;
            }
        }

        if changed {
            self.publish_snapshot(!failed);
        }
    }

    /// Drop joint rows and telemetry that do not belong to `keep`, so a
    /// robot that is no longer watched stops showing up in new snapshots.
    fn forget_detail(&mut self, keep: Option<&str>) {
        let joints_before = self.joints.len();
        let telemetry_before = self.telemetry.len();
        self.joints.retain(|id, _| Some(id.as_str()) == keep);
        self.telemetry.retain(|s| Some(s.robot_id.as_str()) == keep);

        if self.joints.len() != joints_before || self.telemetry.len() != telemetry_before {
            debug!(robot = ?keep, "dropped detail for unwatched robot");
            self.publish_snapshot(false);
        }
    }

    /// Publish the current state as a new version. `fetch_ok` clears the
    /// source error; it must only be set when every fetch behind this
    /// snapshot succeeded.
    fn publish_snapshot(&mut self, fetch_ok: bool) {
        self.version += 1;
        let snapshot = FleetSnapshot {
            version: self.version,
            fetched_at: Utc::now(),
            robots: self.robots.clone(),
            joints: self.joints.clone(),
            telemetry: self.telemetry.clone(),
        };
        self.publish.send_replace(snapshot);
        if fetch_ok {
            *self.error.lock() = None;
        }
    }

    fn record_error(&self, what: &str, error: FetchError) {
        warn!(what, error = %error, "fetch failed, keeping last snapshot");
        *self.error.lock() = Some(error.to_string());
    }
}
