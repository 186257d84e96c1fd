//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use sparkx_types::RobotSnapshot;
use tracing::{debug, info};

use crate::data::{
    map_joints_to_groups, FleetReport, History, JointGroup, RobotFilter, ThresholdConfig,
};
use crate::source::{DataSource, FleetSnapshot};
use crate::ui::fleet::{sort_robots_by, SortColumn};
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Robot detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Robot table with status, battery, temperature and signal.
    Fleet,
    /// Distributions and hourly trends.
    Analytics,
    /// Robot counts per location and country.
    Locations,
}

impl View {
    pub const ALL: [View; 3] = [View::Fleet, View::Analytics, View::Locations];

    pub fn next(self) -> Self {
        match self {
            View::Fleet => View::Analytics,
            View::Analytics => View::Locations,
            View::Locations => View::Fleet,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Fleet => View::Locations,
            View::Analytics => View::Fleet,
            View::Locations => View::Analytics,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Fleet => "Fleet",
            View::Analytics => "Analytics",
            View::Locations => "Locations",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Fleet => 0,
            View::Analytics => 1,
            View::Locations => 2,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    /// Robot the source was last asked to fetch detail for.
    watched_robot: Option<String>,
    pub snapshot: Option<FleetSnapshot>,
    pub report: Option<FleetReport>,
    pub history: History,
    pub load_error: Option<String>,
    pub thresholds: ThresholdConfig,
    /// Applied to every snapshot before anything is derived from it.
    pub filter: RobotFilter,
    pub last_update: Option<Instant>,

    // Navigation state
    pub selected_robot_index: usize,
    pub selected_place_index: usize,

    // Sorting (Fleet view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(source: Box<dyn DataSource>, thresholds: ThresholdConfig) -> Self {
        Self {
            running: true,
            current_view: View::Fleet,
            show_help: false,
            show_detail_overlay: false,
            source,
            watched_robot: None,
            snapshot: None,
            report: None,
            history: History::new(),
            load_error: None,
            thresholds,
            filter: RobotFilter::default(),
            last_update: None,
            selected_robot_index: 0,
            selected_place_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_filter(mut self, filter: RobotFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// The current status message, if it is less than 3 seconds old.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < Duration::from_secs(3) => Some(msg),
            _ => None,
        }
    }

    /// Poll the data source for a new snapshot.
    ///
    /// Returns `true` if a new snapshot was received. A source error is
    /// shown alongside the last good snapshot rather than replacing it.
    pub fn reload_data(&mut self) -> bool {
        let polled = self.source.poll();
        self.load_error = self.source.error();

        let Some(mut snapshot) = polled else {
            return false;
        };
        if !self.filter.is_empty() {
            snapshot.robots.retain(|r| self.filter.matches(r));
        }

        let report = FleetReport::from_snapshot(&snapshot, &self.thresholds);
        debug!(
            version = snapshot.version,
            robots = snapshot.robots.len(),
            fleet_health = report.metrics.fleet_health,
            "applied snapshot"
        );

        let selected_id = self.selected_robot().map(|r| r.id.clone());

        let now = Instant::now();
        self.history.record(&report.metrics, &snapshot.robots, now);
        self.snapshot = Some(snapshot);
        self.report = Some(report);
        self.last_update = Some(now);
        self.reselect_robot(selected_id.as_deref());
        self.clamp_selection();
        self.sync_watched_robot();
        true
    }

    /// Keep the selection on the same robot when a new snapshot re-sorts
    /// the table.
    fn reselect_robot(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };
        if let Some(index) = self.visible_robots().iter().position(|r| r.id == id) {
            self.selected_robot_index = index;
        }
    }

    fn clamp_selection(&mut self) {
        let robots = self.visible_robots().len();
        if self.selected_robot_index >= robots {
            self.selected_robot_index = robots.saturating_sub(1);
        }
        let places = self.place_count();
        if self.selected_place_index >= places {
            self.selected_place_index = places.saturating_sub(1);
        }
    }

    fn place_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.location_stats.len())
    }

    /// Robots matching the search text, in the current sort order.
    pub fn visible_robots(&self) -> Vec<&RobotSnapshot> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let mut robots: Vec<&RobotSnapshot> = snapshot
            .robots
            .iter()
            .filter(|r| self.matches_filter(r))
            .collect();
        sort_robots_by(&mut robots, self.sort_column, self.sort_ascending);
        robots
    }

    pub fn selected_robot(&self) -> Option<&RobotSnapshot> {
        self.visible_robots().get(self.selected_robot_index).copied()
    }

    /// Joint groups for the selected robot, if its joints have been fetched.
    pub fn selected_joint_groups(&self) -> Vec<JointGroup> {
        let (Some(snapshot), Some(robot)) = (&self.snapshot, self.selected_robot()) else {
            return Vec::new();
        };
        map_joints_to_groups(snapshot.joints_for(&robot.id), &self.thresholds)
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Fleet => {
                let max = self.visible_robots().len().saturating_sub(1);
                self.selected_robot_index = self.selected_robot_index.saturating_add(n).min(max);
                self.sync_watched_robot();
            }
            View::Locations => {
                let max = self.place_count().saturating_sub(1);
                self.selected_place_index = self.selected_place_index.saturating_add(n).min(max);
            }
            View::Analytics => {}
        }
    }

    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Fleet => {
                self.selected_robot_index = self.selected_robot_index.saturating_sub(n);
                self.sync_watched_robot();
            }
            View::Locations => {
                self.selected_place_index = self.selected_place_index.saturating_sub(n);
            }
            View::Analytics => {}
        }
    }

    /// Select the robot at `index` in the visible list, if there is one.
    pub fn select_robot(&mut self, index: usize) {
        if index < self.visible_robots().len() {
            self.selected_robot_index = index;
            self.sync_watched_robot();
        }
    }

    pub fn select_first(&mut self) {
        self.select_prev_n(usize::MAX);
    }

    pub fn select_last(&mut self) {
        self.select_next_n(usize::MAX);
    }

    /// Open the detail overlay for the selected robot and ask the source
    /// for its joint rows.
    pub fn enter_detail(&mut self) {
        if self.current_view != View::Fleet {
            return;
        }
        let Some(id) = self.selected_robot().map(|r| r.id.clone()) else {
            return;
        };
        info!(robot = %id, "opening robot detail");
        self.show_detail_overlay = true;
        self.source.watch_robot(Some(&id));
        self.watched_robot = Some(id);
    }

    /// While the overlay is open, keep the watched robot in step with the
    /// selection.
    fn sync_watched_robot(&mut self) {
        if !self.show_detail_overlay {
            return;
        }
        let id = self.selected_robot().map(|r| r.id.clone());
        if id != self.watched_robot {
            self.source.watch_robot(id.as_deref());
            self.watched_robot = id;
        }
    }

    pub fn close_overlay(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            self.source.watch_robot(None);
            self.watched_robot = None;
        }
    }

    /// Navigate back: close the overlay first, then return to the Fleet view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.close_overlay();
        } else {
            self.current_view = View::Fleet;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_robot_index = 0;
    }

    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Case-insensitive search over id, name, location and country.
    pub fn matches_filter(&self, robot: &RobotSnapshot) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();
        [&robot.id, &robot.name, &robot.location, &robot.country]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the current fleet report as pretty JSON.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let Some(report) = &self.report else {
            anyhow::bail!("No data to export");
        };
        write_report(report, path)
    }
}

/// Write a fleet report to `path` as pretty JSON.
pub fn write_report(report: &FleetReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), version = report.version, "exported fleet report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use sparkx_types::{JointReading, RobotStatus};
    use tokio::sync::watch;

    fn fleet() -> Vec<RobotSnapshot> {
        vec![
            RobotSnapshot::builder("RBT-003")
                .name("Cobalt")
                .status(RobotStatus::Online)
                .battery(55.0)
                .place("Seoul Lab", "", "South Korea", "Asia Pacific")
                .build(),
            RobotSnapshot::builder("RBT-001")
                .name("Atlas")
                .status(RobotStatus::Error)
                .battery(12.0)
                .place("Berlin Hub", "", "Germany", "Europe")
                .build(),
            RobotSnapshot::builder("RBT-002")
                .name("Bishop")
                .status(RobotStatus::Charging)
                .battery(80.0)
                .place("Berlin Hub", "", "Germany", "Europe")
                .build(),
        ]
    }

    fn app_with_fleet() -> (watch::Sender<FleetSnapshot>, App) {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), ThresholdConfig::DEFAULT);
        tx.send(FleetSnapshot::new(1, fleet())).unwrap();
        assert!(app.reload_data());
        (tx, app)
    }

    #[test]
    fn test_reload_builds_report_and_history() {
        let (_tx, mut app) = app_with_fleet();

        let report = app.report.as_ref().unwrap();
        assert_eq!(report.metrics.total, 3);
        assert_eq!(report.metrics.critical_alerts, 1);
        assert_eq!(app.history.fleet_health.len(), 1);
        assert!(app.last_update.is_some());

        // Nothing new
        assert!(!app.reload_data());
        assert_eq!(app.history.fleet_health.len(), 1);
    }

    #[test]
    fn test_visible_robots_sorted_and_filtered() {
        let (_tx, mut app) = app_with_fleet();

        let names: Vec<&str> = app.visible_robots().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Atlas", "Bishop", "Cobalt"]);

        for c in "berlin".chars() {
            app.filter_push(c);
        }
        let ids: Vec<&str> = app.visible_robots().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["RBT-001", "RBT-002"]);

        app.clear_filter();
        assert_eq!(app.visible_robots().len(), 3);
    }

    #[test]
    fn test_selection_clamps_to_visible() {
        let (tx, mut app) = app_with_fleet();
        app.select_last();
        assert_eq!(app.selected_robot_index, 2);

        tx.send(FleetSnapshot::new(2, fleet().into_iter().take(1).collect()))
            .unwrap();
        app.reload_data();
        assert_eq!(app.selected_robot_index, 0);
        assert_eq!(app.selected_robot().map(|r| r.id.as_str()), Some("RBT-003"));
    }

    #[test]
    fn test_detail_overlay_shows_joint_groups() {
        let (tx, mut app) = app_with_fleet();
        app.enter_detail();
        assert!(app.show_detail_overlay);
        assert!(app.selected_joint_groups().is_empty());

        let snapshot = FleetSnapshot::new(2, fleet()).with_joints(
            "RBT-001",
            vec![
                JointReading::new("Left_Shoulder_Pitch").with_temperature(40.0),
                JointReading::new("Left_Elbow").with_temperature(80.0),
            ],
        );
        tx.send(snapshot).unwrap();
        app.reload_data();

        let groups = app.selected_joint_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Shoulder Joints (6 DOF)");

        app.go_back();
        assert!(!app.show_detail_overlay);
        app.set_view(View::Analytics);
        app.go_back();
        assert_eq!(app.current_view, View::Fleet);
    }

    /// Hands out queued snapshots and records every `watch_robot` call.
    #[derive(Debug, Default)]
    struct RecordingSource {
        queued: std::collections::VecDeque<FleetSnapshot>,
        watched: std::sync::Arc<parking_lot::Mutex<Vec<Option<String>>>>,
    }

    impl DataSource for RecordingSource {
        fn poll(&mut self) -> Option<FleetSnapshot> {
            self.queued.pop_front()
        }

        fn description(&self) -> &str {
            "recording"
        }

        fn error(&self) -> Option<String> {
            None
        }

        fn watch_robot(&mut self, robot_id: Option<&str>) {
            self.watched.lock().push(robot_id.map(str::to_string));
        }
    }

    fn robot(id: &str, battery: f64) -> RobotSnapshot {
        RobotSnapshot::builder(id)
            .name(id)
            .status(RobotStatus::Online)
            .battery(battery)
            .build()
    }

    #[test]
    fn test_detail_follows_robot_across_resort() {
        let watched = std::sync::Arc::default();
        let source = RecordingSource {
            queued: [
                FleetSnapshot::new(1, vec![robot("A", 10.0), robot("B", 50.0)]),
                FleetSnapshot::new(2, vec![robot("A", 60.0), robot("B", 50.0)]),
                FleetSnapshot::new(3, vec![robot("B", 50.0)]),
            ]
            .into(),
            watched: std::sync::Arc::clone(&watched),
        };
        let mut app = App::new(Box::new(source), ThresholdConfig::DEFAULT);
        app.sort_column = SortColumn::Battery;

        assert!(app.reload_data());
        app.enter_detail();
        assert_eq!(app.selected_robot().map(|r| r.id.as_str()), Some("A"));

        // A now sorts after B; the overlay stays on A and nothing is re-requested
        assert!(app.reload_data());
        assert_eq!(app.selected_robot_index, 1);
        assert_eq!(app.selected_robot().map(|r| r.id.as_str()), Some("A"));
        assert_eq!(*watched.lock(), [Some("A".to_string())]);

        // A disappears; the source follows the robot now on screen
        assert!(app.reload_data());
        assert_eq!(app.selected_robot().map(|r| r.id.as_str()), Some("B"));
        assert_eq!(
            *watched.lock(),
            [Some("A".to_string()), Some("B".to_string())]
        );

        app.close_overlay();
        assert_eq!(watched.lock().last(), Some(&None));
    }

    #[test]
    fn test_fleet_filter_applies_before_metrics() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), ThresholdConfig::DEFAULT).with_filter(RobotFilter {
            country: Some("Germany".into()),
            ..Default::default()
        });
        tx.send(FleetSnapshot::new(1, fleet())).unwrap();
        app.reload_data();

        let report = app.report.as_ref().unwrap();
        assert_eq!(report.metrics.total, 2);
        assert_eq!(report.metrics.active_robots, 1);
        assert_eq!(app.visible_robots().len(), 2);
    }

    #[test]
    fn test_source_error_surfaces_without_data() {
        let mut app = App::new(
            Box::new(crate::source::FileSource::new("/nonexistent/fleet.json")),
            ThresholdConfig::DEFAULT,
        );
        assert!(!app.reload_data());
        assert!(app.load_error.as_deref().unwrap().contains("Read error"));
        assert!(app.report.is_none());
    }

    #[test]
    fn test_view_cycle() {
        let mut view = View::Fleet;
        for _ in 0..View::ALL.len() {
            view = view.next();
        }
        assert_eq!(view, View::Fleet);
        assert_eq!(View::Fleet.prev(), View::Locations);
    }

    #[test]
    fn test_export_report() {
        let (_tx, app) = app_with_fleet();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        app.export_report(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["metrics"]["total"], 3);
        assert_eq!(json["locationStats"][0]["name"], "Berlin Hub");
    }

    #[test]
    fn test_export_without_data_fails() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), ThresholdConfig::DEFAULT);
        assert!(app.export_report(Path::new("unused.json")).is_err());
    }
}
