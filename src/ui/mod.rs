//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`fleet`]: Sortable, searchable robot table
//! - [`analytics`]: Status, battery, temperature and regional distributions plus hourly trends
//! - [`locations`]: Robot counts per location and country, and the filter options
//! - [`detail`]: Modal overlay with one robot's connectivity, heartbeat and joints
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (fleet/analytics/locations::render)  │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod analytics;
pub mod common;
pub mod detail;
pub mod fleet;
pub mod locations;
pub mod theme;

pub use fleet::SortColumn;
pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::app::{App, View};

/// Sparkline characters (8 levels of height).
pub const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the last `width` normalized values as a sparkline.
pub fn sparkline(values: &[u8], width: usize) -> String {
    let start = values.len().saturating_sub(width);
    let line: String = values[start..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect();
    format!("{:<width$}", line, width = width)
}

/// Draw the whole dashboard for one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Fleet => fleet::render(frame, app, chunks[2]),
        View::Analytics => analytics::render(frame, app, chunks[2]),
        View::Locations => locations::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_detail_overlay {
        detail::render_overlay(frame, app, area);
    }
    if app.show_help {
        common::render_help(frame, app, area);
    }
}

/// Rectangle of at most `width` x `height` centred in `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ThresholdConfig;
    use crate::source::{ChannelSource, FleetSnapshot};
    use ratatui::{backend::TestBackend, Terminal};
    use sparkx_types::{JointReading, RobotSnapshot, RobotStatus};

    #[test]
    fn test_sparkline_pads_and_truncates() {
        assert_eq!(sparkline(&[], 4), "    ");
        assert_eq!(sparkline(&[0, 7, 9], 2), "██");
        assert_eq!(sparkline(&[0, 3], 3), "▁▄ ");
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_draw_every_view() {
        let (tx, source) = ChannelSource::create("test");
        let robots = vec![
            RobotSnapshot::builder("RBT-001")
                .name("Atlas")
                .status(RobotStatus::Online)
                .battery(82.0)
                .place("Berlin Hub", "", "Germany", "Europe")
                .build(),
            RobotSnapshot::builder("RBT-002")
                .name("Bishop")
                .status(RobotStatus::Error)
                .battery(9.0)
                .temperature(78.0)
                .place("Seoul Lab", "", "South Korea", "Asia Pacific")
                .build(),
        ];
        let snapshot = FleetSnapshot::new(1, robots)
            .with_joints("RBT-001", vec![JointReading::new("Neck").with_temperature(40.0)]);
        tx.send(snapshot).unwrap();

        let mut app = App::new(Box::new(source), ThresholdConfig::DEFAULT);
        app.reload_data();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("SPARKX"));
        assert!(text.contains("Atlas"));

        app.set_view(View::Analytics);
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Battery Levels"));

        app.set_view(View::Locations);
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Berlin Hub"));

        app.set_view(View::Fleet);
        app.enter_detail();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Neck Joint (3 DOF)"));

        app.close_overlay();
        app.toggle_help();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_draw_before_first_snapshot() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), ThresholdConfig::DEFAULT);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Loading"));
    }
}
