//! Fleet view rendering.
//!
//! Displays a table of all robots with status, battery, temperature,
//! signal and a battery trend sparkline.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use sparkx_types::RobotSnapshot;

use super::sparkline;
use crate::app::App;
use crate::data::{battery_tone, classify_signal, status_tone, temperature_tone};

/// Column to sort by in the Fleet view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Status,
    Battery,
    Temperature,
    Signal,
    Location,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Name => SortColumn::Status,
            SortColumn::Status => SortColumn::Battery,
            SortColumn::Battery => SortColumn::Temperature,
            SortColumn::Temperature => SortColumn::Signal,
            SortColumn::Signal => SortColumn::Location,
            SortColumn::Location => SortColumn::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Status => "status",
            SortColumn::Battery => "battery",
            SortColumn::Temperature => "temp",
            SortColumn::Signal => "signal",
            SortColumn::Location => "location",
        }
    }
}

/// Sort robots by the given column and direction, falling back to name
/// then id so equal keys have a stable order.
pub fn sort_robots_by(robots: &mut [&RobotSnapshot], column: SortColumn, ascending: bool) {
    robots.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            SortColumn::Battery => a.battery.total_cmp(&b.battery),
            SortColumn::Temperature => a.temperature.total_cmp(&b.temperature),
            SortColumn::Signal => a.signal.total_cmp(&b.signal),
            SortColumn::Location => a.location.cmp(&b.location),
        };

        let primary = if ascending { primary } else { primary.reverse() };

        if primary == Ordering::Equal {
            a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id))
        } else {
            primary
        }
    });
}

/// Render the Fleet view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(snapshot) = &app.snapshot else {
        return;
    };
    let robots = app.visible_robots();
    let t = &app.thresholds;

    let header = Row::new(vec![
        Cell::from(format_header("Robot", SortColumn::Name, app)),
        Cell::from("ID"),
        Cell::from(format_header("Status", SortColumn::Status, app)),
        Cell::from(format_header("Battery", SortColumn::Battery, app)),
        Cell::from("Trend"),
        Cell::from(format_header("Temp", SortColumn::Temperature, app)),
        Cell::from(format_header("Signal", SortColumn::Signal, app)),
        Cell::from(format_header("Location", SortColumn::Location, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = robots
        .iter()
        .map(|r| {
            let trend = sparkline(&app.history.battery_sparkline(&r.id), 8);
            Row::new(vec![
                Cell::from(r.name.clone()),
                Cell::from(r.id.clone()),
                Cell::from(r.status.label()).style(app.theme.tone_style(status_tone(&r.status))),
                Cell::from(format!("{:.0}%", r.battery))
                    .style(app.theme.tone_style(battery_tone(r.battery, &t.battery))),
                Cell::from(trend),
                Cell::from(format!("{:.1}°C", r.temperature))
                    .style(app.theme.tone_style(temperature_tone(r.temperature, &t.temperature))),
                Cell::from(format!("{:.0}%", r.signal))
                    .style(app.theme.tone_style(classify_signal(r.signal, &t.signal))),
                Cell::from(place(r)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // Robot
        Constraint::Fill(1), // ID
        Constraint::Min(9),  // Status
        Constraint::Min(7),  // Battery
        Constraint::Min(8),  // Trend
        Constraint::Min(8),  // Temp
        Constraint::Min(7),  // Signal
        Constraint::Fill(3), // Location
    ];

    let selected = app.selected_robot_index.min(robots.len().saturating_sub(1));
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if robots.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, robots.len())
    };

    let title = format!(
        " Robots ({}/{}) [s:sort {}{}]{}{} ",
        robots.len(),
        snapshot.robots.len(),
        app.sort_column.label(),
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// "Location, Country", skipping empty parts.
fn place(robot: &RobotSnapshot) -> String {
    [robot.location.as_str(), robot.country.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}
