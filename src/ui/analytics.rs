//! Analytics view rendering.
//!
//! Distribution panels for status, battery, temperature and region, fleet
//! averages, and the hourly battery and temperature trends.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};
use sparkx_types::TelemetrySample;

use super::sparkline;
use super::theme::hex_color;
use crate::app::App;
use crate::data::{DistributionEntry, FleetReport, HealthGrade};

/// Render the Analytics view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(report) = &app.report else {
        return;
    };

    let rows = Layout::vertical([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .split(area);

    let top = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(rows[0]);

    render_distribution(frame, app, top[0], "Status", &report.status_distribution);
    render_distribution(frame, app, top[1], "Battery Levels", &report.battery_distribution);
    render_distribution(frame, app, top[2], "Temperature", &report.temperature_distribution);

    let bottom = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(rows[1]);

    render_distribution(frame, app, bottom[0], "Regions", &report.regional_distribution);
    render_averages(frame, app, report, bottom[1]);
    render_trends(frame, app, report, bottom[2]);
}

fn panel(app: &App, title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// One horizontal bar per entry, scaled to the largest value.
fn render_distribution(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    entries: &[DistributionEntry],
) {
    let block = panel(app, title);
    let inner_width = block.inner(area).width as usize;

    let label_width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    let bar_space = inner_width.saturating_sub(label_width + 6).max(1);
    let max = entries.iter().map(|e| e.value).max().unwrap_or(0).max(1);

    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from(Span::styled(
            " No robots",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        entries
            .iter()
            .map(|entry| {
                let bar_len = entry.value * bar_space / max;
                Line::from(vec![
                    Span::raw(format!("{:<width$} ", entry.name, width = label_width)),
                    Span::styled("█".repeat(bar_len), Style::default().fg(hex_color(entry.fill))),
                    Span::raw(format!(" {}", entry.value)),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_averages(frame: &mut Frame, app: &App, report: &FleetReport, area: Rect) {
    let m = &report.metrics;
    let grade = HealthGrade::from_score(m.fleet_health as f64);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::raw(" Fleet health  "),
            Span::styled(format!("{}%", m.fleet_health), bold),
            Span::raw("  "),
            Span::styled(grade.label(), app.theme.tone_style(grade.tone())),
        ]),
        Line::from(vec![
            Span::raw(" History       "),
            Span::raw(sparkline(&app.history.fleet_health_sparkline(), 16)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Avg battery   "),
            Span::styled(format!("{}%", m.averages.battery), bold),
        ]),
        Line::from(vec![
            Span::raw(" Avg temp      "),
            Span::styled(format!("{}°C", m.averages.temperature), bold),
        ]),
        Line::from(vec![
            Span::raw(" Avg signal    "),
            Span::styled(format!("{}%", m.averages.signal), bold),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Status        "),
            Span::raw(format!(
                "{} online  {} charging  {} offline  {} error  {} other",
                m.status_counts.online,
                m.status_counts.charging,
                m.status_counts.offline,
                m.status_counts.error,
                m.status_counts.unknown
            )),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(panel(app, "Fleet Averages")), area);
}

fn render_trends(frame: &mut Frame, app: &App, report: &FleetReport, area: Rect) {
    let samples = app.snapshot.as_ref().map_or(&[][..], |s| &s.telemetry[..]);
    let block = panel(app, &format!("Last 24h: {}", telemetry_scope(samples)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if report.battery_trends.iter().all(|p| p.max_battery == 0.0)
        && report.temperature_trends.iter().all(|p| p.max_temp == 0.0)
    {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No telemetry. Open a robot's detail to load its history",
            Style::default().add_modifier(Modifier::DIM),
        )));
        frame.render_widget(empty, inner);
        return;
    }

    let parts = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(inner);

    let battery: Vec<u64> = report
        .battery_trends
        .iter()
        .map(|p| p.avg_battery.max(0) as u64)
        .collect();
    let temperature: Vec<u64> = report
        .temperature_trends
        .iter()
        .map(|p| p.avg_temp.max(0.0).round() as u64)
        .collect();

    frame.render_widget(Paragraph::new(" Avg battery %"), parts[0]);
    frame.render_widget(
        Sparkline::default()
            .data(&battery)
            .max(100)
            .style(Style::default().fg(app.theme.success)),
        parts[1],
    );
    frame.render_widget(Paragraph::new(" Avg temperature °C"), parts[2]);
    frame.render_widget(
        Sparkline::default()
            .data(&temperature)
            .style(Style::default().fg(app.theme.warning)),
        parts[3],
    );
}

/// Whose telemetry the trends describe: the robot id when every sample
/// comes from one robot, otherwise the whole fleet.
fn telemetry_scope(samples: &[TelemetrySample]) -> &str {
    match samples.split_first() {
        Some((first, rest)) if rest.iter().all(|s| s.robot_id == first.robot_id) => {
            first.robot_id.as_str()
        }
        Some(_) => "fleet",
        None => "no robot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_telemetry_scope_names_single_robot() {
        let now = Utc::now();
        let one = vec![
            TelemetrySample::new("RBT-1", now, 80.0),
            TelemetrySample::new("RBT-1", now, 79.0),
        ];
        assert_eq!(telemetry_scope(&one), "RBT-1");

        let mixed = vec![
            TelemetrySample::new("RBT-1", now, 80.0),
            TelemetrySample::new("RBT-2", now, 60.0),
        ];
        assert_eq!(telemetry_scope(&mixed), "fleet");
        assert_eq!(telemetry_scope(&[]), "no robot");
    }
}
