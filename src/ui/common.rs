//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::centered;
use crate::app::{App, View};
use crate::data::age::format_since;
use crate::data::{HealthGrade, Tone};

/// Render the header bar with the fleet overview.
///
/// Displays: health indicator, fleet health, uptime against its target,
/// active/total robots and the critical alert count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" SPARKX ", Style::default().add_modifier(Modifier::BOLD));

    let Some(report) = &app.report else {
        let line = Line::from(vec![title, Span::raw("| Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let m = &report.metrics;
    let grade = HealthGrade::from_score(m.fleet_health as f64);
    let uptime_tone = if m.meets_uptime_target(&app.thresholds) {
        Tone::Success
    } else {
        Tone::Warning
    };
    let alert_style = if m.critical_alerts > 0 {
        app.theme.tone_style(Tone::Destructive)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.tone_style(grade.tone())),
        Span::styled("SPARKX ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ health "),
        Span::styled(format!("{}%", m.fleet_health), app.theme.tone_style(grade.tone())),
        Span::raw(" │ uptime "),
        Span::styled(format!("{:.1}%", m.uptime), app.theme.tone_style(uptime_tone)),
        Span::raw(format!(" / {:.1}% │ ", app.thresholds.uptime_target)),
        Span::styled(
            format!("{}/{}", m.active_robots, m.total),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" active │ "),
        Span::styled(m.critical_alerts.to_string(), alert_style),
        Span::raw(" critical"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, snapshot age and version, available controls, and the
/// last source error. Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Fleet if app.filter_active => "Type to search | Enter:apply Esc:cancel",
        View::Fleet => "/:search s:sort Enter:detail ?:help q:quit",
        View::Analytics => "Tab:switch r:reload e:export ?:help q:quit",
        View::Locations => "↑↓:select Tab:switch ?:help q:quit",
    };

    let (status, style) = match (&app.snapshot, &app.load_error) {
        (Some(snapshot), error) => {
            let age = format_since(Utc::now() - snapshot.fetched_at);
            let mut status = format!(
                " {} | v{} updated {} | {}",
                app.source_description(),
                snapshot.version,
                age,
                controls
            );
            match error {
                Some(err) => {
                    status.push_str(&format!(" | Error: {}", err));
                    (status, app.theme.tone_style(Tone::Warning))
                }
                None => (status, Style::default().add_modifier(Modifier::DIM)),
            }
        }
        (None, Some(err)) => (
            format!(" {} | Error: {} | q:quit r:retry", app.source_description(), err),
            app.theme.tone_style(Tone::Destructive),
        ),
        (None, None) => (
            format!(" {} | Loading... | q:quit", app.source_description()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ Tab     Switch views"),
        Line::from("  1/2/3       Fleet/Analytics/Locations"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Enter       Robot detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Fleet"),
        Line::from("  /           Search robots"),
        Line::from("  c           Clear search"),
        Line::from("  s           Cycle sort column"),
        Line::from("  S           Toggle sort direction"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Reload data"),
        Line::from("  e           Export report to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let help_area = centered(
        area,
        44u16.min(area.width.saturating_sub(4)),
        25u16.min(area.height.saturating_sub(2)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}
