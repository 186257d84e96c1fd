//! Detail overlay rendering.
//!
//! Displays a modal overlay with one robot's vitals, connectivity, heartbeat
//! and joint groups.

use chrono::{TimeDelta, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use sparkx_types::RobotSnapshot;

use super::{centered, sparkline};
use crate::app::App;
use crate::data::age::format_since;
use crate::data::classify::quality_tone;
use crate::data::{
    battery_tone, classify_connectivity, classify_signal, status_tone, temperature_tone,
    HeartbeatStatus, JointGroup,
};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the robot detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(robot) = app.selected_robot() else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 110);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);
    let overlay_area = centered(area, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(8), // Vitals
        Constraint::Min(6),    // Joints
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    render_vitals(frame, app, robot, chunks[0]);
    render_joints(frame, app, &app.selected_joint_groups(), chunks[1]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑↓:previous/next robot  Esc:close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}

fn render_vitals(frame: &mut Frame, app: &App, robot: &RobotSnapshot, area: Rect) {
    let t = &app.thresholds;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let since_seen = robot
        .last_updated
        .map(|at| Utc::now() - at)
        .unwrap_or(TimeDelta::MAX);
    let heartbeat = HeartbeatStatus::classify(&robot.status, since_seen);
    let seen = robot
        .last_updated
        .map(|_| format_since(since_seen))
        .unwrap_or_else(|| "never".to_string());

    let link = classify_connectivity(robot.signal, &t.signal);
    let rate = app
        .history
        .battery_rate(&robot.id)
        .map(|r| format!("{:+.1}%/min", r))
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", robot.name), bold),
            Span::raw(format!("({})  ", robot.id)),
            Span::styled(robot.status.label(), app.theme.tone_style(status_tone(&robot.status))),
        ]),
        Line::from(format!(
            " {}  {}  {}  {}",
            robot.location, robot.state, robot.country, robot.region
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Battery "),
            Span::styled(
                format!("{:.0}%", robot.battery),
                app.theme.tone_style(battery_tone(robot.battery, &t.battery)),
            ),
            Span::raw(format!(" {} {}", sparkline(&app.history.battery_sparkline(&robot.id), 8), rate)),
            Span::raw("   Temp "),
            Span::styled(
                format!("{:.1}°C", robot.temperature),
                app.theme.tone_style(temperature_tone(robot.temperature, &t.temperature)),
            ),
            Span::raw(format!("   CPU {:.0}%", robot.cpu_load)),
        ]),
        Line::from(vec![
            Span::raw(" Signal "),
            Span::styled(
                format!("{:.0}% {}", robot.signal, link.as_str()),
                app.theme.tone_style(classify_signal(robot.signal, &t.signal)),
            ),
            Span::raw("   WiFi "),
            Span::styled(
                robot.connectivity.wifi.as_str(),
                app.theme.tone_style(quality_tone(robot.connectivity.wifi)),
            ),
            Span::raw("   Cellular "),
            Span::styled(
                robot.connectivity.cellular.as_str(),
                app.theme.tone_style(quality_tone(robot.connectivity.cellular)),
            ),
        ]),
        Line::from(vec![
            Span::raw(" Heartbeat "),
            Span::styled(heartbeat.label(), app.theme.tone_style(heartbeat.tone())),
            Span::raw(format!(
                "   Last seen {}   GPS {:.4}, {:.4}",
                seen, robot.gps.lat, robot.gps.lng
            )),
        ]),
    ];

    let block = Block::default()
        .title(" Robot Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_joints(frame: &mut Frame, app: &App, groups: &[JointGroup], area: Rect) {
    let joint_count: usize = groups.iter().map(|g| g.joints.len()).sum();
    let block = Block::default()
        .title(format!(" Joints ({}) ", joint_count))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if groups.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No joint data yet",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Joint"),
        Cell::from("Angle"),
        Cell::from("Target"),
        Cell::from("Torque"),
        Cell::from("Temp"),
        Cell::from("Status"),
    ])
    .style(app.theme.header);

    let mut rows = Vec::with_capacity(joint_count + groups.len());
    for group in groups {
        let worst = group.worst_status();
        rows.push(Row::new(vec![
            Cell::from(group.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(worst.as_str()).style(app.theme.tone_style(worst.tone())),
        ]));
        for joint in &group.joints {
            rows.push(Row::new(vec![
                Cell::from(format!("  {}", joint.name)),
                Cell::from(format!("{:.1}°", joint.angle)),
                Cell::from(format!("{:.1}°", joint.target_angle)),
                Cell::from(format!("{:.1} Nm", joint.torque)),
                Cell::from(format!("{:.1}°C", joint.temperature)),
                Cell::from(joint.status.as_str()).style(app.theme.tone_style(joint.status.tone())),
            ]));
        }
    }

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
