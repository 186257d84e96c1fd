//! Locations view rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{FilterOptions, PlaceCount};

/// Render the Locations view: location ranking, country ranking, and the
/// values available for filtering.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(report) = &app.report else {
        return;
    };

    let columns = Layout::horizontal([
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(2),
    ])
    .split(area);

    let total = report.metrics.total;
    let mut state = TableState::default();
    if !report.location_stats.is_empty() {
        state.select(Some(app.selected_place_index));
    }
    frame.render_stateful_widget(
        ranking(app, " Locations ", &report.location_stats, total),
        columns[0],
        &mut state,
    );
    frame.render_widget(
        ranking(app, " Countries ", &report.country_stats, total),
        columns[1],
    );
    render_filter_options(frame, app, &report.filter_options, columns[2]);
}

fn ranking<'a>(app: &App, title: &'a str, stats: &'a [PlaceCount], total: usize) -> Table<'a> {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Robots"),
        Cell::from("Share"),
    ])
    .style(app.theme.header);

    let rows: Vec<Row> = stats
        .iter()
        .map(|place| {
            let name = if place.name.is_empty() {
                "(unassigned)"
            } else {
                place.name.as_str()
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(place.count.to_string()),
                Cell::from(format!("{:.0}%", share(place.count, total))),
            ])
        })
        .collect();

    Table::new(
        rows,
        [Constraint::Fill(1), Constraint::Length(7), Constraint::Length(6)],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .row_highlight_style(app.theme.selected)
    .highlight_symbol("▶ ")
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn render_filter_options(frame: &mut Frame, app: &App, options: &FilterOptions, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (label, values) in [
        ("Regions", &options.regions),
        ("Countries", &options.countries),
        ("States", &options.states),
        ("Locations", &options.locations),
    ] {
        lines.push(Line::from(Span::styled(
            format!(" {} ({})", label, values.len()),
            bold,
        )));
        if values.is_empty() {
            lines.push(Line::from(Span::styled(
                "   none",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        lines.extend(values.iter().map(|v| Line::from(format!("   {}", v))));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(" Filter Options ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_of_empty_fleet() {
        assert_eq!(share(3, 0), 0.0);
        assert_eq!(share(1, 4), 25.0);
    }
}
