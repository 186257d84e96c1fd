use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// File written by the `e` key.
pub const EXPORT_FILE: &str = "fleet_report.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Step through robots while the overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    // If search input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access (detail is an overlay, opened with Enter)
        KeyCode::Char('1') => app.set_view(View::Fleet),
        KeyCode::Char('2') => app.set_view(View::Analytics),
        KeyCode::Char('3') => app.set_view(View::Locations),

        // Up/down for items, left/right for tabs
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter detail overlay
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Reload
        KeyCode::Char('r') => {
            if !app.reload_data() {
                app.set_status_message("No new data".to_string());
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Sorting (Fleet view)
        KeyCode::Char('s') if app.current_view == View::Fleet => app.cycle_sort(),
        KeyCode::Char('S') if app.current_view == View::Fleet => app.toggle_sort_direction(),

        // Search (start typing to filter robots)
        KeyCode::Char('/') if app.current_view == View::Fleet => app.start_filter(),

        // Clear search
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_report(&export_path) {
                Ok(()) => app.set_status_message(format!("Exported to {}", export_path.display())),
                Err(e) => app.set_status_message(format!("Export failed: {}", e)),
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm search
        KeyCode::Enter => app.filter_active = false,

        // Keep text but exit input mode
        KeyCode::Esc => app.cancel_filter(),

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        // Backspace
        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => app.filter_push(c),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows below the table header map onto visible robots
            if clicked_row > content_start_row && app.current_view == View::Fleet {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                app.select_robot(item_row);
            }

            // Tab bar sits on row 1, below the header
            if clicked_row == 1 {
                // Approximate tab positions: Fleet (0-9), Analytics (10-23), Locations (24-37)
                match mouse.column {
                    0..=9 => app.set_view(View::Fleet),
                    10..=23 => app.set_view(View::Analytics),
                    24..=37 => app.set_view(View::Locations),
                    _ => {}
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ThresholdConfig;
    use crate::source::{ChannelSource, FleetSnapshot};
    use sparkx_types::RobotSnapshot;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        let (tx, source) = ChannelSource::create("test");
        let robots = ["Atlas", "Bishop", "Cobalt"]
            .iter()
            .enumerate()
            .map(|(i, name)| RobotSnapshot::builder(format!("RBT-{i}")).name(*name).build())
            .collect();
        tx.send(FleetSnapshot::new(1, robots)).unwrap();
        let mut app = App::new(Box::new(source), ThresholdConfig::DEFAULT);
        app.reload_data();
        app
    }

    #[test]
    fn test_view_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Analytics);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_view, View::Locations);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_view, View::Analytics);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_view, View::Fleet);
    }

    #[test]
    fn test_search_captures_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.filter_active);

        // 'q' is search text here, not quit
        for c in "cob".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert!(!app.filter_active);
        assert_eq!(app.filter_text, "cob");
        assert_eq!(app.visible_robots().len(), 1);

        press(&mut app, KeyCode::Char('c'));
        assert!(app.filter_text.is_empty());
    }

    #[test]
    fn test_overlay_and_help_swallow_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail_overlay);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_robot_index, 1);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_detail_overlay);

        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_sort_keys() {
        let mut app = app();
        let before = app.sort_column;
        press(&mut app, KeyCode::Char('s'));
        assert_ne!(app.sort_column, before);
        press(&mut app, KeyCode::Char('S'));
        assert!(!app.sort_ascending);
    }
}
