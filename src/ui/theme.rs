//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::config::ThemeChoice;
use crate::data::Tone;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for online robots and values inside their healthy range.
    pub success: Color,
    /// Color for acceptable but not ideal values.
    pub primary: Color,
    /// Color for warning-level readings.
    pub warning: Color,
    /// Color for critical readings and error status.
    pub critical: Color,
    /// Color for offline robots and unknown statuses.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            success: Color::Green,
            primary: Color::LightBlue,
            warning: Color::Yellow,
            critical: Color::Red,
            muted: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            success: Color::Green,
            primary: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Resolve the configured theme, probing the terminal for `Auto`.
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Get the color for a tone.
    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Success => self.success,
            Tone::Primary => self.primary,
            Tone::Warning => self.warning,
            Tone::Destructive => self.critical,
            Tone::Muted => self.muted,
        }
    }

    /// Get a foreground style for a tone. Destructive values are bold.
    pub fn tone_style(&self, tone: Tone) -> Style {
        let style = Style::default().fg(self.tone_color(tone));
        if tone == Tone::Destructive {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

/// Parse a `#rrggbb` colour token; anything else falls back to gray.
pub fn hex_color(hex: &str) -> Color {
    let parsed = hex
        .strip_prefix('#')
        .filter(|digits| digits.len() == 6)
        .and_then(|digits| u32::from_str_radix(digits, 16).ok());

    match parsed {
        Some(rgb) => Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8),
        None => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#10b981"), Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(hex_color("10b981"), Color::Gray);
        assert_eq!(hex_color("#xyzxyz"), Color::Gray);
    }

    #[test]
    fn test_destructive_tone_is_bold() {
        let theme = Theme::dark();
        assert!(theme
            .tone_style(Tone::Destructive)
            .add_modifier
            .contains(Modifier::BOLD));
        assert_eq!(theme.tone_color(Tone::Success), Color::Green);
    }
}
