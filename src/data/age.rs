//! Human-readable ages and intervals.

use std::time::Duration;

use chrono::TimeDelta;

/// How long ago something was seen, e.g. `Just now`, `42s ago`, `3h ago`.
///
/// Negative ages (clock skew between robot and monitor) read as `Just now`.
pub fn format_since(age: TimeDelta) -> String {
    let seconds = age.num_seconds();
    if seconds < 10 {
        return "Just now".to_string();
    }
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// Format a polling interval or snapshot age for the status bar.
pub fn format_interval(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        let secs = d.as_secs();
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}
