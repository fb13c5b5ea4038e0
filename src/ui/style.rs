use ratatui::style::{Color, Style, Stylize};

use crate::poll::Snapshot;

pub fn dim_unless_focused(is_focused: bool, style: Style) -> Style {
    if is_focused { style.bold() } else { style.dim().italic() }
}

/// Red once the latest fetch failed, yellow until the first response, green otherwise.
pub fn freshness_color(snapshot: &Snapshot) -> Color {
    if snapshot.is_stale() {
        Color::Red
    } else if !snapshot.has_data() {
        Color::Yellow
    } else {
        Color::Green
    }
}
