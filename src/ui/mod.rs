pub mod detail;
pub mod overview;
pub mod snapshot_table;
pub mod style;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::app::{App, AppMode};
use crate::ui::detail::render_detail;
use crate::ui::overview::render_overview;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.mode {
            AppMode::Overview => render_overview(self, area, buf),
            AppMode::Detail(resource) => {
                render_detail(resource, self.active_view.as_ref(), area, buf)
            }
        }
    }
}
