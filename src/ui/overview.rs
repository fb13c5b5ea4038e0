use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget},
};

use crate::api::FetchMode;
use crate::app::App;
use crate::ui::style::dim_unless_focused;

pub fn render_overview(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new(format!("Rackio Admin - {}", app.config.base_url))
        .block(
            Block::bordered()
                .title("Rackio")
                .title_alignment(Alignment::Center)
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Green)
        .alignment(Alignment::Center);
    title.render(layout[0], buf);

    let mode_label = match app.config.fetch_mode {
        FetchMode::OnDemand => "on-demand",
        FetchMode::EagerSingleton => "eager",
    };

    let items: Vec<ListItem> = app
        .resources
        .iter()
        .enumerate()
        .map(|(i, resource)| {
            let is_selected = i == app.selected;
            let refresh = match app.config.poll_interval(*resource) {
                Some(interval) => format!("every {}ms", interval.as_millis()),
                None => "on open / 'r'".to_string(),
            };

            let marker = if is_selected { "> " } else { "  " };
            let line = Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<10}", resource.label()),
                    dim_unless_focused(is_selected, Style::default().fg(Color::Yellow)),
                ),
                Span::styled(format!("{:<16}", resource.path()), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:<16}", refresh)),
                Span::styled(mode_label, Style::default().fg(Color::DarkGray)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::bordered()
            .title(format!("Resources ({})", app.resources.len()))
            .border_type(BorderType::Rounded),
    );
    Widget::render(list, layout[1], buf);

    let help = Paragraph::new("↑/↓: Navigate • Enter: Open • 'q': Quit")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(layout[2], buf);
}
