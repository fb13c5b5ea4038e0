use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Row, Table, Widget, Wrap},
};

use crate::api::Resource;
use crate::poll::Snapshot;
use crate::ui::snapshot_table::{entry_count, table_from_snapshot};
use crate::ui::style::freshness_color;
use crate::view::ResourceView;

pub fn render_detail(resource: Resource, view: Option<&ResourceView>, area: Rect, buf: &mut Buffer) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let Some(view) = view else {
        Paragraph::new(format!("{} view is not active", resource.label()))
            .fg(Color::Red)
            .alignment(Alignment::Center)
            .render(layout[0], buf);
        return;
    };

    let snapshot = view.snapshot();
    render_snapshot(&snapshot, layout[0], buf);
    render_status(view, &snapshot, layout[1], buf);

    let help = Paragraph::new("'r': Refresh • Esc: Back")
        .block(
            Block::bordered()
                .title("Controls")
                .border_type(BorderType::Rounded),
        )
        .fg(Color::Yellow)
        .alignment(Alignment::Center);
    help.render(layout[2], buf);
}

fn render_snapshot(snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered()
        .title(format!(
            "{} ({})",
            snapshot.resource.label(),
            snapshot.resource.path()
        ))
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(freshness_color(snapshot)));

    match table_from_snapshot(&snapshot.data) {
        Some(table) => {
            let widths = vec![Constraint::Fill(1); table.headers.len().max(1)];
            let header = Row::new(table.headers.clone())
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rows: Vec<Row> = table.rows.into_iter().map(Row::new).collect();

            let widget = Table::new(rows, widths).header(header).block(block);
            Widget::render(widget, area, buf);
        }
        None => {
            let text = if snapshot.has_data() {
                serde_json::to_string_pretty(&snapshot.data).unwrap_or_default()
            } else {
                "Waiting for data...".to_string()
            };
            Paragraph::new(text)
                .block(block)
                .wrap(Wrap { trim: false })
                .render(area, buf);
        }
    }
}

fn render_status(view: &ResourceView, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let refresh = match view.settings().poll_interval {
        Some(interval) if view.is_polling() => format!("polling every {}ms", interval.as_millis()),
        Some(_) => "stopped".to_string(),
        None => "on demand".to_string(),
    };

    let updated = snapshot
        .updated_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut spans = vec![
        Span::raw(format!("{} • ", refresh)),
        Span::raw(format!("updated {} • ", updated)),
        Span::raw(format!("{} updates • {} entries", snapshot.updates, entry_count(&snapshot.data))),
    ];

    if let Some(err) = &snapshot.last_error {
        spans.push(Span::styled(
            format!(" • STALE: {}", err.reason()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    Paragraph::new(Line::from(spans))
        .block(
            Block::bordered()
                .title("Status")
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(freshness_color(snapshot))),
        )
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::ScriptedFetcher;
    use crate::view::ViewSettings;
    use serde_json::json;
    use std::time::Duration;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_renders_tag_rows() {
        let fetcher = ScriptedFetcher::always(json!([{"name": "T1", "value": 1}]));
        let view = ResourceView::activate(fetcher, Resource::Tags, ViewSettings::default());
        tokio::time::sleep(Duration::from_millis(10)).await;

        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        render_detail(Resource::Tags, Some(&view), area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("name"));
        assert!(text.contains("T1"));
        assert!(!text.contains("STALE"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_renders_stale_indicator() {
        let fetcher = ScriptedFetcher::new();
        fetcher.set_fallback(Err(crate::error::FetchError::failed("/api/alarms", "HTTP 502")));
        let view = ResourceView::activate(fetcher, Resource::Alarms, ViewSettings::default());
        tokio::time::sleep(Duration::from_millis(10)).await;

        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        render_detail(Resource::Alarms, Some(&view), area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Waiting for data"));
        assert!(text.contains("STALE: HTTP 502"));
    }
}
