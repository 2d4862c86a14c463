use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::TuiApp;

pub fn render(frame: &mut Frame, app: &mut TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Items
            Constraint::Length(5), // Selected item
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_items_pane(frame, app, chunks[0]);
    render_detail_pane(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_items_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect) {
    let items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    item.pub_date.format("%m/%d %H:%M ").to_string(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{} ", item.feed_title),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(item.title.clone()),
            ]))
        })
        .collect();

    let title = format!(" Items ({}) ", app.items.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_detail_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let lines = match app.selected_item() {
        Some(item) => vec![
            Line::from(Span::styled(
                item.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{}  {}",
                    item.feed_title,
                    item.pub_date.format("%Y-%m-%d %H:%M")
                ),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(
                item.link.as_str(),
                Style::default().fg(Color::Blue),
            )),
        ],
        None => vec![Line::from("Nothing to read")],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let status = if app.is_refreshing {
        "Refreshing feeds...".to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        app.help.clone()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    use crate::domain::Item;

    fn screen(app: &mut TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_items_and_help() {
        let mut app = TuiApp::new("q:Quit".to_string());
        app.set_items(vec![Item {
            title: "Rust 2.0 announced".into(),
            link: "https://example.com/rust".into(),
            guid: "g".into(),
            feed_title: "Example".into(),
            pub_date: Utc.with_ymd_and_hms(2024, 4, 1, 9, 30, 0).unwrap(),
        }]);

        let text = screen(&mut app);
        assert!(text.contains("Items (1)"));
        assert!(text.contains("04/01 09:30 Example Rust 2.0 announced"));
        assert!(text.contains("https://example.com/rust"));
        assert!(text.contains("q:Quit"));
    }

    #[test]
    fn test_renders_empty_state_and_refreshing() {
        let mut app = TuiApp::new("q:Quit".to_string());
        app.is_refreshing = true;

        let text = screen(&mut app);
        assert!(text.contains("Nothing to read"));
        assert!(text.contains("Refreshing feeds..."));
    }
}
