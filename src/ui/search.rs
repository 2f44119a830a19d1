//! Search bar and suggestion dropdown

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

/// Renders the search bar in the header area
pub fn render_bar(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.mode == InputMode::Search;

    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let mut title = vec![Span::styled(
        " weatherdash ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if app.is_loading() {
        title.push(Span::styled("Loading... ", Style::default().fg(Color::Yellow)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(title));

    let content = if focused {
        Line::from(vec![
            Span::styled("\u{1F50D} ", Style::default().fg(Color::Yellow)),
            Span::styled(app.search_input.clone(), Style::default().fg(Color::White)),
            Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(Span::styled(
            "Search for a place...  (press / to search)",
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders the suggestion dropdown directly below the search bar
pub fn render_suggestions(frame: &mut Frame, bar: Rect, app: &App) {
    if app.suggestions.is_empty() {
        return;
    }

    let height = (app.suggestions.len() as u16 + 2).min(frame.area().height.saturating_sub(bar.bottom()));
    let area = Rect {
        x: bar.x + 1,
        y: bar.bottom(),
        width: bar.width.saturating_sub(2).min(60),
        height,
    };

    let items: Vec<ListItem> = app
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, place)| {
            let selected = app.selected_suggestion == Some(i);
            let (cursor, style) = if selected {
                (
                    "\u{25B8} ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            ListItem::new(Line::from(vec![
                Span::styled(cursor, style),
                Span::styled(place.suggestion_label(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Place;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                let bar = Rect::new(0, 0, 80, 3);
                render_bar(frame, bar, app);
                render_suggestions(frame, bar, app);
            })
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_unfocused_bar_shows_hint() {
        let app = App::default();
        let content = render_to_string(&app);
        assert!(content.contains("Search for a place"));
    }

    #[test]
    fn test_focused_bar_shows_input() {
        let mut app = App::default();
        app.mode = InputMode::Search;
        app.search_input = "Berl".to_string();
        let content = render_to_string(&app);
        assert!(content.contains("Berl"));
        assert!(!content.contains("Search for a place"));
    }

    #[test]
    fn test_suggestions_render_labels_and_cursor() {
        let mut app = App::default();
        app.mode = InputMode::Search;
        app.suggestions = vec![
            Place {
                name: "Berlin".to_string(),
                latitude: 52.52,
                longitude: 13.41,
                admin1: Some("Land Berlin".to_string()),
                country: Some("Germany".to_string()),
            },
            Place {
                name: "Berlin".to_string(),
                latitude: 44.47,
                longitude: -71.19,
                admin1: Some("New Hampshire".to_string()),
                country: Some("United States".to_string()),
            },
        ];
        app.selected_suggestion = Some(1);

        let content = render_to_string(&app);
        assert!(content.contains("Berlin, Land Berlin, Germany"));
        assert!(content.contains("\u{25B8} Berlin, New Hampshire, United States"));
    }
}
