//! Full-body status panels: loading, welcome, not found and server error

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Vertically centers a block of `height` lines inside `area`
fn centered_rows(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let target = centered_rows(area, lines.len() as u16);
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, target);
}

/// Renders a loading message while the first forecast is fetched
pub fn render_loading(frame: &mut Frame, area: Rect) {
    render_centered(
        frame,
        area,
        vec![Line::from(Span::styled(
            "Loading weather data...",
            Style::default().fg(Color::Cyan),
        ))],
    );
}

/// Shown when no position is available and nothing has been searched yet
pub fn render_welcome(frame: &mut Frame, area: Rect) {
    render_centered(
        frame,
        area,
        vec![
            Line::from(Span::styled(
                "How's the sky looking today?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("/", Style::default().fg(Color::Cyan)),
                Span::styled(" to search for a city", Style::default().fg(Color::Gray)),
            ]),
        ],
    );
}

/// Shown when the searched city has no geocoding match
pub fn render_not_found(frame: &mut Frame, area: Rect) {
    render_centered(
        frame,
        area,
        vec![
            Line::from(Span::styled(
                "No search result found!",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("/", Style::default().fg(Color::Cyan)),
                Span::styled(" to try another place", Style::default().fg(Color::Gray)),
            ]),
        ],
    );
}

/// Shown after an HTTP 500; replaces the whole body
pub fn render_server_error(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    render_centered(
        frame,
        inner,
        vec![
            Line::from(Span::styled(
                "\u{26A0} Something went wrong",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "We couldn't connect to the server (API error).",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Please try again in a few moments.",
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("[r] ", Style::default().fg(Color::Yellow)),
                Span::styled("Retry", Style::default().fg(Color::White)),
                Span::raw("   "),
                Span::styled("[q] ", Style::default().fg(Color::Yellow)),
                Span::styled("Quit", Style::default().fg(Color::White)),
            ]),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_with(draw: fn(&mut Frame, Rect)) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area);
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
    fn test_loading_panel() {
        assert!(render_with(render_loading).contains("Loading weather data"));
    }

    #[test]
    fn test_welcome_panel() {
        assert!(render_with(render_welcome).contains("to search for a city"));
    }

    #[test]
    fn test_not_found_panel() {
        assert!(render_with(render_not_found).contains("No search result found!"));
    }

    #[test]
    fn test_server_error_panel_offers_retry() {
        let content = render_with(render_server_error);
        assert!(content.contains("Something went wrong"));
        assert!(content.contains("Retry"));
    }

    #[test]
    fn test_centered_rows_in_tiny_area() {
        let area = Rect::new(0, 0, 10, 1);
        let target = centered_rows(area, 5);
        assert!(target.height <= area.height);
    }
}
