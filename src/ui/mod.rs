//! UI rendering module for weatherdash
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod format;
pub mod help_overlay;
pub mod search;
pub mod status;
pub mod units_menu;
pub mod widgets;

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppState, InputMode};

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    match app.state {
        // The error panel replaces everything but the key hints
        AppState::ServerError => {
            let body = chunks[0].union(chunks[1]);
            status::render_server_error(frame, body);
        }
        AppState::Loading => {
            search::render_bar(frame, chunks[0], app);
            status::render_loading(frame, chunks[1]);
        }
        AppState::Welcome => {
            search::render_bar(frame, chunks[0], app);
            status::render_welcome(frame, chunks[1]);
        }
        AppState::NotFound => {
            search::render_bar(frame, chunks[0], app);
            status::render_not_found(frame, chunks[1]);
        }
        AppState::Dashboard => {
            search::render_bar(frame, chunks[0], app);
            match &app.dashboard {
                Some(loaded) => {
                    dashboard::render(frame, chunks[1], loaded, app.selected_day, Utc::now())
                }
                None => status::render_loading(frame, chunks[1]),
            }
        }
    }

    render_key_hints(frame, chunks[2], app);

    if app.state != AppState::ServerError {
        match app.mode {
            InputMode::Search => search::render_suggestions(frame, chunks[0], app),
            InputMode::UnitsMenu => units_menu::render(frame, app),
            InputMode::Normal => {}
        }
    }

    if app.show_help {
        help_overlay::render(frame);
    }
}

fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Cyan)),
        Span::styled(label, Style::default().fg(Color::Gray)),
    ]
}

/// Renders the one-line key legend for the current mode
fn render_key_hints(frame: &mut Frame, area: Rect, app: &App) {
    let hints: Vec<[Span<'static>; 2]> = match (app.state, app.mode) {
        (AppState::ServerError, _) => vec![hint("r", " Retry  "), hint("q", " Quit")],
        (_, InputMode::Search) => vec![
            hint("Enter", " Search  "),
            hint("\u{2191}/\u{2193}", " Suggestions  "),
            hint("Esc", " Cancel"),
        ],
        (_, InputMode::UnitsMenu) => vec![
            hint("\u{2191}/\u{2193}", " Move  "),
            hint("Enter", " Select  "),
            hint("Esc", " Close"),
        ],
        (AppState::Dashboard, InputMode::Normal) => vec![
            hint("/", " Search  "),
            hint("\u{2190}/\u{2192}", " Day  "),
            hint("u", " Units  "),
            hint("i", " Metric/Imperial  "),
            hint("?", " Help  "),
            hint("q", " Quit"),
        ],
        (_, InputMode::Normal) => vec![
            hint("/", " Search  "),
            hint("u", " Units  "),
            hint("?", " Help  "),
            hint("q", " Quit"),
        ],
    };

    let line = Line::from(hints.into_iter().flatten().collect::<Vec<_>>());
    frame.render_widget(Paragraph::new(line), area);
}
