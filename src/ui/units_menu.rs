//! Units dropdown overlay
//!
//! Lists the metric/imperial switch followed by one row per unit, grouped by
//! category, with a check mark on the units currently selected.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{units_menu_entries, App, MenuEntry};
use crate::units::UnitCategory;

const MENU_WIDTH: u16 = 28;

fn category_heading(category: UnitCategory) -> &'static str {
    match category {
        UnitCategory::Temperature => "Temperature",
        UnitCategory::WindSpeed => "Wind Speed",
        UnitCategory::Precipitation => "Precipitation",
    }
}

/// Builds the menu lines, inserting a heading before each category
fn build_menu_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut last_category = None;

    for (index, entry) in units_menu_entries().into_iter().enumerate() {
        let highlighted = index == app.units_menu_index;
        let row_style = if highlighted {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        match entry {
            MenuEntry::SwitchSystem => {
                lines.push(Line::from(Span::styled(
                    format!(" {:<width$}", app.unit_system.switch_label(), width = MENU_WIDTH as usize - 3),
                    row_style.add_modifier(Modifier::BOLD),
                )));
            }
            MenuEntry::Unit { category, label } => {
                if last_category != Some(category) {
                    lines.push(Line::from(Span::styled(
                        category_heading(category),
                        Style::default().fg(Color::DarkGray),
                    )));
                    last_category = Some(category);
                }
                let check = if app.is_menu_entry_checked(entry) { "\u{2713}" } else { " " };
                lines.push(Line::from(Span::styled(
                    format!(" {:<width$}{}", label, check, width = MENU_WIDTH as usize - 4),
                    row_style,
                )));
            }
        }
    }

    lines
}

/// Renders the units menu anchored to the top right corner
pub fn render(frame: &mut Frame, app: &App) {
    let lines = build_menu_lines(app);
    let full = frame.area();
    let area = Rect {
        x: full.right().saturating_sub(MENU_WIDTH + 1),
        y: full.y + 2,
        width: MENU_WIDTH.min(full.width),
        height: (lines.len() as u16 + 2).min(full.height.saturating_sub(2)),
    };

    let block = Block::default()
        .title(" Units ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
