//! Dashboard screen UI
//!
//! Renders the loaded forecast: the current conditions panel, the detail
//! tiles, the seven-day outlook and the hourly window with its day selector.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc, Weekday};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::format::{
    format_hour, format_humidity, format_long_date, format_precipitation, format_temperature,
    format_weekday, format_wind, temperature_color, weather_icon,
};
use super::widgets::TemperatureSparkline;
use crate::data::HourlyForecast;
use crate::forecast::{daily_outlook, week_from, window_hours, DaySummary};
use crate::service::Dashboard;
use crate::units::Units;

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Cyan;
    pub const PRIMARY: Color = Color::White;
    pub const SECONDARY: Color = Color::Gray;
    pub const UNKNOWN: Color = Color::DarkGray;
    pub const SELECTED: Color = Color::Yellow;
}

/// Width of one hourly column: "12 PM" plus spacing
const HOUR_COLUMN_WIDTH: u16 = 7;

/// Renders the dashboard for a loaded forecast
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `area` - Area below the search bar
/// * `dashboard` - The last successful load
/// * `selected_day` - Day picked in the hourly selector; `None` means today
/// * `now` - Current instant, converted to the location's local time
pub fn render(
    frame: &mut Frame,
    area: Rect,
    dashboard: &Dashboard,
    selected_day: Option<Weekday>,
    now: DateTime<Utc>,
) {
    let snapshot = &dashboard.snapshot;
    let local_now = snapshot.local_time(now);
    let day = selected_day.unwrap_or(local_now.weekday());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Current conditions
            Constraint::Length(4), // Detail tiles
            Constraint::Min(0),    // Outlook + hourly
        ])
        .split(area);

    render_current(frame, chunks[0], dashboard, local_now);
    render_tiles(frame, chunks[1], dashboard);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    let outlook = daily_outlook(&snapshot.daily);
    render_outlook(frame, bottom[0], &outlook, &snapshot.units);

    let window = window_hours(&snapshot.hourly, day, local_now);
    render_hourly(frame, bottom[1], &window, day, local_now, &snapshot.units);
}

fn section_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_current(frame: &mut Frame, area: Rect, dashboard: &Dashboard, local_now: NaiveDateTime) {
    let current = &dashboard.snapshot.current;
    let units = &dashboard.snapshot.units;
    let icon = weather_icon(current.weather_code);

    let lines = vec![
        Line::from(Span::styled(
            dashboard.place.to_string(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format_long_date(local_now.date()),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled(format!("{}  ", icon.glyph()), Style::default().fg(icon.color())),
            Span::styled(
                format_temperature(current.temperature, units),
                Style::default()
                    .fg(temperature_color(current.temperature, units))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", icon.label()), Style::default().fg(colors::SECONDARY)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(section_block("Now"));
    frame.render_widget(paragraph, area);
}

fn render_tiles(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let current = &dashboard.snapshot.current;
    let units = &dashboard.snapshot.units;

    let tiles = [
        ("Feels Like", format_temperature(current.feels_like, units)),
        ("Humidity", format_humidity(current.humidity)),
        ("Wind", format_wind(current.wind_speed, units)),
        ("Precipitation", format_precipitation(current.precipitation, units)),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value), column) in tiles.into_iter().zip(columns.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::UNKNOWN))
            .title(Span::styled(title, Style::default().fg(colors::SECONDARY)));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )))
        .block(block);
        frame.render_widget(paragraph, *column);
    }
}

/// Builds one row of the seven-day outlook
fn build_outlook_line(day: &DaySummary, units: &Units) -> Line<'static> {
    let icon = weather_icon(day.weather_code);
    Line::from(vec![
        Span::styled(
            format!("{:<5}", format_weekday(day.weekday())),
            Style::default().fg(colors::PRIMARY),
        ),
        Span::styled(format!("{:<3}", icon.glyph()), Style::default().fg(icon.color())),
        Span::styled(
            format!("{:>5}", format_temperature(day.temperature_max, units)),
            Style::default().fg(temperature_color(day.temperature_max, units)),
        ),
        Span::styled(
            format!("{:>5}", format_temperature(day.temperature_min, units)),
            Style::default().fg(colors::SECONDARY),
        ),
    ])
}

fn render_outlook(frame: &mut Frame, area: Rect, outlook: &[DaySummary], units: &Units) {
    let lines: Vec<Line> = if outlook.is_empty() {
        vec![Line::from(Span::styled(
            "No daily forecast available",
            Style::default().fg(colors::UNKNOWN),
        ))]
    } else {
        outlook.iter().map(|day| build_outlook_line(day, units)).collect()
    };

    let paragraph = Paragraph::new(lines).block(section_block("7-Day Forecast"));
    frame.render_widget(paragraph, area);
}

/// Builds the weekday selector, highlighting the selected day
fn build_day_selector(today: Weekday, selected: Weekday) -> Line<'static> {
    let mut spans = vec![Span::styled("< ", Style::default().fg(colors::UNKNOWN))];
    for day in week_from(today) {
        let style = if day == selected {
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(colors::SECONDARY)
        };
        spans.push(Span::styled(format_weekday(day), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(">", Style::default().fg(colors::UNKNOWN)));
    Line::from(spans)
}

fn padded(text: String) -> String {
    format!("{:<width$}", text, width = HOUR_COLUMN_WIDTH as usize)
}

fn render_hourly(
    frame: &mut Frame,
    area: Rect,
    window: &[HourlyForecast],
    day: Weekday,
    local_now: NaiveDateTime,
    units: &Units,
) {
    let block = section_block("Hourly Forecast");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Day selector
            Constraint::Length(1), // Hours
            Constraint::Length(1), // Icons
            Constraint::Length(1), // Temperatures
            Constraint::Length(1), // Sparkline
            Constraint::Min(0),
        ])
        .split(inner);

    let selector = build_day_selector(local_now.weekday(), day);
    frame.render_widget(Paragraph::new(selector), rows[0]);

    if window.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No hourly forecast for this day",
                Style::default().fg(colors::UNKNOWN),
            )),
            rows[1],
        );
        return;
    }

    let hours: Vec<Span> = window
        .iter()
        .map(|h| Span::styled(padded(format_hour(h.time)), Style::default().fg(colors::PRIMARY)))
        .collect();
    let icons: Vec<Span> = window
        .iter()
        .map(|h| {
            let icon = weather_icon(h.weather_code);
            Span::styled(padded(icon.glyph().to_string()), Style::default().fg(icon.color()))
        })
        .collect();
    let temps: Vec<Span> = window
        .iter()
        .map(|h| {
            Span::styled(
                padded(format_temperature(h.temperature, units)),
                Style::default().fg(temperature_color(h.temperature, units)),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(hours)), rows[1]);
    frame.render_widget(Paragraph::new(Line::from(icons)), rows[2]);
    frame.render_widget(Paragraph::new(Line::from(temps)), rows[3]);

    let temperatures: Vec<f64> = window.iter().map(|h| h.temperature).collect();
    let mut sparkline = TemperatureSparkline::new(&temperatures)
        .cell_width(HOUR_COLUMN_WIDTH - 2)
        .spacing(2);
    if let Some(index) = window
        .iter()
        .position(|h| h.time.date() == local_now.date() && h.time.hour() == local_now.hour())
    {
        sparkline = sparkline.marker(index);
    }
    frame.render_widget(sparkline, rows[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CurrentConditions, DailyForecast, ForecastSnapshot, PlaceName};
    use crate::units::UnitSystem;
    use chrono::{Duration, NaiveDate, TimeZone};
    use ratatui::{backend::TestBackend, style::Color, Terminal};

    fn test_dashboard(units: Units) -> Dashboard {
        let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let midnight = start.and_hms_opt(0, 0, 0).unwrap();
        Dashboard {
            place: PlaceName {
                name: "Paris".to_string(),
                country: "France".to_string(),
            },
            snapshot: ForecastSnapshot {
                current: CurrentConditions {
                    time: start.and_hms_opt(14, 0, 0).unwrap(),
                    temperature: 16.4,
                    feels_like: 15.1,
                    humidity: 72,
                    precipitation: 0.2,
                    wind_speed: 11.9,
                    weather_code: 61,
                },
                hourly: (0..48)
                    .map(|h| HourlyForecast {
                        time: midnight + Duration::hours(h),
                        temperature: 10.0 + (h % 24) as f64 / 2.0,
                        weather_code: 2,
                    })
                    .collect(),
                daily: (0..7)
                    .map(|d| DailyForecast {
                        date: start + Duration::days(d),
                        weather_code: 3,
                        temperature_max: 18.0,
                        temperature_min: 9.0,
                    })
                    .collect(),
                units,
                utc_offset_seconds: 0,
                fetched_at: Utc::now(),
            },
        }
    }

    fn render_to_string(dashboard: &Dashboard, selected_day: Option<Weekday>) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 20, 0).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, dashboard, selected_day, now);
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
    fn test_renders_place_and_date() {
        let content = render_to_string(&test_dashboard(Units::default()), None);
        assert!(content.contains("Paris, France"));
        assert!(content.contains("Sunday, October 18, 2026"));
    }

    #[test]
    fn test_renders_current_conditions_and_tiles() {
        let content = render_to_string(&test_dashboard(Units::default()), None);
        assert!(content.contains("16\u{00B0}"));
        assert!(content.contains("Rain"));
        assert!(content.contains("Feels Like"));
        assert!(content.contains("72%"));
        assert!(content.contains("12 km/h"));
        assert!(content.contains("0 mm"));
    }

    #[test]
    fn test_tiles_use_snapshot_units() {
        let content = render_to_string(&test_dashboard(UnitSystem::Imperial.units()), None);
        assert!(content.contains("12 mph"));
        assert!(content.contains("0 in"));
    }

    #[test]
    fn test_hourly_window_starts_at_current_hour() {
        let content = render_to_string(&test_dashboard(Units::default()), None);
        assert!(content.contains("2 PM"));
        assert!(content.contains("9 PM"));
        assert!(!content.contains("10 PM"));
        assert!(!content.contains("1 PM"));
    }

    #[test]
    fn test_selected_day_starts_at_midnight() {
        let content = render_to_string(&test_dashboard(Units::default()), Some(Weekday::Mon));
        assert!(content.contains("12 AM"));
        assert!(content.contains("7 AM"));
        assert!(!content.contains("8 AM"));
    }

    #[test]
    fn test_day_without_data_shows_placeholder() {
        let content = render_to_string(&test_dashboard(Units::default()), Some(Weekday::Wed));
        assert!(content.contains("No hourly forecast for this day"));
    }

    #[test]
    fn test_outlook_lists_seven_days() {
        let content = render_to_string(&test_dashboard(Units::default()), None);
        assert!(content.contains("7-Day Forecast"));
        for day in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
            assert!(content.contains(day), "missing {day}");
        }
        assert!(content.contains("18\u{00B0}"));
    }

    #[test]
    fn test_day_selector_starts_today() {
        let line = build_day_selector(Weekday::Sun, Weekday::Tue);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("< Sun Mon Tue"));
        let selected = line.spans.iter().find(|s| s.content == "Tue").unwrap();
        assert_eq!(selected.style.fg, Some(Color::Yellow));
    }
}
