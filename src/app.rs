//! Application state management for weatherdash
//!
//! This module contains the dashboard state and its transitions. Keyboard
//! input is mapped to typed [`Action`]s; [`App::handle_action`] applies an
//! action and returns the [`Command`] (side effect) the event loop should run.
//! Every fetch carries its own copy of the units and location, and only the
//! response to the latest request is applied.

use chrono::{Datelike, Local, Utc, Weekday};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::StartupConfig;
use crate::data::{Coordinates, Location, Place};
use crate::forecast::week_from;
use crate::service::{Dashboard, FailureKind, LoadError};
use crate::units::{normalize, UnitCategory, UnitSystem, Units};
use crate::units::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit};

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first position or forecast
    Loading,
    /// No location known yet; prompt for a search
    Welcome,
    /// Showing the last successful forecast
    Dashboard,
    /// The last searched city had no geocoding results
    NotFound,
    /// A service answered HTTP 500; only retry or quit are possible
    ServerError,
}

/// Where keyboard input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search bar
    Search,
    /// Navigating the units dropdown
    UnitsMenu,
}

/// A typed UI or completion event
#[derive(Debug)]
pub enum Action {
    /// Initial load: search the startup city or ask for the position
    Start,
    /// Search form submitted
    SubmitSearch(String),
    /// Search input text changed
    SearchInputChanged(String),
    /// A suggestion from the dropdown was picked
    SelectSuggestion(usize),
    /// A unit was picked from the units menu
    SelectUnit { category: UnitCategory, label: String },
    /// The metric/imperial switch was pressed
    SwitchUnitSystem,
    /// A day was picked in the hourly forecast selector
    SelectDay(Weekday),
    /// Geolocation answered
    PositionAcquired(Coordinates),
    /// Geolocation failed; logged and otherwise ignored
    PositionUnavailable(String),
    /// A forecast load finished
    ForecastLoaded {
        request_id: u64,
        result: Result<Dashboard, LoadError>,
    },
    /// A suggestion lookup finished
    SuggestionsLoaded {
        query: String,
        result: Result<Vec<Place>, LoadError>,
    },
    /// Retry from the server error panel: clear input and start over
    Retry,
    Quit,
}

/// A forecast request: location and units are copied in at creation
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub id: u64,
    pub location: Location,
    pub units: Units,
}

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    /// Load a dashboard
    Fetch(FetchRequest),
    /// Look up search suggestions (debounced by the runner)
    Suggest(String),
    /// Ask the position source where we are
    Locate,
}

/// One row of the units dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    SwitchSystem,
    Unit {
        category: UnitCategory,
        label: &'static str,
    },
}

/// Rows of the units dropdown, in display order
pub fn units_menu_entries() -> [MenuEntry; 7] {
    use MenuEntry::{SwitchSystem, Unit};
    use UnitCategory::{Precipitation, Temperature, WindSpeed};

    [
        SwitchSystem,
        Unit { category: Temperature, label: TemperatureUnit::Celsius.label() },
        Unit { category: Temperature, label: TemperatureUnit::Fahrenheit.label() },
        Unit { category: WindSpeed, label: WindSpeedUnit::Kmh.label() },
        Unit { category: WindSpeed, label: WindSpeedUnit::Mph.label() },
        Unit { category: Precipitation, label: PrecipitationUnit::Millimeters.label() },
        Unit { category: Precipitation, label: PrecipitationUnit::Inch.label() },
    ]
}

/// Main application struct managing state and data
#[derive(Debug)]
pub struct App {
    /// Current screen
    pub state: AppState,
    /// Current input focus
    pub mode: InputMode,
    /// Units sent with the next fetch
    pub units: Units,
    /// Preset the switch action toggles from
    pub unit_system: UnitSystem,
    /// Location of the last successful fetch
    pub location: Option<Location>,
    /// Last successful load
    pub dashboard: Option<Dashboard>,
    /// Day shown in the hourly forecast; `None` means today
    pub selected_day: Option<Weekday>,
    /// Search bar contents
    pub search_input: String,
    /// Suggestions for the current search input
    pub suggestions: Vec<Place>,
    /// Highlighted suggestion
    pub selected_suggestion: Option<usize>,
    /// Highlighted units menu row
    pub units_menu_index: usize,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// The in-flight request whose response will be applied
    pending: Option<FetchRequest>,
    /// Last issued request id; survives retries so late responses stay stale
    last_request_id: u64,
    startup: StartupConfig,
}

impl Default for App {
    fn default() -> Self {
        Self::with_startup_config(StartupConfig::default())
    }
}

impl App {
    /// Creates a new App instance with the given startup configuration.
    pub fn with_startup_config(config: StartupConfig) -> Self {
        Self {
            state: AppState::Loading,
            mode: InputMode::Normal,
            units: config.units,
            unit_system: config.unit_system,
            location: None,
            dashboard: None,
            selected_day: None,
            search_input: String::new(),
            suggestions: Vec::new(),
            selected_suggestion: None,
            units_menu_index: 0,
            show_help: false,
            should_quit: false,
            pending: None,
            last_request_id: 0,
            startup: config,
        }
    }

    /// Whether a forecast request is in flight
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The weekday of "now" at the displayed location
    pub fn today(&self) -> Weekday {
        match &self.dashboard {
            Some(dashboard) => dashboard.snapshot.local_time(Utc::now()).weekday(),
            None => Local::now().weekday(),
        }
    }

    /// Whether a units menu row matches the current selection
    pub fn is_menu_entry_checked(&self, entry: MenuEntry) -> bool {
        match entry {
            MenuEntry::SwitchSystem => false,
            MenuEntry::Unit { category, label } => {
                let current = match category {
                    UnitCategory::Temperature => self.units.temperature.token(),
                    UnitCategory::WindSpeed => self.units.wind_speed.token(),
                    UnitCategory::Precipitation => self.units.precipitation.token(),
                };
                normalize(category, label) == current
            }
        }
    }

    /// Applies an action and returns the side effect to run
    pub fn handle_action(&mut self, action: Action) -> Command {
        match action {
            Action::Start => match self.startup.city.clone() {
                Some(city) => self.request(Location::City(city)),
                None => {
                    self.state = AppState::Loading;
                    Command::Locate
                }
            },
            Action::SubmitSearch(query) => {
                let query = query.trim();
                if query.is_empty() {
                    return Command::None;
                }
                self.close_search();
                self.request(Location::City(query.to_string()))
            }
            Action::SearchInputChanged(text) => {
                self.search_input = text;
                self.suggestions.clear();
                self.selected_suggestion = None;
                if self.search_input.trim().chars().count() < crate::data::geocoding::MIN_SUGGESTION_QUERY_LEN {
                    Command::None
                } else {
                    Command::Suggest(self.search_input.trim().to_string())
                }
            }
            Action::SelectSuggestion(index) => {
                let Some(place) = self.suggestions.get(index) else {
                    return Command::None;
                };
                let coords = place.coordinates();
                self.close_search();
                self.request(Location::Coordinates(coords))
            }
            Action::SelectUnit { category, label } => {
                self.units = self.units.with_label(category, &label);
                if let Some(system) = self.units.system() {
                    self.unit_system = system;
                }
                self.refetch()
            }
            Action::SwitchUnitSystem => {
                self.unit_system = self.unit_system.toggled();
                self.units = self.unit_system.units();
                self.refetch()
            }
            Action::SelectDay(day) => {
                self.selected_day = Some(day);
                Command::None
            }
            Action::PositionAcquired(coords) => self.request(Location::Coordinates(coords)),
            Action::PositionUnavailable(reason) => {
                tracing::warn!("Geolocation unavailable: {}", reason);
                if self.state == AppState::Loading && self.pending.is_none() {
                    self.state = AppState::Welcome;
                }
                Command::None
            }
            Action::ForecastLoaded { request_id, result } => {
                self.apply_forecast(request_id, result);
                Command::None
            }
            Action::SuggestionsLoaded { query, result } => {
                if self.mode != InputMode::Search || query != self.search_input.trim() {
                    return Command::None;
                }
                match result {
                    Ok(places) => {
                        self.suggestions = places;
                        self.selected_suggestion = None;
                    }
                    Err(e) => tracing::debug!("Suggestion lookup for '{}' failed: {}", query, e),
                }
                Command::None
            }
            Action::Retry => {
                let last_request_id = self.last_request_id;
                *self = App::with_startup_config(self.startup.clone());
                self.last_request_id = last_request_id;
                self.handle_action(Action::Start)
            }
            Action::Quit => {
                self.should_quit = true;
                Command::None
            }
        }
    }

    /// Handles keyboard input, returning the side effect to run
    ///
    /// # Key Bindings
    /// - `/` or `s`: Focus the search bar (Enter submits, Esc cancels)
    /// - `u`: Open the units menu
    /// - `i`: Switch between metric and imperial
    /// - `Left`/`h`, `Right`/`l`: Previous / next day in the hourly forecast
    /// - `r` or `Enter` (server error panel): Retry
    /// - `?`: Toggle help
    /// - `q` or `Esc`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Command {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Command::None;
        }

        match self.mode {
            InputMode::Search => self.handle_search_key(key_event),
            InputMode::UnitsMenu => self.handle_units_menu_key(key_event),
            InputMode::Normal => match self.action_for_key(key_event) {
                Some(action) => self.handle_action(action),
                None => Command::None,
            },
        }
    }

    /// Maps a key in normal mode to an action, handling pure view changes inline
    fn action_for_key(&mut self, key_event: KeyEvent) -> Option<Action> {
        if self.state == AppState::ServerError {
            return match key_event.code {
                KeyCode::Char('r') | KeyCode::Enter => Some(Action::Retry),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.mode = InputMode::Search;
                None
            }
            KeyCode::Char('u') => {
                self.mode = InputMode::UnitsMenu;
                self.units_menu_index = 0;
                None
            }
            KeyCode::Char('i') => Some(Action::SwitchUnitSystem),
            KeyCode::Left | KeyCode::Char('h') if self.state == AppState::Dashboard => {
                Some(Action::SelectDay(self.shifted_day(-1)))
            }
            KeyCode::Right | KeyCode::Char('l') if self.state == AppState::Dashboard => {
                Some(Action::SelectDay(self.shifted_day(1)))
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) -> Command {
        match key_event.code {
            KeyCode::Esc => {
                self.close_search();
                Command::None
            }
            KeyCode::Enter => match self.selected_suggestion {
                Some(index) => self.handle_action(Action::SelectSuggestion(index)),
                None => self.handle_action(Action::SubmitSearch(self.search_input.clone())),
            },
            KeyCode::Backspace => {
                let mut text = self.search_input.clone();
                text.pop();
                self.handle_action(Action::SearchInputChanged(text))
            }
            KeyCode::Char(c) => {
                let mut text = self.search_input.clone();
                text.push(c);
                self.handle_action(Action::SearchInputChanged(text))
            }
            KeyCode::Down => {
                self.move_suggestion_down();
                Command::None
            }
            KeyCode::Up => {
                self.move_suggestion_up();
                Command::None
            }
            _ => Command::None,
        }
    }

    fn handle_units_menu_key(&mut self, key_event: KeyEvent) -> Command {
        let count = units_menu_entries().len();
        match key_event.code {
            KeyCode::Esc | KeyCode::Char('u') => {
                self.mode = InputMode::Normal;
                Command::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.units_menu_index = (self.units_menu_index + count - 1) % count;
                Command::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.units_menu_index = (self.units_menu_index + 1) % count;
                Command::None
            }
            KeyCode::Enter => {
                let entry = units_menu_entries()[self.units_menu_index.min(count - 1)];
                self.mode = InputMode::Normal;
                match entry {
                    MenuEntry::SwitchSystem => self.handle_action(Action::SwitchUnitSystem),
                    MenuEntry::Unit { category, label } => self.handle_action(Action::SelectUnit {
                        category,
                        label: label.to_string(),
                    }),
                }
            }
            _ => Command::None,
        }
    }

    /// Moves the suggestion highlight down, wrapping to the top
    fn move_suggestion_down(&mut self) {
        let count = self.suggestions.len();
        if count == 0 {
            return;
        }
        self.selected_suggestion = Some(match self.selected_suggestion {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    /// Moves the suggestion highlight up, wrapping to the bottom
    fn move_suggestion_up(&mut self) {
        let count = self.suggestions.len();
        if count == 0 {
            return;
        }
        self.selected_suggestion = Some(match self.selected_suggestion {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }

    /// The day `delta` steps from the selected one, within the coming week
    fn shifted_day(&self, delta: i32) -> Weekday {
        let today = self.today();
        let current = self.selected_day.unwrap_or(today);
        let week = week_from(today);
        let index = week.iter().position(|d| *d == current).unwrap_or(0) as i32;
        week[(index + delta).rem_euclid(7) as usize]
    }

    fn close_search(&mut self) {
        self.mode = InputMode::Normal;
        self.search_input.clear();
        self.suggestions.clear();
        self.selected_suggestion = None;
    }

    /// Re-fetches the newest location with the current units, preferring an
    /// in-flight request over the last loaded one
    fn refetch(&mut self) -> Command {
        let location = self
            .pending
            .as_ref()
            .map(|pending| pending.location.clone())
            .or_else(|| self.location.clone());
        match location {
            Some(location) => self.request(location),
            None => Command::None,
        }
    }

    /// Issues a new request, superseding any in-flight one
    fn request(&mut self, location: Location) -> Command {
        self.last_request_id += 1;
        let request = FetchRequest {
            id: self.last_request_id,
            location,
            units: self.units,
        };

        if self.state == AppState::NotFound {
            self.state = if self.dashboard.is_some() {
                AppState::Dashboard
            } else {
                AppState::Loading
            };
        }

        tracing::debug!(id = request.id, location = %request.location, "Requesting forecast");
        self.pending = Some(request.clone());
        Command::Fetch(request)
    }

    fn apply_forecast(&mut self, request_id: u64, result: Result<Dashboard, LoadError>) {
        let is_current = self.pending.as_ref().is_some_and(|pending| pending.id == request_id);
        if !is_current {
            tracing::debug!(request_id, "Ignoring superseded forecast response");
            return;
        }
        let Some(request) = self.pending.take() else {
            return;
        };

        match result {
            Ok(dashboard) => {
                tracing::info!(place = %dashboard.place, "Forecast loaded");
                self.location = Some(request.location);
                self.dashboard = Some(dashboard);
                self.selected_day = None;
                self.state = AppState::Dashboard;
            }
            Err(e) => match e.kind() {
                FailureKind::NotFound => {
                    tracing::info!("{}", e);
                    self.state = AppState::NotFound;
                }
                FailureKind::Server => {
                    tracing::warn!("{}", e);
                    self.state = AppState::ServerError;
                }
                FailureKind::Other => {
                    tracing::warn!("Failed to load forecast for {}: {}", request.location, e);
                    self.state = if self.dashboard.is_some() {
                        AppState::Dashboard
                    } else {
                        AppState::Welcome
                    };
                }
            },
        }
    }
}
