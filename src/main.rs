//! weatherdash - current, hourly and 7-day forecasts in the terminal
//!
//! A terminal UI application that shows Open-Meteo forecasts for the current
//! position or any searched city.

use std::io;
use std::panic;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use weatherdash::app::{Action, App};
use weatherdash::cli::{Cli, StartupConfig};
use weatherdash::geolocation::FixedPosition;
use weatherdash::refresh::{RefreshConfig, RefreshHandle};
use weatherdash::service::WeatherService;
use weatherdash::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Logs go to stderr and are off unless RUST_LOG asks for them
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

async fn run(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = WeatherService::from_endpoints(&config.endpoints);
    let source = FixedPosition::new(config.position);
    let mut refresh = RefreshHandle::new(service, source, RefreshConfig::default());
    let mut app = App::with_startup_config(config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let command = app.handle_action(Action::Start);
    refresh.dispatch(command);

    let mut events = EventStream::new();

    // Main event loop
    let result: Result<(), Box<dyn std::error::Error>> = loop {
        if let Err(e) = terminal.draw(|f| ui::render(f, &app)) {
            break Err(e.into());
        }

        let command = tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => continue,
                Some(Err(e)) => break Err(e.into()),
                None => break Ok(()),
            },
            action = refresh.recv() => match action {
                Some(action) => app.handle_action(action),
                None => continue,
            },
        };
        refresh.dispatch(command);

        // Check if we should quit
        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    init_tracing();

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    tracing::info!(units = %config.units, "Starting weatherdash");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
