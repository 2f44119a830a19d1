//! Background command runner
//!
//! Executes the [`Command`]s produced by state transitions on spawned tokio
//! tasks and reports their outcomes back to the main loop as [`Action`]s over
//! a channel. Suggestion lookups are debounced: a newer lookup cancels the
//! pending one before it reaches the network.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::{Action, Command, FetchRequest};
use crate::geolocation::{locate, PositionOptions, PositionSource};
use crate::service::WeatherService;

/// Configuration for background work
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Quiet period after the last keystroke before suggestions are fetched
    pub suggestion_delay: Duration,
    /// Options for every position lookup
    pub position_options: PositionOptions,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            suggestion_delay: Duration::from_millis(300),
            position_options: PositionOptions::default(),
        }
    }
}

/// Handle for running commands in the background
pub struct RefreshHandle<S> {
    /// Channel for receiving completion actions
    receiver: mpsc::Receiver<Action>,
    sender: mpsc::Sender<Action>,
    service: Arc<WeatherService>,
    source: Arc<S>,
    config: RefreshConfig,
    /// The debounced suggestion lookup, if one is waiting or running
    pending_suggestion: Option<JoinHandle<()>>,
}

impl<S> RefreshHandle<S>
where
    S: PositionSource + Send + Sync + 'static,
{
    /// Creates a new RefreshHandle
    ///
    /// # Arguments
    /// * `service` - Loads forecasts and suggestions
    /// * `source` - Answers position lookups
    /// * `config` - Debounce delay and position options
    pub fn new(service: WeatherService, source: S, config: RefreshConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            receiver,
            sender,
            service: Arc::new(service),
            source: Arc::new(source),
            config,
            pending_suggestion: None,
        }
    }

    /// Starts the work a command describes
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::Fetch(request) => self.spawn_fetch(request),
            Command::Suggest(query) => self.spawn_suggest(query),
            Command::Locate => self.spawn_locate(),
        }
    }

    /// Waits for the next completion
    pub async fn recv(&mut self) -> Option<Action> {
        self.receiver.recv().await
    }

    /// Checks for a completion without blocking
    pub fn try_recv(&mut self) -> Option<Action> {
        self.receiver.try_recv().ok()
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let result = service.load(&request.location, &request.units).await;
            let _ = tx
                .send(Action::ForecastLoaded {
                    request_id: request.id,
                    result,
                })
                .await;
        });
    }

    fn spawn_suggest(&mut self, query: String) {
        if let Some(pending) = self.pending_suggestion.take() {
            pending.abort();
        }

        let service = Arc::clone(&self.service);
        let tx = self.sender.clone();
        let delay = self.config.suggestion_delay;

        self.pending_suggestion = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = service.suggest(&query).await;
            let _ = tx.send(Action::SuggestionsLoaded { query, result }).await;
        }));
    }

    fn spawn_locate(&self) {
        let source = Arc::clone(&self.source);
        let tx = self.sender.clone();
        let options = self.config.position_options;

        tokio::spawn(async move {
            let action = match locate(source.as_ref(), &options).await {
                Ok(position) => Action::PositionAcquired(position.coords),
                Err(e) => Action::PositionUnavailable(e.to_string()),
            };
            let _ = tx.send(action).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Coordinates, GeocodingClient, Location, WeatherClient};
    use crate::geolocation::FixedPosition;
    use crate::units::Units;

    /// Service pointed at a closed local port; every request fails fast
    fn offline_service() -> WeatherService {
        WeatherService::new(
            WeatherClient::with_base_url("http://127.0.0.1:9/v1/forecast"),
            GeocodingClient::with_base_urls("http://127.0.0.1:9/v1/search", "http://127.0.0.1:9/reverse"),
        )
    }

    fn quick_config() -> RefreshConfig {
        RefreshConfig {
            suggestion_delay: Duration::from_millis(10),
            ..RefreshConfig::default()
        }
    }

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshConfig::default();
        assert_eq!(config.suggestion_delay, Duration::from_millis(300));
        assert_eq!(config.position_options, PositionOptions::default());
    }

    #[tokio::test]
    async fn test_none_command_sends_nothing() {
        let mut handle = RefreshHandle::new(offline_service(), FixedPosition::default(), quick_config());
        handle.dispatch(Command::None);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_locate_reports_position() {
        let coords = Coordinates::new(59.91, 10.75);
        let mut handle = RefreshHandle::new(offline_service(), FixedPosition::new(Some(coords)), quick_config());

        handle.dispatch(Command::Locate);

        match handle.recv().await {
            Some(Action::PositionAcquired(got)) => assert_eq!(got, coords),
            other => panic!("Expected PositionAcquired, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_locate_reports_unavailable() {
        let mut handle = RefreshHandle::new(offline_service(), FixedPosition::default(), quick_config());

        handle.dispatch(Command::Locate);

        assert!(matches!(
            handle.recv().await,
            Some(Action::PositionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_reports_result_with_request_id() {
        let mut handle = RefreshHandle::new(offline_service(), FixedPosition::default(), quick_config());

        handle.dispatch(Command::Fetch(FetchRequest {
            id: 7,
            location: Location::City("Oslo".into()),
            units: Units::default(),
        }));

        match handle.recv().await {
            Some(Action::ForecastLoaded { request_id, result }) => {
                assert_eq!(request_id, 7);
                assert!(result.is_err());
            }
            other => panic!("Expected ForecastLoaded, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_newer_suggestion_cancels_pending_one() {
        let mut handle = RefreshHandle::new(offline_service(), FixedPosition::default(), quick_config());

        handle.dispatch(Command::Suggest("Par".into()));
        handle.dispatch(Command::Suggest("Pari".into()));

        match handle.recv().await {
            Some(Action::SuggestionsLoaded { query, .. }) => assert_eq!(query, "Pari"),
            other => panic!("Expected SuggestionsLoaded, got {:?}", other),
        }

        let next = tokio::time::timeout(Duration::from_millis(100), handle.recv()).await;
        assert!(next.is_err(), "cancelled lookup must not report");
    }
}
