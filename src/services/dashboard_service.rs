use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::api::market::{FetchError, MarketSource};
use crate::models::{ChartModel, HotelId, PriceSeries};
use crate::services::chart_service;
use crate::services::selection_service::{SelectionChange, SelectionStore};

/// Result of one market data request, tagged with its request token
#[derive(Debug)]
pub struct FetchOutcome {
    pub token: u64,
    pub result: Result<PriceSeries, FetchError>,
}

/// What happened to an outcome once it reached the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Series replaced
    Applied,
    /// A newer request was issued or already applied; outcome dropped
    Stale,
    /// Fetch failed; previous series kept
    Failed,
}

/// User actions on the hotel selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    SelectAll,
    UnselectAll,
    Toggle(HotelId),
}

/// Selection, fetched series and the fetch pipeline between them
///
/// Selection changes are observed through the store's subscription and each
/// one schedules a market data fetch. Fetches run as tasks and report back
/// through `next_outcome`; only the newest request's answer is applied.
pub struct Dashboard<S: MarketSource> {
    source: Arc<S>,
    store: SelectionStore,
    changes: UnboundedReceiver<SelectionChange>,
    series: PriceSeries,
    last_updated: Option<DateTime<Utc>>,
    next_token: u64,
    applied_token: Option<u64>,
    in_flight: usize,
    outcome_tx: UnboundedSender<FetchOutcome>,
    outcome_rx: UnboundedReceiver<FetchOutcome>,
}

impl<S: MarketSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        let mut store = SelectionStore::new();
        let changes = store.subscribe();
        let (outcome_tx, outcome_rx) = unbounded_channel();

        Self {
            source: Arc::new(source),
            store,
            changes,
            series: PriceSeries::new(),
            last_updated: None,
            next_token: 0,
            applied_token: None,
            in_flight: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Load the eligible hotels; selecting them all schedules the first fetch.
    ///
    /// On failure the error is logged and returned, and nothing changes.
    pub async fn start(&mut self) -> Result<usize, FetchError> {
        match self.source.fetch_eligible_hotels().await {
            Ok(hotels) => {
                self.store.load_eligible(hotels);
                let count = self.store.eligible().len();
                info!("Loaded {} eligible hotels", count);
                self.pump_changes();
                Ok(count)
            }
            Err(e) => {
                error!("Error fetching eligible hotels: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a selection action; returns false if it was rejected.
    pub fn apply(&mut self, action: SelectionAction) -> bool {
        let accepted = match action {
            SelectionAction::SelectAll => {
                self.store.select_all();
                true
            }
            SelectionAction::UnselectAll => {
                self.store.unselect_all();
                true
            }
            SelectionAction::Toggle(id) => self.store.toggle(&id),
        };
        self.pump_changes();
        accepted
    }

    /// Fetch again for the current selection without changing it.
    pub fn refresh(&mut self) -> u64 {
        let hotels = self.store.selected().to_vec();
        self.request_market_data(hotels)
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` only if the outcome channel is closed, which cannot
    /// happen while the dashboard holds its own sender.
    pub async fn next_outcome(&mut self) -> Option<OutcomeStatus> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.handle_outcome(outcome))
    }

    /// Apply a finished fetch.
    pub fn handle_outcome(&mut self, outcome: FetchOutcome) -> OutcomeStatus {
        self.in_flight = self.in_flight.saturating_sub(1);

        let newest_issued = self.next_token.saturating_sub(1);
        let superseded = self.applied_token.is_some_and(|applied| outcome.token <= applied);
        if outcome.token < newest_issued || superseded {
            debug!(
                "Discarding stale market data response #{} (newest request #{})",
                outcome.token, newest_issued
            );
            return OutcomeStatus::Stale;
        }

        match outcome.result {
            Ok(series) => {
                info!("Market data #{}: {} point(s)", outcome.token, series.len());
                self.replace_series(series);
                self.applied_token = Some(outcome.token);
                OutcomeStatus::Applied
            }
            Err(e) if e.is_network() => {
                error!("Error fetching data (request #{}): {}", outcome.token, e);
                OutcomeStatus::Failed
            }
            Err(e) => {
                error!("Malformed market data (request #{}): {}", outcome.token, e);
                OutcomeStatus::Failed
            }
        }
    }

    /// Swap in a freshly fetched series.
    pub fn replace_series(&mut self, series: PriceSeries) {
        self.series = series;
        self.last_updated = Some(Utc::now());
    }

    /// Chart model for the current series, rebuilt on every call.
    pub fn chart(&self) -> ChartModel {
        chart_service::assemble(&self.series)
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.store
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Turn every pending selection notification into a fetch.
    fn pump_changes(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            self.request_market_data(change.selected);
        }
    }

    fn request_market_data(&mut self, hotels: Vec<HotelId>) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.in_flight += 1;
        debug!("Requesting market data #{} for {} hotel(s)", token, hotels.len());

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_market_data(&hotels).await;
            // receiver lives as long as the dashboard
            let _ = tx.send(FetchOutcome { token, result });
        });

        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::models::PricePoint;

    /// Canned answers, recorded requests
    struct FakeSource {
        eligible: Mutex<Option<Result<Vec<HotelId>, FetchError>>>,
        responses: Mutex<VecDeque<Result<PriceSeries, FetchError>>>,
        requests: Arc<Mutex<Vec<Vec<HotelId>>>>,
    }

    impl FakeSource {
        fn new(eligible: &[&str]) -> Self {
            Self {
                eligible: Mutex::new(Some(Ok(ids(eligible)))),
                responses: Mutex::new(VecDeque::new()),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing_eligible() -> Self {
            let source = Self::new(&[]);
            *source.eligible.lock().unwrap() = Some(Err(decode_error()));
            source
        }

        fn respond(self, response: Result<PriceSeries, FetchError>) -> Self {
            self.responses.lock().unwrap().push_back(response);
            self
        }
    }

    impl MarketSource for FakeSource {
        async fn fetch_eligible_hotels(&self) -> Result<Vec<HotelId>, FetchError> {
            self.eligible
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_market_data(&self, hotels: &[HotelId]) -> Result<PriceSeries, FetchError> {
            self.requests.lock().unwrap().push(hotels.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn ids(names: &[&str]) -> Vec<HotelId> {
        names.iter().map(|n| HotelId::from(*n)).collect()
    }

    fn decode_error() -> FetchError {
        FetchError::from(serde_json::from_str::<PriceSeries>("not json").unwrap_err())
    }

    fn series(date: &str, max: f64) -> PriceSeries {
        vec![PricePoint {
            date: date.to_string(),
            min: Some(max / 2.0),
            max: Some(max),
            my_price: Some(max * 0.75),
            median: Some(max * 0.6),
        }]
    }

    #[tokio::test]
    async fn test_start_selects_all_and_fetches() {
        let source = FakeSource::new(&["Gamma", "Alpha", "Beta"]).respond(Ok(series("2024-01-01", 200.0)));
        let requests = Arc::clone(&source.requests);
        let mut dashboard = Dashboard::new(source);

        assert_eq!(dashboard.start().await.unwrap(), 3);
        assert!(dashboard.selection().all_selected());
        assert_eq!(dashboard.in_flight(), 1);

        assert_eq!(dashboard.next_outcome().await, Some(OutcomeStatus::Applied));
        assert_eq!(dashboard.in_flight(), 0);
        assert_eq!(requests.lock().unwrap().as_slice(), &[ids(&["Alpha", "Beta", "Gamma"])]);

        let chart = dashboard.chart();
        assert_eq!(chart.labels, vec!["2024-01-01".to_string()]);
        assert!((chart.y_axis_max - 220.0).abs() < 1e-9);
        assert!(dashboard.last_updated().is_some());
    }

    #[tokio::test]
    async fn test_start_failure_keeps_state() {
        let mut dashboard = Dashboard::new(FakeSource::failing_eligible());
        assert!(dashboard.start().await.is_err());
        assert!(dashboard.selection().eligible().is_empty());
        assert_eq!(dashboard.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_toggle_requests_new_selection() {
        let source = FakeSource::new(&["Alpha", "Beta", "Gamma"]);
        let requests = Arc::clone(&source.requests);
        let mut dashboard = Dashboard::new(source);
        dashboard.start().await.unwrap();
        dashboard.next_outcome().await;

        dashboard.apply(SelectionAction::UnselectAll);
        dashboard.next_outcome().await;
        assert!(dashboard.apply(SelectionAction::Toggle(HotelId::from("Beta"))));
        dashboard.next_outcome().await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].is_empty());
        assert_eq!(requests[2], ids(&["Beta"]));
    }

    #[tokio::test]
    async fn test_rejected_toggle_does_not_fetch() {
        let mut dashboard = Dashboard::new(FakeSource::new(&["Alpha"]));
        dashboard.start().await.unwrap();
        dashboard.next_outcome().await;

        assert!(!dashboard.apply(SelectionAction::Toggle(HotelId::from("Nowhere"))));
        assert_eq!(dashboard.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_previous_chart() {
        let source = FakeSource::new(&["Alpha"])
            .respond(Ok(series("2024-01-01", 200.0)))
            .respond(Err(decode_error()));
        let mut dashboard = Dashboard::new(source);
        dashboard.start().await.unwrap();
        assert_eq!(dashboard.next_outcome().await, Some(OutcomeStatus::Applied));
        let before = dashboard.chart();

        dashboard.refresh();
        assert_eq!(dashboard.next_outcome().await, Some(OutcomeStatus::Failed));
        assert_eq!(dashboard.chart(), before);
    }

    #[tokio::test]
    async fn test_refresh_uses_current_selection() {
        let source = FakeSource::new(&["Alpha", "Beta"]);
        let requests = Arc::clone(&source.requests);
        let mut dashboard = Dashboard::new(source);
        dashboard.start().await.unwrap();
        dashboard.next_outcome().await;

        dashboard.apply(SelectionAction::Toggle(HotelId::from("Alpha")));
        dashboard.next_outcome().await;
        dashboard.refresh();
        dashboard.next_outcome().await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests[1], ids(&["Beta"]));
        assert_eq!(requests[2], ids(&["Beta"]));
    }

    #[tokio::test]
    async fn test_out_of_order_response_is_discarded() {
        let mut dashboard = Dashboard::new(FakeSource::new(&["Alpha", "Beta"]));
        dashboard.start().await.unwrap();
        dashboard.next_outcome().await;

        // two requests issued; the newer one lands first
        let older = dashboard.refresh();
        let newer = dashboard.refresh();

        let newer_status = dashboard.handle_outcome(FetchOutcome {
            token: newer,
            result: Ok(series("2024-02-02", 400.0)),
        });
        let older_status = dashboard.handle_outcome(FetchOutcome {
            token: older,
            result: Ok(series("2024-01-01", 100.0)),
        });

        assert_eq!(newer_status, OutcomeStatus::Applied);
        assert_eq!(older_status, OutcomeStatus::Stale);
        assert_eq!(dashboard.chart().labels, vec!["2024-02-02".to_string()]);
    }

    #[tokio::test]
    async fn test_older_response_arriving_first_is_discarded() {
        let source = FakeSource::new(&["Alpha", "Beta"]).respond(Ok(series("2024-01-01", 100.0)));
        let mut dashboard = Dashboard::new(source);
        dashboard.start().await.unwrap();
        assert_eq!(dashboard.next_outcome().await, Some(OutcomeStatus::Applied));

        // the older request answers while the newer one is still pending
        let older = dashboard.refresh();
        let newer = dashboard.refresh();

        let older_status = dashboard.handle_outcome(FetchOutcome {
            token: older,
            result: Ok(series("2024-03-03", 300.0)),
        });
        assert_eq!(older_status, OutcomeStatus::Stale);
        assert_eq!(dashboard.series(), &series("2024-01-01", 100.0));

        let newer_status = dashboard.handle_outcome(FetchOutcome {
            token: newer,
            result: Ok(series("2024-04-04", 400.0)),
        });
        assert_eq!(newer_status, OutcomeStatus::Applied);
        assert_eq!(dashboard.chart().labels, vec!["2024-04-04".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_response_clears_chart() {
        let source = FakeSource::new(&["Alpha"])
            .respond(Ok(series("2024-01-01", 200.0)))
            .respond(Ok(Vec::new()));
        let mut dashboard = Dashboard::new(source);
        dashboard.start().await.unwrap();
        dashboard.next_outcome().await;

        dashboard.apply(SelectionAction::UnselectAll);
        assert_eq!(dashboard.next_outcome().await, Some(OutcomeStatus::Applied));

        let chart = dashboard.chart();
        assert!(chart.is_empty());
        assert_eq!(chart.y_axis_max, 0.0);
    }
}
