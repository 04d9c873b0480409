//! Debounced search input
//!
//! `QueryDebouncer` sits between raw keystrokes and a `GeoSearch` backend.
//! Live mode waits for a quiet period before firing; manual mode only fires
//! on `trigger`. Every state change bumps a sequence number, and results are
//! tagged with the sequence they were issued under so the owner can drop any
//! response that is no longer the latest (last-submitted-wins).
//!
//! Results are delivered as messages on an unbounded channel; the debouncer
//! never touches candidate lists itself.

use crate::error::Result;
use crate::geo::{GeoSearch, SearchCandidate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How typed text turns into requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Fire after the debounce window
    Live,
    /// Fire only on explicit submission
    Manual,
}

impl SearchMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Live => Self::Manual,
            Self::Manual => Self::Live,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" | "realtime" | "real-time" => Ok(Self::Live),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown search mode: {} (expected live or manual)", s)),
        }
    }
}

/// Tunables for the debouncer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub delay: Duration,
    pub min_chars: usize,
    pub mode: SearchMode,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(crate::constants::search::DEBOUNCE_MS),
            min_chars: crate::constants::search::MIN_QUERY_CHARS,
            mode: SearchMode::Live,
        }
    }
}

/// A finished search, tagged with the sequence it was issued under
#[derive(Debug)]
pub struct SearchOutcome {
    pub sequence: u64,
    pub query: String,
    pub result: Result<Vec<SearchCandidate>>,
}

/// What `submit` or `trigger` did with the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Too short: pending work cancelled, candidates should be cleared
    Cleared,
    /// A request will fire under this sequence number
    Scheduled { sequence: u64 },
    /// Manual mode: text recorded, waiting for `trigger`
    Deferred,
    /// `trigger` with nothing searchable; nothing changed
    Ignored,
}

/// Turns keystrokes into a rate-limited sequence of searches
///
/// Outcomes are sent as `M`, so the owner can fold them into its own event
/// type.
pub struct QueryDebouncer<G, M = SearchOutcome> {
    client: Arc<G>,
    settings: SearchSettings,
    mode: SearchMode,
    query: String,
    sequence: u64,
    pending: Option<JoinHandle<()>>,
    outcomes: UnboundedSender<M>,
}

impl<G, M> QueryDebouncer<G, M>
where
    G: GeoSearch + 'static,
    M: From<SearchOutcome> + Send + 'static,
{
    pub fn new(client: Arc<G>, settings: SearchSettings, outcomes: UnboundedSender<M>) -> Self {
        Self {
            client,
            settings,
            mode: settings.mode,
            query: String::new(),
            sequence: 0,
            pending: None,
            outcomes,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Text most recently submitted
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Highest sequence number issued so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether a response issued under `sequence` may still be shown
    pub fn is_current(&self, sequence: u64) -> bool {
        sequence == self.sequence
    }

    /// Record new input text
    pub fn submit(&mut self, text: &str) -> Submission {
        self.query = text.to_string();

        if !self.is_searchable(text) {
            self.invalidate();
            debug!(sequence = self.sequence, "query too short, search cleared");
            return Submission::Cleared;
        }

        match self.mode {
            SearchMode::Manual => Submission::Deferred,
            SearchMode::Live => {
                self.invalidate();
                self.schedule(self.settings.delay);
                Submission::Scheduled {
                    sequence: self.sequence,
                }
            }
        }
    }

    /// Explicit submission: search the recorded text now
    pub fn trigger(&mut self) -> Submission {
        if !self.is_searchable(&self.query) {
            return Submission::Ignored;
        }

        self.invalidate();
        self.schedule(Duration::ZERO);
        Submission::Scheduled {
            sequence: self.sequence,
        }
    }

    /// Switch modes; pending and in-flight searches are dropped
    pub fn set_mode(&mut self, mode: SearchMode) {
        self.invalidate();
        self.mode = mode;
        debug!(%mode, sequence = self.sequence, "search mode changed");
    }

    /// Drop pending and in-flight searches without changing the text
    pub fn cancel(&mut self) {
        self.invalidate();
    }

    /// Forget the text and drop pending and in-flight searches
    pub fn clear(&mut self) {
        self.query.clear();
        self.invalidate();
    }

    /// Check an outcome against the latest sequence
    ///
    /// Returns `None` for stale outcomes. Failures are logged here so callers
    /// only have to show them.
    pub fn accept(&self, outcome: SearchOutcome) -> Option<Result<Vec<SearchCandidate>>> {
        if !self.is_current(outcome.sequence) {
            debug!(
                sequence = outcome.sequence,
                latest = self.sequence,
                query = %outcome.query,
                "discarding stale search response"
            );
            return None;
        }

        if let Err(e) = &outcome.result {
            warn!(query = %outcome.query, error = %e, "search failed");
        }
        Some(outcome.result)
    }

    fn is_searchable(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.settings.min_chars
    }

    /// Abort the pending timer and move to a new sequence number
    fn invalidate(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.sequence += 1;
    }

    fn schedule(&mut self, delay: Duration) {
        let client = Arc::clone(&self.client);
        let outcomes = self.outcomes.clone();
        let query = self.query.trim().to_string();
        let sequence = self.sequence;

        let request = async move {
            debug!(sequence, query = %query, "search fired");
            let result = client.search(&query).await;
            let _ = outcomes.send(
                SearchOutcome {
                    sequence,
                    query,
                    result,
                }
                .into(),
            );
        };

        if delay.is_zero() {
            tokio::spawn(request);
            return;
        }

        // Only the timer is abortable; once fired the request runs to
        // completion and is filtered by sequence in `accept`.
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(request);
        }));
    }
}

impl<G, M> Drop for QueryDebouncer<G, M> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fakes::{candidate, FakeGeo};
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::sleep;

    fn debouncer(
        geo: FakeGeo,
        mode: SearchMode,
    ) -> (
        Arc<FakeGeo>,
        QueryDebouncer<FakeGeo>,
        UnboundedReceiver<SearchOutcome>,
    ) {
        let geo = Arc::new(geo);
        let (tx, rx) = mpsc::unbounded_channel();
        let settings = SearchSettings {
            mode,
            ..SearchSettings::default()
        };
        (Arc::clone(&geo), QueryDebouncer::new(geo, settings, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_never_hits_network() {
        let (geo, mut debouncer, mut rx) = debouncer(FakeGeo::new(), SearchMode::Live);

        for text in ["", "  ", "Lo", "  Lo  ", "ab\t"] {
            assert_eq!(debouncer.submit(text), Submission::Cleared);
        }

        sleep(Duration::from_secs(2)).await;
        assert!(geo.search_calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_cancels_pending_search() {
        let (geo, mut debouncer, mut rx) = debouncer(FakeGeo::new(), SearchMode::Live);

        assert!(matches!(
            debouncer.submit("Paris"),
            Submission::Scheduled { .. }
        ));
        sleep(Duration::from_millis(100)).await;
        assert_eq!(debouncer.submit("Pa"), Submission::Cleared);

        sleep(Duration::from_secs(2)).await;
        assert!(geo.search_calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_submits_coalesce() {
        let geo = FakeGeo::new().with_results("London", vec![candidate(1, "London, England")]);
        let (geo, mut debouncer, mut rx) = debouncer(geo, SearchMode::Live);

        for text in ["Lon", "Lond", "Londo", "London"] {
            debouncer.submit(text);
            sleep(Duration::from_millis(100)).await;
        }

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.query, "London");
        assert!(debouncer.is_current(outcome.sequence));
        assert_eq!(geo.search_calls(), vec!["London".to_string()]);

        sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_debounce_window() {
        let (geo, mut debouncer, mut rx) = debouncer(FakeGeo::new(), SearchMode::Live);

        debouncer.submit("Berlin");
        sleep(Duration::from_millis(299)).await;
        assert!(geo.search_calls().is_empty());

        sleep(Duration::from_millis(2)).await;
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.query, "Berlin");
        assert_eq!(geo.search_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_response_is_stale() {
        let geo = FakeGeo::new()
            .with_results("Lon", vec![candidate(1, "Lon, Somewhere")])
            .with_results("London", vec![candidate(2, "London, England")])
            .with_search_latency("Lon", Duration::from_millis(800));
        let (_geo, mut debouncer, mut rx) = debouncer(geo, SearchMode::Live);

        debouncer.submit("Lon");
        sleep(Duration::from_millis(350)).await; // "Lon" is now in flight
        debouncer.submit("London");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.query, "London");
        let accepted = debouncer.accept(first).unwrap().unwrap();
        assert_eq!(accepted[0].place_id, 2);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.query, "Lon");
        assert!(debouncer.accept(second).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_mode_waits_for_trigger() {
        let (geo, mut debouncer, mut rx) = debouncer(FakeGeo::new(), SearchMode::Manual);

        assert_eq!(debouncer.submit("Madrid"), Submission::Deferred);
        sleep(Duration::from_secs(2)).await;
        assert!(geo.search_calls().is_empty());

        assert!(matches!(debouncer.trigger(), Submission::Scheduled { .. }));
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.query, "Madrid");
        assert_eq!(geo.search_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_ignores_short_text() {
        let (geo, mut debouncer, _rx) = debouncer(FakeGeo::new(), SearchMode::Manual);

        debouncer.submit("Ma");
        assert_eq!(debouncer.trigger(), Submission::Ignored);
        sleep(Duration::from_secs(1)).await;
        assert!(geo.search_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_switch_discards_in_flight() {
        let geo = FakeGeo::new().with_search_latency("Rome", Duration::from_millis(500));
        let (_geo, mut debouncer, mut rx) = debouncer(geo, SearchMode::Live);

        debouncer.submit("Rome");
        sleep(Duration::from_millis(400)).await;
        debouncer.set_mode(SearchMode::Manual);
        assert_eq!(debouncer.mode(), SearchMode::Manual);

        let outcome = rx.recv().await.unwrap();
        assert!(debouncer.accept(outcome).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_returned_not_panicked() {
        let geo = FakeGeo::new().failing_search("Atlantis");
        let (_geo, mut debouncer, mut rx) = debouncer(geo, SearchMode::Live);

        debouncer.submit("Atlantis");
        let outcome = rx.recv().await.unwrap();
        let result = debouncer.accept(outcome).unwrap();
        assert!(matches!(result, Err(Error::Provider(_))));
    }

    #[test]
    fn test_search_mode_parse() {
        assert_eq!("live".parse::<SearchMode>().unwrap(), SearchMode::Live);
        assert_eq!("Manual".parse::<SearchMode>().unwrap(), SearchMode::Manual);
        assert!("sometimes".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::Live.toggled(), SearchMode::Manual);
    }
}
