//! Session controller
//!
//! The single logical thread of control for a location session. User intents
//! and network completions are applied one at a time to the
//! `LocationSessionState`; network calls run on spawned tasks that only
//! report back through the completion channel.
//!
//! Address lookups and article resolutions carry sequence numbers like the
//! search debouncer, so a late answer to a superseded request is dropped
//! instead of overwriting newer state.

use crate::article::{is_valid_code, ArticleResolver, Encyclopedia, ResolvedArticle};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::position::PositionSource;
use crate::geo::{AddressRecord, GeoSearch};
use crate::search::{QueryDebouncer, SearchMode, SearchOutcome, SearchSettings, Submission};
use crate::session::{LocationSessionState, SessionSnapshot};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Something the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// The search box text changed
    TextChanged(String),
    /// Search form submitted
    Submit,
    SetMode(SearchMode),
    ToggleMode,
    /// Pick an entry from the candidate list by index
    SelectCandidate(usize),
    /// Map click or typed coordinate
    SelectCoordinate(Coordinate),
    LocateMe,
    OpenArticle,
    ChangeLanguage(String),
    CloseArticle,
    CloseAddress,
}

/// A finished network call
#[derive(Debug)]
pub enum Completion {
    Search(SearchOutcome),
    Address {
        sequence: u64,
        coordinate: Coordinate,
        result: Result<AddressRecord>,
    },
    Article {
        sequence: u64,
        language: String,
        result: Result<ResolvedArticle>,
    },
    Position(Result<Coordinate>),
}

impl From<SearchOutcome> for Completion {
    fn from(outcome: SearchOutcome) -> Self {
        Self::Search(outcome)
    }
}

/// Applies intents and completions to a `LocationSessionState`
pub struct Controller<G, E, P> {
    session: LocationSessionState,
    geo: Arc<G>,
    debouncer: QueryDebouncer<G, Completion>,
    resolver: ArticleResolver<E>,
    position: Arc<P>,
    address_sequence: u64,
    article_sequence: u64,
    /// Language selected before an unconfirmed language change
    rollback_language: Option<String>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl<G, E, P> Controller<G, E, P>
where
    G: GeoSearch + 'static,
    E: Encyclopedia + 'static,
    P: PositionSource + 'static,
{
    pub fn new(
        session: LocationSessionState,
        geo: Arc<G>,
        encyclopedia: Arc<E>,
        position: Arc<P>,
        settings: SearchSettings,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let settings = SearchSettings {
            mode: session.search_mode(),
            ..settings
        };
        let debouncer = QueryDebouncer::new(Arc::clone(&geo), settings, completions_tx.clone());

        Self {
            session,
            geo,
            debouncer,
            resolver: ArticleResolver::new(encyclopedia),
            position,
            address_sequence: 0,
            article_sequence: 0,
            rollback_language: None,
            completions_tx,
            completions_rx,
        }
    }

    pub fn session(&self) -> &LocationSessionState {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Wait for the next finished network call
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Drive the session until `intents` closes, calling `render` after every
    /// change. Returns the final snapshot.
    pub async fn run<F>(mut self, mut intents: mpsc::Receiver<Intent>, mut render: F) -> SessionSnapshot
    where
        F: FnMut(&SessionSnapshot),
    {
        render(&self.snapshot());
        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle(intent),
                    None => break,
                },
                Some(completion) = self.completions_rx.recv() => self.apply(completion),
            }
            render(&self.snapshot());
        }
        self.shutdown()
    }

    /// Cancel outstanding work and close the session
    pub fn shutdown(mut self) -> SessionSnapshot {
        self.debouncer.cancel();
        self.address_sequence += 1;
        self.article_sequence += 1;
        self.session.close()
    }

    /// Apply a user intent
    pub fn handle(&mut self, intent: Intent) {
        debug!(?intent, "intent");
        match intent {
            Intent::TextChanged(text) => self.text_changed(&text),
            Intent::Submit => {
                if let Submission::Scheduled { .. } = self.debouncer.trigger() {
                    self.session.update_activity(|a| a.searching = true);
                }
            }
            Intent::SetMode(mode) => self.set_mode(mode),
            Intent::ToggleMode => {
                let mode = self.debouncer.mode().toggled();
                self.set_mode(mode);
            }
            Intent::SelectCandidate(index) => self.select_candidate(index),
            Intent::SelectCoordinate(coordinate) => self.select_coordinate(coordinate),
            Intent::LocateMe => self.locate(),
            Intent::OpenArticle => self.open_article(),
            Intent::ChangeLanguage(code) => self.change_language(&code),
            Intent::CloseArticle => self.close_article(),
            Intent::CloseAddress => {
                self.article_sequence += 1;
                self.session.update_activity(|a| a.loading_article = false);
                self.session.dismiss_address();
            }
        }
    }

    /// Apply a finished network call
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Search(outcome) => self.search_finished(outcome),
            Completion::Address {
                sequence,
                coordinate,
                result,
            } => self.address_finished(sequence, coordinate, result),
            Completion::Article {
                sequence,
                language,
                result,
            } => self.article_finished(sequence, &language, result),
            Completion::Position(result) => self.position_finished(result),
        }
    }

    fn text_changed(&mut self, text: &str) {
        match self.debouncer.submit(text) {
            Submission::Cleared => {
                self.session.clear_candidates();
                self.session.update_activity(|a| a.searching = false);
            }
            Submission::Scheduled { .. } => {
                self.session.update_activity(|a| a.searching = true);
            }
            Submission::Deferred | Submission::Ignored => {}
        }
    }

    fn set_mode(&mut self, mode: SearchMode) {
        self.debouncer.set_mode(mode);
        self.session.set_search_mode(mode);
        self.session.clear_candidates();
        self.session.update_activity(|a| a.searching = false);
    }

    fn search_finished(&mut self, outcome: SearchOutcome) {
        let Some(result) = self.debouncer.accept(outcome) else {
            return;
        };

        self.session.update_activity(|a| a.searching = false);
        match result {
            Ok(candidates) => {
                debug!(count = candidates.len(), "search results");
                self.session.replace_candidates(candidates);
            }
            Err(e) => {
                self.session.clear_candidates();
                self.session.set_error(e.to_string());
            }
        }
    }

    fn select_candidate(&mut self, index: usize) {
        let Some(candidate) = self.session.candidates().get(index).cloned() else {
            warn!(index, "no search candidate at index");
            return;
        };

        self.debouncer.clear();
        self.session.clear_candidates();
        self.session.update_activity(|a| a.searching = false);
        info!(place = %candidate.display_name, "candidate selected");
        self.select_coordinate(candidate.coordinate);
    }

    fn select_coordinate(&mut self, coordinate: Coordinate) {
        self.session.clear_error();
        self.session.select_coordinate(coordinate);
        self.session.update_activity(|a| a.loading_address = true);

        self.address_sequence += 1;
        let sequence = self.address_sequence;
        let geo = Arc::clone(&self.geo);
        let completions = self.completions_tx.clone();

        tokio::spawn(async move {
            let result = geo.reverse_lookup(coordinate).await;
            let _ = completions.send(Completion::Address {
                sequence,
                coordinate,
                result,
            });
        });
    }

    fn address_finished(&mut self, sequence: u64, coordinate: Coordinate, result: Result<AddressRecord>) {
        if sequence != self.address_sequence {
            debug!(sequence, latest = self.address_sequence, %coordinate, "discarding stale address");
            return;
        }

        self.session.update_activity(|a| a.loading_address = false);
        match result {
            Ok(address) => {
                if self.session.address() != Some(&address) {
                    self.article_sequence += 1;
                    if self.session.activity().loading_article {
                        self.session.update_activity(|a| a.loading_article = false);
                        self.restore_language();
                    }
                }
                info!(place = %address.display_name, "address resolved");
                self.session.set_address(address);
            }
            Err(e) => {
                warn!(%coordinate, error = %e, "reverse lookup failed");
                self.session.set_error(e.to_string());
            }
        }
    }

    fn locate(&mut self) {
        self.session.clear_error();
        self.session.update_activity(|a| a.locating = true);

        let position = Arc::clone(&self.position);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = position.current_position().await;
            let _ = completions.send(Completion::Position(result));
        });
    }

    fn position_finished(&mut self, result: Result<Coordinate>) {
        self.session.update_activity(|a| a.locating = false);
        match result {
            Ok(coordinate) => self.select_coordinate(coordinate),
            Err(e) => {
                warn!(error = %e, "current position unavailable");
                self.session.set_error(e.to_string());
            }
        }
    }

    fn open_article(&mut self) {
        let language = self.session.language().to_string();
        self.start_resolution(&language);
    }

    fn change_language(&mut self, code: &str) {
        let code = code.trim();
        if code.is_empty() {
            return;
        }
        if !is_valid_code(code) {
            warn!(code, "rejected language code");
            self.session
                .set_error(Error::InvalidLanguage(code.to_string()).to_string());
            return;
        }

        let previous = self.session.select_language(code);
        if self.rollback_language.is_none() && previous != code {
            self.rollback_language = Some(previous);
        }
        if self.session.article().is_none() && !self.session.activity().loading_article {
            // Nothing on display; the choice applies to the next article
            return;
        }
        self.start_resolution(code);
    }

    fn start_resolution(&mut self, language: &str) {
        self.session.clear_error();

        let Some(term) = self
            .session
            .address()
            .and_then(|a| a.article_term())
            .map(str::to_string)
        else {
            self.session.set_error(Error::MissingSearchTerm.to_string());
            self.restore_language();
            return;
        };

        self.article_sequence += 1;
        let sequence = self.article_sequence;
        self.session.update_activity(|a| a.loading_article = true);

        let resolver = self.resolver.clone();
        let completions = self.completions_tx.clone();
        let language = language.to_string();

        tokio::spawn(async move {
            let result = resolver.resolve(&term, &language).await;
            let _ = completions.send(Completion::Article {
                sequence,
                language,
                result,
            });
        });
    }

    fn article_finished(&mut self, sequence: u64, language: &str, result: Result<ResolvedArticle>) {
        if sequence != self.article_sequence {
            debug!(sequence, latest = self.article_sequence, language, "discarding stale article");
            return;
        }

        self.session.update_activity(|a| a.loading_article = false);
        match result {
            Ok(resolved) => {
                info!(title = %resolved.summary.title, language, "article resolved");
                self.rollback_language = None;
                self.session.set_article(resolved.into());
            }
            Err(e) => {
                self.session.set_error(e.to_string());
                self.restore_language();
            }
        }
    }

    fn close_article(&mut self) {
        self.article_sequence += 1;
        self.session.update_activity(|a| a.loading_article = false);
        self.restore_language();
        self.session.dismiss_article();
    }

    /// Point the language indicator back at the article on display, or at
    /// the language selected before the abandoned change
    fn restore_language(&mut self) {
        let saved = self.rollback_language.take();
        let target = match self.session.article() {
            Some(view) => view.summary.language_code.clone(),
            None => match saved {
                Some(saved) => saved,
                None => return,
            },
        };

        let abandoned = self.session.select_language(&target);
        if abandoned != target {
            debug!(%abandoned, restored = %target, "language selection rolled back");
        }
    }
}
