//! Debounced live search.
//!
//! [`SearchSession`] is the pure state machine: it decides when a request is
//! issued and whether a response may touch the visible results.
//! [`SearchController`] drives one session from a single tokio task, which
//! owns the debounce timer and the outstanding requests.
//!
//! Every issued request carries the session generation at the time it was
//! issued. A response is applied only if its generation is still current and
//! the session is still waiting for it; anything else is dropped silently.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::catalog::Product;
use crate::service::{CatalogQueryService, ServiceError};

/// Search lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStatus {
    /// No query, no results.
    Idle,
    /// Waiting for the input to settle.
    Debouncing,
    /// A request for the current query is outstanding.
    InFlight,
    /// Results for the current query are displayed.
    Settled,
}

impl SearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Debouncing => "debouncing",
            SearchStatus::InFlight => "in-flight",
            SearchStatus::Settled => "settled",
        }
    }
}

/// What the timer owner must do after an input change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    /// Cancel any pending timer.
    Cleared,
    /// (Re)start the debounce timer.
    Debounce,
}

/// A request to send to the query service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

/// Result of offering a response to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results published.
    Published(usize),
    /// The request failed; results cleared.
    Failed(ServiceError),
    /// The response was superseded and ignored.
    Stale,
}

/// Read-only view of the session, as published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub generation: u64,
    pub status: SearchStatus,
    pub results: Vec<Product>,
}

impl SearchSnapshot {
    /// Check if no further change is expected without new input.
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, SearchStatus::Idle | SearchStatus::Settled)
    }
}

/// Search state machine for one search surface.
#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    generation: u64,
    status: SearchStatus,
    results: Vec<Product>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            generation: 0,
            status: SearchStatus::Idle,
            results: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Record new input text.
    ///
    /// Blank text clears the results and returns to idle without a request.
    pub fn set_query(&mut self, text: &str) -> InputEffect {
        self.query = text.to_string();
        if text.trim().is_empty() {
            self.status = SearchStatus::Idle;
            self.results.clear();
            InputEffect::Cleared
        } else {
            self.status = SearchStatus::Debouncing;
            InputEffect::Debounce
        }
    }

    /// The debounce delay elapsed: issue the next request, if one is due.
    pub fn fire(&mut self) -> Option<SearchRequest> {
        if self.status != SearchStatus::Debouncing {
            return None;
        }
        self.generation += 1;
        self.status = SearchStatus::InFlight;
        Some(SearchRequest {
            generation: self.generation,
            query: self.query.trim().to_string(),
        })
    }

    /// Offer a response tagged with the generation of its request.
    pub fn accept(
        &mut self,
        generation: u64,
        result: Result<Vec<Product>, ServiceError>,
    ) -> SearchOutcome {
        if generation != self.generation || self.status != SearchStatus::InFlight {
            return SearchOutcome::Stale;
        }
        match result {
            Ok(results) => {
                self.results = results;
                self.status = SearchStatus::Settled;
                SearchOutcome::Published(self.results.len())
            }
            Err(e) => {
                self.results.clear();
                self.status = SearchStatus::Idle;
                SearchOutcome::Failed(e)
            }
        }
    }

    /// The user dismissed the search surface.
    pub fn dismiss(&mut self) {
        self.query.clear();
        self.results.clear();
        self.status = SearchStatus::Idle;
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            generation: self.generation,
            status: self.status,
            results: self.results.clone(),
        }
    }
}

/// Input to a running controller.
#[derive(Debug, Clone)]
enum SearchEvent {
    Input(String),
    Dismiss,
}

/// Drives a [`SearchSession`] against a query service.
pub struct SearchController<Q: ?Sized> {
    service: Arc<Q>,
    debounce: Duration,
    session: SearchSession,
}

impl<Q> SearchController<Q>
where
    Q: CatalogQueryService + ?Sized + 'static,
{
    /// Create a controller with the given trailing debounce delay.
    pub fn new(service: Arc<Q>, debounce: Duration) -> Self {
        Self {
            service,
            debounce,
            session: SearchSession::new(),
        }
    }

    /// Start the controller task. Must be called within a tokio runtime.
    pub fn spawn(self) -> SearchHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(self.session.snapshot());
        let task = tokio::spawn(self.run(events_rx, snapshot_tx));

        SearchHandle {
            events: events_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<SearchEvent>,
        snapshots: watch::Sender<SearchSnapshot>,
    ) {
        let timer = tokio::time::sleep(self.debounce);
        tokio::pin!(timer);
        let mut pending = FuturesUnordered::new();

        loop {
            let debouncing = self.session.status() == SearchStatus::Debouncing;

            tokio::select! {
                event = events.recv() => match event {
                    Some(SearchEvent::Input(text)) => {
                        if self.session.set_query(&text) == InputEffect::Debounce {
                            timer.as_mut().reset(Instant::now() + self.debounce);
                        }
                        snapshots.send_replace(self.session.snapshot());
                    }
                    Some(SearchEvent::Dismiss) => {
                        self.session.dismiss();
                        snapshots.send_replace(self.session.snapshot());
                    }
                    None => {
                        debug!("Search surface closed, pending timer cancelled");
                        break;
                    }
                },

                () = &mut timer, if debouncing => {
                    if let Some(request) = self.session.fire() {
                        debug!(generation = request.generation, query = %request.query, "Search request issued");
                        let service = Arc::clone(&self.service);
                        pending.push(async move {
                            let result = service.search(&request.query).await;
                            (request.generation, result)
                        });
                        snapshots.send_replace(self.session.snapshot());
                    }
                },

                Some((generation, result)) = pending.next(), if !pending.is_empty() => {
                    match self.session.accept(generation, result) {
                        SearchOutcome::Published(count) => {
                            debug!(generation, count, "Search results published");
                            snapshots.send_replace(self.session.snapshot());
                        }
                        SearchOutcome::Failed(e) => {
                            warn!(generation, error = %e, "Search failed, showing no results");
                            snapshots.send_replace(self.session.snapshot());
                        }
                        SearchOutcome::Stale => {
                            debug!(generation, current = self.session.generation(), "Discarded stale search response");
                        }
                    }
                },
            }
        }
    }
}

/// Handle to a running [`SearchController`].
///
/// Dropping the handle stops the controller and cancels its pending timer.
/// Requests already sent are abandoned, never applied.
pub struct SearchHandle {
    events: mpsc::UnboundedSender<SearchEvent>,
    snapshots: watch::Receiver<SearchSnapshot>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// Feed the current text of the search box.
    pub fn input(&self, text: impl Into<String>) -> bool {
        self.events.send(SearchEvent::Input(text.into())).is_ok()
    }

    /// Clear the query and results (e.g., a click outside the results).
    pub fn dismiss(&self) -> bool {
        self.events.send(SearchEvent::Dismiss).is_ok()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until `query` is the live text and its search has resolved.
    ///
    /// Returns `None` if the controller stopped first.
    pub async fn wait_settled(&self, query: &str) -> Option<SearchSnapshot> {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| s.query == query && s.is_resolved())
            .await
            .ok()?;
        Some(snapshot.clone())
    }

    /// Stop the controller and wait for its task to end.
    pub async fn shutdown(self) {
        let SearchHandle { events, task, .. } = self;
        drop(events);
        let _ = task.await;
    }
}
