//! Fetch lifecycle and the in-memory client snapshot.
//!
//! A [`Session`] holds one immutable [`ClientSnapshot`] at a time. A fetch is
//! started with [`Session::begin_fetch`], which hands out a [`FetchTicket`]
//! stamped with the current generation. [`Session::teardown`] bumps the
//! generation, so a fetch that completes afterwards is discarded on commit
//! instead of overwriting newer state.

use crate::core::backend::BackendKind;
use crate::core::error::FetchError;
use crate::core::filter::filter;
use crate::core::record::{ClientRecord, normalize_batch};
use crate::core::resolver::{DataSourceResolver, Fetched};
use crate::core::summary::{Summary, summarize};
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// One fetch cycle's worth of normalized clients, sorted by name.
#[derive(Debug, Default)]
pub struct ClientSnapshot {
    pub clients: Vec<ClientRecord>,
    pub source: Option<BackendKind>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ClientSnapshot {
    pub fn from_fetched(fetched: Fetched) -> Self {
        Self {
            clients: normalize_batch(fetched.records),
            source: Some(fetched.source),
            fetched_at: Some(Utc::now()),
        }
    }

    /// Finds a client by exact id, then by exact name.
    pub fn find(&self, key: &str) -> Option<&ClientRecord> {
        self.clients
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.clients.iter().find(|c| c.client_name == key))
    }

    pub fn view(&self, query: &str, active_filter_index: usize, prefixes: &[String]) -> ClientView<'_> {
        let records = filter(&self.clients, query, active_filter_index, prefixes);
        let summary = summarize(records.iter().copied());
        ClientView { records, summary }
    }
}

/// Filtered records of a snapshot and their aggregate.
#[derive(Debug)]
pub struct ClientView<'a> {
    pub records: Vec<&'a ClientRecord>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed(String),
    /// Another fetch is outstanding or the session was torn down.
    Busy,
    /// The session was torn down while the fetch was in flight.
    Discarded,
}

#[derive(Default)]
struct SessionState {
    snapshot: Arc<ClientSnapshot>,
    error: Option<String>,
    loading: bool,
    closed: bool,
    generation: u64,
}

#[derive(Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a fetch as outstanding. Returns `None` if one already is, or if
    /// the session has been torn down.
    pub fn begin_fetch(&self) -> Option<FetchTicket> {
        let mut state = self.write();
        if state.loading || state.closed {
            return None;
        }
        state.loading = true;
        Some(FetchTicket {
            generation: state.generation,
        })
    }

    /// Applies a fetch result. Returns `false` and leaves state untouched if
    /// the ticket is stale.
    pub fn commit(&self, ticket: FetchTicket, result: Result<ClientSnapshot, FetchError>) -> bool {
        let mut state = self.write();
        if state.closed || state.generation != ticket.generation {
            debug!(
                ticket = ticket.generation,
                current = state.generation,
                "Discarding stale fetch result"
            );
            return false;
        }

        state.loading = false;
        match result {
            Ok(snapshot) => {
                state.snapshot = Arc::new(snapshot);
                state.error = None;
            }
            Err(e) => {
                state.snapshot = Arc::new(ClientSnapshot::default());
                state.error = Some(e.to_string());
            }
        }
        true
    }

    /// Invalidates any outstanding fetch. Later commits are discarded.
    pub fn teardown(&self) {
        let mut state = self.write();
        state.generation += 1;
        state.closed = true;
        state.loading = false;
        debug!(generation = state.generation, "Session torn down");
    }

    /// Fetches, normalizes and commits one batch of clients.
    pub async fn load(&self, resolver: &DataSourceResolver) -> LoadOutcome {
        let Some(ticket) = self.begin_fetch() else {
            return LoadOutcome::Busy;
        };

        let result = resolver
            .fetch_all_clients()
            .await
            .map(ClientSnapshot::from_fetched);
        let outcome = match &result {
            Ok(snapshot) => LoadOutcome::Loaded(snapshot.clients.len()),
            Err(e) => LoadOutcome::Failed(e.to_string()),
        };

        if !self.commit(ticket, result) {
            return LoadOutcome::Discarded;
        }
        info!(?outcome, "Client load finished");
        outcome
    }

    pub fn snapshot(&self) -> Arc<ClientSnapshot> {
        Arc::clone(&self.read().snapshot)
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }
}
