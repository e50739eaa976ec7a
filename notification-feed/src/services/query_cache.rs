//! Read-through cache for the notification list
//!
//! A single entry keyed by `"notifications"` moves through:
//!
//! ```text
//! Absent ──read()──▶ Loading ──fetch ok──▶ Resolved
//!   ▲                   │    └─fetch err─▶ Errored
//!   └───invalidate()────┴──────────────────────┘
//! ```
//!
//! Concurrent readers of a loading entry await the same shared fetch. Every
//! invalidation bumps the entry generation; a fetch that started under an
//! older generation never writes its result, and its readers fetch again.
//! Data from the last successful fetch is kept across invalidations so the
//! view can keep rendering it until the re-fetch lands.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::NotificationCollection;
use crate::services::fetch_client::FetchClient;
use crate::services::stats::{CacheStats, StatsCollector};

type FetchOutput = Result<Arc<NotificationCollection>, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutput>>;

/// Identifier of a cached query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey(&'static str);

impl QueryKey {
    pub const NOTIFICATIONS: QueryKey = QueryKey("notifications");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched, or invalidated
    Absent,
    Loading,
    Resolved,
    Errored,
}

/// Observable state of the cache entry
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub key: QueryKey,
    pub status: QueryStatus,
    /// Last successfully fetched collection, possibly stale
    pub data: Option<Arc<NotificationCollection>>,
    /// Error of the last fetch, if it failed
    pub error: Option<FetchError>,
}

impl QuerySnapshot {
    /// True until the current generation has settled
    pub fn is_pending(&self) -> bool {
        matches!(self.status, QueryStatus::Absent | QueryStatus::Loading)
    }

    pub fn notifications(&self) -> Option<&NotificationCollection> {
        self.data.as_deref()
    }
}

enum Phase {
    Absent,
    Loading(SharedFetch),
    Resolved,
    Errored,
}

impl Phase {
    fn status(&self) -> QueryStatus {
        match self {
            Phase::Absent => QueryStatus::Absent,
            Phase::Loading(_) => QueryStatus::Loading,
            Phase::Resolved => QueryStatus::Resolved,
            Phase::Errored => QueryStatus::Errored,
        }
    }
}

struct Entry {
    phase: Phase,
    data: Option<Arc<NotificationCollection>>,
    error: Option<FetchError>,
    generation: u64,
}

impl Entry {
    fn new() -> Self {
        Self {
            phase: Phase::Absent,
            data: None,
            error: None,
            generation: 0,
        }
    }

    fn snapshot(&self, key: QueryKey) -> QuerySnapshot {
        QuerySnapshot {
            key,
            status: self.phase.status(),
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

/// Session-scoped cache of the notification list
pub struct QueryCache {
    key: QueryKey,
    client: FetchClient,
    entry: Mutex<Entry>,
    updates: watch::Sender<QuerySnapshot>,
    stats: StatsCollector,
}

impl QueryCache {
    pub fn new(client: FetchClient) -> Self {
        let key = QueryKey::NOTIFICATIONS;
        let entry = Entry::new();
        let (updates, _) = watch::channel(entry.snapshot(key));

        Self {
            key,
            client,
            entry: Mutex::new(entry),
            updates,
            stats: StatsCollector::new(),
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    /// Current state, without triggering a fetch
    pub fn snapshot(&self) -> QuerySnapshot {
        self.entry.lock().snapshot(self.key)
    }

    /// Receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.updates.subscribe()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Read through the cache
    ///
    /// Settled entries are returned as-is. An absent entry starts a fetch; a
    /// loading entry is joined. Returns once the current generation settles.
    pub async fn read(&self) -> QuerySnapshot {
        loop {
            let (generation, fetch) = {
                let mut entry = self.entry.lock();
                let in_flight = match &entry.phase {
                    Phase::Resolved | Phase::Errored => return entry.snapshot(self.key),
                    Phase::Loading(fetch) => Some(fetch.clone()),
                    Phase::Absent => None,
                };

                let fetch = match in_flight {
                    Some(fetch) => {
                        debug!(key = %self.key, "Joining in-flight fetch");
                        fetch
                    }
                    None => {
                        let fetch = self.start_fetch();
                        entry.phase = Phase::Loading(fetch.clone());
                        self.publish(&entry);
                        fetch
                    }
                };

                (entry.generation, fetch)
            };

            let result = fetch.await;

            let mut entry = self.entry.lock();
            if entry.generation != generation {
                debug!(
                    key = %self.key,
                    started_at = generation,
                    current = entry.generation,
                    "Discarding fetch result from before invalidation"
                );
                continue;
            }

            // First joined reader to wake up settles the entry
            if matches!(entry.phase, Phase::Loading(_)) {
                match result {
                    Ok(collection) => {
                        info!(key = %self.key, count = collection.len(), "Query resolved");
                        entry.data = Some(collection);
                        entry.error = None;
                        entry.phase = Phase::Resolved;
                    }
                    Err(e) => {
                        warn!(key = %self.key, error = %e, "Query failed");
                        entry.error = Some(e);
                        entry.phase = Phase::Errored;
                    }
                }
                self.publish(&entry);
            }

            return entry.snapshot(self.key);
        }
    }

    /// Mark the entry absent so the next read re-fetches
    ///
    /// Does not fetch by itself. Invalidating an absent entry is a no-op.
    pub fn invalidate(&self) {
        self.stats.record_invalidation();

        let mut entry = self.entry.lock();
        if matches!(entry.phase, Phase::Absent) {
            debug!(key = %self.key, "Invalidation of absent entry ignored");
            return;
        }

        entry.generation = entry.generation.wrapping_add(1);
        entry.phase = Phase::Absent;

        info!(key = %self.key, generation = entry.generation, "Query invalidated");
        self.publish(&entry);
    }

    fn start_fetch(&self) -> SharedFetch {
        let client = self.client.clone();
        let stats = self.stats.clone();
        let key = self.key;

        stats.record_fetch();
        debug!(%key, "Starting fetch");

        async move {
            let started = Instant::now();
            let result = client
                .list_notifications()
                .await
                .map(|notifications| Arc::new(NotificationCollection::from_fetched(notifications)));

            stats.record_latency(started.elapsed().as_secs_f64() * 1000.0);
            if result.is_err() {
                stats.record_fetch_error();
            }
            result
        }
        .boxed()
        .shared()
    }

    fn publish(&self, entry: &Entry) {
        self.updates.send_replace(entry.snapshot(self.key));
    }
}
