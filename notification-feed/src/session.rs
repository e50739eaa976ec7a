//! Feed session: the cache, mutations and toasts of one open feed view

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::{ConfigError, MutationError};
use crate::services::fetch_client::FetchClient;
use crate::services::mutation::{MutationController, Outcome};
use crate::services::query_cache::{QueryCache, QuerySnapshot, QueryStatus};
use crate::services::toast::{Toast, ToastReceiver, Toaster};
use crate::services::transport::ReqwestTransport;
use crate::view::{render, FeedView, Intent};

pub struct FeedSession {
    cache: Arc<QueryCache>,
    mutations: MutationController,
    toasts: Mutex<ToastReceiver>,
}

impl FeedSession {
    pub fn new(client: FetchClient) -> Self {
        let cache = Arc::new(QueryCache::new(client.clone()));
        let (toaster, toasts) = Toaster::channel();
        let mutations = MutationController::new(client, cache.clone(), toaster);

        Self {
            cache,
            mutations,
            toasts: Mutex::new(toasts),
        }
    }

    /// Session talking to the configured notification service over HTTP
    pub fn from_config(config: &FeedConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(FetchClient::new(Arc::new(transport))))
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn mutations(&self) -> &MutationController {
        &self.mutations
    }

    /// Read through the cache, fetching if the entry is absent
    pub async fn refresh(&self) -> QuerySnapshot {
        self.cache.read().await
    }

    /// Current view model
    pub fn view(&self) -> FeedView {
        render(&self.cache.snapshot(), self.mutations.pending().as_ref())
    }

    /// Run a user intent, then re-read the invalidated list
    pub async fn dispatch(&self, intent: Intent) -> Result<Outcome, MutationError> {
        debug!(?intent, "Dispatching intent");

        let outcome = match intent {
            Intent::DeleteOne(id) => self.mutations.delete_one(&id).await?,
            Intent::DeleteAll => self.mutations.delete_all().await?,
        };

        if outcome.is_applied() {
            self.cache.read().await;
        }
        Ok(outcome)
    }

    /// Re-read whenever the cache entry becomes absent
    ///
    /// Never returns while the session is alive; spawn it and abort the
    /// task when the view closes. Reads issued here join any fetch already
    /// in flight.
    pub async fn follow_invalidations(&self) {
        let mut updates = self.cache.subscribe();
        loop {
            let absent = updates.borrow_and_update().status == QueryStatus::Absent;
            if absent {
                self.cache.read().await;
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
    }

    /// Toasts raised since the last call
    pub fn drain_toasts(&self) -> Vec<Toast> {
        self.toasts.lock().drain()
    }
}
