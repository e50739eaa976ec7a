//! Delete-one and delete-all mutations
//!
//! Each mutation runs: remote call → cache invalidation → success toast.
//! All notification-mutating operations share one pending slot; a request
//! arriving while the slot is taken is dropped, not queued.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{FetchResult, MutationError, MutationKind};
use crate::models::{Ack, NotificationId};
use crate::services::fetch_client::FetchClient;
use crate::services::query_cache::QueryCache;
use crate::services::toast::Toaster;

pub const DELETE_ONE_SUCCESS: &str = "Notification deleted successfully";
pub const DELETE_ALL_SUCCESS: &str = "Notifications deleted successfully";

/// The mutation currently holding the pending slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingMutation {
    DeleteOne(NotificationId),
    DeleteAll,
}

impl PendingMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            PendingMutation::DeleteOne(_) => MutationKind::DeleteOne,
            PendingMutation::DeleteAll => MutationKind::DeleteAll,
        }
    }

    /// Whether this mutation targets the row `id`
    pub fn targets(&self, id: &NotificationId) -> bool {
        matches!(self, PendingMutation::DeleteOne(pending) if pending == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Remote call succeeded and the cache was invalidated
    Applied(Ack),
    /// Another mutation was in flight; nothing was sent
    Skipped,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Clears the pending slot when the mutation finishes or is dropped
struct PendingGuard<'a> {
    slot: &'a Mutex<Option<PendingMutation>>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}

pub struct MutationController {
    client: FetchClient,
    cache: Arc<QueryCache>,
    toaster: Toaster,
    pending: Mutex<Option<PendingMutation>>,
}

impl MutationController {
    pub fn new(client: FetchClient, cache: Arc<QueryCache>, toaster: Toaster) -> Self {
        Self {
            client,
            cache,
            toaster,
            pending: Mutex::new(None),
        }
    }

    /// Mutation currently in flight, if any
    pub fn pending(&self) -> Option<PendingMutation> {
        self.pending.lock().clone()
    }

    pub fn is_deleting(&self, id: &NotificationId) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|pending| pending.targets(id))
    }

    /// Delete a single notification
    pub async fn delete_one(&self, id: &NotificationId) -> Result<Outcome, MutationError> {
        self.run(
            PendingMutation::DeleteOne(id.clone()),
            self.client.delete_notification(id),
            DELETE_ONE_SUCCESS,
        )
        .await
    }

    /// Delete every notification of the viewer
    pub async fn delete_all(&self) -> Result<Outcome, MutationError> {
        self.run(
            PendingMutation::DeleteAll,
            self.client.delete_all_notifications(),
            DELETE_ALL_SUCCESS,
        )
        .await
    }

    async fn run<F>(
        &self,
        mutation: PendingMutation,
        request: F,
        success_message: &str,
    ) -> Result<Outcome, MutationError>
    where
        F: Future<Output = FetchResult<Ack>>,
    {
        let kind = mutation.kind();
        let Some(_guard) = self.try_begin(mutation) else {
            return Ok(Outcome::Skipped);
        };

        match request.await {
            Ok(ack) => {
                self.cache.invalidate();
                info!(%kind, ack = ?ack.message, "Mutation succeeded");
                self.toaster.success(success_message);
                Ok(Outcome::Applied(ack))
            }
            Err(e) => {
                warn!(%kind, error = %e, "Mutation failed");
                self.toaster.error(e.message());
                Err(MutationError::new(kind, e))
            }
        }
    }

    fn try_begin(&self, mutation: PendingMutation) -> Option<PendingGuard<'_>> {
        let mut slot = self.pending.lock();
        if let Some(current) = slot.as_ref() {
            debug!(
                in_flight = ?current,
                requested = ?mutation,
                "Mutation already in flight, dropping request"
            );
            return None;
        }

        debug!(mutation = ?mutation, "Mutation started");
        *slot = Some(mutation);

        Some(PendingGuard {
            slot: &self.pending,
        })
    }
}
