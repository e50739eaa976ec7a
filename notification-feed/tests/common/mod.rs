//! In-memory notification service for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use notification_feed::error::FetchResult;
use notification_feed::{
    Actor, FetchClient, HttpTransport, Method, Notification, NotificationType, RawResponse,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

const NOTIFICATIONS_PATH: &str = "/api/notifications";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
}

#[derive(Default)]
struct FakeState {
    notifications: Vec<Notification>,
    calls: Vec<RecordedCall>,
    list_failure: Option<(u16, Value)>,
    delete_failure: Option<(u16, Value)>,
    raw_override: Option<RawResponse>,
    hold_lists: bool,
    hold_deletes: bool,
}

impl FakeState {
    fn handle(&mut self, method: Method, path: &str) -> RawResponse {
        if let Some(raw) = &self.raw_override {
            return raw.clone();
        }

        let (status, body) = match (method, path) {
            (Method::Get, NOTIFICATIONS_PATH) => match &self.list_failure {
                Some(failure) => failure.clone(),
                None => (200, json!(self.notifications)),
            },
            (Method::Delete, NOTIFICATIONS_PATH) => match &self.delete_failure {
                Some(failure) => failure.clone(),
                None => {
                    self.notifications.clear();
                    (200, json!({"message": "Notifications deleted successfully"}))
                }
            },
            (Method::Delete, path) if path.starts_with("/api/notifications/") => {
                if let Some(failure) = &self.delete_failure {
                    failure.clone()
                } else {
                    let id = &path["/api/notifications/".len()..];
                    let before = self.notifications.len();
                    self.notifications.retain(|n| n.id.as_str() != id);
                    if self.notifications.len() == before {
                        (404, json!({"error": "Notification not found"}))
                    } else {
                        (200, json!({"message": "Notification deleted successfully"}))
                    }
                }
            }
            _ => (404, json!({"error": "Not found"})),
        };

        RawResponse::new(status, body.to_string())
    }
}

/// Fake backend behind `HttpTransport`
///
/// Requests are recorded and answered on arrival; "held" requests then wait
/// for a permit before the response is returned to the client.
pub struct FakeNotificationService {
    state: Mutex<FakeState>,
    list_gate: Semaphore,
    delete_gate: Semaphore,
}

impl FakeNotificationService {
    pub fn with_notifications(notifications: Vec<Notification>) -> Arc<Self> {
        let state = FakeState {
            notifications,
            ..FakeState::default()
        };
        Arc::new(Self {
            state: Mutex::new(state),
            list_gate: Semaphore::new(0),
            delete_gate: Semaphore::new(0),
        })
    }

    pub fn client(self: &Arc<Self>) -> FetchClient {
        FetchClient::new(self.clone())
    }

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        self.state.lock().notifications = notifications;
    }

    pub fn notification_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .notifications
            .iter()
            .map(|n| n.id.to_string())
            .collect()
    }

    pub fn fail_lists(&self, status: u16, body: Value) {
        self.state.lock().list_failure = Some((status, body));
    }

    pub fn fail_deletes(&self, status: u16, body: Value) {
        self.state.lock().delete_failure = Some((status, body));
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.state.lock().raw_override = Some(RawResponse::new(status, body));
    }

    pub fn hold_lists(&self) {
        self.state.lock().hold_lists = true;
    }

    pub fn hold_deletes(&self) {
        self.state.lock().hold_deletes = true;
    }

    pub fn release_lists(&self, n: usize) {
        self.list_gate.add_permits(n);
    }

    pub fn release_deletes(&self, n: usize) {
        self.delete_gate.add_permits(n);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.count(Method::Get)
    }

    pub fn delete_calls(&self) -> usize {
        self.count(Method::Delete)
    }

    fn count(&self, method: Method) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count()
    }
}

#[async_trait]
impl HttpTransport for FakeNotificationService {
    async fn send(&self, method: Method, path: &str) -> FetchResult<RawResponse> {
        let (response, held) = {
            let mut state = self.state.lock();
            state.calls.push(RecordedCall {
                method,
                path: path.to_string(),
            });
            let response = state.handle(method, path);
            let held = match method {
                Method::Get => state.hold_lists,
                Method::Delete => state.hold_deletes,
            };
            (response, held)
        };

        if held {
            let gate = match method {
                Method::Get => &self.list_gate,
                Method::Delete => &self.delete_gate,
            };
            gate.acquire().await.expect("gate closed").forget();
        }

        Ok(response)
    }
}

pub fn notification(id: &str, kind: &str, username: &str) -> Notification {
    Notification {
        id: id.into(),
        kind: NotificationType::from(kind),
        from: Actor {
            username: username.to_string(),
            profile_img: None,
        },
    }
}

pub fn sample_feed() -> Vec<Notification> {
    vec![
        notification("n1", "follow", "alice"),
        notification("n2", "like", "bob"),
        notification("n3", "like", "carol"),
    ]
}

/// Yield to other tasks until `condition` holds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}
