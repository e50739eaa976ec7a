//! Fetch client for the notification service
//!
//! One call, one JSON body. Classification:
//! - status 2xx → parsed body
//! - other status → `RequestFailed` with the body's `error` message
//! - network or parse failure → `TransportFailed`

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::models::{Ack, Notification, NotificationId};
use crate::services::transport::{HttpTransport, Method};

/// List and delete-all endpoint
pub const NOTIFICATIONS_PATH: &str = "/api/notifications";

/// Delete-one endpoint for `id`
pub fn notification_path(id: &NotificationId) -> String {
    format!(
        "{}/{}",
        NOTIFICATIONS_PATH,
        urlencoding::encode(id.as_str())
    )
}

#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
}

impl FetchClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Issue one request and parse its body as JSON, whatever the status
    pub async fn call(&self, endpoint: &str, method: Method) -> FetchResult<Value> {
        let started = Instant::now();

        let response = match self.transport.send(method, endpoint).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, endpoint, error = %e, "Request did not complete");
                return Err(e);
            }
        };

        let body: Value = serde_json::from_slice(&response.body).map_err(|e| {
            warn!(
                %method,
                endpoint,
                status = response.status,
                error = %e,
                "Response body is not JSON"
            );
            FetchError::transport(e.to_string())
        })?;

        let latency_ms = started.elapsed().as_millis() as u64;

        if !response.is_success() {
            let err = FetchError::from_error_body(response.status, &body);
            warn!(
                %method,
                endpoint,
                status = response.status,
                latency_ms,
                error = %err,
                "Request rejected by server"
            );
            return Err(err);
        }

        debug!(
            %method,
            endpoint,
            status = response.status,
            latency_ms,
            "Request succeeded"
        );

        Ok(body)
    }

    /// `GET /api/notifications`
    pub async fn list_notifications(&self) -> FetchResult<Vec<Notification>> {
        let body = self.call(NOTIFICATIONS_PATH, Method::Get).await?;

        serde_json::from_value(body)
            .map_err(|e| FetchError::transport(format!("Unexpected notification list: {}", e)))
    }

    /// `DELETE /api/notifications/{id}`
    pub async fn delete_notification(&self, id: &NotificationId) -> FetchResult<Ack> {
        let body = self.call(&notification_path(id), Method::Delete).await?;
        Ok(Ack::from_body(&body))
    }

    /// `DELETE /api/notifications`
    pub async fn delete_all_notifications(&self) -> FetchResult<Ack> {
        let body = self.call(NOTIFICATIONS_PATH, Method::Delete).await?;
        Ok(Ack::from_body(&body))
    }
}
