//! Notification feed client
//!
//! Fetches the viewer's notifications, renders them, and deletes one or all
//! of them while keeping the rendered list coherent with the server.
//!
//! # Architecture
//!
//! ```text
//! FeedView ──read()──▶ QueryCache ──▶ FetchClient ──▶ HttpTransport ──▶ /api/notifications
//!    │                    ▲
//!    │ Intent             │ invalidate() after remote success
//!    ▼                    │
//! MutationController ─────┴──▶ FetchClient (DELETE) ; Toaster (success / error)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use notification_feed::{FeedConfig, FeedSession, Intent};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let session = FeedSession::from_config(&FeedConfig::from_env()?)?;
//!
//!     session.refresh().await;
//!     println!("{}", session.view());
//!
//!     session.dispatch(Intent::DeleteOne("65f0c2a1".into())).await?;
//!     for toast in session.drain_toasts() {
//!         println!("{}", toast);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod telemetry;
pub mod view;

pub use config::{FeedConfig, LogFormat};
pub use error::{ConfigError, FetchError, MutationError, MutationKind};
pub use models::{Ack, Actor, Notification, NotificationCollection, NotificationId, NotificationType};
pub use services::{
    FetchClient, HttpTransport, Method, MutationController, Outcome, PendingMutation, QueryCache,
    QueryKey, QuerySnapshot, QueryStatus, RawResponse, ReqwestTransport, Toast, ToastLevel,
};
pub use session::FeedSession;
pub use view::{render, FeedBody, FeedView, Intent, RowView};
