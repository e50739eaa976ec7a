//! Transient user-facing messages raised by mutations

use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
        };
        write!(f, "{} {}", marker, self.message)
    }
}

/// Sending half of the toast channel
#[derive(Clone)]
pub struct Toaster {
    tx: mpsc::UnboundedSender<Toast>,
}

/// Receiving half of the toast channel
pub struct ToastReceiver {
    rx: mpsc::UnboundedReceiver<Toast>,
}

impl Toaster {
    pub fn channel() -> (Toaster, ToastReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Toaster { tx }, ToastReceiver { rx })
    }

    pub fn success(&self, message: impl Into<String>) {
        self.raise(ToastLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.raise(ToastLevel::Error, message.into());
    }

    fn raise(&self, level: ToastLevel, message: String) {
        let toast = Toast {
            level,
            message,
            raised_at: Utc::now(),
        };
        if self.tx.send(toast).is_err() {
            debug!("Toast receiver dropped, message discarded");
        }
    }
}

impl ToastReceiver {
    /// Take every toast raised so far
    pub fn drain(&mut self) -> Vec<Toast> {
        let mut toasts = Vec::new();
        while let Ok(toast) = self.rx.try_recv() {
            toasts.push(toast);
        }
        toasts
    }

    /// Wait for the next toast; `None` once every `Toaster` is gone
    pub async fn recv(&mut self) -> Option<Toast> {
        self.rx.recv().await
    }
}
