//! Feed view model
//!
//! `render` is a pure function of the cache snapshot and the pending
//! mutation. It never fetches; it only describes what to show and which
//! intents the user can issue.

use std::fmt;

use crate::models::{Notification, NotificationId, NotificationType};
use crate::services::mutation::PendingMutation;
use crate::services::query_cache::{QuerySnapshot, QueryStatus};

pub const FEED_TITLE: &str = "Notifications";
pub const DELETE_ALL_LABEL: &str = "Delete all notifications";
pub const EMPTY_FEED_TEXT: &str = "No notifications 🤔";
pub const AVATAR_PLACEHOLDER: &str = "/avatar-placeholder.png";

/// User intents issued from the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    DeleteOne(NotificationId),
    DeleteAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    User,
    Heart,
}

impl Icon {
    fn for_type(kind: &NotificationType) -> Option<Icon> {
        match kind {
            NotificationType::Follow => Some(Icon::User),
            NotificationType::Like => Some(Icon::Heart),
            NotificationType::Other(_) => None,
        }
    }

    fn glyph(&self) -> &'static str {
        match self {
            Icon::User => "👤",
            Icon::Heart => "♥",
        }
    }
}

/// One rendered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: NotificationId,
    pub icon: Option<Icon>,
    pub handle: String,
    pub profile_link: String,
    pub avatar_url: String,
    pub action_text: &'static str,
    /// The delete-one for this row is in flight
    pub busy: bool,
}

impl RowView {
    fn from_notification(notification: &Notification, pending: Option<&PendingMutation>) -> Self {
        let actor = &notification.from;
        let action_text = match notification.kind {
            NotificationType::Follow => "followed you",
            _ => "liked your post",
        };

        Self {
            id: notification.id.clone(),
            icon: Icon::for_type(&notification.kind),
            handle: format!("@{}", actor.username),
            profile_link: format!("/profile/{}", actor.username),
            avatar_url: actor
                .profile_img
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| AVATAR_PLACEHOLDER.to_string()),
            action_text,
            busy: pending.is_some_and(|p| p.targets(&notification.id)),
        }
    }

    /// Intent issued by this row's delete button
    pub fn delete_intent(&self) -> Intent {
        Intent::DeleteOne(self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedBody {
    Loading,
    /// Fetch failed and nothing was ever loaded
    Errored(String),
    Empty,
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    pub title: &'static str,
    pub delete_all_label: &'static str,
    pub body: FeedBody,
    /// Error of the latest fetch, shown above stale rows
    pub error_banner: Option<String>,
    /// Stale rows are shown while a re-fetch is pending
    pub refreshing: bool,
}

impl FeedView {
    pub fn rows(&self) -> &[RowView] {
        match &self.body {
            FeedBody::Rows(rows) => rows,
            _ => &[],
        }
    }
}

/// Render the feed from cache and mutation state
pub fn render(snapshot: &QuerySnapshot, pending: Option<&PendingMutation>) -> FeedView {
    let failed = snapshot.status == QueryStatus::Errored;
    let error_message = snapshot
        .error
        .as_ref()
        .filter(|_| failed)
        .map(|e| e.message().to_string());

    let (body, error_banner) = match snapshot.notifications() {
        Some(collection) if collection.is_empty() => (FeedBody::Empty, error_message),
        Some(collection) => {
            let rows = collection
                .iter()
                .map(|n| RowView::from_notification(n, pending))
                .collect();
            (FeedBody::Rows(rows), error_message)
        }
        None => match error_message {
            Some(message) => (FeedBody::Errored(message), None),
            None => (FeedBody::Loading, None),
        },
    };

    FeedView {
        title: FEED_TITLE,
        delete_all_label: DELETE_ALL_LABEL,
        refreshing: snapshot.data.is_some() && snapshot.is_pending(),
        body,
        error_banner,
    }
}

impl fmt::Display for FeedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if self.refreshing {
            write!(f, " (refreshing)")?;
        }
        writeln!(f, "    [{}]", self.delete_all_label)?;
        writeln!(f, "{}", "-".repeat(48))?;

        if let Some(banner) = &self.error_banner {
            writeln!(f, "! {}", banner)?;
        }

        match &self.body {
            FeedBody::Loading => writeln!(f, "Loading..."),
            FeedBody::Errored(message) => writeln!(f, "! {}", message),
            FeedBody::Empty => writeln!(f, "{}", EMPTY_FEED_TEXT),
            FeedBody::Rows(rows) => {
                for row in rows {
                    let icon = row.icon.map(|i| i.glyph()).unwrap_or(" ");
                    let action = if row.busy { "deleting..." } else { "delete" };
                    writeln!(
                        f,
                        "{} {} {}  <{}>  [{}: {}]",
                        icon, row.handle, row.action_text, row.profile_link, action, row.id
                    )?;
                }
                Ok(())
            }
        }
    }
}
