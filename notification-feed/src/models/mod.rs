use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Opaque notification identifier (`_id` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Notification type enumeration
///
/// Unknown values are kept so newer servers do not break the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// User started following
    Follow,
    /// User liked a post
    Like,
    Other(String),
}

impl NotificationType {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationType::Follow => "follow",
            NotificationType::Like => "like",
            NotificationType::Other(s) => s,
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NotificationType {
    fn from(s: &str) -> Self {
        match s {
            "follow" => NotificationType::Follow,
            "like" => NotificationType::Like,
            other => NotificationType::Other(other.to_string()),
        }
    }
}

impl Serialize for NotificationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(NotificationType::from(raw.as_str()))
    }
}

/// The user who triggered a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub username: String,
    #[serde(
        rename = "profileImg",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_img: Option<String>,
}

/// A notification as returned by `GET /api/notifications`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub from: Actor,
}

/// One fetch snapshot of the notification list, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Wrap a freshly fetched list
    ///
    /// Ids are unique within a snapshot; later duplicates are dropped.
    pub fn from_fetched(notifications: Vec<Notification>) -> Self {
        let fetched = notifications.len();
        let mut seen = HashSet::with_capacity(fetched);
        let items: Vec<Notification> = notifications
            .into_iter()
            .filter(|n| seen.insert(n.id.clone()))
            .collect();

        if items.len() != fetched {
            warn!(
                fetched,
                kept = items.len(),
                "Dropped duplicate notification ids from list response"
            );
        }

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.items.iter().any(|n| &n.id == id)
    }

    pub fn ids(&self) -> Vec<NotificationId> {
        self.items.iter().map(|n| n.id.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Success acknowledgment of a delete call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    /// Any JSON body counts as an ack; only `message` is kept
    pub fn from_body(body: &Value) -> Self {
        Self {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}
