//! User-facing notifications.
//!
//! Typed results carry the outcome of every action; a [`Notifier`] is the
//! side channel that tells a human about it.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Destructive,
}

/// A short title/description pair shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Sink for notifications. Must never block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
            Variant::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
        }
    }
}

/// Forwards notifications to a consumer task (a UI loop, a test).
impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}
