//! Fire-and-forget notifications.
//!
//! `publish` never blocks and never fails from the caller's point of view.
//! Delivery to a real mail or broker system is not wired up; the channel
//! consumer only logs what it receives.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub content: String,
}

pub trait Notifier: Send + Sync {
    fn publish(&self, message: Notification);
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn publish(&self, _message: Notification) {}
}

#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Notifier whose messages are drained by a background task that logs them.
    pub fn spawn_logging() -> (Self, JoinHandle<()>) {
        let (notifier, mut rx) = Self::new();
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                info!(to = %message.to, subject = %message.subject, "notification dispatched");
            }
        });
        (notifier, handle)
    }
}

impl Notifier for ChannelNotifier {
    fn publish(&self, message: Notification) {
        if let Err(e) = self.tx.send(message) {
            warn!(subject = %e.0.subject, "notification dropped: channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> Notification {
        Notification {
            to: "ops@example.com".to_string(),
            subject: "Car import completed".to_string(),
            content: "2 imported, 0 failed".to_string(),
        }
    }

    #[tokio::test]
    async fn channel_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.publish(message());
        notifier.publish(Notification {
            subject: "second".to_string(),
            ..message()
        });
        assert_eq!(rx.recv().await.unwrap(), message());
        assert_eq!(rx.recv().await.unwrap().subject, "second");
    }

    #[tokio::test]
    async fn publish_after_receiver_dropped_does_not_panic() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.publish(message());
    }
}
