//! Delivery targets for rendered notifications.

use async_trait::async_trait;
use eyre::Result;

use crate::notify::Notification;

/// Destination for rendered notifications.
///
/// Implementations should return an error instead of panicking; the poller
/// logs delivery failures and moves on to the next event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// Prints notifications to stdout in a two-line block:
///
/// ```text
/// [2024-01-01 12:30:45] Product: API, Playground
/// Status: This incident has been resolved.
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        println!("[{}] Product: {}", notification.timestamp, notification.products);
        println!("Status: {}", notification.message);
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_sink_delivery_succeeds() {
        let sink = ConsoleSink;
        let note = Notification {
            timestamp: "2024-01-01 12:30:45".to_owned(),
            products: "API".to_owned(),
            message: "Resolved.".to_owned(),
        };
        assert!(sink.deliver(&note).await.is_ok());
    }
}
