use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use tickler_core::{Reminder, ReminderDelivery};

use crate::error::DeliveryError;

/// Outbound side of a fired reminder: whatever actually reaches the user.
///
/// Implementations must be `Send + Sync` so the engine can share one sink
/// across every timer task. Retry and backoff, if any, belong here: the
/// engine calls `deliver` exactly once per fired reminder.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Stable lowercase identifier used in logs (e.g. `"channel"`).
    fn name(&self) -> &str;

    /// Deliver the notification for a reminder that has just fired.
    async fn deliver(&self, reminder: &Reminder) -> Result<(), DeliveryError>;
}

/// Forwards each fired reminder as a [`ReminderDelivery`] to a delivery task.
pub struct ChannelSink {
    tx: mpsc::Sender<ReminderDelivery>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ReminderDelivery>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    async fn deliver(&self, reminder: &Reminder) -> Result<(), DeliveryError> {
        self.tx
            .send(ReminderDelivery::from(reminder))
            .await
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}

/// Writes the notification line to the log. Useful when no transport is wired up.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, reminder: &Reminder) -> Result<(), DeliveryError> {
        info!(reminder_id = %reminder.id, "{}", reminder.notification_text());
        Ok(())
    }
}
