//! Reminder record and delivery payload, shared between the scheduler engine
//! and every notification sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ReminderId;

/// Lifecycle state of a reminder.
///
/// Only `Scheduled → Triggered` and `Scheduled → Cancelled` are legal; both
/// targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    /// Timer armed, waiting for `trigger_time`.
    Scheduled,
    /// Fired by the scheduler; the notification has been dispatched.
    Triggered,
    /// Cancelled by the user before it fired.
    Cancelled,
}

impl ReminderStatus {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, ReminderStatus::Scheduled)
    }
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReminderStatus::Scheduled => "scheduled",
            ReminderStatus::Triggered => "triggered",
            ReminderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// A reminder held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// UUIDv7 string, primary key.
    pub id: ReminderId,
    /// What the user asked to be reminded about. Never empty.
    pub task: String,
    /// Absolute UTC instant at which the notification fires.
    pub trigger_time: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: ReminderStatus,
}

impl Reminder {
    pub fn new(task: impl Into<String>, trigger_time: DateTime<Utc>) -> Self {
        Self {
            id: ReminderId::new(),
            task: task.into(),
            trigger_time,
            status: ReminderStatus::Scheduled,
        }
    }

    /// Notification line sent to the user when the reminder fires.
    pub fn notification_text(&self) -> String {
        format!("🔔 Reminder: {}", self.task)
    }
}

/// Parsed and ready-to-send reminder; passed from a channel-backed sink to
/// the delivery task that talks to the outside world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderDelivery {
    /// Originating reminder ID, used for logging.
    pub reminder_id: ReminderId,
    pub task: String,
    pub trigger_time: DateTime<Utc>,
    /// Rendered notification text.
    pub message: String,
}

impl From<&Reminder> for ReminderDelivery {
    fn from(reminder: &Reminder) -> Self {
        Self {
            reminder_id: reminder.id.clone(),
            task: reminder.task.clone(),
            trigger_time: reminder.trigger_time,
            message: reminder.notification_text(),
        }
    }
}
