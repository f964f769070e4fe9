use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `create` was called with a blank task or without a trigger time.
    #[error("Reminder rejected: {reason}")]
    RejectedCreate { reason: String },

    /// No reminder with the given ID exists in the store.
    #[error("Reminder not found: {id}")]
    ReminderNotFound { id: String },

    /// A timer is already armed for this reminder; reminders are never re-scheduled.
    #[error("Reminder already scheduled: {id}")]
    AlreadyScheduled { id: String },

    /// The engine has been shut down and accepts no new timers.
    #[error("Scheduler is shut down")]
    ShutDown,
}

impl SchedulerError {
    /// Short error code string for logs and user-facing replies.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulerError::RejectedCreate { .. } => "REJECTED_CREATE",
            SchedulerError::ReminderNotFound { .. } => "NOT_FOUND",
            SchedulerError::AlreadyScheduled { .. } => "ALREADY_SCHEDULED",
            SchedulerError::ShutDown => "SHUT_DOWN",
        }
    }
}

/// Failure reported by a [`NotificationSink`](crate::sink::NotificationSink).
///
/// Never rolls back the `Triggered` state and never blocks cleanup.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The message could not be handed to the delivery endpoint.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The receiving side of a channel-backed sink has gone away.
    #[error("Delivery channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
