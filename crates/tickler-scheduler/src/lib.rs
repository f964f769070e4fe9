//! `tickler-scheduler`: in-memory reminder store and one-shot timer engine.
//!
//! # Overview
//!
//! Reminders live in a [`store::ReminderStore`] (a `DashMap` keyed by
//! [`ReminderId`](tickler_core::ReminderId)). The [`engine::ReminderScheduler`]
//! arms one Tokio task per reminder; when it fires it marks the reminder
//! triggered and hands it to a [`sink::NotificationSink`].
//!
//! # Lifecycle
//!
//! | From        | To          | Who                                   |
//! |-------------|-------------|---------------------------------------|
//! | —           | `Scheduled` | [`ReminderStore::create`]             |
//! | `Scheduled` | `Triggered` | timer fire → [`ReminderStore::mark_triggered`] |
//! | `Scheduled` | `Cancelled` | [`ReminderService::cancel_reminder`]  |
//!
//! Whichever of fire and cancel wins the store transition decides the
//! outcome; the loser becomes a no-op, so a reminder is delivered at most once.

pub mod engine;
pub mod error;
pub mod service;
pub mod sink;
pub mod store;
pub mod types;

pub use engine::ReminderScheduler;
pub use error::{DeliveryError, Result, SchedulerError};
pub use service::ReminderService;
pub use sink::{ChannelSink, LogSink, NotificationSink};
pub use store::ReminderStore;
pub use types::{FireOutcome, FireReport};
