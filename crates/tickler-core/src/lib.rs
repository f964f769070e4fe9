//! `tickler-core`: types shared by every Tickler crate: configuration,
//! the reminder record, identifiers and the top-level error type.

pub mod config;
pub mod error;
pub mod reminder;
pub mod types;

pub use config::TicklerConfig;
pub use error::{Result, TicklerError};
pub use reminder::{Reminder, ReminderDelivery, ReminderStatus};
pub use types::ReminderId;
