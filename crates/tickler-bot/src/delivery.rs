//! Background tasks on the outbound side: printing fired reminders and
//! logging fire reports.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tickler_core::ReminderDelivery;
use tickler_scheduler::{FireOutcome, FireReport};

/// Print every delivered reminder to stdout until the channel closes.
pub async fn run_stdout_delivery(mut rx: mpsc::Receiver<ReminderDelivery>) {
    while let Some(delivery) = rx.recv().await {
        println!("{}", delivery.message);
        debug!(reminder_id = %delivery.reminder_id, "reminder delivered to stdout");
    }
    debug!("delivery channel closed");
}

/// Log the outcome of every fired reminder.
pub async fn run_report_logger(mut rx: mpsc::Receiver<FireReport>) {
    while let Some(report) = rx.recv().await {
        match report.outcome {
            FireOutcome::Delivered => {
                info!(reminder_id = %report.reminder_id, "reminder fired")
            }
            FireOutcome::DeliveryFailed { reason } => {
                warn!(reminder_id = %report.reminder_id, %reason, "reminder fired but delivery failed")
            }
        }
    }
}
