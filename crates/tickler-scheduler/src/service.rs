use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{info, warn};

use tickler_core::{config::SchedulerConfig, Reminder, ReminderId};

use crate::{
    engine::ReminderScheduler,
    error::Result,
    sink::NotificationSink,
    store::ReminderStore,
    types::FireReport,
};

/// Caller-facing reminder API: create, cancel, list.
///
/// Owns the store and the engine so that create-then-schedule and
/// cancel-then-unschedule always happen as a pair.
pub struct ReminderService {
    store: Arc<ReminderStore>,
    scheduler: ReminderScheduler,
}

impl ReminderService {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        config: SchedulerConfig,
        report_tx: Option<mpsc::Sender<FireReport>>,
    ) -> Self {
        let store = Arc::new(ReminderStore::new());
        let scheduler = ReminderScheduler::new(Arc::clone(&store), sink, config, report_tx);
        Self { store, scheduler }
    }

    /// Store a new reminder and arm its timer.
    ///
    /// `RejectedCreate` for a blank task or missing time. If the timer cannot
    /// be armed the store entry is removed again.
    pub fn create_reminder(
        &self,
        task: &str,
        trigger_time: Option<DateTime<Utc>>,
    ) -> Result<ReminderId> {
        let reminder = self.store.create(task, trigger_time)?;
        if let Err(e) = self.scheduler.schedule(&reminder.id, reminder.trigger_time) {
            warn!(reminder_id = %reminder.id, error = %e, "failed to arm timer: rolling back");
            self.store.delete(&reminder.id);
            return Err(e);
        }
        Ok(reminder.id)
    }

    /// Cancel a pending reminder. `false` when the id is unknown or the
    /// reminder already fired.
    pub fn cancel_reminder(&self, id: &ReminderId) -> bool {
        match self.store.cancel(id) {
            Some(_) => {
                self.scheduler.unschedule(id);
                true
            }
            None => {
                info!(reminder_id = %id, "cancel ignored: reminder unknown or already fired");
                false
            }
        }
    }

    /// Snapshot of reminders still waiting to fire, soonest first.
    pub fn list_pending(&self) -> Vec<Reminder> {
        self.store.list_scheduled()
    }

    pub fn get(&self, id: &ReminderId) -> Option<Reminder> {
        self.store.get(id)
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Disarm all timers; pending reminders stay in the store but never fire.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }
}
