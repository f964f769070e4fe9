//! `ReminderStore`: concurrency-safe map of every live reminder.
//!
//! All state transitions happen under the DashMap shard lock of the entry,
//! so `mark_triggered` and `cancel` on the same id are mutually exclusive.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use tickler_core::{Reminder, ReminderId, ReminderStatus};

use crate::error::{Result, SchedulerError};

/// In-memory reminder table. Lives for the lifetime of the process.
pub struct ReminderStore {
    reminders: DashMap<ReminderId, Reminder>,
}

impl ReminderStore {
    pub fn new() -> Self {
        Self {
            reminders: DashMap::new(),
        }
    }

    /// Insert a new `Scheduled` reminder and return a snapshot of it.
    ///
    /// Rejects a blank task or a missing trigger time; nothing is inserted then.
    pub fn create(&self, task: &str, trigger_time: Option<DateTime<Utc>>) -> Result<Reminder> {
        let task = task.trim();
        if task.is_empty() {
            return Err(SchedulerError::RejectedCreate {
                reason: "task is empty".to_string(),
            });
        }
        let Some(trigger_time) = trigger_time else {
            return Err(SchedulerError::RejectedCreate {
                reason: "trigger time is missing".to_string(),
            });
        };

        let reminder = Reminder::new(task, trigger_time);
        self.reminders.insert(reminder.id.clone(), reminder.clone());
        info!(reminder_id = %reminder.id, %trigger_time, "reminder created");
        Ok(reminder)
    }

    /// Move a `Scheduled` reminder to `Triggered` and return the updated record.
    ///
    /// Returns `None` ("already handled") when the id is unknown or the
    /// reminder is no longer `Scheduled`.
    pub fn mark_triggered(&self, id: &ReminderId) -> Option<Reminder> {
        let mut entry = self.reminders.get_mut(id)?;
        if !entry.status.is_scheduled() {
            return None;
        }
        entry.status = ReminderStatus::Triggered;
        debug!(reminder_id = %id, "reminder marked triggered");
        Some(entry.clone())
    }

    /// Remove a `Scheduled` reminder. The returned record carries status `Cancelled`.
    ///
    /// `None` for unknown ids and for reminders that already fired; a normal
    /// outcome, not an error.
    pub fn cancel(&self, id: &ReminderId) -> Option<Reminder> {
        let (_, mut reminder) = self
            .reminders
            .remove_if(id, |_, r| r.status.is_scheduled())?;
        reminder.status = ReminderStatus::Cancelled;
        info!(reminder_id = %id, "reminder cancelled");
        Some(reminder)
    }

    /// Unconditional removal. Returns whether anything was removed.
    pub fn delete(&self, id: &ReminderId) -> bool {
        let removed = self.reminders.remove(id).is_some();
        if removed {
            debug!(reminder_id = %id, "reminder deleted");
        }
        removed
    }

    pub fn get(&self, id: &ReminderId) -> Option<Reminder> {
        self.reminders.get(id).map(|r| r.clone())
    }

    /// Snapshot of all `Scheduled` reminders, soonest first.
    pub fn list_scheduled(&self) -> Vec<Reminder> {
        let mut pending: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|r| r.status.is_scheduled())
            .map(|r| r.clone())
            .collect();
        pending.sort_by(|a, b| {
            a.trigger_time
                .cmp(&b.trigger_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        pending
    }

    /// Number of reminders held, in any status.
    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

impl Default for ReminderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn soon() -> Option<DateTime<Utc>> {
        Some(Utc::now() + Duration::minutes(5))
    }

    #[test]
    fn create_inserts_scheduled() {
        let store = ReminderStore::new();
        let r = store.create("  call john ", soon()).unwrap();
        assert_eq!(r.task, "call john");
        assert_eq!(r.status, ReminderStatus::Scheduled);
        assert_eq!(store.get(&r.id), Some(r));
    }

    #[test]
    fn empty_task_is_rejected() {
        let store = ReminderStore::new();
        let err = store.create("   ", soon()).unwrap_err();
        assert!(matches!(err, SchedulerError::RejectedCreate { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_time_is_rejected() {
        let store = ReminderStore::new();
        let err = store.create("call john", None).unwrap_err();
        assert_eq!(err.code(), "REJECTED_CREATE");
        assert!(store.is_empty());
    }

    #[test]
    fn ids_stay_unique_across_deletes() {
        let store = ReminderStore::new();
        let a = store.create("a", soon()).unwrap();
        store.delete(&a.id);
        let b = store.create("b", soon()).unwrap();
        let c = store.create("c", soon()).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
    }

    #[test]
    fn create_then_cancel_leaves_nothing_scheduled() {
        let store = ReminderStore::new();
        let r = store.create("call john", soon()).unwrap();
        let cancelled = store.cancel(&r.id).unwrap();
        assert_eq!(cancelled.status, ReminderStatus::Cancelled);
        assert!(store.list_scheduled().is_empty());
        assert!(store.get(&r.id).is_none());
    }

    #[test]
    fn cancel_unknown_is_none() {
        let store = ReminderStore::new();
        assert!(store.cancel(&ReminderId::from("nope")).is_none());
    }

    #[test]
    fn mark_triggered_only_once() {
        let store = ReminderStore::new();
        let r = store.create("call john", soon()).unwrap();
        let fired = store.mark_triggered(&r.id).unwrap();
        assert_eq!(fired.status, ReminderStatus::Triggered);
        assert!(store.mark_triggered(&r.id).is_none());
    }

    #[test]
    fn triggered_cannot_be_cancelled() {
        let store = ReminderStore::new();
        let r = store.create("call john", soon()).unwrap();
        store.mark_triggered(&r.id).unwrap();
        assert!(store.cancel(&r.id).is_none());
        assert_eq!(store.get(&r.id).unwrap().status, ReminderStatus::Triggered);
    }

    #[test]
    fn cancelled_cannot_be_triggered() {
        let store = ReminderStore::new();
        let r = store.create("call john", soon()).unwrap();
        store.cancel(&r.id).unwrap();
        assert!(store.mark_triggered(&r.id).is_none());
    }

    #[test]
    fn list_scheduled_skips_triggered_and_orders_by_time() {
        let store = ReminderStore::new();
        let now = Utc::now();
        let later = store.create("later", Some(now + Duration::hours(2))).unwrap();
        let sooner = store.create("sooner", Some(now + Duration::hours(1))).unwrap();
        let fired = store.create("fired", Some(now)).unwrap();
        store.mark_triggered(&fired.id);

        let ids: Vec<_> = store.list_scheduled().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn concurrent_cancels_have_one_winner() {
        let store = ReminderStore::new();
        let r = store.create("call john", soon()).unwrap();

        let wins = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| store.cancel(&r.id).is_some()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count()
        });
        assert_eq!(wins, 1);
    }

    #[test]
    fn cancel_racing_trigger_has_one_winner() {
        for _ in 0..200 {
            let store = ReminderStore::new();
            let r = store.create("race", soon()).unwrap();
            let (cancelled, triggered) = std::thread::scope(|s| {
                let c = s.spawn(|| store.cancel(&r.id).is_some());
                let t = s.spawn(|| store.mark_triggered(&r.id).is_some());
                (c.join().unwrap(), t.join().unwrap())
            });
            assert!(cancelled ^ triggered);
        }
    }
}
