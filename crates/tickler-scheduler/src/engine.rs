use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tickler_core::{config::SchedulerConfig, ReminderId};

use crate::{
    error::{Result, SchedulerError},
    sink::NotificationSink,
    store::ReminderStore,
    types::{FireOutcome, FireReport},
};

/// One-shot timer engine: arms, disarms and fires reminder timers.
///
/// Each armed reminder is an independent Tokio task racing a sleep against
/// its cancellation token. Cheap to clone; clones share the same timers.
#[derive(Clone)]
pub struct ReminderScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<ReminderStore>,
    sink: Arc<dyn NotificationSink>,
    config: SchedulerConfig,
    /// Armed timers. An entry disappears when its timer fires or is disarmed.
    timers: DashMap<ReminderId, CancellationToken>,
    /// Parent of every timer token; cancelled by [`ReminderScheduler::shutdown`].
    shutdown: CancellationToken,
    /// If set, every fired reminder is reported here.
    report_tx: Option<mpsc::Sender<FireReport>>,
}

impl ReminderScheduler {
    /// Create an engine bound to `store` and delivering through `sink`.
    ///
    /// Pass `Some(tx)` to receive a [`FireReport`] for every fired reminder.
    /// The sender is non-blocking (`try_send`) so a slow reader never stalls a timer.
    pub fn new(
        store: Arc<ReminderStore>,
        sink: Arc<dyn NotificationSink>,
        config: SchedulerConfig,
        report_tx: Option<mpsc::Sender<FireReport>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                sink,
                config,
                timers: DashMap::new(),
                shutdown: CancellationToken::new(),
                report_tx,
            }),
        }
    }

    pub fn store(&self) -> &Arc<ReminderStore> {
        &self.inner.store
    }

    /// Arm a one-shot timer for `id` firing at `trigger_time`.
    ///
    /// A trigger time in the past fires immediately. A reminder is armed at
    /// most once: a second call for the same id returns `AlreadyScheduled`.
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, id: &ReminderId, trigger_time: DateTime<Utc>) -> Result<()> {
        if self.inner.shutdown.is_cancelled() {
            return Err(SchedulerError::ShutDown);
        }
        let token = match self.inner.timers.entry(id.clone()) {
            Entry::Occupied(_) => {
                return Err(SchedulerError::AlreadyScheduled { id: id.to_string() });
            }
            Entry::Vacant(slot) => {
                let token = self.inner.shutdown.child_token();
                slot.insert(token.clone());
                token
            }
        };

        // Checked after the timer slot is taken: a cancel that lands in
        // between either sees the slot and disarms it, or is seen here.
        if !self
            .inner
            .store
            .get(id)
            .is_some_and(|r| r.status.is_scheduled())
        {
            self.unschedule(id);
            return Err(SchedulerError::ReminderNotFound { id: id.to_string() });
        }

        // Negative durations (past trigger times) clamp to zero.
        let delay = (trigger_time - Utc::now()).to_std().unwrap_or_default();
        let inner = Arc::clone(&self.inner);
        let id = id.clone();
        debug!(reminder_id = %id, ?delay, "timer armed");

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(reminder_id = %id, "timer disarmed before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    inner.fire(&id).await;
                }
            }
        });
        Ok(())
    }

    /// Disarm the timer for `id`. Returns `false` if nothing was armed
    /// (unknown id, or the timer already fired).
    pub fn unschedule(&self, id: &ReminderId) -> bool {
        match self.inner.timers.remove(id) {
            Some((_, token)) => {
                token.cancel();
                debug!(reminder_id = %id, "timer unscheduled");
                true
            }
            None => false,
        }
    }

    /// Number of timers currently armed.
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.len()
    }

    /// Disarm every pending timer and refuse new ones.
    pub fn shutdown(&self) {
        info!(pending = self.pending_timers(), "reminder scheduler shutting down");
        self.inner.shutdown.cancel();
        self.inner.timers.clear();
    }
}

impl Inner {
    /// Timer callback. The store transition decides whether this fire counts;
    /// losing it to a cancel makes the whole fire a no-op.
    async fn fire(&self, id: &ReminderId) {
        self.timers.remove(id);

        let Some(reminder) = self.store.mark_triggered(id) else {
            debug!(reminder_id = %id, "reminder already handled: fire skipped");
            return;
        };
        info!(reminder_id = %id, task = %reminder.task, "reminder triggered");

        let outcome = match self.sink.deliver(&reminder).await {
            Ok(()) => FireOutcome::Delivered,
            Err(e) => {
                warn!(reminder_id = %id, sink = self.sink.name(), error = %e, "reminder delivery failed");
                FireOutcome::DeliveryFailed {
                    reason: e.to_string(),
                }
            }
        };

        // Cleanup runs even after a failed delivery so fired reminders never leak.
        if self.config.auto_delete_on_trigger {
            self.store.delete(id);
        }

        if let Some(ref tx) = self.report_tx {
            let report = FireReport {
                reminder_id: id.clone(),
                outcome,
            };
            if tx.try_send(report).is_err() {
                warn!(reminder_id = %id, "fire report channel full or closed: report dropped");
            }
        }
    }
}
