//! Inbound message → user-facing reply.
//!
//! Slash commands are intercepted first; everything else goes through intent
//! classification and, for reminder requests, entity extraction.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{debug, warn};

use tickler_core::{Reminder, ReminderId};
use tickler_nlp::{analyze, Entities, Intent};
use tickler_scheduler::{ReminderService, SchedulerError};

use crate::slash::handle_slash_command;

const HELP_TEXT: &str = "🤖 Tickler Reminder Bot Help:\n\
\n\
You can:\n\
1. Set a reminder by saying something like:\n\
- \"remind me to call John in 5 minutes\"\n\
- \"set a reminder for meeting tomorrow at 2pm\"\n\
2. See pending reminders with /list\n\
3. Cancel one with /cancel <id>\n\
4. Type 'help' anytime to see this message again";

/// What a reminder request was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Task,
    Time { task: String },
    Both,
}

/// Everything the bot can answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Confirmed {
        id: ReminderId,
        task: String,
        at: DateTime<Utc>,
    },
    Clarify(Missing),
    Help,
    Unknown,
    Pending(Vec<Reminder>),
    Cancelled { id: ReminderId },
    NotCancelled { id: ReminderId },
    Usage(&'static str),
    Failed { code: &'static str, message: String },
}

fn local(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Confirmed { task, at, .. } => {
                write!(f, "✅ I'll remind you to {task} at {}.", local(at))
            }
            Reply::Clarify(Missing::Both) => {
                write!(f, "Please specify what and when you want to be reminded about.")
            }
            Reply::Clarify(Missing::Task) => write!(f, "What should I remind you about?"),
            Reply::Clarify(Missing::Time { task }) => write!(
                f,
                "When should I remind you to {task}? Try \"in 10 minutes\" or \"tomorrow at 9am\"."
            ),
            Reply::Help => write!(f, "{HELP_TEXT}"),
            Reply::Unknown => {
                write!(f, "I'm not sure what you want. Try asking for help by saying 'help'!")
            }
            Reply::Pending(reminders) if reminders.is_empty() => {
                write!(f, "No reminders scheduled.")
            }
            Reply::Pending(reminders) => {
                write!(f, "Scheduled reminders ({}):", reminders.len())?;
                for r in reminders {
                    write!(f, "\n- ID: {} | {} | {}", r.id, r.task, local(&r.trigger_time))?;
                }
                Ok(())
            }
            Reply::Cancelled { id } => write!(f, "Reminder '{id}' cancelled."),
            Reply::NotCancelled { id } => {
                write!(f, "No pending reminder with ID '{id}'. It may have already fired.")
            }
            Reply::Usage(usage) => write!(f, "Usage: {usage}"),
            Reply::Failed { code, message } => {
                write!(f, "Sorry, I couldn't do that ({code}): {message}")
            }
        }
    }
}

/// Turns text messages into replies, creating reminders along the way.
pub struct MessageProcessor {
    service: Arc<ReminderService>,
}

impl MessageProcessor {
    pub fn new(service: Arc<ReminderService>) -> Self {
        Self { service }
    }

    /// Process a message relative to the local clock.
    pub fn process(&self, text: &str) -> Reply {
        self.process_at(text, Local::now())
    }

    /// Process a message relative to `now`; wall-clock phrases resolve in `now`'s zone.
    pub fn process_at<Tz: TimeZone>(&self, text: &str, now: DateTime<Tz>) -> Reply {
        if let Some(reply) = handle_slash_command(text, &self.service) {
            return reply;
        }

        let result = analyze(text, now);
        debug!(intent = %result.intent, "message classified");
        match result.intent {
            Intent::SetReminder => self.handle_reminder(result.entities),
            Intent::Help => Reply::Help,
            Intent::Unknown => Reply::Unknown,
        }
    }

    fn handle_reminder<Tz: TimeZone>(&self, entities: Entities<Tz>) -> Reply {
        let (task, at) = match (entities.task, entities.time) {
            (Some(task), Some(time)) => (task, time.with_timezone(&Utc)),
            (Some(task), None) => return Reply::Clarify(Missing::Time { task }),
            (None, Some(_)) => return Reply::Clarify(Missing::Task),
            (None, None) => return Reply::Clarify(Missing::Both),
        };

        match self.service.create_reminder(&task, Some(at)) {
            Ok(id) => Reply::Confirmed { id, task, at },
            Err(SchedulerError::RejectedCreate { reason }) => {
                debug!(%reason, "reminder rejected: asking for clarification");
                Reply::Clarify(Missing::Both)
            }
            Err(e) => {
                warn!(error = %e, "failed to create reminder");
                Reply::Failed {
                    code: e.code(),
                    message: e.to_string(),
                }
            }
        }
    }
}
