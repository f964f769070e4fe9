//! Slash commands, intercepted before intent classification.
//!
//! Recognized commands:
//!   `/help`         same as saying "help"
//!   `/list`         list pending reminders
//!   `/cancel <id>`  cancel a pending reminder

use tracing::info;

use tickler_core::ReminderId;
use tickler_scheduler::ReminderService;

use crate::processor::Reply;

/// Handle slash commands before the message reaches the classifier.
///
/// Returns `Some(reply)` if the message was a recognized command,
/// `None` if it should be classified as free text.
pub fn handle_slash_command(message: &str, service: &ReminderService) -> Option<Reply> {
    let trimmed = message.trim();

    // /help
    if trimmed.eq_ignore_ascii_case("/help") {
        return Some(Reply::Help);
    }

    // /list
    if trimmed.eq_ignore_ascii_case("/list") {
        return Some(Reply::Pending(service.list_pending()));
    }

    // /cancel [id]
    if trimmed.eq_ignore_ascii_case("/cancel") {
        return Some(Reply::Usage("/cancel <id>"));
    }

    if let Some(arg) = strip_command(trimmed, "/cancel") {
        let id = ReminderId::from(arg.trim());
        if service.cancel_reminder(&id) {
            info!(reminder_id = %id, "reminder cancelled via /cancel");
            return Some(Reply::Cancelled { id });
        }
        return Some(Reply::NotCancelled { id });
    }

    None
}

/// Argument text after `command` (matched case-insensitively) and at least one
/// whitespace character; `None` if `message` is not that command.
fn strip_command<'a>(message: &'a str, command: &str) -> Option<&'a str> {
    let head = message.get(..command.len())?;
    let rest = &message[command.len()..];
    (head.eq_ignore_ascii_case(command) && rest.starts_with(char::is_whitespace))
        .then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tickler_core::config::SchedulerConfig;
    use tickler_scheduler::LogSink;

    fn service() -> ReminderService {
        ReminderService::new(Arc::new(LogSink), SchedulerConfig::default(), None)
    }

    #[tokio::test]
    async fn free_text_is_not_a_command() {
        assert_eq!(handle_slash_command("remind me to call john in 5 minutes", &service()), None);
        assert_eq!(handle_slash_command("/remind", &service()), None);
    }

    #[tokio::test]
    async fn help_command() {
        assert_eq!(handle_slash_command(" /HELP ", &service()), Some(Reply::Help));
    }

    #[tokio::test]
    async fn list_shows_pending() {
        let service = service();
        assert_eq!(
            handle_slash_command("/list", &service),
            Some(Reply::Pending(Vec::new()))
        );

        service
            .create_reminder("water plants", Some(Utc::now() + Duration::hours(1)))
            .unwrap();
        let Some(Reply::Pending(pending)) = handle_slash_command("/list", &service) else {
            panic!("expected pending list");
        };
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].task, "water plants");
    }

    #[tokio::test]
    async fn cancel_command() {
        let service = service();
        let id = service
            .create_reminder("water plants", Some(Utc::now() + Duration::hours(1)))
            .unwrap();

        let reply = handle_slash_command(&format!("/cancel {id}"), &service);
        assert_eq!(reply, Some(Reply::Cancelled { id: id.clone() }));
        assert!(service.list_pending().is_empty());

        let reply = handle_slash_command(&format!("/cancel {id}"), &service);
        assert_eq!(reply, Some(Reply::NotCancelled { id }));
    }

    #[tokio::test]
    async fn cancel_command_ignores_case() {
        let service = service();
        let id = service
            .create_reminder("water plants", Some(Utc::now() + Duration::hours(1)))
            .unwrap();

        let reply = handle_slash_command(&format!("/CANCEL  {id} "), &service);
        assert_eq!(reply, Some(Reply::Cancelled { id }));
        assert!(service.list_pending().is_empty());
    }

    #[test]
    fn strip_command_requires_separator() {
        assert_eq!(strip_command("/Cancel abc", "/cancel"), Some(" abc"));
        assert_eq!(strip_command("/cancelled", "/cancel"), None);
        assert_eq!(strip_command("/can", "/cancel"), None);
        assert_eq!(strip_command("/cancél x", "/cancel"), None);
    }

    #[tokio::test]
    async fn cancel_without_id_shows_usage() {
        let reply = handle_slash_command("/cancel", &service()).unwrap();
        assert_eq!(reply.to_string(), "Usage: /cancel <id>");
    }
}
