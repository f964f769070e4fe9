use serde::{Deserialize, Serialize};

/// Keywords that mark a reminder request. Checked before [`HELP_KEYWORD`].
const REMINDER_KEYWORDS: &[&str] = &["remind", "reminder", "schedule"];
const HELP_KEYWORD: &str = "help";

/// Coarse purpose of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SetReminder,
    Help,
    Unknown,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Intent::SetReminder => "set_reminder",
            Intent::Help => "help",
            Intent::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Classify `text` by case-insensitive substring containment.
///
/// Reminder keywords win over `help`; anything else (including the empty
/// string) is [`Intent::Unknown`].
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    if REMINDER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Intent::SetReminder
    } else if lower.contains(HELP_KEYWORD) {
        Intent::Help
    } else {
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remind_keyword_sets_reminder() {
        assert_eq!(classify("Remind me to call John in 5 minutes"), Intent::SetReminder);
        assert_eq!(classify("SCHEDULE a call at 3pm"), Intent::SetReminder);
    }

    #[test]
    fn reminder_keyword_beats_help() {
        assert_eq!(classify("help me set a reminder"), Intent::SetReminder);
    }

    #[test]
    fn help_keyword() {
        assert_eq!(classify("Help"), Intent::Help);
        assert_eq!(classify("can you help?"), Intent::Help);
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(classify(""), Intent::Unknown);
        assert_eq!(classify("what's the weather like"), Intent::Unknown);
    }

    #[test]
    fn substring_containment_is_not_word_bound() {
        // "rescheduled" contains "schedule"
        assert_eq!(classify("the meeting got rescheduled"), Intent::SetReminder);
    }
}
