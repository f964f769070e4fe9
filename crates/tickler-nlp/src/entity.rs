use std::sync::OnceLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::{
    intent::{classify, Intent},
    time::parse_time,
};

/// Leading phrases stripped from the task, longest first so `remind me to`
/// wins over `remind me`. A phrase must be followed by whitespace or end the
/// segment, so a bare "remind me" leaves no task behind.
const BOILERPLATE: &str = r"^(?:remind me to|remind me|reminder to|reminder)(?:\s+|$)";

/// Whitespace-bounded tokens that start the time part of a message.
const TIME_INDICATOR: &str = r"\s+(?:in|at|tomorrow)\s+";

/// Fields pulled out of a reminder request. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "DateTime<Tz>: Serialize"))]
pub struct Entities<Tz: TimeZone> {
    pub task: Option<String>,
    pub time: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Entities<Tz> {
    pub fn empty() -> Self {
        Self { task: None, time: None }
    }

    /// True when both task and time were found.
    pub fn is_complete(&self) -> bool {
        self.task.is_some() && self.time.is_some()
    }
}

/// Per-message classification result; consumed once by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "Entities<Tz>: Serialize"))]
pub struct IntentResult<Tz: TimeZone> {
    pub intent: Intent,
    pub entities: Entities<Tz>,
}

fn time_indicator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIME_INDICATOR).expect("time indicator regex is valid"))
}

fn boilerplate() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(BOILERPLATE).expect("boilerplate regex is valid"))
}

/// Everything before the first time indicator, minus the leading boilerplate.
fn extract_task(lower: &str) -> Option<String> {
    let head = time_indicator().split(lower).next().unwrap_or_default();
    let task = boilerplate().replace(head, "");
    let task = task.trim();
    (!task.is_empty()).then(|| task.to_string())
}

/// Extract the task phrase and trigger time from a reminder request.
///
/// The text is case-folded first, so the task comes back lowercase.
pub fn extract<Tz: TimeZone>(text: &str, now: DateTime<Tz>) -> Entities<Tz> {
    let lower = text.to_lowercase();
    let time = parse_time(&lower, now);
    let task = extract_task(&lower);
    debug!(has_task = task.is_some(), has_time = time.is_some(), "entities extracted");
    Entities { task, time }
}

/// Classify `text` and, for reminder requests, extract its entities.
pub fn analyze<Tz: TimeZone>(text: &str, now: DateTime<Tz>) -> IntentResult<Tz> {
    let intent = classify(text);
    let entities = match intent {
        Intent::SetReminder => extract(text, now),
        Intent::Help | Intent::Unknown => Entities::empty(),
    };
    IntentResult { intent, entities }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn remind_me_to_in_minutes() {
        let e = extract("remind me to call john in 5 minutes", now());
        assert_eq!(e.task.as_deref(), Some("call john"));
        assert_eq!(e.time, Some(now() + Duration::minutes(5)));
        assert!(e.is_complete());
    }

    #[test]
    fn task_is_case_folded() {
        let e = extract("Remind me to call John in 5 minutes", now());
        assert_eq!(e.task.as_deref(), Some("call john"));
    }

    #[test]
    fn set_a_reminder_keeps_phrase() {
        // Only a leading boilerplate phrase is stripped.
        let e = extract("set a reminder for meeting tomorrow at 2pm", now());
        assert_eq!(e.task.as_deref(), Some("set a reminder for meeting"));
        assert!(e.time.is_some());
    }

    #[test]
    fn boilerplate_variants() {
        assert_eq!(extract("remind me stretch in 1 hour", now()).task.as_deref(), Some("stretch"));
        assert_eq!(extract("reminder to pay rent at 9", now()).task.as_deref(), Some("pay rent"));
        assert_eq!(extract("reminder standup at 9", now()).task.as_deref(), Some("standup"));
    }

    #[test]
    fn splits_on_first_indicator_only() {
        let e = extract("remind me to meet bob at the cafe in 2 hours", now());
        assert_eq!(e.task.as_deref(), Some("meet bob"));
        assert_eq!(e.time, Some(now() + Duration::hours(2)));
    }

    #[test]
    fn indicator_must_be_whitespace_bounded() {
        // "inbox" and "attic" are not indicators.
        let e = extract("remind me to clean inbox and attic in 10 mins", now());
        assert_eq!(e.task.as_deref(), Some("clean inbox and attic"));
    }

    #[test]
    fn missing_time_reported() {
        let e = extract("remind me to buy milk", now());
        assert_eq!(e.task.as_deref(), Some("buy milk"));
        assert_eq!(e.time, None);
        assert!(!e.is_complete());
    }

    #[test]
    fn missing_task_reported() {
        let e = extract("remind me in 5 minutes", now());
        assert_eq!(e.task, None);
        assert!(e.time.is_some());
    }

    #[test]
    fn bare_keyword_has_no_task() {
        let e = extract("reminder", now());
        assert_eq!(e.task, None);
        assert_eq!(e.time, None);
    }

    #[test]
    fn keyword_prefix_inside_a_word_is_kept() {
        let e = extract("reminders are useful at 9", now());
        assert_eq!(e.task.as_deref(), Some("reminders are useful"));
    }

    #[test]
    fn analyze_extracts_only_for_reminders() {
        let r = analyze("remind me to call john in 5 minutes", now());
        assert_eq!(r.intent, Intent::SetReminder);
        assert!(r.entities.is_complete());

        let r = analyze("help", now());
        assert_eq!(r.intent, Intent::Help);
        assert_eq!(r.entities, Entities::empty());

        let r = analyze("at 5pm", now());
        assert_eq!(r.intent, Intent::Unknown);
        assert_eq!(r.entities.time, None);
    }

    #[test]
    fn intent_result_serializes() {
        let r = analyze("remind me to call john in 5 minutes", now());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["intent"], "set_reminder");
        assert_eq!(json["entities"]["task"], "call john");
    }
}
