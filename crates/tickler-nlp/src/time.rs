use std::sync::OnceLock;

use chrono::{DateTime, Days, Duration, NaiveTime, TimeZone};
use regex::{Captures, Regex};
use tracing::trace;

/// One entry of the ordered time-expression rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeRule {
    /// `in <N> minute(s)|min(s)`
    InMinutes,
    /// `in <N> hour(s)|hr(s)`
    InHours,
    /// `tomorrow at <H>[:<M>][am|pm]`
    TomorrowAt,
    /// `at <H>[:<M>][am|pm]`
    TodayAt,
}

impl TimeRule {
    /// Priority order: relative offsets first, then the more specific wall-clock form.
    const ORDERED: [TimeRule; 4] = [
        TimeRule::InMinutes,
        TimeRule::InHours,
        TimeRule::TomorrowAt,
        TimeRule::TodayAt,
    ];

    fn pattern(self) -> &'static str {
        match self {
            TimeRule::InMinutes => r"in ([0-9]+) (minute|minutes|min|mins)",
            TimeRule::InHours => r"in ([0-9]+) (hour|hours|hr|hrs)",
            TimeRule::TomorrowAt => r"tomorrow at ([0-9]+)(?::([0-9]+))?\s*(am|pm)?",
            TimeRule::TodayAt => r"at ([0-9]+)(?::([0-9]+))?\s*(am|pm)?",
        }
    }

    /// Turn a match of this rule into an absolute instant in `now`'s zone.
    fn resolve<Tz: TimeZone>(self, caps: &Captures<'_>, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match self {
            TimeRule::InMinutes => {
                let n: i64 = caps[1].parse().ok()?;
                now.clone().checked_add_signed(Duration::try_minutes(n)?)
            }
            TimeRule::InHours => {
                let n: i64 = caps[1].parse().ok()?;
                now.clone().checked_add_signed(Duration::try_hours(n)?)
            }
            TimeRule::TomorrowAt => wall_clock(caps, now, 1),
            TimeRule::TodayAt => wall_clock(caps, now, 0),
        }
    }
}

fn compiled_rules() -> &'static [(TimeRule, Regex)] {
    static RULES: OnceLock<Vec<(TimeRule, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        TimeRule::ORDERED
            .iter()
            .map(|&rule| {
                let re = Regex::new(rule.pattern()).expect("time rule regex is valid");
                (rule, re)
            })
            .collect()
    })
}

/// Parse the first time expression found in `text`, relative to `now`.
///
/// Rules are tried in a fixed order and the first one whose pattern matches
/// decides the result. A match with out-of-range values (`at 25`, `13pm`) or
/// a wall-clock time that does not exist in `now`'s zone yields `None`
/// rather than falling through to a later rule.
///
/// Without an `am`/`pm` suffix the hour is taken literally as 24-hour time:
/// `at 7` means 07:00, not 19:00.
pub fn parse_time<Tz: TimeZone>(text: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let lower = text.to_lowercase();
    let (rule, caps) = compiled_rules()
        .iter()
        .find_map(|(rule, re)| re.captures(&lower).map(|caps| (*rule, caps)))?;

    let resolved = rule.resolve(&caps, &now);
    trace!(?rule, matched = %&caps[0], resolved = resolved.is_some(), "time rule matched");
    resolved
}

/// Build `<date of now + days_ahead> <H>:<M>:00` from a wall-clock match.
fn wall_clock<Tz: TimeZone>(
    caps: &Captures<'_>,
    now: &DateTime<Tz>,
    days_ahead: u64,
) -> Option<DateTime<Tz>> {
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let hour = apply_meridiem(hour, caps.get(3).map(|m| m.as_str()))?;

    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let date = now.date_naive().checked_add_days(Days::new(days_ahead))?;
    // DST overlap resolves to the earlier instant; a DST gap has no instant at all.
    now.timezone()
        .from_local_datetime(&date.and_time(time))
        .earliest()
}

/// `pm` adds 12 unless the hour is 12; `12am` is midnight.
fn apply_meridiem(hour: u32, meridiem: Option<&str>) -> Option<u32> {
    match meridiem {
        Some("pm") if hour != 12 => hour.checked_add(12),
        Some("am") if hour == 12 => Some(0),
        _ => Some(hour),
    }
}
