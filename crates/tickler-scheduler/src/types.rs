use serde::{Deserialize, Serialize};
use tickler_core::ReminderId;

/// What happened when a timer fired and won the store transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum FireOutcome {
    /// The sink accepted the notification.
    Delivered,
    /// The sink failed; the reminder still counts as fired.
    DeliveryFailed { reason: String },
}

/// Sent on the engine's report channel once per fired reminder.
///
/// Timers that lose the race to a cancel produce no report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireReport {
    pub reminder_id: ReminderId,
    #[serde(flatten)]
    pub outcome: FireOutcome,
}

impl FireReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, FireOutcome::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_flat() {
        let report = FireReport {
            reminder_id: ReminderId::from("r-1"),
            outcome: FireOutcome::DeliveryFailed { reason: "boom".to_string() },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reminder_id"], "r-1");
        assert_eq!(json["outcome"], "delivery_failed");
        assert_eq!(json["reason"], "boom");
        assert!(!report.is_delivered());
    }
}
