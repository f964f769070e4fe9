use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a reminder (UUIDv7, time-sortable).
///
/// Never derived from the size of the store, so ids stay unique while
/// reminders are created and deleted concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(pub String);

impl ReminderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ReminderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ReminderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_ids_are_unique() {
        let ids: HashSet<ReminderId> = (0..1000).map(|_| ReminderId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn id_round_trips_through_str() {
        let id = ReminderId::new();
        assert_eq!(ReminderId::from(id.as_str()), id);
        assert_eq!(id.to_string(), id.as_str());
    }
}
