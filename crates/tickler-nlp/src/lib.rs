//! `tickler-nlp`: rule-based intent classification and time/task extraction.
//!
//! # Pipeline
//!
//! 1. [`intent::classify`] picks a coarse [`Intent`] from keyword containment.
//! 2. For [`Intent::SetReminder`], [`entity::extract`] runs the ordered time
//!    rules of [`time::parse_time`] and strips boilerplate to get the task.
//!
//! # Time rules (first match wins)
//!
//! | Order | Pattern                                | Result                      |
//! |-------|----------------------------------------|-----------------------------|
//! | 1     | `in <N> minute(s)\|min(s)`             | `now + N minutes`           |
//! | 2     | `in <N> hour(s)\|hr(s)`                | `now + N hours`             |
//! | 3     | `tomorrow at <H>[:<M>][am\|pm]`        | wall-clock time tomorrow    |
//! | 4     | `at <H>[:<M>][am\|pm]`                 | wall-clock time today       |
//!
//! Everything is pure: callers pass `now` explicitly.

pub mod entity;
pub mod intent;
pub mod time;

pub use entity::{analyze, extract, Entities, IntentResult};
pub use intent::{classify, Intent};
pub use time::parse_time;
