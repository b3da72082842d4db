//! Calendar arithmetic for recurring events.
//!
//! `expand` turns a master event's rule into the concrete instances that are
//! stored up to a horizon, and `resolve_next` computes the next future
//! occurrence of a stored series for display. Both are pure: the caller
//! supplies "now" and persists the results.

pub mod error;
pub mod expand;
pub mod pattern;
pub mod resolve;
pub mod rule;
pub mod step;

pub use error::{CalendarError, CalendarResult};
pub use expand::{EventInstance, expand, horizon_end, instance_id};
pub use pattern::{MonthlyWeek, Recurrence};
pub use resolve::{SeriesOccurrence, next_occurrence, resolve_next};
pub use rule::EventRule;
