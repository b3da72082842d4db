//! Volunteer assignments and the volunteer overview.

pub mod service;
pub mod stats;

pub use service::{VolunteerDraft, VolunteerService};
pub use stats::VolunteerStats;
