//! Church scheduling on top of the stores in `congregate_db`: the
//! recurring-series lifecycle, the read views built from stored events,
//! volunteer assignment and attendance.

pub mod attendance;
pub mod clock;
pub mod error;
pub mod event;
pub mod volunteer;
