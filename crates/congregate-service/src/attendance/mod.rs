//! Attendance recorded against events.

pub mod service;

pub use service::AttendanceService;
