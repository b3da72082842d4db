//! Shared building blocks for the congregate workspace: settings, the core
//! error type, tenant context and identifier helpers.

pub mod config;
pub mod error;
pub mod types;
pub mod util;
