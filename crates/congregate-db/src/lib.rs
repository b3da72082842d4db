//! Persistence for events, volunteer assignments and attendance: the domain
//! record model, the store traits and their PostgreSQL and in-memory
//! implementations.

pub mod db;
pub mod error;
pub mod model;
pub mod store;
