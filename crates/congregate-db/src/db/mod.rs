pub mod connection;
pub mod enums;
pub mod migrate;
pub mod query;
pub mod rows;
pub mod schema;
