//! Shared domain types and the JSON document store behind the intake service.

pub mod error;
pub mod models;
pub mod store;
pub mod utils;
