//! Shared domain types and errors for the Dosewise backend.

pub mod error;
pub mod types;
