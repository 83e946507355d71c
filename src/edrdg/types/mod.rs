//! Foundational data structures, error types, and dictionary kind definitions.

pub mod error;
pub mod kinds;
pub mod models;
