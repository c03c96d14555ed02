//! Shared building blocks: errors, the site record, and its registry

pub mod errors;
pub mod traits;
pub mod types;
