//! Error types for the planner

use thiserror::Error;

use super::types::SiteId;

/// Result type alias using our PlannerError
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Main error type for allocation and planning operations
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A site's state cannot be used by the requested computation
    #[error("Invalid state for site '{site}': {reason}")]
    InvalidSiteState { site: String, reason: String },

    /// A count (budget, team count, adventurer size, days) is out of range
    #[error("Invalid {what}: {value} (must be between 0 and {max})", max = u32::MAX)]
    InvalidBudget { what: &'static str, value: i64 },

    /// A site handle that the registry never issued
    #[error("Unknown site: {0}")]
    UnknownSite(SiteId),

    /// A site name that is already registered
    #[error("Duplicate site name: {0}")]
    DuplicateSite(String),

    /// A gold total or score that does not fit in a Decimal
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization errors
    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl PlannerError {
    /// Shorthand for a zero-guardian site hit by a ratio computation
    pub fn zero_guardians(site: impl Into<String>) -> Self {
        PlannerError::InvalidSiteState {
            site: site.into(),
            reason: "guardian count is zero, efficiency ratio is undefined".to_string(),
        }
    }
}
