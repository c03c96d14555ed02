//! ExpeditionPlanner Library
//!
//! Greedy allocation of adventurers across gold sites, either from a single
//! pool or by teams competing over the same sites day after day.

pub mod allocation;
pub mod common;
pub mod config;
pub mod report;

// Re-export commonly used types
pub use common::errors::{PlannerError, Result};
pub use common::traits::SiteRecord;
pub use common::types::{Site, SiteId, SiteRegistry};
pub use config::types::AppConfig;

// Allocation types
pub use allocation::{
    total_reward, AbstentionRule, Candidate, Decision, RankKey, SequentialTeamAllocator,
    SiteAllocation, SinglePoolAllocator,
};
pub use report::{DayReport, SinglePoolReport};
