use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{PlannerError, Result};
use crate::common::types::SiteId;

/// Gold-equivalent value a team places on each adventurer it keeps home
pub const DEFAULT_IDLE_VALUE: Decimal = dec!(2.5);

/// Adventurers assigned to one site by the single-pool allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAllocation {
    pub site: SiteId,
    pub adventurers: u32,
}

impl SiteAllocation {
    pub fn new(site: SiteId, adventurers: u32) -> Self {
        Self { site, adventurers }
    }

    /// Returns true if the budget ran out before this site was reached
    pub fn is_unfunded(&self) -> bool {
        self.adventurers == 0
    }
}

/// One team's choice for a simulated day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// The team stays home
    Abstain,
    /// The team sends `adventurers` to `site`
    Assigned { site: SiteId, adventurers: u32 },
}

impl Decision {
    /// Create an Assigned decision
    pub fn assigned(site: SiteId, adventurers: u32) -> Self {
        Self::Assigned { site, adventurers }
    }

    /// Site chosen, if any
    pub fn site(&self) -> Option<SiteId> {
        match self {
            Self::Abstain => None,
            Self::Assigned { site, .. } => Some(*site),
        }
    }

    /// Adventurers deployed (zero when abstaining)
    pub fn adventurers(&self) -> u32 {
        match self {
            Self::Abstain => 0,
            Self::Assigned { adventurers, .. } => *adventurers,
        }
    }

    /// Returns true if the team abstained
    pub fn is_abstain(&self) -> bool {
        matches!(self, Self::Abstain)
    }
}

/// How a team weighs staying home against the best site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstentionRule {
    /// Abstain only when there is no site to choose from
    #[default]
    Fallback,
    /// Abstention competes with score `idle_value * adventurer_size` and
    /// wins only when strictly greater than every site's score
    Scored,
}

/// What a team would get out of one site, evaluated against shadow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub site: SiteId,
    /// Adventurers the team would commit
    pub used: u32,
    /// Gold the team would carry off
    pub received: Decimal,
    /// `idle_value * (adventurer_size - used) + received`
    pub score: Decimal,
}

/// Convert an externally supplied count into the core's unsigned form
///
/// Config files, CLI flags and environment variables can carry negative or
/// oversized numbers; those are rejected here instead of wrapping.
pub fn validate_count(what: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| PlannerError::InvalidBudget { what, value })
}
