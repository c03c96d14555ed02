//! Allocation policies for sending adventurers after gold
//!
//! Two greedy policies share one reward law (see [`reward::capture`]).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SINGLE POOL (policy a)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SinglePoolAllocator                                        │
//! │    - Ranks sites by gold / guardians, then raw gold         │
//! │    - Saturates sites in rank order until budget runs out    │
//! │    - Reports total reward for any list of budgets           │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                COMPETING TEAMS (policy b)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Snapshot sites into shadow state                           │
//! │       │                                                     │
//! │       ▼ (for each team, in order)                           │
//! │  Score every site against shadow → pick best (or abstain)   │
//! │  Deplete the winner's shadow entry                          │
//! │       │                                                     │
//! │       ▼ (after the last team)                               │
//! │  Commit shadow state onto the real sites                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`SinglePoolAllocator`]: ratio-ranked greedy fill of one budget
//! - [`SequentialTeamAllocator`]: per-team best choice over shared, depleting sites
//! - [`Decision`]: Abstain / Assigned result of one team
//! - [`SiteAllocation`]: adventurers given to one site by the single pool
//!
//! # Example
//!
//! ```ignore
//! let mut registry = SiteRegistry::new();
//! let ids = registry.extend([
//!     Site::new("A", dec!(60), 4),
//!     Site::new("B", dec!(50), 5),
//! ])?;
//!
//! let pool = SinglePoolAllocator::new(ids.clone(), 6);
//! let allocation = pool.allocate(&registry)?;      // A → 4, B → 2
//! assert_eq!(total_reward(&registry, &allocation)?, dec!(80));
//!
//! let mut teams = SequentialTeamAllocator::new(2);
//! teams.add_sites(ids);
//! let decisions = teams.simulate_day(&mut registry, 3)?;
//! ```

pub mod reward;
mod sequential;
mod single_pool;
mod types;

pub use types::{
    validate_count,
    AbstentionRule,
    Candidate,
    Decision,
    SiteAllocation,
    DEFAULT_IDLE_VALUE,
};

pub use single_pool::{total_reward, RankKey, SinglePoolAllocator};

pub use sequential::SequentialTeamAllocator;
