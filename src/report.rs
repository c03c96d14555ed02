//! Printable summaries of allocation runs

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::allocation::{reward, Decision, SiteAllocation};
use crate::common::errors::Result;
use crate::common::traits::SiteRecord;
use crate::common::types::SiteRegistry;

/// One site's share of a single-pool allocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationLine {
    pub site: String,
    pub adventurers: u32,
    pub reward: Decimal,
}

/// Expected reward for one budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReward {
    pub budget: u32,
    pub reward: Decimal,
}

/// Result of a single-pool run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePoolReport {
    pub budget: u32,
    pub allocations: Vec<AllocationLine>,
    pub total_reward: Decimal,
    pub budget_rewards: Vec<BudgetReward>,
}

impl SinglePoolReport {
    pub fn build<S: SiteRecord>(
        registry: &SiteRegistry<S>,
        budget: u32,
        allocation: &[SiteAllocation],
        budgets: &[u32],
        rewards: &[Decimal],
    ) -> Result<Self> {
        let allocations = allocation
            .iter()
            .map(|entry| -> Result<AllocationLine> {
                let site = registry.get(entry.site)?;
                Ok(AllocationLine {
                    site: site.name().to_string(),
                    adventurers: entry.adventurers,
                    reward: reward::capture(site.gold(), site.guardians(), entry.adventurers),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total_reward =
            reward::checked_total("total reward", allocations.iter().map(|line| line.reward))?;
        let budget_rewards = budgets
            .iter()
            .zip(rewards)
            .map(|(&budget, &reward)| BudgetReward { budget, reward })
            .collect();

        Ok(Self {
            budget,
            allocations,
            total_reward,
            budget_rewards,
        })
    }
}

impl fmt::Display for SinglePoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Single-pool allocation (budget {})", self.budget)?;
        for line in &self.allocations {
            writeln!(
                f,
                "  {:<20} {:>6} adventurers  {:>12} gold",
                line.site, line.adventurers, line.reward
            )?;
        }
        writeln!(f, "  total reward: {}", self.total_reward)?;

        if !self.budget_rewards.is_empty() {
            writeln!(f, "Expected reward by budget")?;
            for entry in &self.budget_rewards {
                writeln!(f, "  {:>6} -> {}", entry.budget, entry.reward)?;
            }
        }
        Ok(())
    }
}

/// One team's move, with the site resolved to its name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamLine {
    pub team: usize,
    pub site: Option<String>,
    pub adventurers: u32,
}

/// Site state after a day was committed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteState {
    pub name: String,
    pub gold: Decimal,
    pub guardians: u32,
}

/// Result of one simulated day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub day: u32,
    pub decisions: Vec<TeamLine>,
    pub sites: Vec<SiteState>,
}

impl DayReport {
    pub fn build<S: SiteRecord>(
        registry: &SiteRegistry<S>,
        day: u32,
        decisions: &[Decision],
    ) -> Result<Self> {
        let decisions = decisions
            .iter()
            .enumerate()
            .map(|(team, decision)| -> Result<TeamLine> {
                let site = match decision.site() {
                    Some(id) => Some(registry.get(id)?.name().to_string()),
                    None => None,
                };
                Ok(TeamLine {
                    team,
                    site,
                    adventurers: decision.adventurers(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let sites = registry
            .iter()
            .map(|(_, site)| SiteState {
                name: site.name().to_string(),
                gold: site.gold(),
                guardians: site.guardians(),
            })
            .collect();

        Ok(Self {
            day,
            decisions,
            sites,
        })
    }
}

impl fmt::Display for DayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Day {}", self.day)?;
        for line in &self.decisions {
            match &line.site {
                Some(site) => writeln!(
                    f,
                    "  team {:>3}: {:<20} {:>6} adventurers",
                    line.team, site, line.adventurers
                )?,
                None => writeln!(f, "  team {:>3}: abstains", line.team)?,
            }
        }
        writeln!(f, "  sites after commit:")?;
        for site in &self.sites {
            writeln!(
                f,
                "    {:<20} {:>12} gold {:>6} guardians",
                site.name, site.gold, site.guardians
            )?;
        }
        Ok(())
    }
}
