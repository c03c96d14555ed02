use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::allocation::reward;
use crate::allocation::types::SiteAllocation;
use crate::common::errors::{PlannerError, Result};
use crate::common::traits::SiteRecord;
use crate::common::types::{SiteId, SiteRegistry};

/// Sort key for the greedy ranking: `(gold / guardians, gold)`
pub type RankKey = (Decimal, Decimal);

/// Greedy allocator for a single pool of adventurers
///
/// Sites are ranked by gold per guardian (ties broken by raw gold) and
/// saturated in that order until the budget runs out. Each site absorbs at
/// most its own guardian count, since extra adventurers earn nothing.
#[derive(Debug, Clone)]
pub struct SinglePoolAllocator {
    sites: Vec<SiteId>,
    budget: u32,
}

impl SinglePoolAllocator {
    pub fn new(sites: Vec<SiteId>, budget: u32) -> Self {
        Self { sites, budget }
    }

    pub fn sites(&self) -> &[SiteId] {
        &self.sites
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn set_budget(&mut self, budget: u32) {
        self.budget = budget;
    }

    /// Ranking key for a site
    ///
    /// Fails with `InvalidSiteState` for an undefended site, whose ratio is
    /// undefined.
    pub fn rank_key<S: SiteRecord>(site: &S) -> Result<RankKey> {
        if site.guardians() == 0 {
            return Err(PlannerError::zero_guardians(site.name()));
        }
        let efficiency = site.gold() / Decimal::from(site.guardians());
        Ok((efficiency, site.gold()))
    }

    /// Allocate the stored budget across every site
    ///
    /// The result holds one entry per site: funded sites in rank order,
    /// then the sites the budget never reached with zero adventurers, still
    /// in rank order.
    pub fn allocate<S: SiteRecord>(
        &self,
        registry: &SiteRegistry<S>,
    ) -> Result<Vec<SiteAllocation>> {
        self.allocate_with_budget(registry, self.budget)
    }

    /// Total reward for each budget in `budgets`
    ///
    /// Every budget reruns the full ranking; nothing is reused between
    /// budgets. The stored budget is left as it was.
    pub fn expected_reward_for_budgets<S: SiteRecord>(
        &self,
        registry: &SiteRegistry<S>,
        budgets: &[u32],
    ) -> Result<Vec<Decimal>> {
        budgets
            .iter()
            .map(|&budget| -> Result<Decimal> {
                let allocation = self.allocate_with_budget(registry, budget)?;
                let total = total_reward(registry, &allocation)?;
                debug!(budget, %total, "Expected reward computed");
                Ok(total)
            })
            .collect()
    }

    /// Overwrite a site's gold and guardians
    ///
    /// No validation beyond resolving the handle; callers supply sane values.
    pub fn update_site<S: SiteRecord>(
        &self,
        registry: &mut SiteRegistry<S>,
        site: SiteId,
        new_gold: Decimal,
        new_guardians: u32,
    ) -> Result<()> {
        let record = registry.get_mut(site)?;
        debug!(
            site = record.name(),
            old_gold = %record.gold(),
            old_guardians = record.guardians(),
            %new_gold,
            new_guardians,
            "Updating site"
        );
        record.set_gold(new_gold);
        record.set_guardians(new_guardians);
        Ok(())
    }

    fn allocate_with_budget<S: SiteRecord>(
        &self,
        registry: &SiteRegistry<S>,
        budget: u32,
    ) -> Result<Vec<SiteAllocation>> {
        // Every key is computed up front so a bad site fails the call even
        // when the budget would run out before reaching it.
        let mut ranked = self
            .sites
            .iter()
            .map(|&id| -> Result<(SiteId, RankKey)> {
                Ok((id, Self::rank_key(registry.get(id)?)?))
            })
            .collect::<Result<Vec<(SiteId, RankKey)>>>()
            .map_err(|err| {
                warn!(budget, error = %err, "Single-pool allocation rejected");
                err
            })?;

        // Stable, descending
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));

        let mut remaining = budget;
        let mut allocation = Vec::with_capacity(ranked.len());

        for (id, (efficiency, _)) in &ranked {
            let adventurers = if remaining > 0 {
                let guardians = registry.get(*id)?.guardians();
                remaining.min(guardians)
            } else {
                0
            };
            remaining -= adventurers;

            if adventurers > 0 {
                debug!(site = %id, %efficiency, adventurers, "Site funded");
            }
            allocation.push(SiteAllocation::new(*id, adventurers));
        }

        info!(
            budget,
            sites = allocation.len(),
            unspent = remaining,
            "Single-pool allocation complete"
        );
        Ok(allocation)
    }
}

/// Sum of the reward law over an allocation
pub fn total_reward<S: SiteRecord>(
    registry: &SiteRegistry<S>,
    allocation: &[SiteAllocation],
) -> Result<Decimal> {
    let captures = allocation
        .iter()
        .map(|entry| -> Result<Decimal> {
            let site = registry.get(entry.site)?;
            Ok(reward::capture(site.gold(), site.guardians(), entry.adventurers))
        })
        .collect::<Result<Vec<_>>>()?;
    reward::checked_total("total reward", captures)
}
