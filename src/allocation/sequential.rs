use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::allocation::reward;
use crate::allocation::types::{AbstentionRule, Candidate, Decision, DEFAULT_IDLE_VALUE};
use crate::common::errors::{PlannerError, Result};
use crate::common::traits::SiteRecord;
use crate::common::types::{SiteId, SiteRegistry};

/// Uncommitted gold and guardians for one site during a simulated day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShadowSite {
    gold: Decimal,
    guardians: u32,
}

/// Scratch copy of site state for one simulated day
///
/// Teams deplete the shadow copy; the real sites are only written by
/// [`ShadowState::commit`], once every team has decided. A handle managed
/// twice maps to one slot, so both entries see the same depletion.
#[derive(Debug)]
struct ShadowState {
    slots: Vec<(SiteId, ShadowSite)>,
    /// Slot of each managed handle, in stored order
    order: Vec<usize>,
}

impl ShadowState {
    /// Snapshot the current state of `sites`
    ///
    /// Resolves every handle, so an unknown site fails here, before any
    /// team decides and before anything is written back.
    fn snapshot<S: SiteRecord>(registry: &SiteRegistry<S>, sites: &[SiteId]) -> Result<Self> {
        let mut slot_of: HashMap<SiteId, usize> = HashMap::with_capacity(sites.len());
        let mut slots = Vec::with_capacity(sites.len());
        let mut order = Vec::with_capacity(sites.len());

        for &id in sites {
            let slot = match slot_of.get(&id) {
                Some(&slot) => slot,
                None => {
                    let site = registry.get(id)?;
                    slots.push((
                        id,
                        ShadowSite {
                            gold: site.gold(),
                            guardians: site.guardians(),
                        },
                    ));
                    slot_of.insert(id, slots.len() - 1);
                    slots.len() - 1
                }
            };
            order.push(slot);
        }
        Ok(Self { slots, order })
    }

    /// Managed sites in stored order, with their slot and current state
    fn entries(&self) -> impl Iterator<Item = (usize, SiteId, ShadowSite)> + '_ {
        self.order.iter().map(|&slot| {
            let (id, state) = self.slots[slot];
            (slot, id, state)
        })
    }

    /// Apply a team's capture to the shadow copy
    fn deplete(&mut self, slot: usize, candidate: &Candidate) {
        let (_, entry) = &mut self.slots[slot];
        entry.gold -= candidate.received;
        entry.guardians = entry.guardians.saturating_sub(candidate.used);
    }

    /// Write the final shadow values onto the real sites
    fn commit<S: SiteRecord>(self, registry: &mut SiteRegistry<S>) -> Result<()> {
        for (id, shadow) in self.slots {
            let site = registry.get_mut(id)?;
            site.set_gold(shadow.gold);
            site.set_guardians(shadow.guardians);
        }
        Ok(())
    }
}

/// Sequential greedy allocator for competing teams
///
/// Each team, in order, picks the single site that maximizes
/// `idle_value * (adventurer_size - used) + received` against the state left
/// by the teams before it. Site state is committed once the whole day has
/// been decided.
#[derive(Debug, Clone)]
pub struct SequentialTeamAllocator {
    team_count: usize,
    sites: Vec<SiteId>,
    abstention: AbstentionRule,
    idle_value: Decimal,
}

impl SequentialTeamAllocator {
    pub fn new(team_count: usize) -> Self {
        Self {
            team_count,
            sites: Vec::new(),
            abstention: AbstentionRule::default(),
            idle_value: DEFAULT_IDLE_VALUE,
        }
    }

    pub fn with_abstention(mut self, abstention: AbstentionRule) -> Self {
        self.abstention = abstention;
        self
    }

    pub fn with_idle_value(mut self, idle_value: Decimal) -> Self {
        self.idle_value = idle_value;
        self
    }

    /// Append sites to the managed set (duplicates are kept)
    pub fn add_sites(&mut self, sites: impl IntoIterator<Item = SiteId>) {
        self.sites.extend(sites);
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn sites(&self) -> &[SiteId] {
        &self.sites
    }

    pub fn abstention(&self) -> AbstentionRule {
        self.abstention
    }

    pub fn idle_value(&self) -> Decimal {
        self.idle_value
    }

    /// Decide every team's move for one day, then commit the depletion
    ///
    /// Returns one decision per team, team 0 first. The registry is only
    /// written after the last team has decided; on error nothing is written.
    pub fn simulate_day<S: SiteRecord>(
        &self,
        registry: &mut SiteRegistry<S>,
        adventurer_size: u32,
    ) -> Result<Vec<Decision>> {
        if self.sites.is_empty() {
            warn!(teams = self.team_count, "No sites managed, every team abstains");
            return Ok(vec![Decision::Abstain; self.team_count]);
        }

        let mut shadow = ShadowState::snapshot(registry, &self.sites).map_err(|err| {
            warn!(error = %err, "Day rejected, a managed site could not be resolved");
            err
        })?;
        let mut decisions = Vec::with_capacity(self.team_count);

        for team in 0..self.team_count {
            let choice = self.best_choice(&shadow, adventurer_size).map_err(|err| {
                warn!(team, error = %err, "Day rejected, team could not be scored");
                err
            })?;
            let decision = match choice {
                Some((slot, winner)) => {
                    debug!(
                        team,
                        site = %winner.site,
                        used = winner.used,
                        received = %winner.received,
                        score = %winner.score,
                        "Team assigned"
                    );
                    shadow.deplete(slot, &winner);
                    Decision::assigned(winner.site, winner.used)
                }
                None => {
                    debug!(team, "Team abstains");
                    Decision::Abstain
                }
            };
            decisions.push(decision);
        }

        shadow.commit(registry)?;

        info!(
            teams = self.team_count,
            adventurer_size,
            abstained = decisions.iter().filter(|d| d.is_abstain()).count(),
            "Simulated day committed"
        );
        Ok(decisions)
    }

    /// Evaluate one site against its shadow state
    ///
    /// Fails with `Overflow` when the score does not fit in a Decimal.
    pub fn evaluate(
        &self,
        site: SiteId,
        gold: Decimal,
        guardians: u32,
        adventurer_size: u32,
    ) -> Result<Candidate> {
        let used = if guardians > 0 {
            adventurer_size.min(guardians)
        } else {
            adventurer_size
        };
        let received = reward::capture(gold, guardians, used);
        let score = self
            .idle_value
            .checked_mul(Decimal::from(adventurer_size - used))
            .and_then(|idle| idle.checked_add(received))
            .ok_or(PlannerError::Overflow("team score"))?;

        Ok(Candidate {
            site,
            used,
            received,
            score,
        })
    }

    /// Score a team gets for staying home
    pub fn abstention_score(&self, adventurer_size: u32) -> Result<Decimal> {
        self.idle_value
            .checked_mul(Decimal::from(adventurer_size))
            .ok_or(PlannerError::Overflow("abstention score"))
    }

    /// Best candidate for the next team with its shadow slot, or None to
    /// abstain
    ///
    /// Sites are scanned in stored order with a strict comparison, so the
    /// first of several equally scored sites wins.
    fn best_choice(
        &self,
        shadow: &ShadowState,
        adventurer_size: u32,
    ) -> Result<Option<(usize, Candidate)>> {
        let mut best: Option<(usize, Candidate)> = None;

        for (slot, id, state) in shadow.entries() {
            let candidate = self.evaluate(id, state.gold, state.guardians, adventurer_size)?;
            if best.map_or(true, |(_, current)| candidate.score > current.score) {
                best = Some((slot, candidate));
            }
        }

        match (self.abstention, best) {
            (AbstentionRule::Scored, Some((_, winner)))
                if self.abstention_score(adventurer_size)? > winner.score =>
            {
                Ok(None)
            }
            (_, best) => Ok(best),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Site;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn registry_with(sites: Vec<Site>) -> (SiteRegistry, Vec<SiteId>) {
        let mut registry = SiteRegistry::new();
        let ids = registry.extend(sites).unwrap();
        (registry, ids)
    }

    #[test]
    fn test_no_sites_all_abstain() {
        let mut registry: SiteRegistry = SiteRegistry::new();
        let allocator = SequentialTeamAllocator::new(3);

        let decisions = allocator.simulate_day(&mut registry, 5).unwrap();
        assert_eq!(decisions, vec![Decision::Abstain; 3]);
    }

    #[test]
    fn test_single_team_partial_capture() {
        let (mut registry, ids) = registry_with(vec![Site::new("Mine", dec!(100), 8)]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 2).unwrap();

        assert_eq!(decisions, vec![Decision::assigned(ids[0], 2)]);
        let site = registry.get(ids[0]).unwrap();
        assert_eq!(site.guardians(), 6);
        assert_eq!(site.gold(), dec!(75));
    }

    #[test]
    fn test_second_team_sees_depletion() {
        let (mut registry, ids) = registry_with(vec![Site::new("Vault", dec!(100), 10)]);
        let mut allocator = SequentialTeamAllocator::new(2);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 10).unwrap();

        assert_eq!(
            decisions,
            vec![Decision::assigned(ids[0], 10), Decision::assigned(ids[0], 10)]
        );
        let site = registry.get(ids[0]).unwrap();
        assert_eq!(site.gold(), Decimal::ZERO);
        assert_eq!(site.guardians(), 0);
    }

    #[test]
    fn test_winner_values_are_committed_not_last_scanned() {
        // Rich wins but Poor is scanned last; depletion must hit Rich only.
        let (mut registry, ids) = registry_with(vec![
            Site::new("Rich", dec!(90), 3),
            Site::new("Poor", dec!(4), 2),
        ]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 3).unwrap();

        assert_eq!(decisions, vec![Decision::assigned(ids[0], 3)]);
        assert_eq!(registry.get(ids[0]).unwrap().gold(), Decimal::ZERO);
        assert_eq!(registry.get(ids[0]).unwrap().guardians(), 0);
        assert_eq!(registry.get(ids[1]).unwrap(), &Site::new("Poor", dec!(4), 2));
    }

    #[test]
    fn test_idle_value_trades_against_partial_capture() {
        // Cheap: 1 guardian, 10 gold -> score 2.5 * 3 + 10 = 17.5
        // Big:   4 guardians, 16 gold -> score 16
        let (mut registry, ids) = registry_with(vec![
            Site::new("Big", dec!(16), 4),
            Site::new("Cheap", dec!(10), 1),
        ]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 4).unwrap();
        assert_eq!(decisions, vec![Decision::assigned(ids[1], 1)]);
    }

    #[test]
    fn test_ties_go_to_first_site() {
        let (mut registry, ids) = registry_with(vec![
            Site::new("First", dec!(20), 2),
            Site::new("Second", dec!(20), 2),
        ]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 2).unwrap();
        assert_eq!(decisions, vec![Decision::assigned(ids[0], 2)]);
    }

    #[test]
    fn test_zero_adventurers_first_site_wins() {
        let (mut registry, ids) = registry_with(vec![
            Site::new("Open", dec!(30), 0),
            Site::new("Guarded", dec!(30), 3),
        ]);
        let mut allocator = SequentialTeamAllocator::new(2).with_abstention(AbstentionRule::Scored);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 0).unwrap();

        assert_eq!(
            decisions,
            vec![Decision::assigned(ids[0], 0), Decision::assigned(ids[0], 0)]
        );
        assert_eq!(registry.get(ids[0]).unwrap().gold(), dec!(30));
    }

    #[test]
    fn test_scored_abstention_beats_poor_sites() {
        // Best site pays 1 gold for 2 adventurers: 2.5 * 0 + 1 < 2.5 * 2
        let (mut registry, ids) = registry_with(vec![Site::new("Bog", dec!(1), 2)]);
        let mut allocator = SequentialTeamAllocator::new(1).with_abstention(AbstentionRule::Scored);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 2).unwrap();

        assert_eq!(decisions, vec![Decision::Abstain]);
        assert_eq!(registry.get(ids[0]).unwrap(), &Site::new("Bog", dec!(1), 2));
    }

    #[test]
    fn test_fallback_never_abstains_with_sites() {
        let (mut registry, ids) = registry_with(vec![Site::new("Bog", dec!(1), 2)]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 2).unwrap();
        assert_eq!(decisions, vec![Decision::assigned(ids[0], 2)]);
    }

    #[test]
    fn test_custom_idle_value() {
        let (_, ids) = registry_with(vec![Site::new("Eval", dec!(10), 5)]);
        let allocator = SequentialTeamAllocator::new(1).with_idle_value(dec!(1));
        let candidate = allocator.evaluate(ids[0], dec!(10), 5, 7).unwrap();

        assert_eq!(candidate.used, 5);
        assert_eq!(candidate.received, dec!(10));
        assert_eq!(candidate.score, dec!(12));
        assert_eq!(allocator.abstention_score(7).unwrap(), dec!(7));
    }

    #[test]
    fn test_huge_gold_site() {
        let gold = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let (mut registry, ids) = registry_with(vec![Site::new("Dragon", gold, 10)]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let decisions = allocator.simulate_day(&mut registry, 2).unwrap();

        assert_eq!(decisions, vec![Decision::assigned(ids[0], 2)]);
        let site = registry.get(ids[0]).unwrap();
        assert_eq!(site.gold(), gold - gold / dec!(5));
        assert_eq!(site.guardians(), 8);
    }

    #[test_log::test]
    fn test_score_overflow_writes_nothing() {
        // Full capture of MAX gold plus idle value for the unused adventurer
        let (mut registry, ids) = registry_with(vec![Site::new("Hoard", Decimal::MAX, 1)]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites(ids.clone());

        let err = allocator.simulate_day(&mut registry, 2).unwrap_err();

        assert!(matches!(err, PlannerError::Overflow("team score")));
        assert_eq!(registry.get(ids[0]).unwrap().gold(), Decimal::MAX);
    }

    #[test]
    fn test_shadow_slots_follow_stored_order() {
        let (registry, ids) = registry_with(vec![
            Site::new("A", dec!(10), 1),
            Site::new("B", dec!(20), 2),
        ]);
        let shadow = ShadowState::snapshot(&registry, &[ids[1], ids[0], ids[1]]).unwrap();

        let entries: Vec<(usize, SiteId)> =
            shadow.entries().map(|(slot, id, _)| (slot, id)).collect();
        assert_eq!(entries, vec![(0, ids[1]), (1, ids[0]), (0, ids[1])]);
        assert_eq!(shadow.slots.len(), 2);
    }

    #[test]
    fn test_deplete_hits_the_shared_slot() {
        let (registry, ids) = registry_with(vec![Site::new("Mine", dec!(80), 8)]);
        let mut shadow = ShadowState::snapshot(&registry, &[ids[0], ids[0]]).unwrap();
        let allocator = SequentialTeamAllocator::new(1);
        let candidate = allocator.evaluate(ids[0], dec!(80), 8, 4).unwrap();

        shadow.deplete(0, &candidate);

        for (_, _, state) in shadow.entries() {
            assert_eq!(state, ShadowSite { gold: dec!(40), guardians: 4 });
        }
    }

    #[test_log::test]
    fn test_unknown_site_writes_nothing() {
        let (mut registry, ids) = registry_with(vec![Site::new("Mine", dec!(100), 8)]);
        let (_, foreign) = registry_with(vec![
            Site::new("X", dec!(1), 1),
            Site::new("Y", dec!(1), 1),
        ]);
        let mut allocator = SequentialTeamAllocator::new(1);
        allocator.add_sites([ids[0], foreign[1]]);

        let err = allocator.simulate_day(&mut registry, 2).unwrap_err();

        assert!(matches!(err, PlannerError::UnknownSite(_)));
        assert_eq!(registry.get(ids[0]).unwrap(), &Site::new("Mine", dec!(100), 8));
    }
}
