//! Site record and the registry that owns it

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::{PlannerError, Result};
use super::traits::SiteRecord;
use crate::allocation::reward;

/// Handle to a site stored in a [`SiteRegistry`]
///
/// Allocators hold these instead of references so they can outlive any
/// single borrow of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(usize);

impl SiteId {
    /// Position of the site in its registry
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "site#{}", self.0)
    }
}

/// A location holding a gold reward and a guardian defense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site name
    pub name: String,
    /// Gold remaining at the site
    pub gold: Decimal,
    /// Guardians remaining at the site
    #[serde(default)]
    pub guardians: u32,
}

impl Site {
    /// Create a new site
    pub fn new(name: impl Into<String>, gold: Decimal, guardians: u32) -> Self {
        Self {
            name: name.into(),
            gold,
            guardians,
        }
    }
}

impl SiteRecord for Site {
    fn name(&self) -> &str {
        &self.name
    }

    fn gold(&self) -> Decimal {
        self.gold
    }

    fn set_gold(&mut self, gold: Decimal) {
        self.gold = gold;
    }

    fn guardians(&self) -> u32 {
        self.guardians
    }

    fn set_guardians(&mut self, guardians: u32) {
        self.guardians = guardians;
    }
}

/// Caller-owned arena of sites
///
/// Sites are never removed, so every issued [`SiteId`] stays valid for the
/// lifetime of the registry.
#[derive(Debug, Clone)]
pub struct SiteRegistry<S = Site> {
    sites: Vec<S>,
}

impl<S: SiteRecord> SiteRegistry<S> {
    pub fn new() -> Self {
        Self { sites: Vec::new() }
    }

    /// Add a site and return its handle
    ///
    /// Fails if a site with the same name is already registered.
    pub fn insert(&mut self, site: S) -> Result<SiteId> {
        if self.find_by_name(site.name()).is_some() {
            return Err(PlannerError::DuplicateSite(site.name().to_string()));
        }
        self.sites.push(site);
        Ok(SiteId(self.sites.len() - 1))
    }

    /// Add several sites, returning their handles in input order
    pub fn extend<I>(&mut self, sites: I) -> Result<Vec<SiteId>>
    where
        I: IntoIterator<Item = S>,
    {
        sites.into_iter().map(|site| self.insert(site)).collect()
    }

    pub fn get(&self, id: SiteId) -> Result<&S> {
        self.sites.get(id.0).ok_or(PlannerError::UnknownSite(id))
    }

    pub fn get_mut(&mut self, id: SiteId) -> Result<&mut S> {
        self.sites.get_mut(id.0).ok_or(PlannerError::UnknownSite(id))
    }

    /// Look up a site handle by name
    pub fn find_by_name(&self, name: &str) -> Option<SiteId> {
        self.sites
            .iter()
            .position(|site| site.name() == name)
            .map(SiteId)
    }

    /// Handles of every registered site, in insertion order
    pub fn ids(&self) -> Vec<SiteId> {
        (0..self.sites.len()).map(SiteId).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SiteId, &S)> {
        self.sites
            .iter()
            .enumerate()
            .map(|(index, site)| (SiteId(index), site))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Gold held across all sites
    pub fn total_gold(&self) -> Result<Decimal> {
        reward::checked_total("total gold", self.sites.iter().map(SiteRecord::gold))
    }

    /// Guardians across all sites
    pub fn total_guardians(&self) -> u64 {
        self.sites.iter().map(|site| u64::from(site.guardians())).sum()
    }
}

impl<S: SiteRecord> Default for SiteRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = SiteRegistry::new();
        let a = registry.insert(Site::new("A", dec!(60), 4)).unwrap();
        let b = registry.insert(Site::new("B", dec!(50), 5)).unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(b).unwrap().name(), "B");
        assert_eq!(registry.find_by_name("A"), Some(a));
        assert_eq!(registry.find_by_name("C"), None);
        assert_eq!(registry.ids(), vec![a, b]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = SiteRegistry::new();
        registry.insert(Site::new("A", dec!(60), 4)).unwrap();

        let err = registry.insert(Site::new("A", dec!(1), 1)).unwrap_err();
        assert!(matches!(err, PlannerError::DuplicateSite(name) if name == "A"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_site() {
        let registry: SiteRegistry = SiteRegistry::new();
        let err = registry.get(SiteId(3)).unwrap_err();
        assert!(matches!(err, PlannerError::UnknownSite(id) if id.index() == 3));
    }

    #[test]
    fn test_totals() {
        let mut registry = SiteRegistry::new();
        registry
            .extend([Site::new("A", dec!(60), 4), Site::new("B", dec!(50.5), 5)])
            .unwrap();

        assert_eq!(registry.total_gold().unwrap(), dec!(110.5));
        assert_eq!(registry.total_guardians(), 9);
    }

    #[test]
    fn test_total_gold_overflow_is_an_error() {
        let mut registry = SiteRegistry::new();
        registry
            .extend([Site::new("A", Decimal::MAX, 1), Site::new("B", dec!(1), 1)])
            .unwrap();

        assert!(matches!(
            registry.total_gold(),
            Err(PlannerError::Overflow("total gold"))
        ));
    }

    #[test]
    fn test_record_accessors() {
        let mut site = Site::new("Keep", dec!(10), 2);
        site.set_gold(dec!(4));
        site.set_guardians(0);

        assert_eq!(site.gold(), dec!(4));
        assert!(site.is_undefended());
    }
}
