//! Common test utilities and fixtures

#![allow(dead_code)]

use expedition_planner::{Site, SiteId, SiteRegistry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Register `sites` in a fresh registry
pub fn registry_with(sites: Vec<Site>) -> (SiteRegistry, Vec<SiteId>) {
    let mut registry = SiteRegistry::new();
    let ids = registry.extend(sites).expect("fixture site names are unique");
    (registry, ids)
}

/// The two-site scenario: ratios A=15, B=10
pub fn two_sites() -> Vec<Site> {
    vec![Site::new("A", dec!(60), 4), Site::new("B", dec!(50), 5)]
}

/// A wider spread of sites, every one defended
pub fn valley() -> Vec<Site> {
    vec![
        Site::new("Ruins", dec!(120), 10),
        Site::new("Crypt", dec!(45), 3),
        Site::new("Tower", dec!(200), 25),
        Site::new("Barrow", dec!(12), 6),
        Site::new("Mine", dec!(90), 9),
    ]
}

/// Build sites from (gold, guardians) pairs, naming them by position
pub fn numbered(specs: &[(u32, u32)]) -> Vec<Site> {
    specs
        .iter()
        .enumerate()
        .map(|(index, &(gold, guardians))| {
            Site::new(format!("site-{index}"), Decimal::from(gold), guardians)
        })
        .collect()
}

/// Reward law written out independently of the library
pub fn expected_capture(gold: Decimal, guardians: u32, adventurers: u32) -> Decimal {
    let proportional = gold * Decimal::from(adventurers) / Decimal::from(guardians);
    if proportional < gold {
        proportional
    } else {
        gold
    }
}
