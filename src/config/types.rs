//! Configuration types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::{validate_count, AbstentionRule, DEFAULT_IDLE_VALUE};
use crate::common::errors::Result;
use crate::common::types::{Site, SiteId, SiteRegistry};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sites available to both policies
    #[serde(default)]
    pub sites: Vec<Site>,
    /// Single-pool allocation settings
    #[serde(default)]
    pub single_pool: SinglePoolConfig,
    /// Competing-teams settings
    #[serde(default)]
    pub teams: TeamsConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Register every configured site, returning handles in file order
    pub fn build_registry(&self) -> Result<(SiteRegistry, Vec<SiteId>)> {
        let mut registry = SiteRegistry::new();
        let ids = registry.extend(self.sites.iter().cloned())?;
        Ok((registry, ids))
    }
}

/// Single-pool allocation settings
///
/// Counts are signed here so that a negative value in a file or the
/// environment is reported instead of failing deserialization opaquely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinglePoolConfig {
    /// Adventurers available for one allocation
    #[serde(default)]
    pub budget: i64,
    /// Budgets to evaluate expected reward for
    #[serde(default)]
    pub budgets: Vec<i64>,
}

impl SinglePoolConfig {
    pub fn budget(&self) -> Result<u32> {
        validate_count("budget", self.budget)
    }

    pub fn budgets(&self) -> Result<Vec<u32>> {
        self.budgets
            .iter()
            .map(|&budget| validate_count("budget", budget))
            .collect()
    }
}

/// Competing-teams settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsConfig {
    /// Number of teams deciding each day
    #[serde(default = "default_team_count")]
    pub team_count: i64,
    /// Adventurers each team can deploy
    #[serde(default)]
    pub adventurer_size: i64,
    /// Days to simulate back to back
    #[serde(default = "default_days")]
    pub days: i64,
    /// Whether staying home competes with sites
    #[serde(default)]
    pub abstention: AbstentionRule,
    /// Gold-equivalent value of an adventurer kept home
    #[serde(default = "default_idle_value")]
    pub idle_value: Decimal,
}

impl TeamsConfig {
    pub fn team_count(&self) -> Result<usize> {
        validate_count("team count", self.team_count).map(|count| count as usize)
    }

    pub fn adventurer_size(&self) -> Result<u32> {
        validate_count("adventurer size", self.adventurer_size)
    }

    pub fn days(&self) -> Result<u32> {
        validate_count("days", self.days)
    }
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            team_count: default_team_count(),
            adventurer_size: 0,
            days: default_days(),
            abstention: AbstentionRule::default(),
            idle_value: default_idle_value(),
        }
    }
}

fn default_team_count() -> i64 {
    1
}

fn default_days() -> i64 {
    1
}

fn default_idle_value() -> Decimal {
    DEFAULT_IDLE_VALUE
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
