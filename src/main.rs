//! ExpeditionPlanner - Main Entry Point
//!
//! Loads a scenario of gold sites and runs either the single-pool allocator
//! or a multi-day competing-teams simulation over it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use expedition_planner::allocation::validate_count;
use expedition_planner::config::loader::load_config;
use expedition_planner::{
    DayReport, SequentialTeamAllocator, SinglePoolAllocator, SinglePoolReport,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "expedition.toml", env = "EXPEDITION_CONFIG")]
    config: String,

    /// Log level (trace, debug, info, warn, error); defaults to the config file's
    #[arg(long)]
    log_level: Option<String>,

    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate one pool of adventurers across all sites
    SinglePool {
        /// Adventurers available (overrides the config file)
        #[arg(long, allow_negative_numbers = true)]
        budget: Option<i64>,

        /// Comma-separated budgets to report expected reward for
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        budgets: Option<Vec<i64>>,
    },
    /// Simulate teams competing for the same sites
    Teams {
        /// Number of teams (overrides the config file)
        #[arg(long, allow_negative_numbers = true)]
        teams: Option<i64>,

        /// Adventurers per team (overrides the config file)
        #[arg(long, allow_negative_numbers = true)]
        adventurer_size: Option<i64>,

        /// Days to simulate (overrides the config file)
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(Some(&args.config))?;

    // Initialize logging
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(config.settings.log_level.as_str())
        .to_lowercase();
    let level = match log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG directives refine the chosen level per module
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ExpeditionPlanner");
    info!("Configuration file: {}", args.config);

    let (mut registry, ids) = config.build_registry()?;
    info!(sites = registry.len(), "Scenario loaded");

    match args.command {
        Command::SinglePool { budget, budgets } => {
            let budget = match budget {
                Some(value) => validate_count("budget", value)?,
                None => config.single_pool.budget()?,
            };
            let budgets = match budgets {
                Some(values) => values
                    .into_iter()
                    .map(|value| validate_count("budget", value))
                    .collect::<expedition_planner::Result<Vec<_>>>()?,
                None => config.single_pool.budgets()?,
            };

            let allocator = SinglePoolAllocator::new(ids, budget);
            let allocation = allocator.allocate(&registry)?;
            let rewards = allocator.expected_reward_for_budgets(&registry, &budgets)?;

            let report = SinglePoolReport::build(&registry, budget, &allocation, &budgets, &rewards)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Command::Teams {
            teams,
            adventurer_size,
            days,
        } => {
            let team_count = match teams {
                Some(value) => validate_count("team count", value)? as usize,
                None => config.teams.team_count()?,
            };
            let adventurer_size = match adventurer_size {
                Some(value) => validate_count("adventurer size", value)?,
                None => config.teams.adventurer_size()?,
            };
            let days = match days {
                Some(value) => validate_count("days", value)?,
                None => config.teams.days()?,
            };

            let mut allocator = SequentialTeamAllocator::new(team_count)
                .with_abstention(config.teams.abstention)
                .with_idle_value(config.teams.idle_value);
            allocator.add_sites(ids);

            let mut reports = Vec::with_capacity(days as usize);
            for day in 1..=days {
                let decisions = allocator.simulate_day(&mut registry, adventurer_size)?;
                reports.push(DayReport::build(&registry, day, &decisions)?);
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    print!("{report}");
                }
            }
        }
    }

    info!("Done");
    Ok(())
}
