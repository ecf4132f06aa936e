//! Command-line interface for the `rbuild` binary

use crate::core::errors::BuildError;
use crate::core::execution::config::{BuildConfig, DepletionPolicy, PoolScope, StageDurations};
use crate::core::types::Material;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rbuild")]
#[command(about = "Simulate the construction of a multi-floor building: floors in sequence, units in parallel")]
pub struct Cli {
    /// TOML file with a build configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of floors to build
    #[arg(long)]
    pub floors: Option<u32>,

    /// Units built in parallel on each floor
    #[arg(long)]
    pub units_per_floor: Option<u32>,

    /// Material each unit needs
    #[arg(long)]
    pub material_per_unit: Option<Material>,

    /// Initial material stock
    #[arg(long)]
    pub stock: Option<Material>,

    #[arg(long)]
    pub cranes: Option<usize>,

    #[arg(long)]
    pub elevators: Option<usize>,

    #[arg(long)]
    pub plumbers: Option<usize>,

    #[arg(long)]
    pub electricians: Option<usize>,

    #[arg(long)]
    pub fire_alarm_technicians: Option<usize>,

    /// Whether resource pools live for the whole run or are recreated per floor
    #[arg(long, value_enum)]
    pub pool_scope: Option<PoolScope>,

    #[arg(long, value_enum)]
    pub depletion_policy: Option<DepletionPolicy>,

    /// Fractional random spread applied to every simulated duration
    #[arg(long)]
    pub jitter: Option<f64>,

    /// Seed for the duration jitter
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip all simulated waiting
    #[arg(long)]
    pub fast: bool,

    /// Increase log verbosity (-v for stage narration, -vv for everything)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Resolve the final configuration: defaults, then the file, then flags
    pub fn build_config(&self) -> Result<BuildConfig, BuildError> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load(path)?,
            None => BuildConfig::default(),
        };

        if let Some(floors) = self.floors {
            config.floor_count = floors;
        }
        if let Some(units) = self.units_per_floor {
            config.units_per_floor = units;
        }
        if let Some(amount) = self.material_per_unit {
            config.material_per_unit = amount;
        }
        if let Some(stock) = self.stock {
            config.initial_stock = stock;
        }
        if let Some(n) = self.cranes {
            config.capacities.crane = n;
        }
        if let Some(n) = self.elevators {
            config.capacities.elevator = n;
        }
        if let Some(n) = self.plumbers {
            config.capacities.plumber = n;
        }
        if let Some(n) = self.electricians {
            config.capacities.electrician = n;
        }
        if let Some(n) = self.fire_alarm_technicians {
            config.capacities.fire_alarm = n;
        }
        if let Some(scope) = self.pool_scope {
            config.pool_scope = scope;
        }
        if let Some(policy) = self.depletion_policy {
            config.depletion_policy = policy;
        }
        if let Some(jitter) = self.jitter {
            config.jitter = jitter;
        }
        if self.seed.is_some() {
            config.random_seed = self.seed;
        }
        if self.fast {
            config.durations = StageDurations::instant();
        }

        config.validate().map_err(BuildError::InvalidConfig)?;
        Ok(config)
    }
}
