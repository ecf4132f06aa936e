//! Configuration for a building construction run
//!
//! Every constant of the run is adjustable here: topology, material
//! figures, resource pool capacities and the simulated stage durations.

use crate::core::errors::BuildError;
use crate::core::types::{Material, ResourceKind, Stage};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Lifetime of the resource pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PoolScope {
    /// One set of pools for the whole run
    #[default]
    Building,
    /// Pools are recreated at every floor start and dropped at floor end
    Floor,
}

/// How the inventory decides a request failed and who raises the depletion flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DepletionPolicy {
    /// CHECK and CONSUME both test the requested amount and both raise the flag
    #[default]
    Strict,
    /// CHECK tests the per-unit requirement and a failed CONSUME leaves the flag alone
    Legacy,
}

/// Capacity of each resource pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCapacities {
    pub crane: usize,
    pub elevator: usize,
    pub plumber: usize,
    pub electrician: usize,
    pub fire_alarm: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            crane: 1,
            elevator: 1,
            plumber: 2,
            electrician: 2,
            fire_alarm: 3,
        }
    }
}

impl PoolCapacities {
    pub fn capacity(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Crane => self.crane,
            ResourceKind::Elevator => self.elevator,
            ResourceKind::Plumber => self.plumber,
            ResourceKind::Electrician => self.electrician,
            ResourceKind::FireAlarmTechnician => self.fire_alarm,
        }
    }
}

/// Simulated hold durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageDurations {
    pub foundation_ms: u64,
    pub elevator_ms: u64,
    pub crane_ms: u64,
    pub water_ms: u64,
    pub electricity_ms: u64,
    pub fire_alarm_ms: u64,
    pub finishing_ms: u64,
    pub floor_gap_ms: u64,
}

impl Default for StageDurations {
    fn default() -> Self {
        Self {
            foundation_ms: 5000,
            elevator_ms: 1000,
            crane_ms: 1000,
            water_ms: 2000,
            electricity_ms: 2000,
            fire_alarm_ms: 1000,
            finishing_ms: 2000,
            floor_gap_ms: 1000,
        }
    }
}

impl StageDurations {
    /// All holds set to zero
    pub fn instant() -> Self {
        Self::uniform(0)
    }

    /// Every hold, including foundation and floor gap, set to `ms`
    pub fn uniform(ms: u64) -> Self {
        Self {
            foundation_ms: ms,
            elevator_ms: ms,
            crane_ms: ms,
            water_ms: ms,
            electricity_ms: ms,
            fire_alarm_ms: ms,
            finishing_ms: ms,
            floor_gap_ms: ms,
        }
    }

    /// Base hold for a pipeline stage. Material stages are round trips, not holds.
    pub fn for_stage(&self, stage: Stage) -> Duration {
        let ms = match stage {
            Stage::MaterialCheck | Stage::MaterialConsume => 0,
            Stage::Elevator => self.elevator_ms,
            Stage::Crane => self.crane_ms,
            Stage::WaterInstall => self.water_ms,
            Stage::ElectricityInstall => self.electricity_ms,
            Stage::FireAlarm => self.fire_alarm_ms,
            Stage::Finishing => self.finishing_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn foundation(&self) -> Duration {
        Duration::from_millis(self.foundation_ms)
    }

    pub fn floor_gap(&self) -> Duration {
        Duration::from_millis(self.floor_gap_ms)
    }
}

/// Configuration for a construction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub floor_count: u32,
    pub units_per_floor: u32,
    pub material_per_unit: Material,
    pub initial_stock: Material,
    /// Fractional jitter applied to each hold, in `[0, 1]`
    pub jitter: f64,
    /// Seed for the jitter generators; `None` draws from entropy
    pub random_seed: Option<u64>,
    pub pool_scope: PoolScope,
    pub depletion_policy: DepletionPolicy,
    pub capacities: PoolCapacities,
    pub durations: StageDurations,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            floor_count: 10,
            units_per_floor: 4,
            material_per_unit: 2,
            initial_stock: 10,
            jitter: 0.0,
            random_seed: Some(42),
            pool_scope: PoolScope::default(),
            depletion_policy: DepletionPolicy::default(),
            capacities: PoolCapacities::default(),
            durations: StageDurations::default(),
        }
    }
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floors(mut self, floor_count: u32) -> Self {
        self.floor_count = floor_count;
        self
    }

    pub fn with_units_per_floor(mut self, units: u32) -> Self {
        self.units_per_floor = units;
        self
    }

    pub fn with_material_per_unit(mut self, amount: Material) -> Self {
        self.material_per_unit = amount;
        self
    }

    pub fn with_initial_stock(mut self, stock: Material) -> Self {
        self.initial_stock = stock;
        self
    }

    pub fn with_capacities(mut self, capacities: PoolCapacities) -> Self {
        self.capacities = capacities;
        self
    }

    pub fn with_durations(mut self, durations: StageDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_pool_scope(mut self, scope: PoolScope) -> Self {
        self.pool_scope = scope;
        self
    }

    pub fn with_depletion_policy(mut self, policy: DepletionPolicy) -> Self {
        self.depletion_policy = policy;
        self
    }

    /// Total number of units the full building would contain
    pub fn total_units(&self) -> u32 {
        self.floor_count * self.units_per_floor
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.floor_count == 0 {
            return Err("Floor count must be greater than 0".to_string());
        }

        if self.units_per_floor == 0 {
            return Err("Units per floor must be greater than 0".to_string());
        }

        if self.floor_count.checked_mul(self.units_per_floor).is_none() {
            return Err("Total unit count overflows".to_string());
        }

        if self.material_per_unit <= 0 {
            return Err("Material per unit must be greater than 0".to_string());
        }

        if self.initial_stock < 0 {
            return Err("Initial stock cannot be negative".to_string());
        }

        for kind in ResourceKind::ALL {
            if self.capacities.capacity(kind) == 0 {
                return Err(format!("Capacity of the {} pool must be greater than 0", kind));
            }
        }

        if !(0.0..=1.0).contains(&self.jitter) {
            return Err("Jitter must be within [0, 1]".to_string());
        }

        Ok(())
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, String> {
        toml::from_str(source).map_err(|e| e.to_string())
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let source = std::fs::read_to_string(path).map_err(|e| BuildError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&source).map_err(|reason| BuildError::ConfigLoad {
            path: path.to_path_buf(),
            reason,
        })?;
        config.validate().map_err(BuildError::InvalidConfig)?;
        Ok(config)
    }
}
