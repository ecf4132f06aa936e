use super::config::BuildConfig;
use super::floor_coordinator::FloorCoordinator;
use super::timing::StageTimer;
use crate::core::errors::BuildError;
use crate::core::inventory::{DepletionFlag, InventoryClient, MaterialInventory};
use crate::core::observer::{BuildObserver, ObserverSet};
use crate::core::report::{BuildOutcome, BuildReport, FloorReport};
use crate::core::site::SiteEquipment;
use crate::core::types::{Floor, FloorNo};
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

/// Where the supervisor is in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Init,
    PerFloor(FloorNo),
    Finalize,
    Done,
}

/// Top-level driver: starts the inventory, lays the foundation, then builds
/// floors strictly one after another.
///
/// The depletion flag is checked before every floor start and after every
/// floor completion; once it is raised no further floor is started.
pub struct BuildSupervisor {
    config: BuildConfig,
    run_id: Uuid,
    flag: DepletionFlag,
    observers: ObserverSet,
    state: SupervisorState,
}

impl BuildSupervisor {
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        config.validate().map_err(BuildError::InvalidConfig)?;
        Ok(Self {
            config,
            run_id: Uuid::new_v4(),
            flag: DepletionFlag::new(),
            observers: ObserverSet::new(),
            state: SupervisorState::Init,
        })
    }

    /// Add an observer to the run
    pub fn add_observer(&mut self, observer: Arc<dyn BuildObserver>) {
        self.observers.add(observer);
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Shared handle on the run's depletion flag
    pub fn depletion_flag(&self) -> DepletionFlag {
        self.flag.clone()
    }

    fn transition(&mut self, next: SupervisorState) {
        debug!("[Supervisor] {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the construction to completion or until material runs out
    pub fn run(&mut self) -> Result<BuildReport, BuildError> {
        let config = self.config.clone();
        info!(
            "[Supervisor] Run {}: {} floors x {} units, {} material in stock, {} per unit",
            self.run_id,
            config.floor_count,
            config.units_per_floor,
            config.initial_stock,
            config.material_per_unit
        );

        let inventory = MaterialInventory::new(
            config.initial_stock,
            config.material_per_unit,
            config.depletion_policy,
            self.flag.clone(),
        )
        .spawn()?;
        let client = inventory.client();
        let equipment = SiteEquipment::new(&config.capacities);
        let mut timer = StageTimer::new(config.durations.clone(), config.jitter, config.random_seed);

        self.lay_foundation(&mut timer);

        let mut floors = Vec::new();
        for floor_no in 1..=config.floor_count {
            if self.flag.is_raised() {
                warn!(
                    "[Supervisor] Material depleted: floors {}..={} will not be started",
                    floor_no, config.floor_count
                );
                break;
            }

            self.transition(SupervisorState::PerFloor(floor_no));
            let report = self.build_floor(floor_no, &config, &equipment, &client)?;
            floors.push(report);

            if self.flag.is_raised() {
                warn!(
                    "[Supervisor] Floor {} stands, but material is depleted. Stopping construction",
                    floor_no
                );
                break;
            }

            if floor_no < config.floor_count {
                info!("[Supervisor] Floor {} is structurally sound, moving up", floor_no);
                timer.hold(config.durations.floor_gap());
            }
        }

        self.transition(SupervisorState::Finalize);
        let remaining_material = client.query()?.remaining;
        drop(client);
        let ledger = inventory.shutdown()?;

        let depleted = self.flag.is_raised();
        let outcome = if floors.len() == config.floor_count as usize && !depleted {
            BuildOutcome::Complete
        } else {
            BuildOutcome::Partial
        };

        let report = BuildReport {
            run_id: self.run_id,
            floors_planned: config.floor_count,
            floors,
            depleted,
            remaining_material,
            ledger,
            pool_stats: equipment.stats(),
            outcome,
        };

        match report.outcome {
            BuildOutcome::Complete => info!(
                "[Supervisor] Construction complete: {} floors, {} material left",
                report.floors_completed(),
                report.remaining_material
            ),
            BuildOutcome::Partial => warn!(
                "[Supervisor] Construction stopped early: {}/{} floors, {} units completed",
                report.floors_completed(),
                report.floors_planned,
                report.units_completed()
            ),
        }

        self.transition(SupervisorState::Done);
        Ok(report)
    }

    fn lay_foundation(&self, timer: &mut StageTimer) {
        info!("[Supervisor] Laying the foundation");
        timer.hold(self.config.durations.foundation());
        info!("[Supervisor] Foundation complete");
    }

    fn build_floor(
        &self,
        floor_no: FloorNo,
        config: &BuildConfig,
        equipment: &SiteEquipment,
        client: &InventoryClient,
    ) -> Result<FloorReport, BuildError> {
        let floor = Floor::new(floor_no, config.units_per_floor);
        FloorCoordinator::new(floor, config, equipment, client, &self.flag, &self.observers).build()
    }
}
