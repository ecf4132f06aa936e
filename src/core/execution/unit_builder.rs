use super::timing::StageTimer;
use crate::core::inventory::{DepletionFlag, InventoryClient, MaterialRequest, MaterialResponse};
use crate::core::observer::BuildObserver;
use crate::core::site::{FloorSite, SiteEquipment};
use crate::core::execution::config::StageDurations;
use crate::core::types::{AbortReason, BuildSystem, Material, ResourceKind, Stage, Unit, UnitOutcome};
use log::{error, info, warn};

/// Everything the units of one floor share
pub struct FloorContext<'a> {
    pub site: &'a FloorSite,
    pub equipment: &'a SiteEquipment,
    pub inventory: &'a InventoryClient,
    pub flag: &'a DepletionFlag,
    pub observer: &'a dyn BuildObserver,
    pub material_per_unit: Material,
    pub durations: &'a StageDurations,
    pub jitter: f64,
    pub random_seed: Option<u64>,
}

/// Drives one unit through its build pipeline.
///
/// The pipeline is fixed: material check, elevator, crane, water,
/// electricity, fire alarm, finishing, material consume. A failed material
/// operation is terminal; nothing is retried.
pub struct UnitBuilder<'a> {
    unit: Unit,
    ctx: &'a FloorContext<'a>,
    inventory: InventoryClient,
    timer: StageTimer,
}

impl<'a> UnitBuilder<'a> {
    pub fn new(unit: Unit, ctx: &'a FloorContext<'a>) -> Self {
        let seed = ctx
            .random_seed
            .map(|seed| seed.wrapping_add(u64::from(unit.unit_id)));
        Self {
            unit,
            ctx,
            inventory: ctx.inventory.clone(),
            timer: StageTimer::new(ctx.durations.clone(), ctx.jitter, seed),
        }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Run the pipeline to a terminal state
    pub fn run(mut self) -> UnitOutcome {
        info!("[Unit:{}] Starting on floor {}", self.unit.unit_id, self.unit.floor_no);
        let outcome = self.build();
        self.ctx.observer.on_unit_finished(&self.unit, &outcome);
        outcome
    }

    fn build(&mut self) -> UnitOutcome {
        let amount = self.ctx.material_per_unit;

        let check = MaterialRequest::check(&self.unit, amount);
        if let Err(aborted) = self.material_round_trip(Stage::MaterialCheck, check) {
            return aborted;
        }

        self.use_exclusive(Stage::Elevator, ResourceKind::Elevator);
        self.use_exclusive(Stage::Crane, ResourceKind::Crane);
        self.install_system(BuildSystem::Water);
        self.install_system(BuildSystem::Electricity);
        self.install_fire_alarm();
        self.finish_interior();

        let consume = MaterialRequest::consume(&self.unit, amount);
        match self.material_round_trip(Stage::MaterialConsume, consume) {
            Ok(response) => UnitOutcome::Completed {
                remaining: response.remaining,
            },
            Err(aborted) => aborted,
        }
    }

    fn material_round_trip(
        &self,
        stage: Stage,
        request: MaterialRequest,
    ) -> Result<MaterialResponse, UnitOutcome> {
        self.ctx.observer.on_stage_enter(&self.unit, stage);
        let result = self.inventory.request(request);
        self.ctx.observer.on_stage_exit(&self.unit, stage);

        match result {
            Ok(response) if response.ok => Ok(response),
            Ok(response) => {
                self.ctx.flag.raise();
                warn!(
                    "[Unit:{}] {} failed: needs {}, {} available. Stopping this unit",
                    self.unit.unit_id, stage, request.amount, response.remaining
                );
                Err(UnitOutcome::Aborted {
                    stage,
                    reason: AbortReason::MaterialDepleted {
                        requested: request.amount,
                        remaining: response.remaining,
                    },
                })
            }
            Err(e) => {
                self.ctx.flag.raise();
                error!("[Unit:{}] {} failed: {}", self.unit.unit_id, stage, e);
                Err(UnitOutcome::Aborted {
                    stage,
                    reason: AbortReason::InventoryUnavailable,
                })
            }
        }
    }

    fn hold(&mut self, stage: Stage) {
        self.ctx.observer.on_stage_enter(&self.unit, stage);
        self.timer.hold_stage(stage);
        self.ctx.observer.on_stage_exit(&self.unit, stage);
    }

    fn use_exclusive(&mut self, stage: Stage, kind: ResourceKind) {
        let equipment = self.ctx.equipment;
        let _permit = equipment.pool(kind).acquire();
        self.hold(stage);
    }

    /// Floor lock first, then a worker; released in reverse
    fn install_system(&mut self, system: BuildSystem) {
        let site = self.ctx.site;
        let equipment = self.ctx.equipment;

        let floor_lock = site.lock_for(system).acquire();
        let worker = equipment.pool(system.worker()).acquire();
        self.hold(system.stage());
        drop(worker);
        drop(floor_lock);
    }

    fn install_fire_alarm(&mut self) {
        let equipment = self.ctx.equipment;
        let _technician = equipment.pool(ResourceKind::FireAlarmTechnician).acquire();
        self.hold(Stage::FireAlarm);
    }

    fn finish_interior(&mut self) {
        self.hold(Stage::Finishing);
    }
}
