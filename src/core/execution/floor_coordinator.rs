use super::config::BuildConfig;
use super::unit_builder::{FloorContext, UnitBuilder};
use crate::core::errors::BuildError;
use crate::core::inventory::{DepletionFlag, InventoryClient};
use crate::core::observer::BuildObserver;
use crate::core::report::FloorReport;
use crate::core::site::{FloorSite, SiteEquipment};
use crate::core::types::{Floor, Unit, UnitOutcome};
use log::{debug, info};
use parking_lot::Mutex;
use rayon::ThreadPoolBuilder;

/// Builds every unit of one floor concurrently and waits for all of them.
///
/// The floor is reported complete however many of its units aborted;
/// depletion is a building-level concern carried by the shared flag.
pub struct FloorCoordinator<'a> {
    floor: Floor,
    config: &'a BuildConfig,
    equipment: &'a SiteEquipment,
    inventory: &'a InventoryClient,
    flag: &'a DepletionFlag,
    observer: &'a dyn BuildObserver,
}

impl<'a> FloorCoordinator<'a> {
    pub fn new(
        floor: Floor,
        config: &'a BuildConfig,
        equipment: &'a SiteEquipment,
        inventory: &'a InventoryClient,
        flag: &'a DepletionFlag,
        observer: &'a dyn BuildObserver,
    ) -> Self {
        Self {
            floor,
            config,
            equipment,
            inventory,
            flag,
            observer,
        }
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    /// Stand up the floor's site, run one task per unit, join them all and
    /// tear the site down again
    pub fn build(self) -> Result<FloorReport, BuildError> {
        let floor_no = self.floor.floor_no;
        let unit_count = self.floor.units.len();

        // one thread per unit: units block on shared resources and must not
        // queue behind each other for a worker thread
        let task_group = ThreadPoolBuilder::new()
            .num_threads(unit_count)
            .thread_name(move |i| format!("floor-{}-unit-{}", floor_no, i + 1))
            .build()
            .map_err(|e| {
                BuildError::Setup(format!("could not start the task group for floor {}: {}", floor_no, e))
            })?;

        let site = FloorSite::new(floor_no, self.config.pool_scope, &self.config.capacities);
        let ctx = FloorContext {
            site: &site,
            equipment: site.equipment(self.equipment),
            inventory: self.inventory,
            flag: self.flag,
            observer: self.observer,
            material_per_unit: self.config.material_per_unit,
            durations: &self.config.durations,
            jitter: self.config.jitter,
            random_seed: self.config.random_seed,
        };

        info!("[Floor:{}] Building {} units in parallel", floor_no, unit_count);
        self.observer.on_floor_start(floor_no);

        let outcomes: Mutex<Vec<(Unit, UnitOutcome)>> = Mutex::new(Vec::with_capacity(unit_count));
        task_group.scope(|scope| {
            for unit in &self.floor.units {
                let (ctx, outcomes) = (&ctx, &outcomes);
                scope.spawn(move |_| {
                    let outcome = UnitBuilder::new(*unit, ctx).run();
                    outcomes.lock().push((*unit, outcome));
                });
            }
        });
        debug!("[Floor:{}] All unit tasks joined", floor_no);

        let report = FloorReport::new(
            floor_no,
            outcomes.into_inner(),
            site.lock_stats().to_vec(),
            ctx.equipment.stats(),
        );
        drop(site);

        info!(
            "[Floor:{}] Complete: {} units finished, {} aborted",
            floor_no, report.completed, report.aborted
        );
        self.observer.on_floor_complete(&report);
        Ok(report)
    }
}
