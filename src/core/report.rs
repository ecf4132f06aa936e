use crate::core::inventory::InventoryLedger;
use crate::core::sync::{FloorLockStats, PoolStats};
use crate::core::types::{FloorNo, Material, Unit, UnitOutcome};
use std::fmt;
use uuid::Uuid;

/// Result of one floor's build
#[derive(Debug, Clone)]
pub struct FloorReport {
    pub floor_no: FloorNo,
    pub completed: usize,
    pub aborted: usize,
    /// Outcome of every unit, ordered by position
    pub outcomes: Vec<(Unit, UnitOutcome)>,
    pub lock_stats: Vec<FloorLockStats>,
    /// Pool counters as seen at the end of the floor
    pub pool_stats: Vec<PoolStats>,
}

impl FloorReport {
    pub fn new(
        floor_no: FloorNo,
        mut outcomes: Vec<(Unit, UnitOutcome)>,
        lock_stats: Vec<FloorLockStats>,
        pool_stats: Vec<PoolStats>,
    ) -> Self {
        outcomes.sort_by_key(|(unit, _)| unit.position);
        let completed = outcomes.iter().filter(|(_, o)| o.is_completed()).count();
        Self {
            floor_no,
            completed,
            aborted: outcomes.len() - completed,
            outcomes,
            lock_stats,
            pool_stats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Every planned floor was built and the material never ran out
    Complete,
    /// The run stopped early, or units were turned away, because material ran out
    Partial,
}

/// Top-level result of a construction run
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub run_id: Uuid,
    pub floors_planned: u32,
    pub floors: Vec<FloorReport>,
    pub depleted: bool,
    pub remaining_material: Material,
    pub ledger: InventoryLedger,
    pub pool_stats: Vec<PoolStats>,
    pub outcome: BuildOutcome,
}

impl BuildReport {
    /// Number of floors whose units all ran to a terminal state
    pub fn floors_completed(&self) -> u32 {
        self.floors.len() as u32
    }

    pub fn units_completed(&self) -> usize {
        self.floors.iter().map(|f| f.completed).sum()
    }

    pub fn units_aborted(&self) -> usize {
        self.floors.iter().map(|f| f.aborted).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == BuildOutcome::Complete
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.outcome {
            BuildOutcome::Complete => "complete",
            BuildOutcome::Partial => "partial (material depleted)",
        };
        writeln!(f, "run {}: {}", self.run_id, status)?;
        writeln!(
            f,
            "floors built: {}/{}",
            self.floors_completed(),
            self.floors_planned
        )?;
        writeln!(
            f,
            "units completed: {}, aborted: {}",
            self.units_completed(),
            self.units_aborted()
        )?;
        write!(
            f,
            "material: {} used, {} remaining of {}",
            self.ledger.consumed_total, self.remaining_material, self.ledger.initial_stock
        )
    }
}
