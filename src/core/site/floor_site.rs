use super::equipment::SiteEquipment;
use crate::core::execution::config::{PoolCapacities, PoolScope};
use crate::core::sync::{FloorLockStats, FloorSystemLock};
use crate::core::types::{BuildSystem, FloorNo};

/// Everything that lives exactly as long as one floor's build.
///
/// Holds the floor's water and electricity locks and, for floor-scoped
/// pools, a fresh set of equipment. Dropping the site tears them down.
#[derive(Debug)]
pub struct FloorSite {
    floor_no: FloorNo,
    water: FloorSystemLock,
    electricity: FloorSystemLock,
    equipment: Option<SiteEquipment>,
}

impl FloorSite {
    pub fn new(floor_no: FloorNo, scope: PoolScope, capacities: &PoolCapacities) -> Self {
        let equipment = match scope {
            PoolScope::Building => None,
            PoolScope::Floor => Some(SiteEquipment::new(capacities)),
        };
        Self {
            floor_no,
            water: FloorSystemLock::new(floor_no, BuildSystem::Water),
            electricity: FloorSystemLock::new(floor_no, BuildSystem::Electricity),
            equipment,
        }
    }

    pub fn floor_no(&self) -> FloorNo {
        self.floor_no
    }

    pub fn lock_for(&self, system: BuildSystem) -> &FloorSystemLock {
        match system {
            BuildSystem::Water => &self.water,
            BuildSystem::Electricity => &self.electricity,
        }
    }

    /// The floor's own equipment if pools are floor-scoped, otherwise `building`
    pub fn equipment<'a>(&'a self, building: &'a SiteEquipment) -> &'a SiteEquipment {
        self.equipment.as_ref().unwrap_or(building)
    }

    pub fn lock_stats(&self) -> [FloorLockStats; 2] {
        [self.water.stats(), self.electricity.stats()]
    }
}
