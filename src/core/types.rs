use std::fmt;

/// Globally unique unit identifier, derived from floor number and position
pub type UnitId = u32;

/// One-based floor number
pub type FloorNo = u32;

/// Material quantity. Signed so that malformed requests can be rejected
/// instead of wrapping.
pub type Material = i64;

/// A single apartment unit, the smallest concurrently built entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Unit {
    pub unit_id: UnitId,
    pub floor_no: FloorNo,
    pub position: u32,
}

impl Unit {
    /// Create a unit at a one-based `position` on `floor_no`
    pub fn new(floor_no: FloorNo, position: u32, units_per_floor: u32) -> Self {
        Self {
            unit_id: (floor_no - 1) * units_per_floor + position,
            floor_no,
            position,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} (floor {})", self.unit_id, self.floor_no)
    }
}

/// A floor and the ordered units built on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    pub floor_no: FloorNo,
    pub units: Vec<Unit>,
}

impl Floor {
    pub fn new(floor_no: FloorNo, units_per_floor: u32) -> Self {
        let units = (1..=units_per_floor)
            .map(|position| Unit::new(floor_no, position, units_per_floor))
            .collect();
        Self { floor_no, units }
    }
}

/// Capacity-limited equipment and labour shared by units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Crane,
    Elevator,
    Plumber,
    Electrician,
    FireAlarmTechnician,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Crane,
        ResourceKind::Elevator,
        ResourceKind::Plumber,
        ResourceKind::Electrician,
        ResourceKind::FireAlarmTechnician,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Crane => "crane",
            ResourceKind::Elevator => "elevator",
            ResourceKind::Plumber => "plumber",
            ResourceKind::Electrician => "electrician",
            ResourceKind::FireAlarmTechnician => "fire-alarm technician",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Building systems that units on the same floor must install one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSystem {
    Water,
    Electricity,
}

impl BuildSystem {
    /// Worker pool that performs the installation
    pub fn worker(&self) -> ResourceKind {
        match self {
            BuildSystem::Water => ResourceKind::Plumber,
            BuildSystem::Electricity => ResourceKind::Electrician,
        }
    }

    /// Pipeline stage in which the system is installed
    pub fn stage(&self) -> Stage {
        match self {
            BuildSystem::Water => Stage::WaterInstall,
            BuildSystem::Electricity => Stage::ElectricityInstall,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuildSystem::Water => "water",
            BuildSystem::Electricity => "electricity",
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stages of a unit's build pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    MaterialCheck,
    Elevator,
    Crane,
    WaterInstall,
    ElectricityInstall,
    FireAlarm,
    Finishing,
    MaterialConsume,
}

impl Stage {
    pub const PIPELINE: [Stage; 8] = [
        Stage::MaterialCheck,
        Stage::Elevator,
        Stage::Crane,
        Stage::WaterInstall,
        Stage::ElectricityInstall,
        Stage::FireAlarm,
        Stage::Finishing,
        Stage::MaterialConsume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::MaterialCheck => "material check",
            Stage::Elevator => "elevator",
            Stage::Crane => "crane",
            Stage::WaterInstall => "water install",
            Stage::ElectricityInstall => "electricity install",
            Stage::FireAlarm => "fire alarm",
            Stage::Finishing => "finishing",
            Stage::MaterialConsume => "material consume",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a unit stopped before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The inventory could not cover the request
    MaterialDepleted { requested: Material, remaining: Material },
    /// The inventory channel was closed
    InventoryUnavailable,
}

/// Terminal state of a unit's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Completed { remaining: Material },
    Aborted { stage: Stage, reason: AbortReason },
}

impl UnitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, UnitOutcome::Completed { .. })
    }

    pub fn is_aborted(&self) -> bool {
        !self.is_completed()
    }
}
