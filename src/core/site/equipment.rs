use crate::core::execution::config::PoolCapacities;
use crate::core::sync::{PoolStats, ResourcePool};
use crate::core::types::ResourceKind;

/// The set of capacity-limited resources units contend for
#[derive(Debug)]
pub struct SiteEquipment {
    crane: ResourcePool,
    elevator: ResourcePool,
    plumbers: ResourcePool,
    electricians: ResourcePool,
    fire_alarm: ResourcePool,
}

impl SiteEquipment {
    pub fn new(capacities: &PoolCapacities) -> Self {
        let pool = |kind| ResourcePool::new(kind, capacities.capacity(kind));
        Self {
            crane: pool(ResourceKind::Crane),
            elevator: pool(ResourceKind::Elevator),
            plumbers: pool(ResourceKind::Plumber),
            electricians: pool(ResourceKind::Electrician),
            fire_alarm: pool(ResourceKind::FireAlarmTechnician),
        }
    }

    pub fn pool(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Crane => &self.crane,
            ResourceKind::Elevator => &self.elevator,
            ResourceKind::Plumber => &self.plumbers,
            ResourceKind::Electrician => &self.electricians,
            ResourceKind::FireAlarmTechnician => &self.fire_alarm,
        }
    }

    pub fn stats(&self) -> Vec<PoolStats> {
        ResourceKind::ALL
            .iter()
            .map(|kind| self.pool(*kind).stats())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_follow_configured_capacities() {
        let equipment = SiteEquipment::new(&PoolCapacities::default());
        let capacities: Vec<(ResourceKind, usize)> = equipment
            .stats()
            .iter()
            .map(|s| (s.kind, s.capacity))
            .collect();
        assert_eq!(
            capacities,
            vec![
                (ResourceKind::Crane, 1),
                (ResourceKind::Elevator, 1),
                (ResourceKind::Plumber, 2),
                (ResourceKind::Electrician, 2),
                (ResourceKind::FireAlarmTechnician, 3),
            ]
        );
    }
}
