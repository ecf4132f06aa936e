use crate::core::report::FloorReport;
use crate::core::types::{FloorNo, Stage, Unit, UnitOutcome};
use log::{debug, info, warn};
use std::sync::Arc;

/// Observer trait for construction progress.
///
/// Hooks are called from the unit threads themselves, so implementations
/// must be thread-safe. `on_stage_enter` fires once the stage's resources
/// are held and work begins; `on_stage_exit` fires when the work ends,
/// before anything is released.
pub trait BuildObserver: Send + Sync {
    /// Called before a floor's units are started
    fn on_floor_start(&self, _floor_no: FloorNo) {}

    /// Called after every unit on the floor has finished
    fn on_floor_complete(&self, _report: &FloorReport) {}

    fn on_stage_enter(&self, _unit: &Unit, _stage: Stage) {}

    fn on_stage_exit(&self, _unit: &Unit, _stage: Stage) {}

    /// Called once per unit with its terminal state
    fn on_unit_finished(&self, _unit: &Unit, _outcome: &UnitOutcome) {}
}

/// Fan-out to every registered observer
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn BuildObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: Arc<dyn BuildObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl BuildObserver for ObserverSet {
    fn on_floor_start(&self, floor_no: FloorNo) {
        for observer in &self.observers {
            observer.on_floor_start(floor_no);
        }
    }

    fn on_floor_complete(&self, report: &FloorReport) {
        for observer in &self.observers {
            observer.on_floor_complete(report);
        }
    }

    fn on_stage_enter(&self, unit: &Unit, stage: Stage) {
        for observer in &self.observers {
            observer.on_stage_enter(unit, stage);
        }
    }

    fn on_stage_exit(&self, unit: &Unit, stage: Stage) {
        for observer in &self.observers {
            observer.on_stage_exit(unit, stage);
        }
    }

    fn on_unit_finished(&self, unit: &Unit, outcome: &UnitOutcome) {
        for observer in &self.observers {
            observer.on_unit_finished(unit, outcome);
        }
    }
}

/// Narrates progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn on_floor_start(&self, floor_no: FloorNo) {
        info!("[Floor:{}] Construction started", floor_no);
    }

    fn on_floor_complete(&self, report: &FloorReport) {
        info!(
            "[Floor:{}] Construction finished: {} completed, {} aborted",
            report.floor_no, report.completed, report.aborted
        );
    }

    fn on_stage_enter(&self, unit: &Unit, stage: Stage) {
        debug!("[Unit:{}] {} started (floor {})", unit.unit_id, stage, unit.floor_no);
    }

    fn on_stage_exit(&self, unit: &Unit, stage: Stage) {
        debug!("[Unit:{}] {} finished", unit.unit_id, stage);
    }

    fn on_unit_finished(&self, unit: &Unit, outcome: &UnitOutcome) {
        match outcome {
            UnitOutcome::Completed { remaining } => {
                info!("[Unit:{}] Completed ({} material left)", unit.unit_id, remaining)
            }
            UnitOutcome::Aborted { stage, reason } => {
                warn!("[Unit:{}] Aborted at {}: {:?}", unit.unit_id, stage, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingObserver {
        floors: AtomicUsize,
        stages: AtomicUsize,
    }

    impl BuildObserver for CountingObserver {
        fn on_floor_start(&self, _floor_no: FloorNo) {
            self.floors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_stage_enter(&self, _unit: &Unit, _stage: Stage) {
            self.stages.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_observer_set_fans_out() {
        let first = Arc::new(CountingObserver::default());
        let second = Arc::new(CountingObserver::default());
        let mut set = ObserverSet::new();
        assert!(set.is_empty());
        set.add(first.clone());
        set.add(second.clone());
        set.add(Arc::new(LogObserver));
        assert_eq!(set.len(), 3);

        let unit = Unit::new(1, 1, 2);
        set.on_floor_start(1);
        set.on_stage_enter(&unit, Stage::Crane);
        set.on_stage_exit(&unit, Stage::Crane);

        for observer in [&first, &second] {
            assert_eq!(observer.floors.load(Ordering::SeqCst), 1);
            assert_eq!(observer.stages.load(Ordering::SeqCst), 1);
        }
    }
}
