use super::recording_observer::{Recorded, RecordingObserver};
use crate::core::execution::build_supervisor::BuildSupervisor;
use crate::core::execution::config::{BuildConfig, PoolScope, StageDurations};
use crate::core::report::{BuildOutcome, BuildReport};
use crate::core::types::{BuildSystem, ResourceKind, Stage};
use std::sync::Arc;

fn run_recorded(config: BuildConfig) -> (BuildReport, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let mut supervisor = BuildSupervisor::new(config).unwrap();
    supervisor.add_observer(observer.clone());
    let report = supervisor.run().unwrap();
    (report, observer)
}

fn contended_config() -> BuildConfig {
    let mut durations = StageDurations::instant();
    durations.water_ms = 2;
    durations.electricity_ms = 2;
    durations.fire_alarm_ms = 2;
    durations.elevator_ms = 1;
    durations.crane_ms = 1;
    BuildConfig::new()
        .with_floors(3)
        .with_units_per_floor(6)
        .with_initial_stock(1_000)
        .with_durations(durations)
        .with_jitter(0.5)
        .with_random_seed(Some(11))
}

#[test]
fn test_floors_never_overlap() {
    let (report, observer) = run_recorded(contended_config());
    assert_eq!(report.outcome, BuildOutcome::Complete);

    let events = observer.events();
    for floor_no in 1..report.floors_planned {
        let done = events
            .iter()
            .position(|e| *e == Recorded::FloorComplete(floor_no))
            .unwrap();
        let first_above = events
            .iter()
            .position(|e| match e {
                Recorded::FloorStart(f) => *f == floor_no + 1,
                Recorded::Enter(unit, _) | Recorded::Exit(unit, _) | Recorded::Finished(unit, _) => {
                    unit.floor_no == floor_no + 1
                }
                Recorded::FloorComplete(_) => false,
            })
            .unwrap();
        assert!(done < first_above, "floor {} overlapped with the floor above", floor_no);

        let units_below_finished = events[..done]
            .iter()
            .filter(|e| matches!(e, Recorded::Finished(u, _) if u.floor_no == floor_no))
            .count();
        assert_eq!(units_below_finished, 6);
    }
}

#[test]
fn test_floor_systems_are_installed_one_unit_at_a_time() {
    let (report, observer) = run_recorded(contended_config());

    for floor in &report.floors {
        assert_eq!(observer.max_concurrent(Stage::WaterInstall, Some(floor.floor_no)), 1);
        assert_eq!(observer.max_concurrent(Stage::ElectricityInstall, Some(floor.floor_no)), 1);
        for stats in &floor.lock_stats {
            assert_eq!(stats.peak_holders, 1);
            assert_eq!(stats.acquisitions, 6);
            assert_eq!(stats.waiting, 0);
        }
    }
    assert!(report
        .floors
        .iter()
        .flat_map(|f| f.lock_stats.iter())
        .any(|s| s.system == BuildSystem::Electricity));
}

#[test]
fn test_pool_capacity_is_never_exceeded() {
    for scope in [PoolScope::Building, PoolScope::Floor] {
        let (report, observer) = run_recorded(contended_config().with_pool_scope(scope));

        assert!(observer.max_concurrent(Stage::Elevator, None) <= 1);
        assert!(observer.max_concurrent(Stage::Crane, None) <= 1);
        assert!(observer.max_concurrent(Stage::FireAlarm, None) <= 3);

        let per_floor_stats = report.floors.iter().flat_map(|f| f.pool_stats.iter());
        for stats in report.pool_stats.iter().chain(per_floor_stats) {
            assert!(
                stats.peak_in_use <= stats.capacity,
                "{} pool exceeded its capacity",
                stats.kind
            );
            assert_eq!(stats.in_use, 0);
        }
    }
}

#[test]
fn test_floor_scoped_pools_start_fresh() {
    let (report, _) = run_recorded(contended_config().with_pool_scope(PoolScope::Floor));
    for floor in &report.floors {
        for stats in &floor.pool_stats {
            assert_eq!(stats.total_acquisitions, 6);
        }
    }
    // the building-wide set is never touched
    assert!(report.pool_stats.iter().all(|s| s.total_acquisitions == 0));
}

#[test]
fn test_building_scoped_pools_accumulate() {
    let (report, _) = run_recorded(contended_config());
    let crane = report
        .pool_stats
        .iter()
        .find(|s| s.kind == ResourceKind::Crane)
        .unwrap();
    assert_eq!(crane.total_acquisitions, 18);
}

#[test]
fn test_depletion_stops_before_unstarted_floors() {
    let config = BuildConfig::new()
        .with_floors(3)
        .with_units_per_floor(3)
        .with_initial_stock(10)
        .with_material_per_unit(2)
        .with_durations(StageDurations::instant());
    let (report, observer) = run_recorded(config);

    assert!(report.depleted);
    assert_eq!(report.outcome, BuildOutcome::Partial);
    assert_eq!(report.units_completed(), 5);
    assert_eq!(report.floors_completed(), 2);
    assert_eq!(report.remaining_material, 0);
    assert_eq!(observer.started_floors(), vec![1, 2]);
}

#[test]
fn test_sixth_unit_check_fails_and_halts_the_run() {
    let config = BuildConfig::new()
        .with_floors(7)
        .with_units_per_floor(1)
        .with_initial_stock(10)
        .with_material_per_unit(2)
        .with_durations(StageDurations::instant());
    let (report, observer) = run_recorded(config);

    assert_eq!(report.units_completed(), 5);
    assert_eq!(report.floors_completed(), 6);
    assert_eq!(report.floors[5].aborted, 1);
    assert_eq!(observer.stages_of(&report.floors[5].outcomes[0].0), vec![Stage::MaterialCheck]);
    assert_eq!(report.ledger.failed_checks, 1);
    assert!(report.depleted);
    assert_eq!(observer.started_floors(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_empty_stock_builds_one_hollow_floor() {
    let config = BuildConfig::new()
        .with_floors(2)
        .with_initial_stock(0)
        .with_durations(StageDurations::instant());
    let (report, _) = run_recorded(config);

    assert_eq!(report.floors_completed(), 1);
    assert_eq!(report.floors[0].aborted, 4);
    assert!(report.pool_stats.iter().all(|s| s.total_acquisitions == 0));
    assert_eq!(report.ledger.consumes + report.ledger.failed_consumes, 0);
    assert_eq!(report.outcome, BuildOutcome::Partial);
}
