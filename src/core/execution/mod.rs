pub mod build_supervisor;
pub mod config;
pub mod floor_coordinator;
pub mod timing;
pub mod unit_builder;

// Re-export commonly used types
pub use build_supervisor::{BuildSupervisor, SupervisorState};
pub use config::{BuildConfig, DepletionPolicy, PoolCapacities, PoolScope, StageDurations};
pub use floor_coordinator::FloorCoordinator;
pub use timing::StageTimer;
pub use unit_builder::{FloorContext, UnitBuilder};
