pub mod cli;
pub mod core;

// Re-export commonly used types
pub use crate::core::errors::BuildError;
pub use crate::core::execution::{
    BuildConfig, BuildSupervisor, DepletionPolicy, PoolCapacities, PoolScope, StageDurations,
};
pub use crate::core::inventory::DepletionFlag;
pub use crate::core::observer::{BuildObserver, LogObserver};
pub use crate::core::report::{BuildOutcome, BuildReport, FloorReport};
pub use crate::core::types::{Floor, FloorNo, Stage, Unit, UnitId, UnitOutcome};
