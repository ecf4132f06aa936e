pub mod floor_lock;
pub mod resource_pool;

pub use floor_lock::{FloorLockGuard, FloorLockStats, FloorSystemLock};
pub use resource_pool::{PoolPermit, PoolStats, ResourcePool};
