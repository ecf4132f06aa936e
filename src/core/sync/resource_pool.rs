use crate::core::types::ResourceKind;
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct PoolState {
    in_use: usize,
    peak_in_use: usize,
    total_acquisitions: u64,
}

/// Snapshot of a pool's usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub kind: ResourceKind,
    pub capacity: usize,
    pub in_use: usize,
    pub peak_in_use: usize,
    pub total_acquisitions: u64,
}

/// Counting gate over a fixed number of slots (equipment or workers).
///
/// `acquire` blocks until a slot is free. There is no timeout and no
/// fairness guarantee among waiters.
#[derive(Debug)]
pub struct ResourcePool {
    kind: ResourceKind,
    capacity: usize,
    state: Mutex<PoolState>,
    available: Condvar,
}

impl ResourcePool {
    pub fn new(kind: ResourceKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            state: Mutex::new(PoolState::default()),
            available: Condvar::new(),
        }
    }

    /// Block until a slot is free and reserve it.
    ///
    /// The slot is released when the returned permit is dropped, on every
    /// exit path including unwinding.
    pub fn acquire(&self) -> PoolPermit<'_> {
        let mut state = self.state.lock();
        while state.in_use >= self.capacity {
            self.available.wait(&mut state);
        }
        state.in_use += 1;
        state.peak_in_use = state.peak_in_use.max(state.in_use);
        state.total_acquisitions += 1;
        PoolPermit { pool: self }
    }

    fn release(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.in_use > 0, "{} pool released more than acquired", self.kind);
        state.in_use -= 1;
        drop(state);
        self.available.notify_one();
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.state.lock().in_use
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            kind: self.kind,
            capacity: self.capacity,
            in_use: state.in_use,
            peak_in_use: state.peak_in_use,
            total_acquisitions: state.total_acquisitions,
        }
    }
}

/// A reserved slot in a [`ResourcePool`]
#[must_use = "the slot is released as soon as the permit is dropped"]
#[derive(Debug)]
pub struct PoolPermit<'a> {
    pool: &'a ResourcePool,
}

impl PoolPermit<'_> {
    pub fn kind(&self) -> ResourceKind {
        self.pool.kind
    }
}

impl Drop for PoolPermit<'_> {
    fn drop(&mut self) {
        self.pool.release();
    }
}
