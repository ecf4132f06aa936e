use crate::core::types::{BuildSystem, FloorNo};
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct TicketState {
    next_ticket: u64,
    now_serving: u64,
    holders: usize,
    peak_holders: usize,
}

/// Usage counters for one floor-system lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorLockStats {
    pub floor_no: FloorNo,
    pub system: BuildSystem,
    pub acquisitions: u64,
    pub waiting: u64,
    pub peak_holders: usize,
}

/// Exclusive lock over one building system on one floor.
///
/// Implemented as a ticket lock so units are admitted in arrival order.
#[derive(Debug)]
pub struct FloorSystemLock {
    floor_no: FloorNo,
    system: BuildSystem,
    state: Mutex<TicketState>,
    turn: Condvar,
}

impl FloorSystemLock {
    pub fn new(floor_no: FloorNo, system: BuildSystem) -> Self {
        Self {
            floor_no,
            system,
            state: Mutex::new(TicketState::default()),
            turn: Condvar::new(),
        }
    }

    /// Take a ticket and block until it is served
    pub fn acquire(&self) -> FloorLockGuard<'_> {
        let mut state = self.state.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        while state.now_serving != ticket {
            self.turn.wait(&mut state);
        }
        state.holders += 1;
        state.peak_holders = state.peak_holders.max(state.holders);
        FloorLockGuard { lock: self }
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.holders -= 1;
        state.now_serving += 1;
        drop(state);
        // waiters sleep on their own ticket, so wake them all and let the
        // next one in line through
        self.turn.notify_all();
    }

    pub fn floor_no(&self) -> FloorNo {
        self.floor_no
    }

    pub fn system(&self) -> BuildSystem {
        self.system
    }

    pub fn stats(&self) -> FloorLockStats {
        let state = self.state.lock();
        FloorLockStats {
            floor_no: self.floor_no,
            system: self.system,
            acquisitions: state.now_serving + state.holders as u64,
            waiting: state.next_ticket - state.now_serving - state.holders as u64,
            peak_holders: state.peak_holders,
        }
    }
}

/// Proof that the holder is the only unit on the floor working on the system
#[must_use = "the floor lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FloorLockGuard<'a> {
    lock: &'a FloorSystemLock,
}

impl FloorLockGuard<'_> {
    pub fn system(&self) -> BuildSystem {
        self.lock.system
    }
}

impl Drop for FloorLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
