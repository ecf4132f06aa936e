use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sticky, process-wide signal that the material supply ran out.
///
/// Cloning shares the same underlying flag. Once raised it never reverts;
/// raising it again is a no-op.
#[derive(Debug, Clone, Default)]
pub struct DepletionFlag {
    raised: Arc<AtomicBool>,
}

impl DepletionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns `true` only for the call that flipped it.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::SeqCst)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
