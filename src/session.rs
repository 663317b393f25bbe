use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::{BridgeError, notify::ProcessId};

/// Exclusivity flag and registered consumer of one device.
///
/// `owner` is written by config writes in the blocking context and read by
/// the trigger path without any lock. A trigger racing a write may still see
/// the previous owner; that staleness is accepted.
#[derive(Debug, Default)]
pub(crate) struct Session {
    held: AtomicBool,
    owner: AtomicU32,
}

impl Session {
    pub(crate) const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
            owner: AtomicU32::new(0),
        }
    }

    /// Takes the session without waiting.
    pub(crate) fn try_acquire(&self) -> Result<(), BridgeError> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| ())
            .map_err(|_| BridgeError::Busy)
    }

    pub(crate) fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    pub(crate) fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Replaces the registered consumer; `None` unregisters.
    pub(crate) fn register(&self, owner: Option<ProcessId>) {
        self.owner
            .store(owner.map_or(0, ProcessId::get), Ordering::Release);
    }

    pub(crate) fn owner(&self) -> Option<ProcessId> {
        ProcessId::new(self.owner.load(Ordering::Acquire))
    }
}
