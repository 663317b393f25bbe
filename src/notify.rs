use core::num::NonZeroU32;

use crate::error::NoSuchTarget;

/// Identifier of a consumer process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(NonZeroU32);

impl ProcessId {
    /// Returns `None` for 0, which never names a process.
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl core::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signal number a notification is delivered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalId(i32);

impl SignalId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Fixed signal and payload a device sends when its trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Notification {
    pub signal: SignalId,
    pub payload: i32,
}

impl Notification {
    /// Motion event: real-time signal 44 carrying 1234, as the consumer expects.
    pub const MOTION_EVENT: Notification = Notification {
        signal: SignalId::new(44),
        payload: 1234,
    };
}

/// Acknowledgement that the registry accepted a notification for delivery.
///
/// Says nothing about the consumer having handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivered;

/// Resolves process ids and delivers notifications to them.
///
/// Both methods run on the trigger path: they must not block and must not
/// allocate.
pub trait ProcessRegistry {
    /// Live, signalable handle to a process.
    type Process;

    /// Looks up a live process.
    fn resolve(&self, pid: ProcessId) -> Option<Self::Process>;

    /// Fire-and-forget delivery.
    fn send(
        &self,
        process: &Self::Process,
        notification: Notification,
    ) -> Result<Delivered, NoSuchTarget>;
}

impl<R: ProcessRegistry + ?Sized> ProcessRegistry for &R {
    type Process = R::Process;

    fn resolve(&self, pid: ProcessId) -> Option<Self::Process> {
        (**self).resolve(pid)
    }

    fn send(
        &self,
        process: &Self::Process,
        notification: Notification,
    ) -> Result<Delivered, NoSuchTarget> {
        (**self).send(process, notification)
    }
}

/// Registry that knows no processes; every trigger is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRegistry;

impl ProcessRegistry for NoRegistry {
    type Process = core::convert::Infallible;

    fn resolve(&self, _pid: ProcessId) -> Option<Self::Process> {
        None
    }

    fn send(
        &self,
        process: &Self::Process,
        _notification: Notification,
    ) -> Result<Delivered, NoSuchTarget> {
        match *process {}
    }
}

/// Delivery through POSIX queued signals.
#[cfg(all(feature = "std", target_os = "linux"))]
pub mod signal {
    #![allow(unsafe_code)]

    use nix::{errno::Errno, sys::signal::kill, unistd::Pid};

    use super::{Delivered, Notification, ProcessId, ProcessRegistry};
    use crate::error::NoSuchTarget;

    /// Registry over the host's process table.
    ///
    /// Liveness is probed with a null signal; delivery uses `sigqueue` so the
    /// payload arrives in the consumer's `si_int`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SignalRegistry;

    impl ProcessRegistry for SignalRegistry {
        type Process = Pid;

        fn resolve(&self, pid: ProcessId) -> Option<Pid> {
            let pid = Pid::from_raw(i32::try_from(pid.get()).ok()?);
            match kill(pid, None) {
                // EPERM: exists, but the probe itself was refused
                Ok(()) | Err(Errno::EPERM) => Some(pid),
                Err(_) => None,
            }
        }

        fn send(&self, process: &Pid, notification: Notification) -> Result<Delivered, NoSuchTarget> {
            let value = libc::sigval {
                sival_ptr: notification.payload as isize as *mut libc::c_void,
            };

            // SAFETY: sigqueue only reads its by-value arguments; the pointer
            // field carries an integer and is never dereferenced by the kernel.
            let rc = unsafe { libc::sigqueue(process.as_raw(), notification.signal.get(), value) };
            if rc == 0 {
                Ok(Delivered)
            } else {
                tracing::debug!(
                    pid = process.as_raw(),
                    error = %Errno::last(),
                    "sigqueue failed"
                );
                Err(NoSuchTarget)
            }
        }
    }

}
