#![allow(unsafe_code)]

use core::cell::UnsafeCell;

use crate::{
    block::RegisterBlock,
    frame::{ReadMode, assemble_frame},
    handle::{Endpoint, TriggerLine},
    layout::{DeviceLayout, Readback, SessionPolicy},
    notify::{ProcessId, ProcessRegistry},
    session::Session,
    window::RegisterWindow,
    BridgeError,
};

/// Per-device state touched only from the blocking context.
pub(crate) struct DeviceState<B: RegisterBlock, const WS: usize> {
    pub(crate) window: RegisterWindow<B>,
    /// Accumulated ASCII config image.
    pub(crate) config: [u8; WS],
    /// Register snapshot taken by the last read.
    pub(crate) snapshot: [u8; WS],
    /// Frame handed out by the last read.
    pub(crate) frame: [u8; WS],
    pub(crate) mode: ReadMode,
}

impl<B: RegisterBlock, const WS: usize> DeviceState<B, WS> {
    /// Refetches the registers and rebuilds the read frame.
    pub(crate) fn refresh(&mut self, layout: &DeviceLayout) {
        match layout.readback {
            Readback::Registers => {
                self.window.snapshot(&mut self.snapshot);
                assemble_frame(
                    self.mode,
                    layout.event.as_ref(),
                    &self.snapshot,
                    &mut self.frame,
                );
            }
            Readback::ConfigImage => self.frame.copy_from_slice(&self.config),
        }
    }
}

/// One attached device: its register window, config state and session.
///
/// # Const Generics
/// - `WS`: user-visible window size in bytes, sizing every per-device buffer
///
/// # Type Parameters
/// - `B`: register block handed over by the resource provider
/// - `R`: process registry the trigger path notifies through
///
/// Blocking-context access goes through an [`Endpoint`] from
/// [`open`](Self::open); the interrupt context uses a [`TriggerLine`] from
/// [`trigger_line`](Self::trigger_line), which never touches the device state.
pub struct Bridge<B: RegisterBlock, R: ProcessRegistry, const WS: usize> {
    pub(crate) layout: &'static DeviceLayout,
    state: UnsafeCell<DeviceState<B, WS>>,
    pub(crate) session: Session,
    pub(crate) registry: R,
}

// SAFETY: `state` is only reached through `with_state`, which serialises
// access either through the exclusive session or a critical section. The
// trigger path only uses the atomics in `session` and `&R`.
unsafe impl<B, R, const WS: usize> Sync for Bridge<B, R, WS>
where
    B: RegisterBlock + Send,
    R: ProcessRegistry + Sync,
{
}

impl<B: RegisterBlock, R: ProcessRegistry, const WS: usize> core::fmt::Debug for Bridge<B, R, WS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bridge")
            .field("device", &self.layout.name)
            .field("held", &self.session.is_held())
            .field("owner", &self.session.owner())
            .finish_non_exhaustive()
    }
}

impl<B: RegisterBlock, R: ProcessRegistry, const WS: usize> Bridge<B, R, WS> {
    /// Takes ownership of `block` and starts the device unheld, in streaming mode.
    ///
    /// # Panics
    /// Panics if `layout` does not fit `WS` or the block.
    pub(crate) fn attach(layout: &'static DeviceLayout, block: B, registry: R) -> Self {
        layout.validate(WS, block.len());

        let window = RegisterWindow::new(block, layout.register_size, layout.access);
        tracing::info!(
            device = layout.name,
            window = WS,
            registers = layout.register_size,
            "device attached"
        );

        Self {
            layout,
            state: UnsafeCell::new(DeviceState {
                window,
                config: [0; WS],
                snapshot: [0; WS],
                frame: [0; WS],
                mode: ReadMode::Streaming,
            }),
            session: Session::new(),
            registry,
        }
    }

    pub fn layout(&self) -> &'static DeviceLayout {
        self.layout
    }

    /// Opens the endpoint.
    ///
    /// On an exclusive device this fails immediately with
    /// [`BridgeError::Busy`] while another endpoint is open. Dropping the
    /// endpoint releases it.
    pub fn open(&self) -> Result<Endpoint<'_, B, R, WS>, BridgeError> {
        if self.layout.session == SessionPolicy::Exclusive {
            self.session.try_acquire().inspect_err(|_| {
                tracing::debug!(device = self.layout.name, "open refused, session held");
            })?;
        }
        tracing::debug!(device = self.layout.name, "endpoint opened");
        Ok(Endpoint::new(self))
    }

    /// Handle for the interrupt handler.
    pub fn trigger_line(&self) -> TriggerLine<'_, R> {
        TriggerLine::new(self.layout, &self.session, &self.registry)
    }

    /// Consumer the next trigger will notify.
    pub fn owner(&self) -> Option<ProcessId> {
        self.session.owner()
    }

    /// Returns true while an exclusive endpoint is open.
    pub fn is_held(&self) -> bool {
        self.session.is_held()
    }

    /// Tears the device down and returns the block to the resource provider.
    pub fn detach(self) -> B {
        tracing::info!(device = self.layout.name, "device detached");
        self.state.into_inner().window.into_block()
    }

    /// Runs `f` with exclusive access to the device state.
    ///
    /// Must only be called by an open [`Endpoint`]: on an exclusive device the
    /// held session is the lock, otherwise a critical section is taken.
    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&mut DeviceState<B, WS>) -> T) -> T {
        match self.layout.session {
            SessionPolicy::Exclusive => unsafe { self.with_state_unchecked(f) },
            SessionPolicy::Shared => critical_section::with(|_| unsafe { self.with_state_unchecked(f) }),
        }
    }

    /// # Safety
    /// The caller must guarantee that nothing else accesses the device state
    /// for the duration of `f`.
    pub(crate) unsafe fn with_state_unchecked<T>(
        &self,
        f: impl FnOnce(&mut DeviceState<B, WS>) -> T,
    ) -> T {
        let state = unsafe { &mut *self.state.get() };
        f(state)
    }
}
