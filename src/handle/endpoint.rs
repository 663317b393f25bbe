use bitmaps::{Bits, BitsImpl};

use crate::{
    BridgeError,
    block::RegisterBlock,
    bridge::Bridge,
    codec::{self, Targets},
    frame::ReadMode,
    helpers::clamp_span,
    layout::SessionPolicy,
    notify::ProcessRegistry,
    window::Access,
};

/// Open session on a device: the blocking-context side of the bridge.
///
/// Reads return the mode-dependent frame, writes feed the config codec.
/// Dropping the endpoint releases the session.
pub struct Endpoint<'a, B: RegisterBlock, R: ProcessRegistry, const WS: usize> {
    bridge: &'a Bridge<B, R, WS>,
}

impl<'a, B: RegisterBlock, R: ProcessRegistry, const WS: usize> core::fmt::Debug
    for Endpoint<'a, B, R, WS>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Endpoint")
            .field("device", &self.bridge.layout.name)
            .finish_non_exhaustive()
    }
}

impl<'a, B: RegisterBlock, R: ProcessRegistry, const WS: usize> Endpoint<'a, B, R, WS> {
    pub(crate) fn new(bridge: &'a Bridge<B, R, WS>) -> Self {
        Self { bridge }
    }

    /// Reads up to `out.len()` bytes of the current frame starting at `offset`.
    ///
    /// The registers are refetched on every call. Returns the number of bytes
    /// copied, which is 0 once `offset` reaches the end of the window.
    pub fn read(&mut self, offset: usize, out: &mut [u8]) -> Result<usize, BridgeError> {
        let Ok((start, end)) = clamp_span(offset, out.len(), WS) else {
            return Ok(0);
        };
        if start == end {
            return Ok(0);
        }

        let layout = self.bridge.layout;
        self.bridge.with_state(|state| {
            state.refresh(layout);
            out[..end - start].copy_from_slice(&state.frame[start..end]);
        });
        Ok(end - start)
    }

    /// Merges up to `data.len()` bytes at `offset` into the device configuration.
    ///
    /// Returns the number of bytes accepted. Fields that fail to decode keep
    /// their previous value without failing the write.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<usize, BridgeError>
    where
        BitsImpl<WS>: Bits,
    {
        let layout = self.bridge.layout;
        if layout.access == Access::ReadOnly {
            return Err(BridgeError::ReadOnly);
        }

        let (start, end) = clamp_span(offset, data.len(), WS)?;
        let data = &data[..end - start];
        if data.is_empty() {
            return Ok(0);
        }

        let session = &self.bridge.session;
        self.bridge.with_state(|state| {
            let accepted = codec::merge(&mut state.config, start, data, layout.unset);
            codec::commit(
                layout,
                &state.config,
                &accepted,
                Targets {
                    window: &mut state.window,
                    mode: &mut state.mode,
                    session,
                },
            );
        });
        Ok(data.len())
    }

    /// Read mode selected by the last config write.
    pub fn mode(&mut self) -> ReadMode {
        self.bridge.with_state(|state| state.mode)
    }

    /// Closes the endpoint; same as dropping it.
    pub fn release(self) {}
}

impl<'a, B: RegisterBlock, R: ProcessRegistry, const WS: usize> Drop for Endpoint<'a, B, R, WS> {
    fn drop(&mut self) {
        if self.bridge.layout.session == SessionPolicy::Exclusive {
            self.bridge.session.release();
        }
        tracing::debug!(device = self.bridge.layout.name, "endpoint released");
    }
}
