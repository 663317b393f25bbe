use crate::{BridgeError, block::RegisterBlock, helpers::clamp_span};

/// Whether the endpoint may write through to the registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reads only; writes fail with [`BridgeError::ReadOnly`].
    ReadOnly,
    /// Reads and writes.
    ReadWrite,
}

/// Bounds-checked byte view over a mapped register block.
///
/// Constructed once at attach and torn down once at detach; every access
/// goes through [`read`](Self::read) and [`write`](Self::write), which reject
/// offsets past the end and clamp lengths that would overrun it.
pub struct RegisterWindow<B: RegisterBlock> {
    block: B,
    size: usize,
    access: Access,
}

impl<B: RegisterBlock> core::fmt::Debug for RegisterWindow<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterWindow")
            .field("size", &self.size)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl<B: RegisterBlock> RegisterWindow<B> {
    /// Wraps the first `size` bytes of `block`.
    ///
    /// # Panics
    /// Panics if the block maps fewer than `size` bytes.
    pub fn new(block: B, size: usize, access: Access) -> Self {
        assert!(
            size <= block.len(),
            "register block maps {} bytes, window needs {}",
            block.len(),
            size
        );

        Self {
            block,
            size,
            access,
        }
    }

    /// Window size in bytes, fixed at attach.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Reads the live registers at `offset` into `out`.
    ///
    /// Returns the number of bytes copied, which is shorter than `out` when the
    /// request overruns the window.
    pub fn read(&self, offset: usize, out: &mut [u8]) -> Result<usize, BridgeError> {
        let (start, end) = clamp_span(offset, out.len(), self.size)?;
        let len = end - start;
        if len > 0 {
            self.block.read_bytes(start, &mut out[..len]);
        }
        Ok(len)
    }

    /// Writes `data` to the registers at `offset`, leaving every other byte untouched.
    ///
    /// Returns the number of bytes committed after clamping.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<usize, BridgeError> {
        if self.access == Access::ReadOnly {
            return Err(BridgeError::ReadOnly);
        }

        let (start, end) = clamp_span(offset, data.len(), self.size)?;
        let len = end - start;
        if len > 0 {
            self.block.write_bytes(start, &data[..len]);
        }
        Ok(len)
    }

    /// Commits a 32-bit little-endian register value.
    pub fn write_u32(&mut self, offset: usize, value: u32) -> Result<usize, BridgeError> {
        self.write(offset, &value.to_le_bytes())
    }

    /// Copies the start of the window into `out`, as much as both hold.
    pub(crate) fn snapshot(&self, out: &mut [u8]) {
        let len = out.len().min(self.size);
        self.block.read_bytes(0, &mut out[..len]);
    }

    /// Releases the underlying block to the resource provider.
    pub(crate) fn into_block(self) -> B {
        self.block
    }
}
