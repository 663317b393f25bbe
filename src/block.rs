/// A mapped block of device registers handed over by the hardware resource provider.
///
/// The bridge owns the block between attach and detach and only ever calls
/// these methods with ranges already validated against [`len`](Self::len).
/// Implementations backed by real MMIO should use volatile accesses.
pub trait RegisterBlock {
    /// Size of the mapped block in bytes.
    fn len(&self) -> usize;

    /// Returns true if the block maps no registers.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies `out.len()` bytes starting at `offset` out of the block.
    fn read_bytes(&self, offset: usize, out: &mut [u8]);

    /// Copies `data` into the block starting at `offset`.
    fn write_bytes(&mut self, offset: usize, data: &[u8]);
}

/// Register block backed by plain memory.
///
/// Stands in for mapped hardware in tests and host-side simulation. The
/// `load`/`peek` helpers let the caller play the hardware's part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> MemoryBlock<N> {
    /// Creates a zeroed block.
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Overwrites bytes as the hardware would.
    ///
    /// # Panics
    /// Panics if `offset + data.len() > N`.
    pub fn load(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Returns the raw register image.
    pub fn peek(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for MemoryBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RegisterBlock for MemoryBlock<N> {
    fn len(&self) -> usize {
        N
    }

    fn read_bytes(&self, offset: usize, out: &mut [u8]) {
        out.copy_from_slice(&self.bytes[offset..offset + out.len()]);
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }
}

/// Lets a test keep inspecting a block after handing it to a bridge.
impl<T: RegisterBlock + ?Sized> RegisterBlock for &mut T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read_bytes(&self, offset: usize, out: &mut [u8]) {
        (**self).read_bytes(offset, out)
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) {
        (**self).write_bytes(offset, data)
    }
}
