//! Typed views over register images.
//!
//! Device registers are 32 bits wide and little-endian; sensor samples are
//! commonly packed as signed 16- or 32-bit values inside them.
//! [`RegisterImage`] decodes a buffer returned by a read, [`FrameWriter`] is
//! the clamped splice primitive the frame assembler builds on.

/// Generates an `Option`-returning little-endian reader per primitive.
macro_rules! impl_read_le {
    ($($type:ty => $size:literal),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Reads a little-endian `" $type "` at `offset`, or `None` past the end."]
                #[inline]
                pub fn [<$type _at>](&self, offset: usize) -> Option<$type> {
                    let end = offset.checked_add($size)?;
                    let bytes: [u8; $size] = self.0.get(offset..end)?.try_into().ok()?;
                    Some(<$type>::from_le_bytes(bytes))
                }
            )*
        }
    };
}

/// Read-only view of a register image.
#[derive(Debug, Clone, Copy)]
pub struct RegisterImage<'a>(&'a [u8]);

impl<'a> RegisterImage<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the 32-bit register at `index`, counting in registers.
    #[inline]
    pub fn register(&self, index: usize) -> Option<u32> {
        self.u32_at(index.checked_mul(4)?)
    }

    /// Returns `len` bytes at `offset`, or `None` past the end.
    #[inline]
    pub fn bytes_at(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        self.0.get(offset..offset.checked_add(len)?)
    }

    impl_read_le!(u16 => 2, i16 => 2, u32 => 4, i32 => 4, u64 => 8);
}

/// Output buffer that never writes past its end.
///
/// Every operation clamps to the buffer and reports how many bytes it
/// actually touched.
#[derive(Debug)]
pub(crate) struct FrameWriter<'a>(&'a mut [u8]);

impl<'a> FrameWriter<'a> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        Self(bytes)
    }

    /// Copies as much of `src` as fits at `offset`.
    pub(crate) fn splice_at(&mut self, offset: usize, src: &[u8]) -> usize {
        let Some(room) = self.0.len().checked_sub(offset) else {
            return 0;
        };
        let len = src.len().min(room);
        self.0[offset..offset + len].copy_from_slice(&src[..len]);
        len
    }

    /// Zero-fills up to `len` bytes at `offset`.
    pub(crate) fn zero_at(&mut self, offset: usize, len: usize) -> usize {
        let Some(room) = self.0.len().checked_sub(offset) else {
            return 0;
        };
        let len = len.min(room);
        self.0[offset..offset + len].fill(0);
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_primitives() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF, 0x00, 0x00];
        let image = RegisterImage::new(&data);

        assert_eq!(image.u32_at(0), Some(0x1234_5678));
        assert_eq!(image.i16_at(4), Some(-2));
        assert_eq!(image.register(1), Some(0x0000_FFFE));
        assert_eq!(image.u64_at(0), Some(0x0000_FFFE_1234_5678));
    }

    #[test]
    fn reads_past_end_return_none() {
        let data = [0u8; 6];
        let image = RegisterImage::new(&data);

        assert_eq!(image.u32_at(3), None);
        assert_eq!(image.register(2), None);
        assert_eq!(image.u16_at(usize::MAX), None);
        assert_eq!(image.bytes_at(4, 4), None);
        assert_eq!(image.bytes_at(4, 2), Some(&[0u8, 0][..]));
    }

    #[test]
    fn splice_truncates_at_end() {
        let mut out = [0xAAu8; 6];
        let mut writer = FrameWriter::new(&mut out);

        assert_eq!(writer.splice_at(4, &[1, 2, 3, 4]), 2);
        assert_eq!(writer.splice_at(9, &[1]), 0);
        assert_eq!(out, [0xAA, 0xAA, 0xAA, 0xAA, 1, 2]);
    }

    #[test]
    fn zero_fill_truncates_at_end() {
        let mut out = [0xAAu8; 6];
        let mut writer = FrameWriter::new(&mut out);

        assert_eq!(writer.zero_at(3, 10), 3);
        assert_eq!(writer.zero_at(6, 1), 0);
        assert_eq!(out, [0xAA, 0xAA, 0xAA, 0, 0, 0]);
    }
}
