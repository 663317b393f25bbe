//! Utility functions for windowed offset arithmetic.
//!
//! These helpers are useful when implementing a custom
//! [`RegisterBlock`](crate::RegisterBlock) or when reasoning about which
//! configuration fields a write reaches.

use crate::BridgeError;

/// Clamps an access of `len` bytes at `offset` to a window of `size` bytes.
///
/// Returns `(start, end)` with `end` exclusive. A request that would overrun
/// the window is shortened to `size - offset`; a zero-length request yields an
/// empty span rather than an error.
///
/// # Errors
/// * [`BridgeError::OutOfRange`] - if `offset >= size`
///
/// # Example
/// ```
/// use register_bridge::helpers::clamp_span;
///
/// // 180-byte window, 16 bytes requested at 170: only 10 remain
/// assert_eq!(clamp_span(170, 16, 180), Ok((170, 180)));
///
/// // Fully inside the window
/// assert_eq!(clamp_span(4, 8, 180), Ok((4, 12)));
///
/// // Starting at the end is out of range
/// assert!(clamp_span(180, 1, 180).is_err());
/// ```
pub fn clamp_span(offset: usize, len: usize, size: usize) -> Result<(usize, usize), BridgeError> {
    if offset >= size {
        return Err(BridgeError::OutOfRange { offset, size });
    }

    let end = offset.saturating_add(len).min(size);
    Ok((offset, end))
}

/// Returns true if `[a, a + a_len)` and `[b, b + b_len)` share at least one byte.
pub fn overlaps(a: usize, a_len: usize, b: usize, b_len: usize) -> bool {
    a_len != 0 && b_len != 0 && a < b.saturating_add(b_len) && b < a.saturating_add(a_len)
}

#[test]
fn clamp_span_edge_cases() {
    // Zero length is an empty span, not an error
    assert_eq!(clamp_span(0, 0, 16), Ok((0, 0)));

    // Overrun is clamped
    assert_eq!(clamp_span(15, 2, 16), Ok((15, 16)));
    assert_eq!(clamp_span(10, usize::MAX, 16), Ok((10, 16)));

    // Last byte of window
    assert_eq!(clamp_span(15, 1, 16), Ok((15, 16)));

    // Past the end
    assert_eq!(
        clamp_span(16, 1, 16),
        Err(BridgeError::OutOfRange {
            offset: 16,
            size: 16
        })
    );
    assert!(clamp_span(usize::MAX, 1, 16).is_err());
}

#[test]
fn overlaps_edge_cases() {
    assert!(overlaps(0, 9, 8, 4));
    assert!(overlaps(9, 1, 0, 10));
    assert!(!overlaps(0, 9, 9, 1));
    assert!(!overlaps(10, 0, 0, 20));
    assert!(!overlaps(21, 1, 10, 11));
}
