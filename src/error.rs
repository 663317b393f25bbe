/// Errors returned to the caller of an endpoint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// Offset lies outside the register window.
    #[error("offset {offset} outside {size}-byte window")]
    OutOfRange {
        /// Requested offset.
        offset: usize,
        /// Window size in bytes.
        size: usize,
    },
    /// Another consumer holds the session.
    #[error("device is busy")]
    Busy,
    /// The variant exposes no write path.
    #[error("register window is read-only")]
    ReadOnly,
}

/// Rejection of a single configuration sub-field.
///
/// Never returned from a write; the codec logs it and keeps the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// No digits left after blanking, or a blank inside the number.
    #[error("malformed field")]
    Malformed,
    /// Digits do not fit the 32-bit target.
    #[error("field value overflows 32 bits")]
    Overflow,
}

/// The registry could not reach the target process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no such target process")]
pub struct NoSuchTarget;
