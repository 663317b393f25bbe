//! Static descriptors of a device variant.
//!
//! A [`DeviceLayout`] is baked into each bridge at attach time and never
//! mutated afterwards. [`crate::variants`] holds the descriptors of the
//! supported devices.

use crate::{helpers::overlaps, notify::Notification, window::Access};

/// A byte range `[offset, offset + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Exclusive end of the range.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// How the ASCII bytes of a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Bytes pass through unchanged.
    Raw,
    /// Hexadecimal digits, committed as a 32-bit register value.
    AsciiHex,
    /// Decimal digits, committed as a 32-bit value.
    AsciiDecimal,
}

/// Where a decoded field ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Kept in the config image only.
    Stored,
    /// Written to the register at this byte offset.
    Register(usize),
    /// Hex digits: the value goes to `value`, a per-digit validity mask to
    /// `mask` (first digit in the highest bit). Invalid digits are blanked and
    /// count as `0` in the value.
    MaskedRegister { value: usize, mask: usize },
    /// First byte selects the read mode, `'1'` meaning event mode.
    ReadMode,
    /// Decimal process id of the notification consumer.
    Owner,
}

/// One field of the ASCII write layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigField {
    pub name: &'static str,
    pub span: Span,
    pub encoding: Encoding,
    pub sink: Sink,
}

impl ConfigField {
    pub const fn new(
        name: &'static str,
        offset: usize,
        len: usize,
        encoding: Encoding,
        sink: Sink,
    ) -> Self {
        Self {
            name,
            span: Span::new(offset, len),
            encoding,
            sink,
        }
    }
}

/// Splice recipe that turns the event snapshot region into a read frame.
///
/// `accel` and `zero` are output positions; `accel` is sourced from the same
/// offset inside `region`. The timestamp is copied from `timestamp_source`
/// inside `region` to `timestamp_dest` in the output, after the other two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLayout {
    /// Event snapshot region in the register window.
    pub region: Span,
    pub accel: Span,
    pub zero: Span,
    pub timestamp_source: usize,
    pub timestamp_dest: usize,
    pub timestamp_len: usize,
}

/// Who may hold the endpoint open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPolicy {
    /// One holder at a time; a second open fails with `Busy`.
    Exclusive,
    /// Any number of holders, each access serialised by a critical section.
    Shared,
}

/// What a read returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readback {
    /// The (mode dependent) register frame.
    Registers,
    /// The stored ASCII config image.
    ConfigImage,
}

/// Fixed description of one device variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLayout {
    pub name: &'static str,
    /// User-visible window size in bytes.
    pub window_size: usize,
    /// Bytes of the mapped register block the bridge uses.
    pub register_size: usize,
    pub access: Access,
    pub session: SessionPolicy,
    /// Input byte that, like NUL, leaves the stored byte untouched.
    pub unset: u8,
    pub fields: &'static [ConfigField],
    pub event: Option<EventLayout>,
    pub notification: Option<Notification>,
    pub readback: Readback,
}

/// Widest ASCII number a field may hold.
pub const MAX_NUMERIC_DIGITS: usize = 16;

impl DeviceLayout {
    /// Returns the field feeding the given sink kind, if any.
    pub fn field_for(&self, sink: Sink) -> Option<&ConfigField> {
        self.fields.iter().find(|field| field.sink == sink)
    }

    /// Checks the descriptor against the bridge it is attached to.
    ///
    /// # Panics
    /// Panics with a description of the first inconsistency found. Layouts are
    /// static, so an inconsistency is a programming error.
    pub(crate) fn validate(&self, window_size: usize, block_len: usize) {
        assert_eq!(
            self.window_size, window_size,
            "{}: layout window is {} bytes, bridge buffers are {}",
            self.name, self.window_size, window_size
        );
        assert!(
            self.register_size <= block_len,
            "{}: layout needs {} register bytes, block maps {}",
            self.name,
            self.register_size,
            block_len
        );

        if self.readback == Readback::Registers {
            assert!(
                self.window_size <= self.register_size,
                "{}: register readback window exceeds register block",
                self.name
            );
        }

        if !self.fields.is_empty() {
            assert_eq!(
                self.access,
                Access::ReadWrite,
                "{}: config fields on a read-only device",
                self.name
            );
        }

        for (i, field) in self.fields.iter().enumerate() {
            self.validate_field(field);
            for other in &self.fields[i + 1..] {
                assert!(
                    !overlaps(field.span.offset, field.span.len, other.span.offset, other.span.len),
                    "{}: fields {} and {} overlap",
                    self.name,
                    field.name,
                    other.name
                );
            }
        }

        if let Some(event) = &self.event {
            assert_eq!(
                self.window_size, self.register_size,
                "{}: event frames need window and register block to match",
                self.name
            );
            assert!(
                event.region.end() <= self.register_size,
                "{}: event region outside register block",
                self.name
            );
            assert!(
                event.accel.end() <= self.window_size && event.zero.end() <= self.window_size,
                "{}: event frame regions outside window",
                self.name
            );
        }
    }

    fn validate_field(&self, field: &ConfigField) {
        assert!(
            field.span.len > 0 && field.span.end() <= self.window_size,
            "{}: field {} outside window",
            self.name,
            field.name
        );

        if field.encoding != Encoding::Raw {
            assert!(
                field.span.len <= MAX_NUMERIC_DIGITS,
                "{}: numeric field {} too wide",
                self.name,
                field.name
            );
        }

        let register_fits = |offset: usize, len: usize| offset + len <= self.register_size;
        match field.sink {
            Sink::Stored => {}
            Sink::Register(offset) => {
                let len = match field.encoding {
                    Encoding::Raw => field.span.len,
                    Encoding::AsciiHex | Encoding::AsciiDecimal => 4,
                };
                assert!(
                    register_fits(offset, len),
                    "{}: field {} targets a register outside the block",
                    self.name,
                    field.name
                );
            }
            Sink::MaskedRegister { value, mask } => {
                assert!(
                    field.encoding == Encoding::AsciiHex && field.span.len <= 8,
                    "{}: masked field {} must be at most 8 hex digits",
                    self.name,
                    field.name
                );
                assert!(
                    register_fits(value, 4) && register_fits(mask, 4),
                    "{}: field {} targets a register outside the block",
                    self.name,
                    field.name
                );
            }
            Sink::ReadMode => assert!(
                field.encoding == Encoding::Raw && field.span.len == 1,
                "{}: mode field {} must be a single raw byte",
                self.name,
                field.name
            ),
            Sink::Owner => assert!(
                field.encoding == Encoding::AsciiDecimal,
                "{}: owner field {} must be decimal",
                self.name,
                field.name
            ),
        }
    }
}
