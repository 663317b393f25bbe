//! ASCII configuration writes.
//!
//! A write is first merged into the stored config image byte by byte: NUL and
//! the layout's `unset` byte leave the stored byte alone, anything else
//! replaces it. Every field that received at least one byte is then decoded
//! from the merged image and committed to its sink. A field that fails to
//! decode is logged and skipped; the rest of the write still lands and nothing
//! is rolled back.

use bitmaps::{Bitmap, Bits, BitsImpl};

use crate::{
    BridgeError,
    block::RegisterBlock,
    error::FieldError,
    frame::ReadMode,
    layout::{ConfigField, DeviceLayout, Encoding, MAX_NUMERIC_DIGITS, Sink},
    notify::ProcessId,
    session::Session,
    window::RegisterWindow,
};

/// Decoded content of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Bytes(&'a [u8]),
    Number(u32),
    /// Hex digits with a validity bit per digit.
    Masked { value: u32, mask: u32 },
}

/// Merges `data` into `image` at `offset`, returning the positions that took a new byte.
///
/// # Panics
/// Panics if `offset + data.len() > WS`; callers clamp first.
pub(crate) fn merge<const WS: usize>(
    image: &mut [u8; WS],
    offset: usize,
    data: &[u8],
    unset: u8,
) -> Bitmap<WS>
where
    BitsImpl<WS>: Bits,
{
    let mut accepted = Bitmap::new();
    for (pos, &byte) in (offset..).zip(data) {
        if byte != 0 && byte != unset {
            image[pos] = byte;
            accepted.set(pos, true);
        }
    }
    accepted
}

/// Decodes a field from its stored bytes.
pub fn decode_field<'a>(
    field: &ConfigField,
    bytes: &'a [u8],
    unset: u8,
) -> Result<FieldValue<'a>, FieldError> {
    match (field.encoding, field.sink) {
        (Encoding::Raw, _) => Ok(FieldValue::Bytes(bytes)),
        (Encoding::AsciiHex, Sink::MaskedRegister { .. }) => Ok(parse_masked_hex(bytes)),
        (Encoding::AsciiHex, _) => parse_ascii(bytes, 16, unset).map(FieldValue::Number),
        (Encoding::AsciiDecimal, _) => parse_ascii(bytes, 10, unset).map(FieldValue::Number),
    }
}

/// Parses digits of `radix`, treating NUL and `unset` as blank padding.
///
/// Any other non-digit is blanked first. Blanks are only allowed around the
/// number, not inside it.
fn parse_ascii(bytes: &[u8], radix: u32, unset: u8) -> Result<u32, FieldError> {
    let blank = char::from(unset);
    let mut text: heapless::String<{ MAX_NUMERIC_DIGITS * 2 }> = heapless::String::new();
    for &byte in bytes {
        let c = char::from(byte);
        let c = if c.is_digit(radix) { c } else { blank };
        text.push(c).map_err(|_| FieldError::Overflow)?;
    }

    let digits = text.trim_matches(|c: char| c == blank || c == '\0');
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(FieldError::Malformed);
    }

    u32::from_str_radix(digits, radix).map_err(|_| FieldError::Overflow)
}

fn parse_masked_hex(bytes: &[u8]) -> FieldValue<'static> {
    let mut value = 0u32;
    let mut mask = 0u32;
    for &byte in bytes {
        let digit = char::from(byte).to_digit(16);
        value = (value << 4) | digit.unwrap_or(0);
        mask = (mask << 1) | u32::from(digit.is_some());
    }
    FieldValue::Masked { value, mask }
}

/// Device state a config write may change besides the registers.
pub(crate) struct Targets<'a, B: RegisterBlock> {
    pub(crate) window: &'a mut RegisterWindow<B>,
    pub(crate) mode: &'a mut ReadMode,
    pub(crate) session: &'a Session,
}

/// Decodes and commits every field touched by the last merge.
pub(crate) fn commit<B: RegisterBlock, const WS: usize>(
    layout: &DeviceLayout,
    image: &[u8; WS],
    accepted: &Bitmap<WS>,
    targets: Targets<'_, B>,
) where
    BitsImpl<WS>: Bits,
{
    let Targets {
        window,
        mode,
        session,
    } = targets;

    for field in layout.fields {
        let span = field.span;
        if !(span.offset..span.end()).any(|pos| accepted.get(pos)) {
            continue;
        }

        let value = match decode_field(field, &image[span.offset..span.end()], layout.unset) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(
                    device = layout.name,
                    field = field.name,
                    %err,
                    "field rejected, keeping previous value"
                );
                continue;
            }
        };

        let committed = match (field.sink, value) {
            (Sink::Stored, _) => Ok(()),
            (Sink::Register(offset), FieldValue::Bytes(bytes)) => {
                window.write(offset, bytes).map(drop)
            }
            (Sink::Register(offset), FieldValue::Number(number)) => {
                window.write_u32(offset, number).map(drop)
            }
            (Sink::MaskedRegister { value: at, mask: mask_at }, FieldValue::Masked { value, mask }) => {
                commit_masked(window, (at, value), (mask_at, mask))
            }
            (Sink::ReadMode, FieldValue::Bytes(bytes)) => {
                *mode = select_mode(layout, bytes);
                Ok(())
            }
            (Sink::Owner, FieldValue::Number(pid)) => {
                let owner = ProcessId::new(pid);
                tracing::debug!(device = layout.name, pid, "consumer registered");
                session.register(owner);
                Ok(())
            }
            // Layout validation rules out the remaining pairings.
            _ => Ok(()),
        };

        if let Err(err) = committed {
            tracing::warn!(device = layout.name, field = field.name, %err, "register commit failed");
        }
    }
}

/// Blanks every digit, loads the value, then lights the valid digits.
fn commit_masked<B: RegisterBlock>(
    window: &mut RegisterWindow<B>,
    (value_at, value): (usize, u32),
    (mask_at, mask): (usize, u32),
) -> Result<(), BridgeError> {
    window.write_u32(mask_at, 0)?;
    window.write_u32(value_at, value)?;
    window.write_u32(mask_at, mask)?;
    Ok(())
}

fn select_mode(layout: &DeviceLayout, bytes: &[u8]) -> ReadMode {
    let wanted = match bytes.first() {
        Some(b'1') => ReadMode::Event,
        _ => ReadMode::Streaming,
    };

    if wanted == ReadMode::Event && layout.event.is_none() {
        tracing::debug!(device = layout.name, "no event layout, staying in streaming mode");
        return ReadMode::Streaming;
    }

    tracing::debug!(device = layout.name, mode = ?wanted, "read mode selected");
    wanted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        block::MemoryBlock,
        layout::{ConfigField, Encoding, Sink},
        variants,
        window::Access,
    };

    const PID: ConfigField = ConfigField::new("pid", 0, 11, Encoding::AsciiDecimal, Sink::Owner);
    const PWM: ConfigField = ConfigField::new("pwm", 0, 2, Encoding::AsciiHex, Sink::Register(4));
    const DIGITS: ConfigField = ConfigField::new(
        "digits",
        0,
        6,
        Encoding::AsciiHex,
        Sink::MaskedRegister { value: 0, mask: 8 },
    );

    #[test]
    fn merge_skips_nul_and_unset() {
        let mut image = [b'x'; 8];
        let accepted = merge(&mut image, 2, &[b'1', 0, b' ', b'2'], b' ');

        assert_eq!(&image, b"xx1xx2xx");
        assert!(accepted.get(2));
        assert!(!accepted.get(3));
        assert!(!accepted.get(4));
        assert!(accepted.get(5));
        assert_eq!(accepted.len(), 2);
    }

    #[test]
    fn decimal_with_zero_padding() {
        assert_eq!(
            decode_field(&PID, b"00000001234", b' '),
            Ok(FieldValue::Number(1234))
        );
    }

    #[test]
    fn decimal_with_blank_padding() {
        assert_eq!(
            decode_field(&PID, b"   1234    ", b' '),
            Ok(FieldValue::Number(1234))
        );
        assert_eq!(
            decode_field(&PID, b"1234\0\0\0\0\0\0\0", b' '),
            Ok(FieldValue::Number(1234))
        );
    }

    #[test]
    fn decimal_rejections() {
        // Non-digits are blanked, leaving nothing
        assert_eq!(
            decode_field(&PID, b"abcdefghijk", b' '),
            Err(FieldError::Malformed)
        );
        // Blank inside the number
        assert_eq!(
            decode_field(&PID, b"12x34      ", b' '),
            Err(FieldError::Malformed)
        );
        // Too large for 32 bits
        assert_eq!(
            decode_field(&PID, b"99999999999", b' '),
            Err(FieldError::Overflow)
        );
    }

    #[test]
    fn hex_field() {
        assert_eq!(decode_field(&PWM, b"7f", 0), Ok(FieldValue::Number(0x7F)));
        assert_eq!(decode_field(&PWM, b"zz", 0), Err(FieldError::Malformed));
    }

    #[test]
    fn masked_hex_blanks_invalid_digits() {
        assert_eq!(
            decode_field(&DIGITS, b"12ab\0z", 0),
            Ok(FieldValue::Masked {
                value: 0x12AB00,
                mask: 0b111100
            })
        );
    }

    #[test]
    fn commit_only_touches_accepted_fields() {
        let layout = &variants::MPU9250;
        let mut window = RegisterWindow::new(MemoryBlock::<180>::new(), 180, Access::ReadWrite);
        let mut mode = ReadMode::Streaming;
        let session = Session::new();
        let mut image = [b' '; 180];
        image[..9].copy_from_slice(b"CFGBYTES!");

        // Only the mode byte is accepted: the raw config must not be written
        let accepted = merge(&mut image, 9, b"1", layout.unset);
        commit(
            layout,
            &image,
            &accepted,
            Targets {
                window: &mut window,
                mode: &mut mode,
                session: &session,
            },
        );

        assert_eq!(mode, ReadMode::Event);
        let mut config = [0u8; 9];
        window.read(120, &mut config).unwrap();
        assert_eq!(config, [0u8; 9]);
    }

    #[test]
    fn rejected_owner_keeps_previous() {
        let layout = &variants::MPU9250;
        let mut window = RegisterWindow::new(MemoryBlock::<180>::new(), 180, Access::ReadWrite);
        let mut mode = ReadMode::Streaming;
        let session = Session::new();
        session.register(ProcessId::new(77));

        let mut image = [0u8; 180];
        let accepted = merge(&mut image, 10, b"12x4", layout.unset);
        commit(
            layout,
            &image,
            &accepted,
            Targets {
                window: &mut window,
                mode: &mut mode,
                session: &session,
            },
        );

        assert_eq!(session.owner().map(ProcessId::get), Some(77));
    }
}
