use crate::{image::FrameWriter, layout::EventLayout};

/// Which register region a read decodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// The live register window, verbatim.
    #[default]
    Streaming,
    /// The triggered snapshot, reshaped into the streaming layout.
    Event,
}

/// Builds the read frame from a register snapshot.
///
/// In streaming mode, or when the device has no event layout, the frame is the
/// snapshot. In event mode the frame starts as the snapshot, then:
///
/// 1. `accel` is copied from the event region,
/// 2. `zero` is cleared,
/// 3. the timestamp is spliced from the event region to `timestamp_dest`.
///
/// Copies that would run past the event region or the frame are truncated.
///
/// # Panics
/// Panics if `frame` and `snapshot` differ in length.
pub fn assemble_frame(
    mode: ReadMode,
    event: Option<&EventLayout>,
    snapshot: &[u8],
    frame: &mut [u8],
) {
    frame.copy_from_slice(snapshot);

    let (ReadMode::Event, Some(event)) = (mode, event) else {
        return;
    };

    let region = clamped(snapshot, event.region.offset, event.region.len);
    let mut out = FrameWriter::new(frame);

    out.splice_at(
        event.accel.offset,
        clamped(region, event.accel.offset, event.accel.len),
    );
    out.zero_at(event.zero.offset, event.zero.len);
    out.splice_at(
        event.timestamp_dest,
        clamped(region, event.timestamp_source, event.timestamp_len),
    );
}

/// `bytes[offset..offset + len]`, cut short at the end of `bytes`.
fn clamped(bytes: &[u8], offset: usize, len: usize) -> &[u8] {
    let start = offset.min(bytes.len());
    let end = offset.saturating_add(len).min(bytes.len());
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Span;

    // 32-byte window: event region is the upper half
    const EVENT: EventLayout = EventLayout {
        region: Span::new(16, 16),
        accel: Span::new(0, 6),
        zero: Span::new(6, 8),
        timestamp_source: 6,
        timestamp_dest: 6,
        timestamp_len: 4,
    };

    fn snapshot() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        // streaming region
        bytes[..16].fill(0xEE);
        // event region: sample, then timestamp
        bytes[16..22].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        bytes[22..26].copy_from_slice(&[0xA0, 0xA1, 0xA2, 0xA3]);
        bytes[26..32].fill(0x55);
        bytes
    }

    #[test]
    fn streaming_frame_is_verbatim() {
        let snapshot = snapshot();
        let mut frame = [0u8; 32];
        assemble_frame(ReadMode::Streaming, Some(&EVENT), &snapshot, &mut frame);
        assert_eq!(frame, snapshot);
    }

    #[test]
    fn event_frame_structure() {
        let snapshot = snapshot();
        let mut frame = [0u8; 32];
        assemble_frame(ReadMode::Event, Some(&EVENT), &snapshot, &mut frame);

        assert_eq!(&frame[..6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(&frame[6..10], &[0xA0, 0xA1, 0xA2, 0xA3]);
        assert_eq!(&frame[10..14], &[0; 4]);
        // Outside the spliced regions the snapshot shows through
        assert_eq!(&frame[14..16], &[0xEE; 2]);
        assert_eq!(&frame[16..], &snapshot[16..]);
    }

    #[test]
    fn event_frame_ignores_streaming_region() {
        let mut a = snapshot();
        let mut b = snapshot();
        a[..14].fill(0x11);
        b[..14].fill(0x99);

        let mut frame_a = [0u8; 32];
        let mut frame_b = [0u8; 32];
        assemble_frame(ReadMode::Event, Some(&EVENT), &a, &mut frame_a);
        assemble_frame(ReadMode::Event, Some(&EVENT), &b, &mut frame_b);

        assert_eq!(&frame_a[..14], &frame_b[..14]);
    }

    #[test]
    fn oversized_timestamp_is_truncated() {
        let layout = EventLayout {
            timestamp_source: 14,
            timestamp_len: 8,
            ..EVENT
        };
        let snapshot = snapshot();
        let mut frame = [0u8; 32];
        assemble_frame(ReadMode::Event, Some(&layout), &snapshot, &mut frame);

        // Only the two bytes left in the event region are spliced
        assert_eq!(&frame[6..8], &[0x55, 0x55]);
        assert_eq!(&frame[8..14], &[0; 6]);
    }

    #[test]
    fn event_mode_without_layout_streams() {
        let snapshot = snapshot();
        let mut frame = [0u8; 32];
        assemble_frame(ReadMode::Event, None, &snapshot, &mut frame);
        assert_eq!(frame, snapshot);
    }
}
