use crate::types::Dimensions;

pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

const MARKER_PREFIX: u8 = 0xFF;
const MARKER_SOI: u8 = JPEG_SOI[1];
const MARKER_EOI: u8 = JPEG_EOI[1];

/// Low-nibble bitmask over 0xC0..=0xCF. DHT (C4), JPG (C8) and DAC (CC) are
/// not frame headers.
const SOF_MASK: u16 = !((1 << 0x4) | (1 << 0x8) | (1 << 0xC));

/// Length field (2) + precision (1) + height (2) + width (2).
const SOF_MIN_SEGMENT_LEN: usize = 7;

#[inline]
pub fn is_sof_marker(marker: u8) -> bool {
    marker & 0xF0 == 0xC0 && (SOF_MASK >> (marker & 0x0F)) & 1 == 1
}

#[inline]
pub fn has_jpeg_soi(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == JPEG_SOI
}

/// Walks marker segments after SOI until the first start-of-frame header and
/// returns its dimensions.
///
/// Every marker other than SOI and EOI is assumed to carry a two-byte length.
/// Restart markers and TEM are not special-cased; they do not appear ahead of
/// the frame header in well-formed streams.
///
/// Any read that would leave the buffer, a length below 2, or reaching EOI
/// yields `None`.
pub fn jpeg_dimensions(data: &[u8]) -> Option<Dimensions> {
    if !has_jpeg_soi(data) {
        return None;
    }

    let mut pos = 2;

    while pos < data.len() {
        if data[pos] != MARKER_PREFIX {
            pos += 1;
            continue;
        }

        // fill bytes
        while pos < data.len() && data[pos] == MARKER_PREFIX {
            pos += 1;
        }

        let marker = *data.get(pos)?;
        pos += 1;

        match marker {
            MARKER_EOI => return None,
            MARKER_SOI => continue,
            _ => {}
        }

        let seg_len = read_u16_be(data, pos)? as usize;
        if seg_len < 2 {
            return None;
        }

        if is_sof_marker(marker) {
            if seg_len < SOF_MIN_SEGMENT_LEN {
                return None;
            }
            let height = read_u16_be(data, pos + 3)?;
            let width = read_u16_be(data, pos + 5)?;
            return Some(Dimensions::new(width.into(), height.into()));
        }

        pos += seg_len;
    }

    None
}

#[inline]
fn read_u16_be(data: &[u8], pos: usize) -> Option<u16> {
    let bytes = data.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}
