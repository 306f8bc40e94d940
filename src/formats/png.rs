use crate::types::Dimensions;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub const IHDR_CHUNK_TYPE: &[u8; 4] = b"IHDR";

/// Signature (8) + IHDR length (4) + type (4) + width (4) + height (4).
pub const PNG_MIN_HEADER_LEN: usize = 24;

const IHDR_TYPE_OFFSET: usize = 12;
const WIDTH_OFFSET: usize = 16;
const HEIGHT_OFFSET: usize = 20;

#[inline]
pub fn has_png_signature(data: &[u8]) -> bool {
    data.len() >= PNG_SIGNATURE.len() && data[..8] == PNG_SIGNATURE
}

/// Reads width and height from the IHDR chunk, which the format pins directly
/// after the signature, so no chunk walk is needed.
///
/// Returns `None` when the signature, the length or the IHDR tag is missing.
/// The IHDR length field and CRC are not checked.
#[inline]
pub fn png_dimensions(data: &[u8]) -> Option<Dimensions> {
    if data.len() < PNG_MIN_HEADER_LEN || !has_png_signature(data) {
        return None;
    }

    if &data[IHDR_TYPE_OFFSET..IHDR_TYPE_OFFSET + 4] != IHDR_CHUNK_TYPE {
        return None;
    }

    let width = read_u32_be(data, WIDTH_OFFSET)?;
    let height = read_u32_be(data, HEIGHT_OFFSET)?;

    Some(Dimensions::new(width, height))
}

#[inline]
fn read_u32_be(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: u32, height: u32) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(IHDR_CHUNK_TYPE);
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data
    }

    #[test]
    fn exact_minimum_length_is_enough() {
        let data = header(1, 2);
        assert_eq!(data.len(), PNG_MIN_HEADER_LEN);
        assert_eq!(png_dimensions(&data), Some(Dimensions::new(1, 2)));
    }

    #[test]
    fn one_byte_short_is_rejected() {
        let data = header(1, 2);
        assert!(png_dimensions(&data[..PNG_MIN_HEADER_LEN - 1]).is_none());
    }

    #[test]
    fn full_u32_range_is_preserved() {
        let data = header(u32::MAX, 0);
        assert_eq!(png_dimensions(&data), Some(Dimensions::new(u32::MAX, 0)));
    }

    #[test]
    fn signature_check_needs_eight_bytes() {
        assert!(!has_png_signature(&PNG_SIGNATURE[..7]));
        assert!(has_png_signature(&PNG_SIGNATURE));
    }
}
