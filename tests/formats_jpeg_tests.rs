use imgsniff::Dimensions;
use imgsniff::formats::jpeg::{JPEG_EOI, JPEG_SOI, is_sof_marker, jpeg_dimensions};

fn sof_segment(marker: u8, width: u16, height: u16) -> Vec<u8> {
    let mut seg = vec![0xFF, marker, 0x00, 0x0B, 0x08];
    seg.extend_from_slice(&height.to_be_bytes());
    seg.extend_from_slice(&width.to_be_bytes());
    seg.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);
    seg
}

fn dht_segment() -> Vec<u8> {
    let mut seg = vec![0xFF, 0xC4, 0x00, 0x1F, 0x00];
    for i in 0u8..28 {
        seg.push(i.wrapping_mul(37));
    }
    seg
}

#[test]
fn test_jpeg_dimensions_minimal_sof0() {
    let jpeg = [
        0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x64, 0x00, 0xC8, 0x01, 0x01, 0x11, 0x00,
        0xFF, 0xD9,
    ];
    assert_eq!(jpeg_dimensions(&jpeg), Some(Dimensions::new(200, 100)));
}

#[test]
fn test_jpeg_dimensions_after_app_segments() {
    let mut jpeg = Vec::new();
    jpeg.extend_from_slice(&[0xFF, 0xD8]);
    jpeg.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    jpeg.extend_from_slice(b"JFIF\x00\x01\x01\x00\x00\x48\x00\x48\x00\x00");
    jpeg.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x10]);
    jpeg.extend_from_slice(b"Exif\x00\x00");
    jpeg.extend_from_slice(&[0x00; 8]);
    jpeg.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
    jpeg.extend_from_slice(&[10; 64]);
    jpeg.extend_from_slice(&sof_segment(0xC0, 320, 256));
    jpeg.extend_from_slice(&JPEG_EOI);

    assert_eq!(jpeg_dimensions(&jpeg), Some(Dimensions::new(320, 256)));
}

#[test]
fn test_jpeg_dimensions_progressive() {
    let mut jpeg = JPEG_SOI.to_vec();
    jpeg.extend_from_slice(&dht_segment());
    jpeg.extend_from_slice(&sof_segment(0xC2, 1536, 1024));
    assert_eq!(jpeg_dimensions(&jpeg), Some(Dimensions::new(1536, 1024)));
}

#[test]
fn test_jpeg_dimensions_only_dht_then_eoi() {
    let mut jpeg = JPEG_SOI.to_vec();
    jpeg.extend_from_slice(&dht_segment());
    jpeg.extend_from_slice(&dht_segment());
    jpeg.extend_from_slice(&JPEG_EOI);
    // a frame header after EOI is never reached
    jpeg.extend_from_slice(&sof_segment(0xC0, 8, 8));
    assert!(jpeg_dimensions(&jpeg).is_none());
}

#[test]
fn test_jpeg_dimensions_first_sof_wins() {
    let mut jpeg = JPEG_SOI.to_vec();
    jpeg.extend_from_slice(&sof_segment(0xC1, 10, 20));
    jpeg.extend_from_slice(&sof_segment(0xC0, 30, 40));
    assert_eq!(jpeg_dimensions(&jpeg), Some(Dimensions::new(10, 20)));
}

#[test]
fn test_jpeg_dimensions_fill_bytes_before_marker() {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xFF, 0xFF];
    jpeg.extend_from_slice(&sof_segment(0xC0, 64, 48)[1..]);
    assert_eq!(jpeg_dimensions(&jpeg), Some(Dimensions::new(64, 48)));
}

#[test]
fn test_jpeg_dimensions_segment_length_below_two() {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x01];
    jpeg.extend_from_slice(&sof_segment(0xC0, 64, 48));
    assert!(jpeg_dimensions(&jpeg).is_none());
}

#[test]
fn test_jpeg_dimensions_truncated_length_field() {
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
    assert!(jpeg_dimensions(&jpeg).is_none());
}

#[test]
fn test_jpeg_dimensions_truncated_sof_payload() {
    let sof = sof_segment(0xC0, 640, 480);
    let mut jpeg = JPEG_SOI.to_vec();
    jpeg.extend_from_slice(&sof[..8]);
    assert!(jpeg_dimensions(&jpeg).is_none());
}

#[test]
fn test_jpeg_dimensions_segment_skips_past_end() {
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE1, 0xFF, 0xF0, 0x00, 0x00];
    assert!(jpeg_dimensions(&jpeg).is_none());
}

#[test]
fn test_jpeg_dimensions_invalid() {
    let not_jpeg = [0x89, 0x50, 0x4E, 0x47];
    assert!(jpeg_dimensions(&not_jpeg).is_none());
    assert!(jpeg_dimensions(&[0xFF]).is_none());
    assert!(jpeg_dimensions(&[0xFF, 0xD8]).is_none());
}

#[test]
fn test_is_sof_marker() {
    assert!(is_sof_marker(0xC0));
    assert!(is_sof_marker(0xC2));
    assert!(is_sof_marker(0xCF));
    assert!(!is_sof_marker(0xC4));
    assert!(!is_sof_marker(0xC8));
    assert!(!is_sof_marker(0xCC));
    assert!(!is_sof_marker(0xDA));
    assert!(!is_sof_marker(0x00));
}

#[test]
fn test_jpeg_dimensions_eoi_right_after_soi() {
    let mut jpeg = JPEG_SOI.to_vec();
    jpeg.extend_from_slice(&JPEG_EOI);
    jpeg.extend_from_slice(&sof_segment(0xC0, 64, 48));
    assert!(jpeg_dimensions(&jpeg).is_none());
}
