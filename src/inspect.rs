use crate::formats::{jpeg_dimensions, png_dimensions};
use crate::types::{Format, InspectionResult, ParseResult};

/// Runs the detectors in a fixed order (PNG, then JPEG). The first match wins.
#[inline]
pub fn parse(data: &[u8]) -> ParseResult {
    if let Some(dimensions) = png_dimensions(data) {
        return ParseResult::matched(Format::Png, dimensions);
    }

    if let Some(dimensions) = jpeg_dimensions(data) {
        return ParseResult::matched(Format::Jpeg, dimensions);
    }

    ParseResult::UNKNOWN
}

/// Total over every byte sequence: unrecognized input becomes `Format::Unknown`
/// with the byte length still reported.
pub fn inspect(data: &[u8]) -> InspectionResult {
    InspectionResult::from_parse(parse(data), data.len() as u64)
}

/// Like [`inspect`], but an unrecognized buffer takes its mime from a
/// transport content type such as an HTTP `Content-Type` header.
pub fn inspect_with_hint(data: &[u8], content_type: Option<&str>) -> InspectionResult {
    let mut result = inspect(data);
    if !result.format.is_known() {
        result.mime = content_type.and_then(media_type);
    }
    result
}

/// `"Image/PNG; charset=binary"` -> `"image/png"`.
pub fn media_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}
