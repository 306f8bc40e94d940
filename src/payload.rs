//! Inline image payloads: bare base64 or `data:` URIs.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{Error, Result};

const DATA_SCHEME: &str = "data:";
const BASE64_PARAM: &str = ";base64";

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded inline payload and the media type a `data:` URI declared, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub bytes: Vec<u8>,
    pub media_type: Option<String>,
}

pub fn decode_payload(input: &str) -> Result<DecodedPayload> {
    let trimmed = input.trim();

    if starts_with_ignore_case(trimmed, DATA_SCHEME) {
        return decode_data_uri(trimmed);
    }

    Ok(DecodedPayload {
        bytes: decode_base64(trimmed)?,
        media_type: None,
    })
}

/// Standard alphabet, padding optional, embedded whitespace ignored.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    let compact: Vec<u8> = input
        .bytes()
        .filter(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .collect();
    Ok(LENIENT_STANDARD.decode(compact)?)
}

fn decode_data_uri(uri: &str) -> Result<DecodedPayload> {
    let rest = &uri[DATA_SCHEME.len()..];
    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| Error::MalformedDataUri("missing ',' separator".to_string()))?;

    let is_base64 = header.len() >= BASE64_PARAM.len()
        && header.as_bytes()[header.len() - BASE64_PARAM.len()..]
            .eq_ignore_ascii_case(BASE64_PARAM.as_bytes());
    let params = if is_base64 {
        &header[..header.len() - BASE64_PARAM.len()]
    } else {
        header
    };

    let media_type = params
        .split(';')
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_ascii_lowercase);

    let bytes = if is_base64 {
        decode_base64(body)?
    } else {
        urlencoding::decode_binary(body.as_bytes()).into_owned()
    };

    Ok(DecodedPayload { bytes, media_type })
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
