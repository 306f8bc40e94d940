use imgsniff::Error;
use imgsniff::payload::{decode_base64, decode_payload};

#[test]
fn test_decode_bare_base64() {
    let decoded = decode_payload("iVBORw0KGgo=").unwrap();
    assert_eq!(decoded.bytes, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    assert_eq!(decoded.media_type, None);
}

#[test]
fn test_decode_base64_without_padding_and_with_whitespace() {
    let bytes = decode_base64("iVBO Rw0K\r\nGgo").unwrap();
    assert_eq!(bytes, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
}

#[test]
fn test_decode_invalid_base64() {
    let err = decode_payload("not*base64!").unwrap_err();
    assert!(matches!(err, Error::InvalidBase64(_)));
}

#[test]
fn test_decode_data_uri_base64() {
    let decoded = decode_payload("DATA:Image/PNG;base64,iVBORw0KGgo=").unwrap();
    assert_eq!(decoded.bytes.len(), 8);
    assert_eq!(decoded.media_type.as_deref(), Some("image/png"));
}

#[test]
fn test_decode_data_uri_with_parameters() {
    let decoded = decode_payload("data:image/jpeg;name=x.jpg;BASE64,/9g=").unwrap();
    assert_eq!(decoded.bytes, [0xFF, 0xD8]);
    assert_eq!(decoded.media_type.as_deref(), Some("image/jpeg"));
}

#[test]
fn test_decode_data_uri_percent_encoded() {
    let decoded = decode_payload("data:,%FF%D8hi").unwrap();
    assert_eq!(decoded.bytes, [0xFF, 0xD8, b'h', b'i']);
    assert_eq!(decoded.media_type, None);
}

#[test]
fn test_decode_data_uri_missing_comma() {
    let err = decode_payload("data:image/png;base64").unwrap_err();
    assert!(matches!(err, Error::MalformedDataUri(_)));
}

#[test]
fn test_decode_empty_payloads() {
    assert!(decode_payload("").unwrap().bytes.is_empty());
    assert!(decode_payload("data:;base64,").unwrap().bytes.is_empty());
}
