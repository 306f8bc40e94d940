#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    if let Ok(decoded) = imgsniff::payload::decode_payload(input) {
        let _ = imgsniff::inspect_with_hint(&decoded.bytes, decoded.media_type.as_deref());
    }
});
