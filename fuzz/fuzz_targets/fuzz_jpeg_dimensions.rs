#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|body: &[u8]| {
    let mut data = Vec::with_capacity(body.len() + 2);
    data.extend_from_slice(&[0xFF, 0xD8]);
    data.extend_from_slice(body);
    let _ = imgsniff::formats::jpeg_dimensions(&data);
});
