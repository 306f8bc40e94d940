#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let result = imgsniff::inspect(data);
    assert_eq!(result.size, data.len() as u64);
    assert_eq!(result.format.is_known(), result.dimensions.is_some());
});
