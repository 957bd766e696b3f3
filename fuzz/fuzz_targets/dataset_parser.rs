#![no_main]

use banditpam::dataset::parse_text;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Either a rectangular matrix or an error, never a panic
        if let Ok(matrix) = parse_text(input) {
            assert!(matrix.nrows() > 0);
        }
    }
});
