//! Fuzz target for Open Images label line parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oid2yolo::ir::label::fuzz_parse_corner_line;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_parse_corner_line(line);
});
