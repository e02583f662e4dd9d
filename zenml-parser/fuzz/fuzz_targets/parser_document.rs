#![no_main]

use libfuzzer_sys::fuzz_target;
use zenml_parser::{Parser, premade::{Verbatim, Zenithal}};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut parser = Parser::new();
        parser.register_plugin("raw", Verbatim);
        parser.register_plugin("zenithal", Zenithal::default());

        // Only crashes matter here, not whether the input parses
        if let Err(error) = parser.parse(input) {
            assert!(error.offset <= input.len());
        }
    }
});
