#![no_main]

use libfuzzer_sys::fuzz_target;
use zenml_parser::{Options, Parser};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let options = Options::builder()
            .with_brace_name("b")
            .with_bracket_name("k")
            .with_slash_name("i")
            .build();
        let _ = Parser::with_options(options).parse(input);
    }
});
