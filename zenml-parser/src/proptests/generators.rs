//! Input generators for property-based testing
//!
//! From unconstrained strings to chunks of Zenithal markup that are likely
//! to nest, fail late and backtrack.
#![allow(clippy::expect_used)]
use proptest::prelude::*;

/// Any string, including empty and control characters.
pub fn any_document_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(".*").expect("Failed to create any string strategy")
}

/// Printable ASCII with newlines and tabs, which covers every delimiter.
pub fn ascii_document() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x20-\x7E\n\t]*").expect("Failed to create ASCII string strategy")
}

/// Text that contains no character with a meaning in markup.
pub fn plain_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Z0-9 .,!?:=()\n]+").expect("Failed to create plain text")
}

/// Zenithal fragments glued together, well-formed or not.
///
/// Unbalanced openers and stray closers are included on purpose so that
/// alternatives fail deep inside the input.
pub fn structured_document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("\\zml?|brace=\"b\",bracket=\"k\",slash=\"i\"|>\n".to_string()),
            Just("\\xml?|version=\"1.0\"|>".to_string()),
            Just("\\p<".to_string()),
            Just("\\div|class=\"x\", id=\"y\"|<".to_string()),
            Just("\\li+<a><b>".to_string()),
            Just("\\pre*~<\n    code\n  >".to_string()),
            Just("\\br>".to_string()),
            Just(">".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("[k]".to_string()),
            Just("/i/".to_string()),
            Just("&amp;".to_string()),
            Just("&#x41;".to_string()),
            Just("&nope;".to_string()),
            Just("&macro>".to_string()),
            Just("`<".to_string()),
            Just("`q".to_string()),
            Just("## comment\n".to_string()),
            Just("#<comment>#".to_string()),
            Just("|".to_string()),
            prop::string::string_regex(r"[a-zA-Z0-9 .,!?\n]+")
                .expect("Failed to create text chunk"),
        ],
        0..20,
    )
    .prop_map(|chunks| chunks.join(""))
}

/// Multi-byte input, to check that positions respect character boundaries.
pub fn unicode_stress_test() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("\u{1F600}"),
            Just("\u{4E00}"),
            Just("\u{05D0}"),
            Just("e\u{0301}"),
            Just("\u{200B}"),
            Just("\u{FEFF}"),
            Just("\\\u{3042}<"),
            Just("\\\u{00E9}t\u{00E9}<"),
            Just("&\u{1F600};"),
            Just("`\u{00E9}"),
            Just(">"),
            Just("<"),
            Just(" "),
            Just("\n"),
        ],
        0..30,
    )
    .prop_map(|parts| parts.concat())
}
