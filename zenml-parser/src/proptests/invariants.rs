//! Parser invariant tests using property-based testing
//!
//! Organised by priority:
//! - P0: Critical invariants (parser never panics, errors stay in bounds)
//! - P1: Behavioural invariants (determinism, text and escape handling)

use proptest::prelude::*;

use crate::{Node, Options, ParseError, Parser, parse, parse_fragment};

use super::generators::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // ====================================================================
    // P0: CRITICAL INVARIANTS
    // ====================================================================

    /// The parser returns a result for any input, however malformed.
    #[test]
    fn parser_never_panics(input in any_document_string()) {
        let _ = parse(&input);
        let _ = parse_fragment(&input);
    }

    /// Same with every special element enabled, which widens what stops text.
    #[test]
    fn parser_with_special_elements_never_panics(input in ascii_document()) {
        let parser = Parser::with_options(
            Options::builder()
                .with_brace_name("b")
                .with_bracket_name("k")
                .with_slash_name("i")
                .build(),
        );
        let _ = parser.parse(&input);
    }

    /// A reported error points at a character boundary inside the input (or
    /// its very end), and its line and column agree with its byte offset.
    #[test]
    fn error_positions_in_bounds(input in structured_document()) {
        if let Err(error) = parse(&input) {
            verify_error_position(&error, &input)?;
        }
    }

    #[test]
    fn error_positions_utf8_safe(input in unicode_stress_test()) {
        if let Err(error) = parse(&input) {
            verify_error_position(&error, &input)?;
        }
    }

    // ====================================================================
    // P1: BEHAVIOURAL INVARIANTS
    // ====================================================================

    /// Parsing has no hidden state: the same input gives the same outcome.
    #[test]
    fn parsing_is_deterministic(input in structured_document()) {
        let parser = Parser::new();
        prop_assert_eq!(parser.parse(&input), parser.parse(&input));
    }

    /// Every document that parses can be serialised.
    #[test]
    fn documents_serialize(input in structured_document()) {
        if let Ok(document) = parse(&input) {
            prop_assert!(serde_json::to_string(&document).is_ok());
        }
    }

    /// Input without markup is a single text node holding the input.
    #[test]
    fn plain_text_is_one_node(input in plain_text()) {
        let nodes = parse_fragment(&input).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(nodes.len(), 1);
        prop_assert_eq!(nodes.first().and_then(Node::as_text).map(|t| t.value.as_str()), Some(input.as_str()));
    }

    /// Escaping every escapable character makes any text literal content.
    #[test]
    fn escaped_text_is_literal(input in ascii_document()) {
        let escaped: String = input
            .chars()
            .flat_map(|c| {
                let escape = crate::grammar::lexical::is_escapable(c).then_some('`');
                escape.into_iter().chain(std::iter::once(c))
            })
            .collect();
        let document = parse(&format!("\\p<{escaped}>"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let paragraph = document.root_element();
        prop_assert_eq!(paragraph.map(|p| p.inner_text(false)), Some(input));
    }
}

fn verify_error_position(error: &ParseError, input: &str) -> Result<(), TestCaseError> {
    prop_assert!(
        error.offset <= input.len(),
        "offset {} beyond input length {}",
        error.offset,
        input.len()
    );
    prop_assert!(
        input.is_char_boundary(error.offset),
        "offset {} is not a character boundary",
        error.offset
    );
    let prefix = input.get(..error.offset).unwrap_or_default();
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rsplit('\n').next().unwrap_or_default().chars().count() + 1;
    prop_assert_eq!((error.line(), error.column()), (line, column));
    Ok(())
}
