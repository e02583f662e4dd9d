//! A parser for Zenithal markup (ZenML).
//!
//! Zenithal is a compact syntax for XML-like trees:
//!
//! ```text
//! \zml?|version="1.1",brace="x"|>
//! \html<
//!   \p|class="intro"|<Hello {world}!>
//!   \pre*<
//!     indented
//!   >
//! >
//! ```
//!
//! The source is parsed into a [`Document`] of [`Node`]s. Macros (`&name`)
//! and plugins can be registered on a [`Parser`] to expand or re-parse parts
//! of the input.
//!
//! # Example
//!
//! ```
//! let document = zenml_parser::parse(r"\p<Hello &amp; world>").unwrap();
//! let paragraph = document.root_element().unwrap();
//! assert_eq!(paragraph.name(), "p");
//! assert_eq!(paragraph.inner_text(false), "Hello & world");
//! ```
use tracing::instrument;

mod error;
mod extension;
mod grammar;
mod model;
mod options;

#[cfg(test)]
mod proptests;

pub use error::{ExpandError, Expected, ParseError, Reason};
pub use extension::{Expander, Registry, SubParser, SubParserFactory, premade};
pub use grammar::{
    Alternative, CharQuery, Combinators, Cursor, Failure, MAX_NESTING_DEPTH, Mark, PResult,
    SYSTEM_INSTRUCTION_NAME, Scanner, SpecialKind, entity,
};
pub use model::{
    AttributeName, AttributeValue, Attributes, Comment, Document, Element, Node, Nodes, Position,
    ProcessingInstruction, Text, XmlDeclaration,
};
pub use options::{Options, OptionsBuilder};

use grammar::{Grammar, GrammarState};

/// A configured Zenithal parser.
///
/// The parser holds the options and the registered macros and plugins. Every
/// call to [`Parser::parse`] starts from a fresh grammar state, so `zml`
/// instructions in one document do not affect the next one, and a parser can
/// be shared between threads.
#[derive(Debug, Default)]
pub struct Parser {
    options: Options,
    registry: Registry,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            registry: Registry::default(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.options.version = Some(version.into());
    }

    pub fn set_brace_name(&mut self, name: impl Into<String>) {
        self.options.brace_name = Some(name.into());
    }

    pub fn set_bracket_name(&mut self, name: impl Into<String>) {
        self.options.bracket_name = Some(name.into());
    }

    pub fn set_slash_name(&mut self, name: impl Into<String>) {
        self.options.slash_name = Some(name.into());
    }

    /// Register a macro, invoked as `&name`.
    ///
    /// # Example
    ///
    /// ```
    /// use zenml_parser::{Attributes, Element, ExpandError, Nodes, Parser};
    ///
    /// let mut parser = Parser::new();
    /// parser.register_macro("hr", |_: &Attributes, _: Vec<Nodes>| -> Result<Nodes, ExpandError> {
    ///     Ok(Element::new("hr").with_attribute("class", "rule").into())
    /// });
    /// let document = parser.parse("&hr>").unwrap();
    /// assert_eq!(document.root_element().unwrap().attribute("class"), Some("rule"));
    /// ```
    pub fn register_macro(&mut self, name: impl Into<String>, expander: impl Expander + 'static) {
        self.registry.register_macro(name, expander);
    }

    /// Remove a macro. Returns whether it was registered.
    pub fn unregister_macro(&mut self, name: &str) -> bool {
        self.registry.unregister_macro(name)
    }

    /// Register a plugin, whose sub-parser reads the blocks of `&name`.
    pub fn register_plugin(
        &mut self,
        name: impl Into<String>,
        factory: impl SubParserFactory + 'static,
    ) {
        self.registry.register_plugin(name, factory);
    }

    /// Remove a plugin. Returns whether it was registered.
    pub fn unregister_plugin(&mut self, name: &str) -> bool {
        self.registry.unregister_plugin(name)
    }

    /// Parse a whole document.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] for the first position the input could not
    /// be parsed at. No partial document is produced.
    #[instrument(skip_all, fields(len = input.len()))]
    pub fn parse(&self, input: &str) -> Result<Document, ParseError> {
        let (root, state) = self.run(input)?;
        Ok(Document {
            root,
            version: state.into_version(),
        })
    }

    /// Parse a sequence of nodes without wrapping it in a [`Document`].
    ///
    /// # Errors
    ///
    /// Same as [`Parser::parse`].
    #[instrument(skip_all, fields(len = input.len()))]
    pub fn parse_fragment(&self, input: &str) -> Result<Nodes, ParseError> {
        let (nodes, _) = self.run(input)?;
        Ok(nodes)
    }

    fn run(&self, input: &str) -> Result<(Nodes, GrammarState), ParseError> {
        let mut scanner = Scanner::new(input);
        let mut state = GrammarState::new(&self.options);
        let result =
            Grammar::new(&mut scanner, &mut state, &self.registry).document(self.options.exact);
        match result {
            Ok(nodes) => Ok((nodes, state)),
            Err(failure) => {
                let error = scanner.into_error(failure);
                tracing::error!(%error, "failed to parse document");
                Err(error)
            }
        }
    }
}

/// Parse a document with default options and no extensions.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse(input: &str) -> Result<Document, ParseError> {
    Parser::new().parse(input)
}

/// Parse a sequence of nodes with default options and no extensions.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse_fragment(input: &str) -> Result<Nodes, ParseError> {
    Parser::new().parse_fragment(input)
}
