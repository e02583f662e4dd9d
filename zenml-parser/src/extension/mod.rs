//! Macros and plugins.
//!
//! A *macro* is invoked with `&name` instead of `\name`: the element is not
//! emitted, the registered [`Expander`] is called with its attributes and
//! content blocks, and whatever it returns is spliced in its place.
//!
//! A *plugin* changes how the content blocks of `&name` are parsed. Its
//! [`SubParserFactory`] creates a [`SubParser`] from the invocation's
//! attributes, and that sub-parser reads each block from the same scanner
//! the document is parsed with. The parsed blocks then go to the macro of the
//! same name if there is one, or else the first block is spliced in as is.
use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    Attributes, ExpandError, Nodes,
    grammar::{PResult, Scanner},
};

pub mod premade;

/// Expands a macro invocation into nodes.
///
/// Implemented for any `Fn(&Attributes, Vec<Nodes>) -> Result<Nodes, ExpandError>`
/// closure that is `Send + Sync`.
pub trait Expander: Send + Sync {
    /// `blocks` holds one entry per content block; `&name>` passes a single
    /// empty block.
    ///
    /// # Errors
    ///
    /// Returns an error when the invocation cannot be expanded, which fails
    /// the whole parse.
    fn expand(&self, attributes: &Attributes, blocks: Vec<Nodes>) -> Result<Nodes, ExpandError>;
}

impl<F> Expander for F
where
    F: Fn(&Attributes, Vec<Nodes>) -> Result<Nodes, ExpandError> + Send + Sync,
{
    fn expand(&self, attributes: &Attributes, blocks: Vec<Nodes>) -> Result<Nodes, ExpandError> {
        self(attributes, blocks)
    }
}

/// Parses the content of one block in place of the Zenithal grammar.
///
/// The scanner is positioned right after the block's `<`. A sub-parser must
/// stop in front of the closing `>`, which is consumed by the caller, and may
/// use every combinator of [`crate::Combinators`] on the scanner.
pub trait SubParser {
    /// # Errors
    ///
    /// Returns the failure that ended the parse. A recoverable failure lets
    /// the surrounding grammar try other alternatives; a fatal one fails the
    /// whole document.
    fn parse(&mut self, scanner: &mut Scanner<'_>) -> PResult<Nodes>;
}

/// Creates the sub-parser for one plugin invocation.
///
/// Implemented for any `Fn(&Attributes) -> Box<dyn SubParser>` closure that is
/// `Send + Sync`.
pub trait SubParserFactory: Send + Sync {
    fn create(&self, attributes: &Attributes) -> Box<dyn SubParser>;
}

impl<F> SubParserFactory for F
where
    F: Fn(&Attributes) -> Box<dyn SubParser> + Send + Sync,
{
    fn create(&self, attributes: &Attributes) -> Box<dyn SubParser> {
        self(attributes)
    }
}

/// The macros and plugins known to a parser.
#[derive(Default)]
pub struct Registry {
    macros: FxHashMap<String, Box<dyn Expander>>,
    plugins: FxHashMap<String, Box<dyn SubParserFactory>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a macro, replacing any macro of the same name.
    pub fn register_macro(&mut self, name: impl Into<String>, expander: impl Expander + 'static) {
        self.macros.insert(name.into(), Box::new(expander));
    }

    /// Remove a macro. Returns whether it was registered.
    pub fn unregister_macro(&mut self, name: &str) -> bool {
        self.macros.remove(name).is_some()
    }

    /// Register a plugin, replacing any plugin of the same name.
    pub fn register_plugin(
        &mut self,
        name: impl Into<String>,
        factory: impl SubParserFactory + 'static,
    ) {
        self.plugins.insert(name.into(), Box::new(factory));
    }

    /// Remove a plugin. Returns whether it was registered.
    pub fn unregister_plugin(&mut self, name: &str) -> bool {
        self.plugins.remove(name).is_some()
    }

    #[must_use]
    pub fn expander(&self, name: &str) -> Option<&dyn Expander> {
        self.macros.get(name).map(Box::as_ref)
    }

    #[must_use]
    pub fn plugin(&self, name: &str) -> Option<&dyn SubParserFactory> {
        self.plugins.get(name).map(Box::as_ref)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut macros: Vec<_> = self.macros.keys().collect();
        let mut plugins: Vec<_> = self.plugins.keys().collect();
        macros.sort();
        plugins.sort();
        f.debug_struct("Registry")
            .field("macros", &macros)
            .field("plugins", &plugins)
            .finish()
    }
}
