#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Options {
    /// Grammar version recorded on the document unless a `zml` instruction
    /// overrides it. Metadata only: it does not change the grammar.
    pub version: Option<String>,
    /// Element name for `{...}` shorthands. Unset means `{` and `}` are
    /// ordinary text.
    pub brace_name: Option<String>,
    /// Element name for `[...]` shorthands.
    pub bracket_name: Option<String>,
    /// Element name for `/.../` shorthands.
    pub slash_name: Option<String>,
    /// Require the whole input to be consumed.
    ///
    /// When disabled, parsing stops at the first construct that cannot be
    /// parsed and everything after it is ignored.
    pub exact: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            version: None,
            brace_name: None,
            bracket_name: None,
            slash_name: None,
            exact: true,
        }
    }
}

impl Options {
    /// Create a new `OptionsBuilder` for fluent configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use zenml_parser::Options;
    ///
    /// let options = Options::builder()
    ///     .with_version("1.1")
    ///     .with_brace_name("x")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Create a new `Options` with default settings.
    ///
    /// Equivalent to `Options::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builder for `Options` that provides an API for configuration.
///
/// Create an `OptionsBuilder` using `Options::builder()`.
///
/// # Example
///
/// ```
/// use zenml_parser::Options;
///
/// let options = Options::builder()
///     .with_brace_name("x")
///     .with_bracket_name("xn")
///     .with_slash_name("i")
///     .build();
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OptionsBuilder {
    version: Option<String>,
    brace_name: Option<String>,
    bracket_name: Option<String>,
    slash_name: Option<String>,
    exact: bool,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self {
            version: None,
            brace_name: None,
            bracket_name: None,
            slash_name: None,
            exact: true,
        }
    }
}

impl OptionsBuilder {
    /// Set the initial grammar version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Name the element that `{...}` stands for.
    ///
    /// # Example
    ///
    /// ```
    /// use zenml_parser::{Options, Parser};
    ///
    /// let parser = Parser::with_options(Options::builder().with_brace_name("x").build());
    /// let document = parser.parse("{a}").unwrap();
    /// assert_eq!(document.root_element().unwrap().name(), "x");
    /// ```
    #[must_use]
    pub fn with_brace_name(mut self, name: impl Into<String>) -> Self {
        self.brace_name = Some(name.into());
        self
    }

    /// Name the element that `[...]` stands for.
    #[must_use]
    pub fn with_bracket_name(mut self, name: impl Into<String>) -> Self {
        self.bracket_name = Some(name.into());
        self
    }

    /// Name the element that `/.../` stands for.
    #[must_use]
    pub fn with_slash_name(mut self, name: impl Into<String>) -> Self {
        self.slash_name = Some(name.into());
        self
    }

    /// Accept input that continues after the last parsable construct.
    ///
    /// # Example
    ///
    /// ```
    /// use zenml_parser::{Options, Parser};
    ///
    /// let parser = Parser::with_options(Options::builder().with_trailing_input().build());
    /// let document = parser.parse("\\a<b> > rest").unwrap();
    /// assert_eq!(document.root().len(), 2);
    /// ```
    #[must_use]
    pub fn with_trailing_input(mut self) -> Self {
        self.exact = false;
        self
    }

    /// Build the `Options` from this builder.
    #[must_use]
    pub fn build(self) -> Options {
        Options {
            version: self.version,
            brace_name: self.brace_name,
            bracket_name: self.bracket_name,
            slash_name: self.slash_name,
            exact: self.exact,
        }
    }
}
