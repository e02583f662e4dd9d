//! Ready-made sub-parsers.
use crate::{
    Attributes, Nodes, Options, Text,
    extension::{Registry, SubParser, SubParserFactory},
    grammar::{
        Alternative, Combinators, Context, Grammar, GrammarState, PResult, Scanner, SpecialKind,
        escape,
        lexical::{CONTENT_END, ESCAPE_START},
    },
};

/// Reads a block as literal text, like the `~` mark does.
///
/// Only escapes are recognised; the block ends at the first unescaped `>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verbatim;

impl SubParser for Verbatim {
    fn parse(&mut self, scanner: &mut Scanner<'_>) -> PResult<Nodes> {
        let escaped = |scanner: &mut Scanner<'_>| escape(scanner);
        let plain = |scanner: &mut Scanner<'_>| scanner.char_except(&[ESCAPE_START, CONTENT_END]);
        let alternatives: [Alternative<'_, Scanner<'_>, char>; 2] = [&escaped, &plain];

        let chars = scanner.many(0, None, |scanner| scanner.choose(&alternatives))?;
        let mut nodes = Nodes::new();
        if !chars.is_empty() {
            nodes.push(Text::new(chars.into_iter().collect::<String>()));
        }
        Ok(nodes)
    }
}

impl SubParserFactory for Verbatim {
    fn create(&self, _attributes: &Attributes) -> Box<dyn SubParser> {
        Box::new(Verbatim)
    }
}

/// Reads a block with a separate Zenithal grammar.
///
/// The nested grammar has no macros or plugins of its own and keeps its own
/// special element names, starting from the options it was built with. An
/// invocation can override them with `brace`, `bracket` and `slash`
/// attributes:
///
/// ```
/// use zenml_parser::{Parser, premade::Zenithal};
///
/// let mut parser = Parser::new();
/// parser.register_plugin("inner", Zenithal::default());
/// let document = parser.parse(r#"&inner|brace="b"|<{bold}>"#).unwrap();
/// assert_eq!(document.root_element().unwrap().name(), "b");
/// ```
///
/// `zml` instructions inside the block only affect the rest of that block.
#[derive(Clone, Debug, Default)]
pub struct Zenithal {
    options: Options,
}

impl Zenithal {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl SubParser for Zenithal {
    fn parse(&mut self, scanner: &mut Scanner<'_>) -> PResult<Nodes> {
        let registry = Registry::default();
        let mut state = GrammarState::new(&self.options);
        Grammar::new(scanner, &mut state, &registry).nodes(Context::default())
    }
}

impl SubParserFactory for Zenithal {
    fn create(&self, attributes: &Attributes) -> Box<dyn SubParser> {
        let mut options = self.options.clone();
        for kind in SpecialKind::ALL {
            if let Some(name) = attributes.get(kind.attribute_name()) {
                let slot = match kind {
                    SpecialKind::Brace => &mut options.brace_name,
                    SpecialKind::Bracket => &mut options.bracket_name,
                    SpecialKind::Slash => &mut options.slash_name,
                };
                *slot = Some(name.to_string());
            }
        }
        Box::new(Zenithal::new(options))
    }
}
