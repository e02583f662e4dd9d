use crate::{
    Comment, Text,
    error::Reason,
    grammar::{
        Context, Grammar,
        combinators::{Alternative, CharQuery, Combinators, PResult},
        lexical::{
            COMMENT_DELIMITER, CONTENT_END, CONTENT_START, DECIMAL_DIGIT, ENTITY_END,
            ESCAPE_START, HEX_DIGIT, MACRO_START, NUMERIC_ENTITY_MARKER, entity, is_escapable,
        },
    },
};

/// An escape: the escape character followed by one character of the escape
/// set, which is what it yields.
///
/// Anything else after the escape character is a fatal error.
pub(crate) fn escape<'src, P: Combinators<'src>>(parser: &mut P) -> PResult<char> {
    parser.char(ESCAPE_START)?;
    let at = parser.scanner().mark();
    let c = parser.char(CharQuery::Any)?;
    if is_escapable(c) {
        Ok(c)
    } else {
        Err(parser.scanner().abort_at(at, Reason::InvalidEscape(c)))
    }
}

impl Grammar<'_, '_> {
    /// A run of plain characters, escapes and (outside verbal content)
    /// character references.
    pub(crate) fn text(&mut self, ctx: Context) -> PResult<Text> {
        let escaped = |grammar: &mut Self| escape(grammar);
        let reference = |grammar: &mut Self| grammar.entity();
        let plain = |grammar: &mut Self| grammar.plain_char(ctx);
        let verbal: [Alternative<'_, Self, char>; 2] = [&escaped, &plain];
        let markup: [Alternative<'_, Self, char>; 3] = [&escaped, &reference, &plain];
        let alternatives: &[Alternative<'_, Self, char>] = if ctx.verbal { &verbal } else { &markup };

        let chars = self.many(1, None, |grammar| grammar.choose(alternatives))?;
        Ok(Text::new(chars.into_iter().collect::<String>()))
    }

    fn plain_char(&mut self, ctx: Context) -> PResult<char> {
        let stops = self.state.text_stops(ctx.verbal);
        self.scanner.char_except(stops)
    }

    /// `&name;`, `&#123;` or `&#x7B;`.
    ///
    /// Once the `;` is read the reference is committed: an unknown name or a
    /// number that is not a character is fatal.
    fn entity(&mut self) -> PResult<char> {
        let start = self.scanner.mark();
        self.char(MACRO_START)?;
        if self.maybe(|grammar| grammar.char(NUMERIC_ENTITY_MARKER))?.is_some() {
            let hex = self
                .maybe(|grammar| grammar.char_any(&[CharQuery::Literal('x'), CharQuery::Literal('X')]))?
                .is_some();
            let digit = if hex { HEX_DIGIT } else { DECIMAL_DIGIT };
            let digits: String = self
                .many(1, None, |grammar| grammar.char(digit))?
                .into_iter()
                .collect();
            self.char(ENTITY_END)?;
            let radix = if hex { 16 } else { 10 };
            u32::from_str_radix(&digits, radix)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| {
                    let reference = if hex {
                        format!("#x{digits}")
                    } else {
                        format!("#{digits}")
                    };
                    self.scanner
                        .abort_at(start, Reason::InvalidCharacterReference(reference))
                })
        } else {
            let name = self.identifier()?;
            self.char(ENTITY_END)?;
            entity(&name).ok_or_else(|| self.scanner.abort_at(start, Reason::UnknownEntity(name)))
        }
    }

    /// `##line\n` or `#<block>#`.
    pub(crate) fn comment(&mut self) -> PResult<Comment> {
        let line = |grammar: &mut Self| {
            grammar.char(COMMENT_DELIMITER)?;
            let content = grammar.many(0, None, |grammar| grammar.char_except(&['\n']))?;
            grammar.char('\n')?;
            Ok(content)
        };
        let block = |grammar: &mut Self| {
            grammar.char(CONTENT_START)?;
            let content = grammar.many(0, None, |grammar| grammar.char_except(&[CONTENT_END]))?;
            grammar.char(CONTENT_END)?;
            grammar.char(COMMENT_DELIMITER)?;
            Ok(content)
        };
        let forms: [Alternative<'_, Self, Vec<char>>; 2] = [&line, &block];

        self.char(COMMENT_DELIMITER)?;
        let content: String = self.choose(&forms)?.into_iter().collect();
        Ok(Comment::new(&content))
    }
}
