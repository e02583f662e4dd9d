//! A small backtracking parser-combinator runtime.
//!
//! Every parser is a function of a [`Combinators`] implementor returning a
//! [`PResult`]. Failures are plain values: sequencing is done with `?`, and
//! nothing on this path unwinds.
//!
//! There are two kinds of failure. A *recoverable* failure means "this
//! alternative does not apply here" and makes [`Combinators::choose`] try the
//! next alternative and [`Combinators::many`] stop repeating. A *fatal*
//! failure means the input is definitely malformed; it restores the cursor
//! like any other failure but is never swallowed, so it reaches the caller of
//! the top-level parse with its message unchanged.
use std::ops::RangeInclusive;

use crate::{
    error::{Expected, ParseError, Reason},
    grammar::cursor::{Cursor, Mark},
};

pub type PResult<T> = Result<T, Failure>;

/// How many content levels may be open at once. Opening one more is a fatal
/// [`Reason::NestingTooDeep`] failure at its opening delimiter.
pub const MAX_NESTING_DEPTH: usize = 128;

/// One alternative handed to [`Combinators::choose`].
pub type Alternative<'a, P, T> = &'a dyn Fn(&mut P) -> PResult<T>;

/// A parse failure, carrying the diagnostic for the position it happened at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    error: ParseError,
    fatal: bool,
}

impl Failure {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[must_use]
    pub fn error(&self) -> &ParseError {
        &self.error
    }

    #[must_use]
    pub fn into_error(self) -> ParseError {
        self.error
    }
}

/// What a single-character parser accepts.
#[derive(Clone, Copy, Debug)]
pub enum CharQuery {
    /// Any character.
    Any,
    /// Exactly this character.
    Literal(char),
    /// A character whose codepoint lies in one of the ranges.
    Ranges(&'static str, &'static [RangeInclusive<u32>]),
    /// A character satisfying the predicate.
    Predicate(&'static str, fn(char) -> bool),
}

impl CharQuery {
    #[must_use]
    pub fn matches(&self, c: char) -> bool {
        match self {
            CharQuery::Any => true,
            CharQuery::Literal(expected) => *expected == c,
            CharQuery::Ranges(_, ranges) => {
                let codepoint = u32::from(c);
                ranges.iter().any(|range| range.contains(&codepoint))
            }
            CharQuery::Predicate(_, predicate) => predicate(c),
        }
    }

    #[must_use]
    pub fn expected(&self) -> Expected {
        match self {
            CharQuery::Any => Expected::Any,
            CharQuery::Literal(c) => Expected::Char(*c),
            CharQuery::Ranges(name, _) | CharQuery::Predicate(name, _) => Expected::Class(name),
        }
    }
}

impl From<char> for CharQuery {
    fn from(c: char) -> Self {
        CharQuery::Literal(c)
    }
}

/// The input of a parse: a cursor, the furthest recoverable failure seen so
/// far (reported when the whole parse fails) and the number of open content
/// levels.
///
/// Sub-parsers share the scanner, so the nesting depth carries over into
/// delegated grammars.
#[derive(Clone, Debug)]
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
    furthest: Option<ParseError>,
    depth: usize,
}

impl<'src> Scanner<'src> {
    #[must_use]
    pub fn new(input: &'src str) -> Self {
        Self {
            cursor: Cursor::new(input),
            furthest: None,
            depth: 0,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.cursor.peek()
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        self.cursor.mark()
    }

    pub fn reset(&mut self, mark: Mark) {
        self.cursor.reset(mark);
    }

    /// A recoverable failure at the current position.
    pub fn fail(&mut self, expected: Expected) -> Failure {
        let reason = match self.cursor.peek() {
            Some(found) => Reason::Unexpected { expected, found },
            None => Reason::UnexpectedEnd(expected),
        };
        self.failure(reason, false)
    }

    /// A fatal failure at the current position.
    pub fn abort(&mut self, reason: Reason) -> Failure {
        self.failure(reason, true)
    }

    /// A fatal failure at a previously marked position.
    #[must_use]
    pub fn abort_at(&self, mark: Mark, reason: Reason) -> Failure {
        Failure {
            error: ParseError {
                position: mark.position(),
                offset: mark.offset(),
                reason,
            },
            fatal: true,
        }
    }

    /// Open one content level whose delimiter is at `open`.
    pub(crate) fn enter(&mut self, open: Mark) -> PResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.abort_at(open, Reason::NestingTooDeep(MAX_NESTING_DEPTH)));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn failure(&mut self, reason: Reason, fatal: bool) -> Failure {
        let error = ParseError {
            position: self.cursor.position(),
            offset: self.cursor.offset(),
            reason,
        };
        if !fatal
            && self
                .furthest
                .as_ref()
                .is_none_or(|furthest| furthest.offset <= error.offset)
        {
            self.furthest = Some(error.clone());
        }
        Failure { error, fatal }
    }

    /// Turn the failure that ended a parse into the error reported for it.
    ///
    /// Fatal failures are reported as they are. A recoverable failure is
    /// replaced by the furthest recoverable failure when that one happened
    /// later in the input.
    pub(crate) fn into_error(self, failure: Failure) -> ParseError {
        if failure.fatal {
            return failure.error;
        }
        match self.furthest {
            Some(furthest) if furthest.offset > failure.error.offset => furthest,
            Some(_) | None => failure.error,
        }
    }
}

/// The combinator toolkit, available to anything that can lend out the
/// [`Scanner`] it parses from.
pub trait Combinators<'src>: Sized {
    fn scanner(&mut self) -> &mut Scanner<'src>;

    /// Consume one character matching `query`.
    fn char(&mut self, query: impl Into<CharQuery>) -> PResult<char> {
        let query = query.into();
        let scanner = self.scanner();
        match scanner.cursor.peek() {
            Some(c) if query.matches(c) => {
                scanner.cursor.read();
                Ok(c)
            }
            Some(_) | None => Err(scanner.fail(query.expected())),
        }
    }

    /// Consume one character matching the first matching query.
    fn char_any(&mut self, queries: &[CharQuery]) -> PResult<char> {
        let mut last = None;
        for query in queries {
            match self.char(*query) {
                Ok(c) => return Ok(c),
                Err(failure) => last = Some(failure),
            }
        }
        Err(last.unwrap_or_else(|| self.scanner().fail(Expected::Class("nothing"))))
    }

    /// Consume one character that is not in `forbidden`.
    ///
    /// The set is kept by reference in the failure diagnostic.
    fn char_except(&mut self, forbidden: &'static [char]) -> PResult<char> {
        let scanner = self.scanner();
        match scanner.cursor.peek() {
            Some(c) if !forbidden.contains(&c) => {
                scanner.cursor.read();
                Ok(c)
            }
            Some(_) | None => Err(scanner.fail(Expected::NoneOf(forbidden))),
        }
    }

    /// Succeed only at the end of the input.
    fn eof(&mut self) -> PResult<()> {
        let scanner = self.scanner();
        match scanner.cursor.peek() {
            None => Ok(()),
            Some(found) => Err(scanner.failure(Reason::TrailingInput(found), false)),
        }
    }

    /// Run `parser`, rewinding the input if it fails.
    fn attempt<T>(&mut self, parser: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let mark = self.scanner().mark();
        match parser(self) {
            Ok(value) => Ok(value),
            Err(failure) => {
                self.scanner().reset(mark);
                Err(failure)
            }
        }
    }

    /// Try each alternative in order, rewinding the input between attempts.
    ///
    /// Fails with the last recoverable failure when no alternative applies;
    /// a fatal failure ends the choice immediately.
    fn choose<T>(&mut self, alternatives: &[Alternative<'_, Self, T>]) -> PResult<T> {
        let mut last = None;
        for alternative in alternatives {
            match self.attempt(|parser| alternative(parser)) {
                Ok(value) => return Ok(value),
                Err(failure) if failure.is_fatal() => return Err(failure),
                Err(failure) => last = Some(failure),
            }
        }
        Err(last.unwrap_or_else(|| self.scanner().fail(Expected::Class("nothing"))))
    }

    /// Repeat `parser` between `min` and `max` times.
    ///
    /// The failing final attempt is rewound. Repetition also stops after a
    /// success that consumed nothing, which still has to reach `min`.
    fn many<T>(
        &mut self,
        min: usize,
        max: Option<usize>,
        mut parser: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut values = Vec::new();
        while max.is_none_or(|max| values.len() < max) {
            let before = self.scanner().mark();
            match self.attempt(&mut parser) {
                Ok(value) => {
                    values.push(value);
                    if self.scanner().mark() == before {
                        break;
                    }
                }
                Err(failure) if failure.is_fatal() || values.len() < min => return Err(failure),
                Err(_) => break,
            }
        }
        if values.len() < min {
            return Err(self.scanner().fail(Expected::Repetitions(min)));
        }
        Ok(values)
    }

    /// Run `parser` zero or one time.
    fn maybe<T>(&mut self, parser: impl FnMut(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        Ok(self.many(0, Some(1), parser)?.pop())
    }
}

impl<'src> Combinators<'src> for Scanner<'src> {
    fn scanner(&mut self) -> &mut Scanner<'src> {
        self
    }
}
