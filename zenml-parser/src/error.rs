use std::fmt;

use crate::{SpecialKind, model::Position};

/// The error returned by a failed parse.
///
/// There is exactly one `ParseError` per failed parse: no partial tree is
/// produced and no errors are aggregated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("[{position}] {reason}")]
pub struct ParseError {
    /// Line and column of the offending character.
    pub position: Position,
    /// Byte offset of the offending character.
    pub offset: usize,
    pub reason: Reason,
}

impl ParseError {
    #[must_use]
    pub fn line(&self) -> usize {
        self.position.line
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Get advice for this error if available.
    /// Returns helpful information for resolving the error.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match &self.reason {
            Reason::InvalidEscape(_) => Some(
                "Only these characters can follow '`': & < > ' \" { } [ ] / \\ | ` # ;",
            ),
            Reason::UnknownEntity(_) => Some(
                "Known entities are amp, lt, gt, apos, quot, lcub, rcub, lbrace, rbrace, lsqb, rsqb, lbrack, rbrack, sol, bsol, verbar, vert, grave, num and semi; use '&#x...;' for anything else",
            ),
            Reason::UnsetSpecialElement(_) => Some(
                "Special elements need a name, set it with `\\zml?|brace=\"...\"|>` or through the parser options",
            ),
            Reason::NoSuchMacro(_) => {
                Some("Macros ('&name') must be registered on the parser before parsing")
            }
            Reason::MultipleElementBlocks(_) => {
                Some("Add the '+' mark to the element name to allow several content blocks")
            }
            Reason::MultipleInstructionBlocks(_) => {
                Some("Processing instructions take at most one content block")
            }
            Reason::NestingTooDeep(_) => {
                Some("Close some elements before opening new ones, or flatten the structure")
            }
            Reason::TrailingInput(_) => {
                Some("A closing delimiter may be missing its opening counterpart")
            }
            Reason::UnexpectedEnd(_)
            | Reason::Unexpected { .. }
            | Reason::InvalidCharacterReference(_)
            | Reason::Expansion { .. } => None,
        }
    }
}

/// Why a parse failed.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(Expected),

    #[error("expected {expected}, found '{found}'")]
    Unexpected { expected: Expected, found: char },

    #[error("document ends before reaching end of input, found '{0}'")]
    TrailingInput(char),

    #[error("invalid escape character '{0}'")]
    InvalidEscape(char),

    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("invalid character reference '{0}'")]
    InvalidCharacterReference(String),

    #[error("no name specified for {0} elements")]
    UnsetSpecialElement(SpecialKind),

    #[error("no such macro '{0}'")]
    NoSuchMacro(String),

    #[error("processing instruction '{0}' cannot have more than one content block")]
    MultipleInstructionBlocks(String),

    #[error("normal element '{0}' cannot have more than one content block")]
    MultipleElementBlocks(String),

    #[error("content nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("macro '{name}' failed: {source}")]
    Expansion {
        name: String,
        #[source]
        source: ExpandError,
    },
}

/// What a character-level parser was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// One literal character.
    Char(char),
    /// A named character class, such as "identifier start character".
    Class(&'static str),
    /// Any character outside the listed ones.
    NoneOf(&'static [char]),
    /// Any character at all.
    Any,
    /// At least this many matches of a repeated parser.
    Repetitions(usize),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Char(c) => write!(f, "'{}'", c.escape_debug()),
            Expected::Class(name) => f.write_str(name),
            Expected::NoneOf(chars) => {
                f.write_str("a character other than ")?;
                for (i, c) in chars.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{}'", c.escape_debug())?;
                }
                Ok(())
            }
            Expected::Any => f.write_str("any character"),
            Expected::Repetitions(min) => write!(f, "at least {min} matches"),
        }
    }
}

/// The error a macro expander reports when it cannot expand an invocation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExpandError {
    message: String,
}

impl ExpandError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
