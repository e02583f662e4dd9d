//! Character classes, delimiters and the entity table of the Zenithal syntax.
use std::{fmt, ops::RangeInclusive};

use crate::grammar::combinators::CharQuery;

pub(crate) const ELEMENT_START: char = '\\';
pub(crate) const MACRO_START: char = '&';
pub(crate) const ESCAPE_START: char = '`';
pub(crate) const ATTRIBUTE_START: char = '|';
pub(crate) const ATTRIBUTE_END: char = '|';
pub(crate) const ATTRIBUTE_EQUAL: char = '=';
pub(crate) const ATTRIBUTE_SEPARATOR: char = ',';
pub(crate) const STRING_DELIMITER: char = '"';
pub(crate) const CONTENT_START: char = '<';
pub(crate) const CONTENT_END: char = '>';
pub(crate) const COMMENT_DELIMITER: char = '#';
pub(crate) const ENTITY_END: char = ';';
pub(crate) const NUMERIC_ENTITY_MARKER: char = '#';

/// The name of the instruction that reconfigures the grammar.
pub const SYSTEM_INSTRUCTION_NAME: &str = "zml";

/// Characters that may follow [`ESCAPE_START`].
pub(crate) const ESCAPE_CHARS: &[char] = &[
    '&', '<', '>', '\'', '"', '{', '}', '[', ']', '/', '\\', '|', '`', '#', ';',
];

const IDENTIFIER_START_RANGES: &[RangeInclusive<u32>] = &[
    0x3A..=0x3A,
    0x5F..=0x5F,
    0x41..=0x5A,
    0x61..=0x7A,
    0xC0..=0xD6,
    0xD8..=0xF6,
    0xF8..=0x2FF,
    0x370..=0x37D,
    0x37F..=0x1FFF,
    0x200C..=0x200D,
    0x2070..=0x218F,
    0x2C00..=0x2FEF,
    0x3001..=0xD7FF,
    0xF900..=0xFDCF,
    0xFDF0..=0xFFFD,
    0x1_0000..=0xE_FFFF,
];

const IDENTIFIER_CONTINUE_RANGES: &[RangeInclusive<u32>] = &[
    0x2D..=0x2E,
    0x3A..=0x3A,
    0x5F..=0x5F,
    0xB7..=0xB7,
    0x30..=0x39,
    0x41..=0x5A,
    0x61..=0x7A,
    0xC0..=0xD6,
    0xD8..=0xF6,
    0xF8..=0x2FF,
    0x300..=0x36F,
    0x370..=0x37D,
    0x37F..=0x1FFF,
    0x200C..=0x200D,
    0x2070..=0x218F,
    0x2C00..=0x2FEF,
    0x203F..=0x2040,
    0x3001..=0xD7FF,
    0xF900..=0xFDCF,
    0xFDF0..=0xFFFD,
    0x1_0000..=0xE_FFFF,
];

pub(crate) const IDENTIFIER_START: CharQuery =
    CharQuery::Ranges("identifier start character", IDENTIFIER_START_RANGES);
pub(crate) const IDENTIFIER_CONTINUE: CharQuery =
    CharQuery::Ranges("identifier character", IDENTIFIER_CONTINUE_RANGES);
pub(crate) const SPACE: CharQuery = CharQuery::Predicate("whitespace", is_space);
pub(crate) const MARK: CharQuery = CharQuery::Predicate("element mark", is_mark);
pub(crate) const DECIMAL_DIGIT: CharQuery = CharQuery::Predicate("decimal digit", is_decimal_digit);
pub(crate) const HEX_DIGIT: CharQuery = CharQuery::Predicate("hexadecimal digit", is_hex_digit);

pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub(crate) fn is_escapable(c: char) -> bool {
    ESCAPE_CHARS.contains(&c)
}

fn is_mark(c: char) -> bool {
    matches!(c, '?' | '*' | '~' | '+')
}

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Look up a named character entity.
#[must_use]
pub fn entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "apos" => '\'',
        "quot" => '"',
        "lcub" | "lbrace" => '{',
        "rcub" | "rbrace" => '}',
        "lsqb" | "lbrack" => '[',
        "rsqb" | "rbrack" => ']',
        "sol" => '/',
        "bsol" => '\\',
        "verbar" | "vert" => '|',
        "grave" => '`',
        "num" => '#',
        "semi" => ';',
        _ => return None,
    };
    Some(c)
}

/// The three configurable bracket-style shorthands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    /// `{...}`
    Brace,
    /// `[...]`
    Bracket,
    /// `/.../`
    Slash,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 3] = [SpecialKind::Brace, SpecialKind::Bracket, SpecialKind::Slash];

    #[must_use]
    pub fn start(self) -> char {
        match self {
            SpecialKind::Brace => '{',
            SpecialKind::Bracket => '[',
            SpecialKind::Slash => '/',
        }
    }

    #[must_use]
    pub fn end(self) -> char {
        match self {
            SpecialKind::Brace => '}',
            SpecialKind::Bracket => ']',
            SpecialKind::Slash => '/',
        }
    }

    /// The kind whose start delimiter is `c`.
    #[must_use]
    pub fn from_start(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.start() == c)
    }

    /// The attribute of the system instruction that names this kind.
    #[must_use]
    pub fn attribute_name(self) -> &'static str {
        match self {
            SpecialKind::Brace => "brace",
            SpecialKind::Bracket => "bracket",
            SpecialKind::Slash => "slash",
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// The modifiers written right after an element name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Marks {
    /// `?`: a processing instruction.
    pub(crate) instruction: bool,
    /// `*`: dedent each content block.
    pub(crate) trim: bool,
    /// `~`: content blocks are literal text.
    pub(crate) verbal: bool,
    /// `+`: any number of content blocks, one element each.
    pub(crate) multiple: bool,
}

impl FromIterator<char> for Marks {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut marks = Marks::default();
        for c in iter {
            match c {
                '?' => marks.instruction = true,
                '*' => marks.trim = true,
                '~' => marks.verbal = true,
                '+' => marks.multiple = true,
                _ => {}
            }
        }
        marks
    }
}
