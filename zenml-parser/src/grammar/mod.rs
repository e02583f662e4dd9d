mod combinators;
mod cursor;
mod document;
mod element;
pub(crate) mod lexical;
mod state;
mod text;

pub use combinators::{
    Alternative, CharQuery, Combinators, Failure, MAX_NESTING_DEPTH, PResult, Scanner,
};
pub use cursor::{Cursor, Mark};
pub use lexical::{SYSTEM_INSTRUCTION_NAME, SpecialKind, entity};
pub(crate) use state::GrammarState;
pub(crate) use text::escape;

use crate::extension::Registry;

/// What the enclosing constructs allow in the content being parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Context {
    /// Only text and escapes are recognised.
    pub(crate) verbal: bool,
    /// Inside a `/.../` shorthand, where `/` cannot open another one.
    pub(crate) in_slash: bool,
}

/// The Zenithal grammar, parsing from a scanner it borrows.
///
/// Plugins receive the same scanner, so a delegated sub-grammar continues
/// from where this one stopped and hands the position back when it is done.
pub(crate) struct Grammar<'g, 'src> {
    scanner: &'g mut Scanner<'src>,
    state: &'g mut GrammarState,
    registry: &'g Registry,
}

impl<'g, 'src> Grammar<'g, 'src> {
    pub(crate) fn new(
        scanner: &'g mut Scanner<'src>,
        state: &'g mut GrammarState,
        registry: &'g Registry,
    ) -> Self {
        Self {
            scanner,
            state,
            registry,
        }
    }
}

impl Grammar<'_, '_> {
    /// Parse the content of a block whose opening delimiter is at `open`,
    /// one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        open: Mark,
        parser: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.scanner.enter(open)?;
        let result = parser(self);
        self.scanner.leave();
        result
    }
}

impl<'src> Combinators<'src> for Grammar<'_, 'src> {
    fn scanner(&mut self) -> &mut Scanner<'src> {
        self.scanner
    }
}
