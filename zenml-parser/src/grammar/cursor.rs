use crate::model::Position;

/// A saved cursor state, used for backtracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark {
    offset: usize,
    position: Position,
}

impl Mark {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }
}

/// A `Cursor` reads a source one codepoint at a time, keeping track of the
/// line and column of the next codepoint.
///
/// Reading past the end yields `None` and leaves the cursor where it is.
#[derive(Clone, Debug)]
pub struct Cursor<'src> {
    input: &'src str,
    offset: usize,
    position: Position,
}

impl<'src> Cursor<'src> {
    #[must_use]
    pub fn new(input: &'src str) -> Self {
        Self {
            input,
            offset: 0,
            position: Position::default(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &'src str {
        self.input
    }

    /// The part of the input that has not been read yet.
    #[must_use]
    pub fn rest(&self) -> &'src str {
        self.input.get(self.offset..).unwrap_or_default()
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        self.position = self.position.after(c);
        Some(c)
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            position: self.position,
        }
    }

    pub fn reset(&mut self, mark: Mark) {
        self.offset = mark.offset;
        self.position = mark.position;
    }
}
