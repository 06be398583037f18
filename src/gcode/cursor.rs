//! Line cursor for RS274/NGC parsing
//!
//! Readers share one cursor over the line and leave it on the first
//! character after the item they consumed. End of line reads as a NUL byte
//! so readers can treat exhaustion like any other terminator.

/// Position-tracking view over one line of G-code
///
/// The line is expected to be upper-cased with comments stripped before it
/// reaches the evaluator.
#[derive(Debug)]
pub struct LineCursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `line`
    pub fn new(line: &'a str) -> Self {
        Self {
            line: line.as_bytes(),
            pos: 0,
        }
    }

    /// Current character, 0 at end of line
    pub fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    /// Character `offset` positions ahead, 0 past end of line
    pub fn peek_at(&self, offset: usize) -> u8 {
        *self.line.get(self.pos + offset).unwrap_or(&0)
    }

    /// Advance one character, saturating at the line terminator
    pub fn bump(&mut self) {
        if self.pos < self.line.len() {
            self.pos += 1;
        }
    }

    /// Advance `n` characters, saturating at the line terminator
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.line.len());
    }

    /// Current position on the line
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.line.len());
    }

    pub(crate) fn line(&self) -> &'a [u8] {
        self.line
    }

    /// True if the next characters match `word` exactly
    pub(crate) fn matches(&self, word: &[u8]) -> bool {
        word.iter()
            .enumerate()
            .all(|(i, &w)| self.peek_at(i) == w)
    }
}
