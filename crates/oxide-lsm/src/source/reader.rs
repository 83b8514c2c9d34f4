//! Repositionable character cursor.

use std::sync::Arc;

use crate::lexer::Position;

/// A checkpoint returned by [`SourceReader::mark`].
///
/// A mark is consumed by exactly one [`SourceReader::rewind`] or
/// [`SourceReader::release`]. Marks must be settled in the reverse order they
/// were taken.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a mark must be rewound or released"]
pub struct Mark {
    depth: usize,
}

impl Mark {
    /// Depth of this mark on the reader's mark stack (0 for the outermost).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// A character cursor over shared source text with a stack of saved positions.
///
/// Every analysis owns its own reader, so concurrent analyses over the same
/// text never observe each other's marks.
#[derive(Debug, Clone)]
pub struct SourceReader {
    text: Arc<str>,
    position: Position,
    marks: Vec<Position>,
}

impl SourceReader {
    /// Creates a reader positioned at the start of `text`.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            position: Position::start(),
            marks: Vec::new(),
        }
    }

    /// Returns the whole underlying text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the number of outstanding marks.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// Returns true once every character has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position.offset >= self.text.len()
    }

    /// Returns the current character without consuming it, or `None` at end of input.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.text[self.position.offset..].chars().next()
    }

    /// Returns the character after the current one without consuming anything.
    #[must_use]
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.text[self.position.offset..].chars();
        chars.next();
        chars.next()
    }

    /// Consumes the current character and returns it.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position = self.position.after(c);
        Some(c)
    }

    /// Returns the text between two positions previously reached by this reader.
    #[must_use]
    pub fn slice(&self, start: Position, end: Position) -> &str {
        self.text.get(start.offset..end.offset).unwrap_or_default()
    }

    /// Pushes the current position onto the mark stack.
    pub fn mark(&mut self) -> Mark {
        self.marks.push(self.position);
        Mark {
            depth: self.marks.len() - 1,
        }
    }

    /// Restores the position saved by `mark` and pops the stack down to and
    /// including it. Marks pushed after `mark` become invalid.
    pub fn rewind(&mut self, mark: Mark) {
        debug_assert!(mark.depth < self.marks.len(), "rewind of a stale mark");
        if let Some(&saved) = self.marks.get(mark.depth) {
            self.position = saved;
            self.marks.truncate(mark.depth);
        }
    }

    /// Pops `mark` without restoring the position.
    pub fn release(&mut self, mark: Mark) {
        debug_assert!(mark.depth < self.marks.len(), "release of a stale mark");
        self.marks.truncate(mark.depth);
    }

    /// Moves forward to `target`, a position this reader already scanned past
    /// under a mark that has since been rewound.
    pub(crate) fn skip_to(&mut self, target: Position) {
        debug_assert!(target.offset >= self.position.offset, "skip_to moves forward only");
        if target.offset >= self.position.offset && target.offset <= self.text.len() {
            self.position = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut reader = SourceReader::new("ab");
        assert_eq!(reader.peek(), Some('a'));
        assert_eq!(reader.peek_next(), Some('b'));
        assert_eq!(reader.advance(), Some('a'));
        assert_eq!(reader.advance(), Some('b'));
        assert!(reader.is_at_end());
        assert_eq!(reader.peek(), None);
        assert_eq!(reader.advance(), None);
        assert_eq!(reader.position(), Position::new(2, 1, 3));
    }

    #[test]
    fn test_line_tracking() {
        let mut reader = SourceReader::new("a\nbc");
        reader.advance();
        reader.advance();
        reader.advance();
        assert_eq!(reader.position(), Position::new(3, 2, 2));
    }

    #[test]
    fn test_rewind_restores_position() {
        let mut reader = SourceReader::new("SELECT");
        reader.advance();
        let mark = reader.mark();
        reader.advance();
        reader.advance();
        reader.rewind(mark);
        assert_eq!(reader.position().offset, 1);
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_release_keeps_position() {
        let mut reader = SourceReader::new("SELECT");
        let mark = reader.mark();
        reader.advance();
        reader.release(mark);
        assert_eq!(reader.position().offset, 1);
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_nested_marks_follow_stack_discipline() {
        let mut reader = SourceReader::new("abcdef");
        let outer = reader.mark();
        reader.advance();
        let inner = reader.mark();
        assert_eq!(inner.depth(), 1);
        reader.advance();
        reader.release(inner);
        assert_eq!(reader.depth(), 1);
        reader.advance();
        reader.rewind(outer);
        assert_eq!(reader.position(), Position::start());
        assert_eq!(reader.depth(), 0);
    }

    #[test]
    fn test_readers_over_shared_text_are_independent() {
        let text: Arc<str> = Arc::from("SELECT 1");
        let mut first = SourceReader::new(Arc::clone(&text));
        let second = SourceReader::new(text);
        let _mark = first.mark();
        first.advance();
        assert_eq!(second.position(), Position::start());
        assert_eq!(second.depth(), 0);
    }

    #[test]
    fn test_slice() {
        let mut reader = SourceReader::new("SELECT id");
        let start = reader.position();
        for _ in 0..6 {
            reader.advance();
        }
        assert_eq!(reader.slice(start, reader.position()), "SELECT");
    }
}
