//! Lexical error types.

use thiserror::Error;

use super::Position;

/// What went wrong while scanning a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated quoted identifier")]
    UnterminatedQuotedIdentifier,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unterminated blob literal")]
    UnterminatedBlob,

    #[error("invalid blob literal: {0}")]
    InvalidBlob(&'static str),

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
}

/// A lexical error with the position of the offending token.
///
/// For unterminated tokens the position is that of the opening delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    /// The error kind.
    pub kind: LexErrorKind,
    /// Where the offending token starts.
    pub position: Position,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub const fn new(kind: LexErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
}
