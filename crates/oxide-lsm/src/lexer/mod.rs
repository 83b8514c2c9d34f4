//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for SQL that pulls tokens lazily
//! from a [`SourceReader`](crate::source::SourceReader). Keyword classification
//! and quoting rules come from the active dialect's [`LexicalRules`].

mod error;
mod rules;
mod span;
mod token;
mod tokenizer;

pub use error::{LexError, LexErrorKind};
pub use rules::{KeywordTable, LexicalRules};
pub use span::{Position, Span};
pub use token::{Keyword, Token, TokenCategory, TokenKind};
pub use tokenizer::Lexer;
