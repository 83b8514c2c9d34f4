//! SQL Tokenizer implementation.

use std::sync::Arc;

use super::{LexError, LexErrorKind, LexicalRules, Position, Span, Token, TokenKind};
use crate::source::SourceReader;

/// A lexer that pulls tokens from a [`SourceReader`] on demand.
pub struct Lexer {
    /// The character cursor.
    reader: SourceReader,
    /// Keyword classification and quoting rules of the active dialect.
    rules: Arc<LexicalRules>,
    /// The position of the start of the current token.
    start: Position,
}

impl Lexer {
    /// Creates a new lexer over `reader`.
    #[must_use]
    pub fn new(reader: SourceReader, rules: Arc<LexicalRules>) -> Self {
        let start = reader.position();
        Self {
            reader,
            rules,
            start,
        }
    }

    /// Returns the underlying reader.
    #[must_use]
    pub const fn reader(&self) -> &SourceReader {
        &self.reader
    }

    /// Returns the underlying reader mutably (for mark/rewind).
    pub fn reader_mut(&mut self) -> &mut SourceReader {
        &mut self.reader
    }

    /// Returns the lexical rules in use.
    #[must_use]
    pub fn rules(&self) -> &LexicalRules {
        &self.rules
    }

    fn peek(&self) -> Option<char> {
        self.reader.peek()
    }

    fn peek_next(&self) -> Option<char> {
        self.reader.peek_next()
    }

    fn advance(&mut self) -> Option<char> {
        self.reader.advance()
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            let line_comment = (self.peek() == Some('-') && self.peek_next() == Some('-'))
                || (self.rules.hash_comments && self.peek() == Some('#'));
            if line_comment {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                let opening = self.reader.position();
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        Some(_) => {}
                        None => {
                            return Err(LexError::new(LexErrorKind::UnterminatedComment, opening));
                        }
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    fn text(&self) -> &str {
        self.reader.slice(self.start, self.reader.position())
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.text(),
            Span::new(self.start, self.reader.position()),
        )
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.start)
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            self.advance();
        }

        let text = self.text();
        match self.rules.keywords.classify(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => {
                let name = String::from(text);
                self.make_token(TokenKind::Identifier(name))
            }
        }
    }

    /// Scans a quoted identifier (e.g., "column name", `column name` or [column name]).
    fn scan_quoted_identifier(&mut self, close: char) -> Result<Token, LexError> {
        self.advance(); // consume opening quote
        let mut name = String::new();

        loop {
            match self.advance() {
                Some(c) if c == close => {
                    // A doubled closing quote is an escaped quote
                    if self.peek() == Some(close) {
                        self.advance();
                        name.push(close);
                    } else {
                        break;
                    }
                }
                Some(c) => name.push(c),
                None => return Err(self.error(LexErrorKind::UnterminatedQuotedIdentifier)),
            }
        }

        Ok(self.make_token(TokenKind::Identifier(name)))
    }

    /// Scans a number (integer or float).
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance(); // consume .
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance(); // consume e/E
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error(LexErrorKind::InvalidNumber(String::from(self.text()))));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = self.text();
        let kind = if is_float {
            text.parse::<f64>().map(TokenKind::Float).ok()
        } else {
            text.parse::<i64>().map(TokenKind::Integer).ok()
        };
        match kind {
            Some(kind) => Ok(self.make_token(kind)),
            None => Err(self.error(LexErrorKind::InvalidNumber(String::from(text)))),
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self, quote: char) -> Result<Token, LexError> {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    // A doubled quote is an escaped quote
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some('\\') if self.rules.backslash_escapes => {
                    let escape_at = self.reader.position();
                    self.advance();
                    let escaped = match self.advance() {
                        Some('n') => "\n",
                        Some('t') => "\t",
                        Some('r') => "\r",
                        Some('0') => "\0",
                        Some('b') => "\u{8}",
                        Some('Z') => "\u{1a}",
                        Some('\\') => "\\",
                        Some('\'') => "'",
                        Some('"') => "\"",
                        // kept verbatim so LIKE patterns still see the escape
                        Some('%') => "\\%",
                        Some('_') => "\\_",
                        Some(other) => {
                            return Err(LexError::new(
                                LexErrorKind::InvalidEscape(other),
                                escape_at,
                            ));
                        }
                        None => return Err(self.error(LexErrorKind::UnterminatedString)),
                    };
                    value.push_str(escaped);
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return Err(self.error(LexErrorKind::UnterminatedString)),
            }
        }

        Ok(self.make_token(TokenKind::String(value)))
    }

    /// Scans a blob literal (X'...' or x'...').
    fn scan_blob(&mut self) -> Result<Token, LexError> {
        self.advance(); // consume X/x
        self.advance(); // consume opening quote

        let mut hex = String::new();
        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) if c.is_whitespace() => {}
                Some(_) => {
                    return Err(self.error(LexErrorKind::InvalidBlob("non-hex character")));
                }
                None => return Err(self.error(LexErrorKind::UnterminatedBlob)),
            }
        }

        if hex.len() % 2 != 0 {
            return Err(self.error(LexErrorKind::InvalidBlob("odd number of hex digits")));
        }

        let bytes = hex
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| core::str::from_utf8(pair).ok())
            .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
            .collect();
        Ok(self.make_token(TokenKind::Blob(bytes)))
    }

    /// Consumes one character and builds a token of `kind`.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.advance();
        self.make_token(kind)
    }

    /// Consumes one character, then a second one if it is `next`.
    fn one_or_two(&mut self, next: char, two: TokenKind, one: TokenKind) -> Token {
        self.advance();
        if self.peek() == Some(next) {
            self.advance();
            self.make_token(two)
        } else {
            self.make_token(one)
        }
    }

    /// Scans the next token.
    ///
    /// Returns an `Eof` token (repeatedly) once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        self.start = self.reader.position();

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        if let Some(close) = self.rules.identifier_quote(c) {
            return self.scan_quoted_identifier(close);
        }
        if self.rules.is_string_quote(c) {
            return self.scan_string(c);
        }

        let token = match c {
            // Single-character tokens
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            '~' => self.single(TokenKind::BitNot),
            '?' => self.single(TokenKind::Question),
            '@' => self.single(TokenKind::At),
            '.' => self.single(TokenKind::Dot),
            '=' => self.single(TokenKind::Eq),
            '&' => self.single(TokenKind::BitAnd),

            // Potentially multi-character tokens
            ':' => self.one_or_two(':', TokenKind::DoubleColon, TokenKind::Colon),
            '|' => self.one_or_two('|', TokenKind::Concat, TokenKind::BitOr),
            '<' => {
                self.advance();
                match self.peek() {
                    Some('=') => self.single(TokenKind::LtEq),
                    Some('>') => self.single(TokenKind::NotEq),
                    Some('<') => self.single(TokenKind::LeftShift),
                    _ => self.make_token(TokenKind::Lt),
                }
            }
            '>' => {
                self.advance();
                match self.peek() {
                    Some('=') => self.single(TokenKind::GtEq),
                    Some('>') => self.single(TokenKind::RightShift),
                    _ => self.make_token(TokenKind::Gt),
                }
            }
            '!' => {
                if self.peek_next() == Some('=') {
                    self.advance();
                    self.single(TokenKind::NotEq)
                } else {
                    return Err(self.error(LexErrorKind::UnexpectedCharacter('!')));
                }
            }

            // Blob literals
            'X' | 'x' if self.peek_next() == Some('\'') => return self.scan_blob(),

            // Numbers
            c if c.is_ascii_digit() => return self.scan_number(),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => self.scan_word(),

            other => return Err(self.error(LexErrorKind::UnexpectedCharacter(other))),
        };
        Ok(token)
    }

    /// Tokenizes the rest of the input, ending with the `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
