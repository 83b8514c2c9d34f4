//! The backtracking grammar engine and its combinators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use super::{GrammarRules, RuleFailure, SyntaxFailure, Syntax};
use crate::ast::Ident;
use crate::lexer::{Keyword, LexError, Lexer, Position, Span, Token, TokenKind};
use crate::source::{Mark, SourceReader};

/// The result of evaluating a grammar rule.
pub type RuleResult<T> = Result<T, RuleFailure>;

/// A grammar rule.
pub type Rule<T> = fn(&mut Grammar) -> RuleResult<T>;

/// How deep expressions and subqueries may nest.
pub const MAX_NESTING: u32 = 128;

/// A token scanned at some offset, with the reader position just after it.
struct Scanned {
    token: Result<Token, LexError>,
    after: Position,
}

/// A checkpoint of the grammar state.
#[must_use = "a grammar mark must be rewound or released"]
pub struct GrammarMark {
    reader: Mark,
    last_end: Position,
    params: usize,
}

/// Evaluates grammar rules over one reader.
///
/// Tokens are scanned lazily and memoized by start offset, so rewinding never
/// re-lexes text already seen.
pub struct Grammar {
    lexer: Lexer,
    syntax: Arc<Syntax>,
    cancel: Arc<AtomicBool>,
    scanned: HashMap<usize, Scanned>,
    /// End of the last consumed token.
    last_end: Position,
    /// Counter for `?` placeholders.
    params: usize,
    /// The most advanced syntax failure swallowed by `optional` or `many`.
    furthest: Option<SyntaxFailure>,
    /// Active `nested` calls.
    nesting: u32,
}

impl Grammar {
    /// Creates a grammar over `reader` using a dialect's syntax.
    #[must_use]
    pub fn new(reader: SourceReader, syntax: Arc<Syntax>, cancel: Arc<AtomicBool>) -> Self {
        let last_end = reader.position();
        let lexer = Lexer::new(reader, Arc::clone(&syntax.lexical));
        Self {
            lexer,
            syntax,
            cancel,
            scanned: HashMap::new(),
            last_end,
            params: 0,
            furthest: None,
            nesting: 0,
        }
    }

    /// Returns the dialect's rule table.
    #[must_use]
    pub fn rules(&self) -> &GrammarRules {
        &self.syntax.grammar
    }

    /// Returns the reader position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.lexer.reader().position()
    }

    /// Returns the number of outstanding marks.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lexer.reader().depth()
    }

    /// Returns the source text between two positions.
    #[must_use]
    pub fn slice(&self, start: Position, end: Position) -> &str {
        self.lexer.reader().slice(start, end)
    }

    /// Fails with `Cancelled` once the analysis has been cancelled.
    pub fn check_cancelled(&self) -> RuleResult<()> {
        if self.cancel.load(Ordering::Acquire) {
            Err(RuleFailure::Cancelled)
        } else {
            Ok(())
        }
    }

    // --- Marks ---

    pub fn mark(&mut self) -> GrammarMark {
        GrammarMark {
            reader: self.lexer.reader_mut().mark(),
            last_end: self.last_end,
            params: self.params,
        }
    }

    pub fn rewind(&mut self, mark: GrammarMark) {
        self.lexer.reader_mut().rewind(mark.reader);
        self.last_end = mark.last_end;
        self.params = mark.params;
    }

    pub fn release(&mut self, mark: GrammarMark) {
        self.lexer.reader_mut().release(mark.reader);
    }

    // --- Tokens ---

    fn scan(&mut self) -> &Scanned {
        let offset = self.lexer.reader().position().offset;
        let lexer = &mut self.lexer;
        self.scanned.entry(offset).or_insert_with(|| {
            let mark = lexer.reader_mut().mark();
            let token = lexer.next_token();
            let after = lexer.reader().position();
            lexer.reader_mut().rewind(mark);
            Scanned { token, after }
        })
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> RuleResult<&Token> {
        match &self.scan().token {
            Ok(token) => Ok(token),
            Err(err) => Err(RuleFailure::Lexical(err.clone())),
        }
    }

    /// Consumes and returns the next token.
    pub fn bump(&mut self) -> RuleResult<Token> {
        let scanned = self.scan();
        let after = scanned.after;
        let token = scanned.token.clone()?;
        self.lexer.reader_mut().skip_to(after);
        self.last_end = token.span.end;
        Ok(token)
    }

    /// Returns the start of the next token, the start of the node about to be parsed.
    pub fn start(&mut self) -> RuleResult<Position> {
        Ok(self.peek()?.span.start)
    }

    /// Returns the span from `start` to the end of the last consumed token.
    #[must_use]
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Returns the next `?` placeholder index (1-based).
    pub fn next_param(&mut self) -> usize {
        self.params += 1;
        self.params
    }

    /// Checks if the next token matches the given kind.
    pub fn check(&mut self, kind: &TokenKind) -> RuleResult<bool> {
        let token = self.peek()?;
        Ok(core::mem::discriminant(&token.kind) == core::mem::discriminant(kind))
    }

    /// Checks if the next token is the given keyword.
    ///
    /// An unquoted identifier spelled like the keyword also matches, so words
    /// the dialect does not reserve still work in keyword positions.
    pub fn check_keyword(&mut self, keyword: Keyword) -> RuleResult<bool> {
        let token = self.peek()?;
        Ok(match &token.kind {
            TokenKind::Keyword(kw) => *kw == keyword,
            TokenKind::Identifier(_) => token.text.eq_ignore_ascii_case(keyword.as_str()),
            _ => false,
        })
    }

    /// Consumes the next token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> RuleResult<bool> {
        if self.check(kind)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the next token if it is `keyword`.
    pub fn eat_keyword(&mut self, keyword: Keyword) -> RuleResult<bool> {
        if self.check_keyword(keyword)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expects the next token to be the given kind.
    pub fn expect(&mut self, kind: &TokenKind) -> RuleResult<Token> {
        if self.check(kind)? {
            self.bump()
        } else {
            Err(self.fail(&kind.describe()))
        }
    }

    /// Expects the next token to be the given keyword.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> RuleResult<Token> {
        if self.check_keyword(keyword)? {
            self.bump()
        } else {
            Err(self.fail(keyword.as_str()))
        }
    }

    /// Expects and returns an identifier.
    pub fn expect_identifier(&mut self) -> RuleResult<Ident> {
        let token = self.peek()?;
        let TokenKind::Identifier(name) = &token.kind else {
            return Err(self.fail("identifier"));
        };
        // Unquoted identifiers are spelled exactly as their value.
        let quoted = token.text != *name;
        let ident = Ident::new(name.clone(), quoted, token.span);
        self.bump()?;
        Ok(ident)
    }

    /// Builds a syntax failure at the next token.
    pub fn fail(&mut self, expected: &str) -> RuleFailure {
        self.fail_any(&[expected])
    }

    /// Builds a syntax failure at the next token listing several alternatives.
    pub fn fail_any(&mut self, expected: &[&str]) -> RuleFailure {
        match self.peek() {
            Ok(token) => RuleFailure::Syntax(SyntaxFailure::new(
                token.span.start,
                expected.iter().map(|s| String::from(*s)).collect(),
                token.describe(),
            )),
            Err(failure) => failure,
        }
    }

    // --- Combinators ---

    /// Runs `rule` as a unit: on success its mark is released, on any failure
    /// the reader is rewound to where the attempt started.
    pub fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> RuleResult<T>) -> RuleResult<T> {
        self.check_cancelled()?;
        let mark = self.mark();
        match rule(self) {
            Ok(value) => {
                self.release(mark);
                Ok(value)
            }
            Err(failure) => {
                self.rewind(mark);
                Err(failure)
            }
        }
    }

    /// Runs `rule` one nesting level deeper.
    ///
    /// Past [`MAX_NESTING`] levels this fails with the terminal `TooDeep`
    /// instead of recursing further.
    pub fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> RuleResult<T>) -> RuleResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(RuleFailure::TooDeep(self.start()?));
        }
        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    /// Runs `rule` and always rewinds, returning what it would have produced.
    pub fn lookahead<T>(&mut self, rule: impl FnOnce(&mut Self) -> RuleResult<T>) -> RuleResult<T> {
        let mark = self.mark();
        let result = rule(self);
        self.rewind(mark);
        result
    }

    /// Ordered choice: the first alternative that succeeds wins.
    ///
    /// When every alternative fails with a syntax failure, the one that got
    /// furthest is returned; ties pool their expectations.
    pub fn choice<T>(&mut self, alternatives: &[Rule<T>]) -> RuleResult<T> {
        let mut failure: Option<SyntaxFailure> = None;
        for alternative in alternatives {
            match self.attempt(*alternative) {
                Ok(value) => return Ok(value),
                Err(RuleFailure::Syntax(f)) => {
                    failure = Some(match failure {
                        Some(previous) => previous.merge(f),
                        None => f,
                    });
                }
                Err(terminal) => return Err(terminal),
            }
        }
        match failure {
            Some(f) => Err(RuleFailure::Syntax(f)),
            None => Err(self.fail_any(&[])),
        }
    }

    /// Repetition: applies `rule` until it fails, keeping every success.
    ///
    /// Never fails on a syntax mismatch.
    pub fn many<T>(&mut self, mut rule: impl FnMut(&mut Self) -> RuleResult<T>) -> RuleResult<Vec<T>> {
        let mut items = Vec::new();
        loop {
            let before = self.position().offset;
            match self.attempt(&mut rule) {
                Ok(item) => {
                    items.push(item);
                    // An item that consumed nothing would match forever.
                    if self.position().offset == before {
                        break;
                    }
                }
                Err(RuleFailure::Syntax(f)) => {
                    self.note(f);
                    break;
                }
                Err(terminal) => return Err(terminal),
            }
        }
        Ok(items)
    }

    /// Applies `rule` once if it matches; a syntax mismatch yields `None`.
    pub fn optional<T>(&mut self, rule: impl FnOnce(&mut Self) -> RuleResult<T>) -> RuleResult<Option<T>> {
        match self.attempt(rule) {
            Ok(value) => Ok(Some(value)),
            Err(RuleFailure::Syntax(f)) => {
                self.note(f);
                Ok(None)
            }
            Err(terminal) => Err(terminal),
        }
    }

    /// One or more `rule`s separated by commas.
    pub fn comma_separated<T>(&mut self, rule: impl Fn(&mut Self) -> RuleResult<T>) -> RuleResult<Vec<T>> {
        let mut items = vec![rule(self)?];
        let rest = self.many(|g| {
            g.expect(&TokenKind::Comma)?;
            rule(g)
        })?;
        items.extend(rest);
        Ok(items)
    }

    /// `( rule, rule, ... )`
    pub fn parenthesized_list<T>(&mut self, rule: impl Fn(&mut Self) -> RuleResult<T>) -> RuleResult<Vec<T>> {
        self.expect(&TokenKind::LeftParen)?;
        let items = self.comma_separated(rule)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(items)
    }

    /// Records a swallowed failure for the final diagnostics.
    fn note(&mut self, failure: SyntaxFailure) {
        let furthest = match self.furthest.take() {
            Some(previous) => previous.merge(failure),
            None => failure,
        };
        trace!(offset = furthest.position.offset, expected = ?furthest.expected, "furthest failure");
        self.furthest = Some(furthest);
    }

    /// Evaluates an entry rule, which must consume the whole input apart
    /// from an optional trailing `;`.
    ///
    /// A syntax failure is reported at the furthest point any rule reached.
    pub fn run<T>(&mut self, entry: Rule<T>) -> RuleResult<T> {
        match self.complete(entry) {
            Err(RuleFailure::Syntax(failure)) => {
                let failure = match self.furthest.take() {
                    Some(furthest) => furthest.merge(failure),
                    None => failure,
                };
                Err(RuleFailure::Syntax(failure))
            }
            other => other,
        }
    }

    fn complete<T>(&mut self, entry: Rule<T>) -> RuleResult<T> {
        let value = self.attempt(entry)?;
        self.eat(&TokenKind::Semicolon)?;
        if !self.check(&TokenKind::Eof)? {
            return Err(self.fail(&TokenKind::Eof.describe()));
        }
        Ok(value)
    }
}
