//! Per-dialect lexical rules: reserved words, quoting and comment styles.

use std::collections::BTreeSet;

use super::Keyword;

/// The set of keywords a dialect reserves.
///
/// Words outside the set lex as identifiers even if they are SQL keywords
/// elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    reserved: BTreeSet<Keyword>,
}

impl KeywordTable {
    /// Creates a table reserving exactly `keywords`.
    #[must_use]
    pub fn new(keywords: &[Keyword]) -> Self {
        Self {
            reserved: keywords.iter().copied().collect(),
        }
    }

    /// Returns a copy of this table that also reserves `keywords`.
    #[must_use]
    pub fn with(mut self, keywords: &[Keyword]) -> Self {
        self.reserved.extend(keywords.iter().copied());
        self
    }

    /// Returns a copy of this table that no longer reserves `keywords`.
    #[must_use]
    pub fn without(mut self, keywords: &[Keyword]) -> Self {
        for keyword in keywords {
            self.reserved.remove(keyword);
        }
        self
    }

    /// Returns true if `keyword` is reserved.
    #[must_use]
    pub fn reserves(&self, keyword: Keyword) -> bool {
        self.reserved.contains(&keyword)
    }

    /// Classifies a bare word: `Some` only when it is a reserved keyword.
    #[must_use]
    pub fn classify(&self, word: &str) -> Option<Keyword> {
        Keyword::from_str(word).filter(|kw| self.reserves(*kw))
    }

    /// Returns the number of reserved keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    /// Returns true if nothing is reserved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }

    /// Iterates over the reserved keywords in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.reserved.iter().copied()
    }
}

/// Everything the lexer needs to know about a dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRules {
    /// Reserved keywords.
    pub keywords: KeywordTable,
    /// Identifier quote pairs (opening, closing).
    pub identifier_quotes: Vec<(char, char)>,
    /// Characters that open (and close) string literals.
    pub string_quotes: Vec<char>,
    /// Whether `\` escapes characters inside string literals.
    pub backslash_escapes: bool,
    /// Whether `#` starts a line comment.
    pub hash_comments: bool,
}

impl LexicalRules {
    /// Standard SQL lexing: `"` quoted identifiers, `'` strings, `--` and `/* */` comments.
    #[must_use]
    pub fn standard(keywords: KeywordTable) -> Self {
        Self {
            keywords,
            identifier_quotes: vec![('"', '"')],
            string_quotes: vec!['\''],
            backslash_escapes: false,
            hash_comments: false,
        }
    }

    /// Returns the closing quote if `c` opens a quoted identifier.
    #[must_use]
    pub fn identifier_quote(&self, c: char) -> Option<char> {
        self.identifier_quotes
            .iter()
            .find(|(open, _)| *open == c)
            .map(|(_, close)| *close)
    }

    /// Returns true if `c` opens a string literal.
    #[must_use]
    pub fn is_string_quote(&self, c: char) -> bool {
        self.string_quotes.contains(&c)
    }
}

impl Default for LexicalRules {
    fn default() -> Self {
        Self::standard(KeywordTable::default())
    }
}
