//! The per-dialect grammar rule table.

use std::sync::Arc;

use super::{Rule, ddl, select, statement};
use crate::ast::{ColumnConstraint, Limit, Statement};
use crate::lexer::LexicalRules;

/// Overridable rules and feature switches of a dialect's grammar.
///
/// Vendor dialects start from [`GrammarRules::base`] and replace individual
/// entries.
#[derive(Debug, Clone, Copy)]
pub struct GrammarRules {
    /// Dispatches to the statement kinds the dialect understands.
    pub statement: Rule<Statement>,
    /// The LIMIT/OFFSET clause; `None` when the dialect has none.
    pub limit_clause: Option<Rule<Limit>>,
    /// A single column constraint in CREATE TABLE.
    pub column_constraint: Rule<ColumnConstraint>,
    /// `expr::type` casts.
    pub postfix_cast: bool,
    /// `ILIKE` as a case-insensitive LIKE.
    pub ilike: bool,
    /// `RETURNING` on INSERT, UPDATE and DELETE.
    pub returning: bool,
    /// `IF NOT EXISTS` on CREATE TABLE.
    pub if_not_exists: bool,
    /// `NULLS FIRST` / `NULLS LAST` in ORDER BY.
    pub nulls_ordering: bool,
}

impl GrammarRules {
    /// The standard grammar shared by every dialect.
    #[must_use]
    pub fn base() -> Self {
        Self {
            statement: statement::statement,
            limit_clause: None,
            column_constraint: ddl::column_constraint,
            postfix_cast: false,
            ilike: false,
            returning: false,
            if_not_exists: false,
            nulls_ordering: false,
        }
    }

    /// Base grammar plus `LIMIT n [OFFSET m | , m]`.
    #[must_use]
    pub fn with_limit(mut self) -> Self {
        self.limit_clause = Some(select::limit_clause);
        self
    }
}

impl Default for GrammarRules {
    fn default() -> Self {
        Self::base()
    }
}

/// Everything a grammar needs from a dialect, shared by its analyses.
#[derive(Debug)]
pub struct Syntax {
    pub lexical: Arc<LexicalRules>,
    pub grammar: GrammarRules,
}

impl Syntax {
    #[must_use]
    pub fn new(lexical: LexicalRules, grammar: GrammarRules) -> Self {
        Self {
            lexical: Arc::new(lexical),
            grammar,
        }
    }
}
