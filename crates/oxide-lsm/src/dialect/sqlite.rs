//! SQLite.

use super::{Dialect, DialectBuilder, EntryPoint};
use crate::ast::{ColumnConstraint, ColumnConstraintKind, Statement};
use crate::grammar::{self, Grammar, GrammarRules, RuleResult};
use crate::lexer::{Keyword, KeywordTable, LexicalRules};

/// SQLite keywords that cannot be used as bare identifiers.
///
/// Type names and function names are not reserved.
const RESERVED: &[Keyword] = &[
    Keyword::Select,
    Keyword::From,
    Keyword::Where,
    Keyword::Order,
    Keyword::By,
    Keyword::Group,
    Keyword::Having,
    Keyword::Limit,
    Keyword::Offset,
    Keyword::Distinct,
    Keyword::All,
    Keyword::Join,
    Keyword::Inner,
    Keyword::Left,
    Keyword::Right,
    Keyword::Full,
    Keyword::Outer,
    Keyword::Cross,
    Keyword::Natural,
    Keyword::On,
    Keyword::Using,
    Keyword::Union,
    Keyword::Intersect,
    Keyword::Except,
    Keyword::Insert,
    Keyword::Into,
    Keyword::Values,
    Keyword::Update,
    Keyword::Set,
    Keyword::Delete,
    Keyword::Returning,
    Keyword::Create,
    Keyword::Drop,
    Keyword::Table,
    Keyword::Temporary,
    Keyword::Temp,
    Keyword::If,
    Keyword::Pragma,
    Keyword::Primary,
    Keyword::Key,
    Keyword::Foreign,
    Keyword::References,
    Keyword::Unique,
    Keyword::Check,
    Keyword::Default,
    Keyword::Constraint,
    Keyword::Autoincrement,
    Keyword::And,
    Keyword::Or,
    Keyword::Not,
    Keyword::In,
    Keyword::Between,
    Keyword::Like,
    Keyword::Is,
    Keyword::Null,
    Keyword::Exists,
    Keyword::As,
    Keyword::Case,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
    Keyword::Cast,
];

/// Standard statements plus PRAGMA.
fn statement(g: &mut Grammar) -> RuleResult<Statement> {
    g.choice(&[grammar::statement, pragma])
}

fn pragma(g: &mut Grammar) -> RuleResult<Statement> {
    grammar::pragma_statement(g).map(Statement::Pragma)
}

/// Standard column constraints plus AUTOINCREMENT.
fn column_constraint(g: &mut Grammar) -> RuleResult<ColumnConstraint> {
    grammar::named_column_constraint(g, column_constraint_kind)
}

fn column_constraint_kind(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.choice(&[grammar::column_constraint_kind, autoincrement])
}

fn autoincrement(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Autoincrement)?;
    Ok(ColumnConstraintKind::AutoIncrement)
}

pub(super) fn dialect() -> DialectBuilder {
    let lexical = LexicalRules {
        identifier_quotes: vec![('"', '"'), ('`', '`'), ('[', ']')],
        ..LexicalRules::standard(KeywordTable::new(RESERVED))
    };
    let grammar = GrammarRules {
        statement,
        column_constraint,
        returning: true,
        if_not_exists: true,
        nulls_ordering: true,
        ..GrammarRules::base().with_limit()
    };

    Dialect::builder("sqlite")
        .description("SQLite 3")
        .lexical(lexical)
        .grammar(grammar)
        .standard_entries()
        .entry(EntryPoint::Pragma(grammar::pragma_statement))
}
