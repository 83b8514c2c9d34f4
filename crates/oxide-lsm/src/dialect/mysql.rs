//! MySQL.

use super::{Dialect, DialectBuilder};
use crate::ast::{ColumnConstraint, ColumnConstraintKind};
use crate::grammar::{self, Grammar, GrammarRules, RuleResult};
use crate::lexer::{Keyword, KeywordTable, LexicalRules};

const RESERVED: &[Keyword] = &[
    Keyword::Select,
    Keyword::From,
    Keyword::Where,
    Keyword::Order,
    Keyword::By,
    Keyword::Group,
    Keyword::Having,
    Keyword::Limit,
    Keyword::Distinct,
    Keyword::All,
    Keyword::Join,
    Keyword::Inner,
    Keyword::Left,
    Keyword::Right,
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
    Keyword::Create,
    Keyword::Drop,
    Keyword::Table,
    Keyword::If,
    Keyword::Primary,
    Keyword::Key,
    Keyword::Foreign,
    Keyword::References,
    Keyword::Unique,
    Keyword::Check,
    Keyword::Default,
    Keyword::Constraint,
    Keyword::Cascade,
    Keyword::Restrict,
    Keyword::And,
    Keyword::Or,
    Keyword::Not,
    Keyword::In,
    Keyword::Between,
    Keyword::Like,
    Keyword::Is,
    Keyword::Null,
    Keyword::True,
    Keyword::False,
    Keyword::Exists,
    Keyword::Asc,
    Keyword::Desc,
    Keyword::Int,
    Keyword::Integer,
    Keyword::Smallint,
    Keyword::Bigint,
    Keyword::Real,
    Keyword::Double,
    Keyword::Precision,
    Keyword::Float,
    Keyword::Decimal,
    Keyword::Numeric,
    Keyword::Char,
    Keyword::Character,
    Keyword::Varchar,
    Keyword::Blob,
    Keyword::As,
    Keyword::Case,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
    Keyword::Cast,
];

/// Standard column constraints plus AUTO_INCREMENT.
fn column_constraint(g: &mut Grammar) -> RuleResult<ColumnConstraint> {
    grammar::named_column_constraint(g, column_constraint_kind)
}

fn column_constraint_kind(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.choice(&[grammar::column_constraint_kind, auto_increment])
}

fn auto_increment(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::AutoIncrement)?;
    Ok(ColumnConstraintKind::AutoIncrement)
}

pub(super) fn dialect() -> DialectBuilder {
    let lexical = LexicalRules {
        keywords: KeywordTable::new(RESERVED),
        identifier_quotes: vec![('`', '`')],
        string_quotes: vec!['\'', '"'],
        backslash_escapes: true,
        hash_comments: true,
    };
    let grammar = GrammarRules {
        column_constraint,
        if_not_exists: true,
        ..GrammarRules::base().with_limit()
    };

    Dialect::builder("mysql")
        .description("MySQL 8")
        .lexical(lexical)
        .grammar(grammar)
        .standard_entries()
}
