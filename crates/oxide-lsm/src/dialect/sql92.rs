//! ANSI SQL-92.

use super::{Dialect, DialectBuilder};
use crate::lexer::{Keyword, KeywordTable, LexicalRules};

/// The SQL-92 reserved words the grammar knows about.
///
/// `LIMIT`, `OFFSET` and the vendor type names are not among them, so they
/// remain ordinary identifiers.
const RESERVED: &[Keyword] = &[
    Keyword::Select,
    Keyword::From,
    Keyword::Where,
    Keyword::Order,
    Keyword::By,
    Keyword::Group,
    Keyword::Having,
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
    Keyword::Create,
    Keyword::Drop,
    Keyword::Table,
    Keyword::Temporary,
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
    Keyword::No,
    Keyword::Action,
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
    Keyword::Count,
    Keyword::Sum,
    Keyword::Avg,
    Keyword::Min,
    Keyword::Max,
    Keyword::Int,
    Keyword::Integer,
    Keyword::Smallint,
    Keyword::Real,
    Keyword::Double,
    Keyword::Precision,
    Keyword::Float,
    Keyword::Decimal,
    Keyword::Numeric,
    Keyword::Char,
    Keyword::Character,
    Keyword::Varchar,
    Keyword::Date,
    Keyword::Time,
    Keyword::Timestamp,
    Keyword::As,
    Keyword::Case,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
    Keyword::Cast,
];

pub(super) fn dialect() -> DialectBuilder {
    Dialect::builder("sql92")
        .alias("ansi")
        .description("ANSI SQL-92")
        .lexical(LexicalRules::standard(KeywordTable::new(RESERVED)))
        .standard_entries()
}
