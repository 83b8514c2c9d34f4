//! PostgreSQL.

use super::{Dialect, DialectBuilder};
use crate::ast::Limit;
use crate::grammar::{expression, Grammar, GrammarRules, RuleResult};
use crate::lexer::{Keyword, KeywordTable, LexicalRules};

/// PostgreSQL's fully reserved keywords, as far as the grammar knows them.
///
/// INSERT, UPDATE, DELETE and SET are unreserved in PostgreSQL and still
/// work in statement position.
const RESERVED: &[Keyword] = &[
    Keyword::All,
    Keyword::And,
    Keyword::As,
    Keyword::Asc,
    Keyword::Case,
    Keyword::Cast,
    Keyword::Check,
    Keyword::Constraint,
    Keyword::Create,
    Keyword::Cross,
    Keyword::Default,
    Keyword::Desc,
    Keyword::Distinct,
    Keyword::Else,
    Keyword::End,
    Keyword::Except,
    Keyword::False,
    Keyword::Foreign,
    Keyword::From,
    Keyword::Full,
    Keyword::Group,
    Keyword::Having,
    Keyword::Ilike,
    Keyword::In,
    Keyword::Inner,
    Keyword::Intersect,
    Keyword::Into,
    Keyword::Is,
    Keyword::Join,
    Keyword::Left,
    Keyword::Like,
    Keyword::Limit,
    Keyword::Natural,
    Keyword::Not,
    Keyword::Null,
    Keyword::Offset,
    Keyword::On,
    Keyword::Or,
    Keyword::Order,
    Keyword::Outer,
    Keyword::Primary,
    Keyword::References,
    Keyword::Returning,
    Keyword::Right,
    Keyword::Select,
    Keyword::Table,
    Keyword::Then,
    Keyword::True,
    Keyword::Union,
    Keyword::Unique,
    Keyword::Using,
    Keyword::When,
    Keyword::Where,
];

/// `LIMIT {count | ALL}` and `OFFSET skip [ROW | ROWS]`, in either order.
fn limit_clause(g: &mut Grammar) -> RuleResult<Limit> {
    let start = g.start()?;
    let mut limit_seen = false;
    let mut count = None;
    let mut offset = None;

    loop {
        if !limit_seen && g.eat_keyword(Keyword::Limit)? {
            limit_seen = true;
            if !g.eat_keyword(Keyword::All)? {
                count = Some(expression(g)?);
            }
        } else if offset.is_none() && g.eat_keyword(Keyword::Offset)? {
            offset = Some(expression(g)?);
            if !g.eat_keyword(Keyword::Row)? {
                g.eat_keyword(Keyword::Rows)?;
            }
        } else {
            break;
        }
    }

    if !limit_seen && offset.is_none() {
        return Err(g.fail_any(&["LIMIT", "OFFSET"]));
    }

    Ok(Limit {
        count,
        offset,
        span: g.span_from(start),
    })
}

pub(super) fn dialect() -> DialectBuilder {
    let grammar = GrammarRules {
        limit_clause: Some(limit_clause),
        postfix_cast: true,
        ilike: true,
        returning: true,
        if_not_exists: true,
        nulls_ordering: true,
        ..GrammarRules::base()
    };

    Dialect::builder("postgresql")
        .alias("postgres")
        .description("PostgreSQL")
        .lexical(LexicalRules::standard(KeywordTable::new(RESERVED)))
        .grammar(grammar)
        .standard_entries()
}
