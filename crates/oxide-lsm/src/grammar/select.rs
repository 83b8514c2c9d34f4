//! SELECT statement rules, shared clause rules and the standard LIMIT clause.

use super::expression::expression;
use super::{Grammar, GrammarRules, RuleResult};
use crate::ast::{
    Expr, Ident, JoinClause, JoinType, Limit, NullOrdering, ObjectName, OrderBy, OrderDirection,
    SelectColumn, SelectStatement, TableRef,
};
use crate::lexer::{Keyword, Span, TokenKind};

/// Words that end an expression list or table reference, so a bare word
/// spelled like one of them is never taken as an alias.
///
/// LIMIT, OFFSET and RETURNING only count where the dialect has those clauses.
const CLAUSE_WORDS: &[Keyword] = &[
    Keyword::From,
    Keyword::Where,
    Keyword::Group,
    Keyword::Having,
    Keyword::Order,
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
    Keyword::Set,
];

/// Parses a SELECT statement.
pub fn select_statement(g: &mut Grammar) -> RuleResult<SelectStatement> {
    g.nested(select_body)
}

fn select_body(g: &mut Grammar) -> RuleResult<SelectStatement> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Select)?;

    // DISTINCT or ALL
    let distinct = if g.eat_keyword(Keyword::Distinct)? {
        true
    } else {
        g.eat_keyword(Keyword::All)?;
        false
    };

    // SELECT columns
    let columns = g.comma_separated(select_column)?;

    // FROM clause (optional for expressions like SELECT 1+1)
    let from = if g.eat_keyword(Keyword::From)? {
        g.comma_separated(table_ref)?
    } else {
        vec![]
    };

    let where_clause = where_clause(g)?;

    // GROUP BY clause
    let group_by = if g.eat_keyword(Keyword::Group)? {
        g.expect_keyword(Keyword::By)?;
        g.comma_separated(expression)?
    } else {
        vec![]
    };

    // HAVING clause
    let having = if g.eat_keyword(Keyword::Having)? {
        Some(expression(g)?)
    } else {
        None
    };

    let order_by = order_by_clause(g)?;

    // LIMIT clause, in whatever form the dialect writes it
    let limit = match g.rules().limit_clause {
        Some(rule) => g.optional(rule)?,
        None => None,
    };

    Ok(SelectStatement {
        distinct,
        columns,
        from,
        where_clause,
        group_by,
        having,
        order_by,
        limit,
        span: g.span_from(start),
    })
}

/// Parses one item of a select list.
pub fn select_column(g: &mut Grammar) -> RuleResult<SelectColumn> {
    let start = g.start()?;
    let expr = expression(g)?;
    let alias = alias(g)?;
    Ok(SelectColumn {
        expr,
        alias,
        span: g.span_from(start),
    })
}

/// Parses an optional alias: `AS name`, or a bare name that is not a clause word.
pub fn alias(g: &mut Grammar) -> RuleResult<Option<Ident>> {
    if g.eat_keyword(Keyword::As)? {
        return Ok(Some(g.expect_identifier()?));
    }
    let token = g.peek()?;
    let TokenKind::Identifier(name) = &token.kind else {
        return Ok(None);
    };
    // Quoted names are never clause words.
    let spelled_as = if token.text == *name {
        Keyword::from_str(name)
    } else {
        None
    };
    if spelled_as.is_some_and(|kw| is_clause_word(g.rules(), kw)) {
        return Ok(None);
    }
    Ok(Some(g.expect_identifier()?))
}

fn is_clause_word(rules: &GrammarRules, keyword: Keyword) -> bool {
    match keyword {
        Keyword::Limit | Keyword::Offset => rules.limit_clause.is_some(),
        Keyword::Returning => rules.returning,
        _ => CLAUSE_WORDS.contains(&keyword),
    }
}

/// Parses a possibly schema-qualified name.
pub fn object_name(g: &mut Grammar) -> RuleResult<ObjectName> {
    let start = g.start()?;
    let first = g.expect_identifier()?;
    let (schema, name) = if g.eat(&TokenKind::Dot)? {
        (Some(first), g.expect_identifier()?)
    } else {
        (None, first)
    };
    Ok(ObjectName {
        schema,
        name,
        span: g.span_from(start),
    })
}

/// Parses an optional WHERE clause.
pub fn where_clause(g: &mut Grammar) -> RuleResult<Option<Expr>> {
    if g.eat_keyword(Keyword::Where)? {
        Ok(Some(expression(g)?))
    } else {
        Ok(None)
    }
}

/// Parses an optional RETURNING list where the dialect supports one.
pub fn returning_clause(g: &mut Grammar) -> RuleResult<Vec<SelectColumn>> {
    if g.rules().returning && g.eat_keyword(Keyword::Returning)? {
        g.comma_separated(select_column)
    } else {
        Ok(vec![])
    }
}

/// Parses a FROM item with any joins that follow it.
pub fn table_ref(g: &mut Grammar) -> RuleResult<TableRef> {
    let start = g.start()?;
    let mut table = table_factor(g)?;

    for join in g.many(join_clause)? {
        let span = Span::new(start, join.span.end);
        table = TableRef::Join {
            left: Box::new(table),
            join: Box::new(join),
            span,
        };
    }

    Ok(table)
}

/// Parses a single table reference without joins.
fn table_factor(g: &mut Grammar) -> RuleResult<TableRef> {
    g.choice(&[named_table, derived_table, nested_join])
}

fn named_table(g: &mut Grammar) -> RuleResult<TableRef> {
    let start = g.start()?;
    let name = object_name(g)?;
    let alias = alias(g)?;
    Ok(TableRef::Table {
        name,
        alias,
        span: g.span_from(start),
    })
}

fn derived_table(g: &mut Grammar) -> RuleResult<TableRef> {
    let start = g.start()?;
    g.expect(&TokenKind::LeftParen)?;
    let query = select_statement(g)?;
    g.expect(&TokenKind::RightParen)?;
    let alias = alias(g)?;
    Ok(TableRef::Subquery {
        query: Box::new(query),
        alias,
        span: g.span_from(start),
    })
}

fn nested_join(g: &mut Grammar) -> RuleResult<TableRef> {
    g.nested(|g| {
        g.expect(&TokenKind::LeftParen)?;
        let inner = table_ref(g)?;
        g.expect(&TokenKind::RightParen)?;
        Ok(inner)
    })
}

fn join_clause(g: &mut Grammar) -> RuleResult<JoinClause> {
    let start = g.start()?;
    let natural = g.eat_keyword(Keyword::Natural)?;
    let join_type = join_type(g)?;
    let table = table_factor(g)?;

    let (on, using) = if natural || join_type == JoinType::Cross {
        (None, vec![])
    } else if g.eat_keyword(Keyword::On)? {
        (Some(expression(g)?), vec![])
    } else if g.eat_keyword(Keyword::Using)? {
        (None, g.parenthesized_list(Grammar::expect_identifier)?)
    } else {
        return Err(g.fail_any(&["ON", "USING"]));
    };

    Ok(JoinClause {
        join_type,
        natural,
        table,
        on,
        using,
        span: g.span_from(start),
    })
}

/// Parses a join type up to and including JOIN.
fn join_type(g: &mut Grammar) -> RuleResult<JoinType> {
    let join_type = if g.eat_keyword(Keyword::Inner)? {
        JoinType::Inner
    } else if g.eat_keyword(Keyword::Left)? {
        g.eat_keyword(Keyword::Outer)?;
        JoinType::Left
    } else if g.eat_keyword(Keyword::Right)? {
        g.eat_keyword(Keyword::Outer)?;
        JoinType::Right
    } else if g.eat_keyword(Keyword::Full)? {
        g.eat_keyword(Keyword::Outer)?;
        JoinType::Full
    } else if g.eat_keyword(Keyword::Cross)? {
        JoinType::Cross
    } else if g.check_keyword(Keyword::Join)? {
        JoinType::Inner
    } else {
        return Err(g.fail_any(&["JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS"]));
    };
    g.expect_keyword(Keyword::Join)?;
    Ok(join_type)
}

/// Parses an optional ORDER BY list.
fn order_by_clause(g: &mut Grammar) -> RuleResult<Vec<OrderBy>> {
    if !g.eat_keyword(Keyword::Order)? {
        return Ok(vec![]);
    }
    g.expect_keyword(Keyword::By)?;
    g.comma_separated(order_by_item)
}

fn order_by_item(g: &mut Grammar) -> RuleResult<OrderBy> {
    let start = g.start()?;
    let expr = expression(g)?;

    let direction = if g.eat_keyword(Keyword::Desc)? {
        OrderDirection::Desc
    } else {
        g.eat_keyword(Keyword::Asc)?;
        OrderDirection::Asc
    };

    let nulls = if g.rules().nulls_ordering && g.eat_keyword(Keyword::Nulls)? {
        if g.eat_keyword(Keyword::First)? {
            Some(NullOrdering::First)
        } else if g.eat_keyword(Keyword::Last)? {
            Some(NullOrdering::Last)
        } else {
            return Err(g.fail_any(&["FIRST", "LAST"]));
        }
    } else {
        None
    };

    Ok(OrderBy {
        expr,
        direction,
        nulls,
        span: g.span_from(start),
    })
}

/// `LIMIT count [OFFSET skip]` or `LIMIT skip, count`.
pub fn limit_clause(g: &mut Grammar) -> RuleResult<Limit> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Limit)?;
    let first = expression(g)?;

    let (count, offset) = if g.eat_keyword(Keyword::Offset)? {
        (first, Some(expression(g)?))
    } else if g.eat(&TokenKind::Comma)? {
        let count = expression(g)?;
        (count, Some(first))
    } else {
        (first, None)
    };

    Ok(Limit {
        count: Some(count),
        offset,
        span: g.span_from(start),
    })
}
