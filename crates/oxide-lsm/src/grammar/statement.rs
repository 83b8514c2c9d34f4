//! Statement dispatch, scripts and the data manipulation statements.

use super::ddl::create_table_statement;
use super::expression::expression;
use super::select::{alias, object_name, returning_clause, select_statement, where_clause};
use super::{Grammar, RuleResult};
use crate::ast::{
    DeleteStatement, InsertSource, InsertStatement, Script, Statement, UpdateAssignment,
    UpdateStatement,
};
use crate::lexer::{Keyword, TokenKind};

/// Parses any statement of the standard grammar.
pub fn statement(g: &mut Grammar) -> RuleResult<Statement> {
    g.choice(&[select, insert, update, delete, create_table])
}

/// Parses one statement with the active dialect's statement rule.
pub fn dialect_statement(g: &mut Grammar) -> RuleResult<Statement> {
    let rule = g.rules().statement;
    rule(g)
}

fn select(g: &mut Grammar) -> RuleResult<Statement> {
    select_statement(g).map(Statement::Select)
}

fn insert(g: &mut Grammar) -> RuleResult<Statement> {
    insert_statement(g).map(Statement::Insert)
}

fn update(g: &mut Grammar) -> RuleResult<Statement> {
    update_statement(g).map(Statement::Update)
}

fn delete(g: &mut Grammar) -> RuleResult<Statement> {
    delete_statement(g).map(Statement::Delete)
}

fn create_table(g: &mut Grammar) -> RuleResult<Statement> {
    create_table_statement(g).map(Statement::CreateTable)
}

/// Parses `;`-separated statements using the dialect's statement rule.
///
/// Empty statements (stray semicolons) are skipped.
pub fn script(g: &mut Grammar) -> RuleResult<Script> {
    let start = g.start()?;
    let rule = g.rules().statement;
    let mut statements = Vec::new();

    loop {
        while g.eat(&TokenKind::Semicolon)? {}
        if g.check(&TokenKind::Eof)? {
            break;
        }
        statements.push(g.attempt(rule)?);
        if !g.check(&TokenKind::Eof)? {
            g.expect(&TokenKind::Semicolon)?;
        }
    }

    Ok(Script {
        statements,
        span: g.span_from(start),
    })
}

/// Parses an INSERT statement.
pub fn insert_statement(g: &mut Grammar) -> RuleResult<InsertStatement> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Insert)?;
    g.expect_keyword(Keyword::Into)?;

    let table = object_name(g)?;

    // Optional column list
    let columns = g
        .optional(|g| g.parenthesized_list(Grammar::expect_identifier))?
        .unwrap_or_default();

    let source = g.choice(&[values_source, default_values_source, query_source])?;
    let returning = returning_clause(g)?;

    Ok(InsertStatement {
        table,
        columns,
        source,
        returning,
        span: g.span_from(start),
    })
}

fn values_source(g: &mut Grammar) -> RuleResult<InsertSource> {
    g.expect_keyword(Keyword::Values)?;
    let rows = g.comma_separated(|g| g.parenthesized_list(expression))?;
    Ok(InsertSource::Values(rows))
}

fn default_values_source(g: &mut Grammar) -> RuleResult<InsertSource> {
    g.expect_keyword(Keyword::Default)?;
    g.expect_keyword(Keyword::Values)?;
    Ok(InsertSource::DefaultValues)
}

fn query_source(g: &mut Grammar) -> RuleResult<InsertSource> {
    let query = select_statement(g)?;
    Ok(InsertSource::Query(Box::new(query)))
}

/// Parses an UPDATE statement.
pub fn update_statement(g: &mut Grammar) -> RuleResult<UpdateStatement> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Update)?;

    let table = object_name(g)?;
    let alias = alias(g)?;

    g.expect_keyword(Keyword::Set)?;
    let assignments = g.comma_separated(assignment)?;

    let where_clause = where_clause(g)?;
    let returning = returning_clause(g)?;

    Ok(UpdateStatement {
        table,
        alias,
        assignments,
        where_clause,
        returning,
        span: g.span_from(start),
    })
}

fn assignment(g: &mut Grammar) -> RuleResult<UpdateAssignment> {
    let start = g.start()?;
    let column = g.expect_identifier()?;
    g.expect(&TokenKind::Eq)?;
    let value = expression(g)?;
    Ok(UpdateAssignment {
        column,
        value,
        span: g.span_from(start),
    })
}

/// Parses a DELETE statement.
pub fn delete_statement(g: &mut Grammar) -> RuleResult<DeleteStatement> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Delete)?;
    g.expect_keyword(Keyword::From)?;

    let table = object_name(g)?;
    let alias = alias(g)?;
    let where_clause = where_clause(g)?;
    let returning = returning_clause(g)?;

    Ok(DeleteStatement {
        table,
        alias,
        where_clause,
        returning,
        span: g.span_from(start),
    })
}
