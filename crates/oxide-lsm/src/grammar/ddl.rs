//! CREATE TABLE and PRAGMA rules.

use super::expression::{data_type, expression, operand};
use super::select::object_name;
use super::{Grammar, Rule, RuleResult};
use crate::ast::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, CreateTableStatement, Expr, ExprKind,
    ForeignKeyRef, Ident, OrderDirection, PragmaStatement, ReferentialAction, TableConstraint,
    TableConstraintKind,
};
use crate::lexer::{Keyword, TokenKind};

enum TableElement {
    Column(ColumnDef),
    Constraint(TableConstraint),
}

/// Parses a CREATE TABLE statement.
pub fn create_table_statement(g: &mut Grammar) -> RuleResult<CreateTableStatement> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Create)?;
    let temporary = g.eat_keyword(Keyword::Temporary)? || g.eat_keyword(Keyword::Temp)?;
    g.expect_keyword(Keyword::Table)?;

    let if_not_exists = if g.rules().if_not_exists && g.eat_keyword(Keyword::If)? {
        g.expect_keyword(Keyword::Not)?;
        g.expect_keyword(Keyword::Exists)?;
        true
    } else {
        false
    };

    let name = object_name(g)?;
    let elements = g.parenthesized_list(table_element)?;

    let mut columns = Vec::new();
    let mut constraints = Vec::new();
    for element in elements {
        match element {
            TableElement::Column(column) => columns.push(column),
            TableElement::Constraint(constraint) => constraints.push(constraint),
        }
    }

    Ok(CreateTableStatement {
        temporary,
        if_not_exists,
        name,
        columns,
        constraints,
        span: g.span_from(start),
    })
}

fn table_element(g: &mut Grammar) -> RuleResult<TableElement> {
    g.choice(&[constraint_element, column_element])
}

fn constraint_element(g: &mut Grammar) -> RuleResult<TableElement> {
    table_constraint(g).map(TableElement::Constraint)
}

fn column_element(g: &mut Grammar) -> RuleResult<TableElement> {
    column_def(g).map(TableElement::Column)
}

fn column_def(g: &mut Grammar) -> RuleResult<ColumnDef> {
    let start = g.start()?;
    let name = g.expect_identifier()?;
    let data_type = g.optional(data_type)?;
    let rule = g.rules().column_constraint;
    let constraints = g.many(rule)?;
    Ok(ColumnDef {
        name,
        data_type,
        constraints,
        span: g.span_from(start),
    })
}

/// Parses one column constraint of the standard grammar.
pub fn column_constraint(g: &mut Grammar) -> RuleResult<ColumnConstraint> {
    named_column_constraint(g, column_constraint_kind)
}

/// Parses `[CONSTRAINT name]` followed by a constraint body parsed by `kind`.
///
/// Dialects with extra column constraints build their rule on this.
pub fn named_column_constraint(
    g: &mut Grammar,
    kind: Rule<ColumnConstraintKind>,
) -> RuleResult<ColumnConstraint> {
    let start = g.start()?;
    let name = if g.eat_keyword(Keyword::Constraint)? {
        Some(g.expect_identifier()?)
    } else {
        None
    };
    let kind = kind(g)?;
    Ok(ColumnConstraint {
        name,
        kind,
        span: g.span_from(start),
    })
}

/// Parses the body of a standard column constraint.
pub fn column_constraint_kind(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.choice(&[
        not_null,
        null,
        primary_key,
        unique,
        default_value,
        check,
        references,
    ])
}

fn not_null(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Not)?;
    g.expect_keyword(Keyword::Null)?;
    Ok(ColumnConstraintKind::NotNull)
}

fn null(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Null)?;
    Ok(ColumnConstraintKind::Null)
}

fn primary_key(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Primary)?;
    g.expect_keyword(Keyword::Key)?;
    let direction = if g.eat_keyword(Keyword::Asc)? {
        Some(OrderDirection::Asc)
    } else if g.eat_keyword(Keyword::Desc)? {
        Some(OrderDirection::Desc)
    } else {
        None
    };
    Ok(ColumnConstraintKind::PrimaryKey { direction })
}

fn unique(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Unique)?;
    Ok(ColumnConstraintKind::Unique)
}

fn default_value(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Default)?;
    // an operand, so `DEFAULT 0 NOT NULL` leaves NOT NULL to the next constraint
    Ok(ColumnConstraintKind::Default(operand(g)?))
}

fn check(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    g.expect_keyword(Keyword::Check)?;
    g.expect(&TokenKind::LeftParen)?;
    let expr = expression(g)?;
    g.expect(&TokenKind::RightParen)?;
    Ok(ColumnConstraintKind::Check(expr))
}

fn references(g: &mut Grammar) -> RuleResult<ColumnConstraintKind> {
    foreign_key_ref(g).map(ColumnConstraintKind::References)
}

/// Parses `REFERENCES table [(cols)] [ON DELETE action] [ON UPDATE action]`.
fn foreign_key_ref(g: &mut Grammar) -> RuleResult<ForeignKeyRef> {
    let start = g.start()?;
    g.expect_keyword(Keyword::References)?;
    let table = object_name(g)?;
    let columns = g
        .optional(|g| g.parenthesized_list(Grammar::expect_identifier))?
        .unwrap_or_default();

    let mut on_delete = None;
    let mut on_update = None;
    while g.eat_keyword(Keyword::On)? {
        if g.eat_keyword(Keyword::Delete)? {
            on_delete = Some(referential_action(g)?);
        } else if g.eat_keyword(Keyword::Update)? {
            on_update = Some(referential_action(g)?);
        } else {
            return Err(g.fail_any(&["DELETE", "UPDATE"]));
        }
    }

    Ok(ForeignKeyRef {
        table,
        columns,
        on_delete,
        on_update,
        span: g.span_from(start),
    })
}

fn referential_action(g: &mut Grammar) -> RuleResult<ReferentialAction> {
    let action = if g.eat_keyword(Keyword::Cascade)? {
        ReferentialAction::Cascade
    } else if g.eat_keyword(Keyword::Restrict)? {
        ReferentialAction::Restrict
    } else if g.eat_keyword(Keyword::Set)? {
        if g.eat_keyword(Keyword::Null)? {
            ReferentialAction::SetNull
        } else {
            g.expect_keyword(Keyword::Default)?;
            ReferentialAction::SetDefault
        }
    } else if g.eat_keyword(Keyword::No)? {
        g.expect_keyword(Keyword::Action)?;
        ReferentialAction::NoAction
    } else {
        return Err(g.fail_any(&["CASCADE", "RESTRICT", "SET", "NO"]));
    };
    Ok(action)
}

fn table_constraint(g: &mut Grammar) -> RuleResult<TableConstraint> {
    let start = g.start()?;
    let name = if g.eat_keyword(Keyword::Constraint)? {
        Some(g.expect_identifier()?)
    } else {
        None
    };

    let kind = if g.eat_keyword(Keyword::Primary)? {
        g.expect_keyword(Keyword::Key)?;
        TableConstraintKind::PrimaryKey(g.parenthesized_list(Grammar::expect_identifier)?)
    } else if g.eat_keyword(Keyword::Unique)? {
        TableConstraintKind::Unique(g.parenthesized_list(Grammar::expect_identifier)?)
    } else if g.eat_keyword(Keyword::Foreign)? {
        g.expect_keyword(Keyword::Key)?;
        let columns = g.parenthesized_list(Grammar::expect_identifier)?;
        let references = foreign_key_ref(g)?;
        TableConstraintKind::ForeignKey {
            columns,
            references,
        }
    } else if g.eat_keyword(Keyword::Check)? {
        g.expect(&TokenKind::LeftParen)?;
        let expr = expression(g)?;
        g.expect(&TokenKind::RightParen)?;
        TableConstraintKind::Check(expr)
    } else {
        return Err(g.fail_any(&["PRIMARY", "UNIQUE", "FOREIGN", "CHECK"]));
    };

    Ok(TableConstraint {
        name,
        kind,
        span: g.span_from(start),
    })
}

/// Parses `PRAGMA [schema.]name [= value | (value)]`.
pub fn pragma_statement(g: &mut Grammar) -> RuleResult<PragmaStatement> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Pragma)?;
    let name = object_name(g)?;

    let value = if g.eat(&TokenKind::Eq)? {
        Some(pragma_value(g)?)
    } else if g.eat(&TokenKind::LeftParen)? {
        let value = pragma_value(g)?;
        g.expect(&TokenKind::RightParen)?;
        Some(value)
    } else {
        None
    };

    Ok(PragmaStatement {
        name,
        value,
        span: g.span_from(start),
    })
}

/// A pragma value: an operand, or a bare keyword such as `ON` or `FULL`.
fn pragma_value(g: &mut Grammar) -> RuleResult<Expr> {
    g.choice(&[operand, keyword_value])
}

fn keyword_value(g: &mut Grammar) -> RuleResult<Expr> {
    if !matches!(g.peek()?.kind, TokenKind::Keyword(_)) {
        return Err(g.fail("pragma value"));
    }
    let token = g.bump()?;
    let name = Ident::new(token.text, false, token.span);
    Ok(Expr::new(ExprKind::Column { table: None, name }, token.span))
}
