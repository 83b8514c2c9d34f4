//! Expression rules: a Pratt parser over the backtracking engine.

use super::pratt::{
    infix_binding_power, token_to_binary_op, token_to_unary_op, Infix, NOT_BINDING_POWER,
    UNARY_BINDING_POWER,
};
use super::select::select_statement;
use super::{Grammar, Rule, RuleResult};
use crate::ast::{
    DataType, Expr, ExprKind, FunctionCall, Ident, InList, Literal, TypeArgs, UnaryOp, WhenClause,
};
use crate::lexer::{Keyword, Position, TokenKind};

/// Parses a full expression.
pub fn expression(g: &mut Grammar) -> RuleResult<Expr> {
    expression_bp(g, 0)
}

/// Parses an operand: a primary expression with unary operators and casts,
/// but no binary operators.
pub fn operand(g: &mut Grammar) -> RuleResult<Expr> {
    expression_bp(g, UNARY_BINDING_POWER)
}

/// Parses an expression using Pratt parsing.
fn expression_bp(g: &mut Grammar, min_bp: u8) -> RuleResult<Expr> {
    g.nested(|g| {
        let start = g.start()?;
        let mut lhs = prefix(g)?;

        while let Some(op) = peek_infix(g)? {
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            lhs = infix(g, op, lhs, start, r_bp)?;
        }

        Ok(lhs)
    })
}

/// Identifies the operator at the cursor without consuming anything.
fn peek_infix(g: &mut Grammar) -> RuleResult<Option<Infix>> {
    let kind = g.peek()?.kind.clone();
    if let Some(op) = token_to_binary_op(&kind) {
        return Ok(Some(Infix::Binary(op)));
    }
    if matches!(kind, TokenKind::DoubleColon) {
        return Ok(g.rules().postfix_cast.then_some(Infix::Cast));
    }
    if g.check_keyword(Keyword::Not)? {
        // NOT only continues an expression as NOT IN / NOT BETWEEN / NOT LIKE
        return g.lookahead(|g| {
            g.bump()?;
            predicate(g, true)
        });
    }
    predicate(g, false)
}

fn predicate(g: &mut Grammar, negated: bool) -> RuleResult<Option<Infix>> {
    let op = if !negated && g.check_keyword(Keyword::Is)? {
        Some(Infix::Is)
    } else if g.check_keyword(Keyword::In)? {
        Some(Infix::In { negated })
    } else if g.check_keyword(Keyword::Between)? {
        Some(Infix::Between { negated })
    } else if g.check_keyword(Keyword::Like)? {
        Some(Infix::Like {
            negated,
            case_insensitive: false,
        })
    } else if g.rules().ilike && g.check_keyword(Keyword::Ilike)? {
        Some(Infix::Like {
            negated,
            case_insensitive: true,
        })
    } else {
        None
    };
    Ok(op)
}

/// Parses the operator `op` and its right-hand side.
fn infix(g: &mut Grammar, op: Infix, lhs: Expr, start: Position, r_bp: u8) -> RuleResult<Expr> {
    let expr = Box::new(lhs);
    let kind = match op {
        Infix::Binary(op) => {
            g.bump()?;
            let right = expression_bp(g, r_bp)?;
            ExprKind::Binary {
                left: expr,
                op,
                right: Box::new(right),
            }
        }
        Infix::Is => {
            g.expect_keyword(Keyword::Is)?;
            let negated = g.eat_keyword(Keyword::Not)?;
            g.expect_keyword(Keyword::Null)?;
            ExprKind::IsNull { expr, negated }
        }
        Infix::In { negated } => {
            if negated {
                g.expect_keyword(Keyword::Not)?;
            }
            g.expect_keyword(Keyword::In)?;
            g.expect(&TokenKind::LeftParen)?;
            let list = if g.check_keyword(Keyword::Select)? {
                InList::Subquery(Box::new(select_statement(g)?))
            } else {
                InList::Values(g.comma_separated(expression)?)
            };
            g.expect(&TokenKind::RightParen)?;
            ExprKind::In {
                expr,
                list,
                negated,
            }
        }
        Infix::Between { negated } => {
            if negated {
                g.expect_keyword(Keyword::Not)?;
            }
            g.expect_keyword(Keyword::Between)?;
            let low = expression_bp(g, r_bp)?;
            g.expect_keyword(Keyword::And)?;
            let high = expression_bp(g, r_bp)?;
            ExprKind::Between {
                expr,
                low: Box::new(low),
                high: Box::new(high),
                negated,
            }
        }
        Infix::Like {
            negated,
            case_insensitive,
        } => {
            if negated {
                g.expect_keyword(Keyword::Not)?;
            }
            g.expect_keyword(if case_insensitive {
                Keyword::Ilike
            } else {
                Keyword::Like
            })?;
            let pattern = expression_bp(g, r_bp)?;
            ExprKind::Like {
                expr,
                pattern: Box::new(pattern),
                case_insensitive,
                negated,
            }
        }
        Infix::Cast => {
            g.expect(&TokenKind::DoubleColon)?;
            let data_type = data_type(g)?;
            ExprKind::Cast { expr, data_type }
        }
    };
    Ok(Expr::new(kind, g.span_from(start)))
}

/// Parses a prefix expression.
fn prefix(g: &mut Grammar) -> RuleResult<Expr> {
    let start = g.start()?;
    let kind = g.peek()?.kind.clone();

    if let Some(op) = token_to_unary_op(&kind) {
        g.bump()?;
        let operand = expression_bp(g, UNARY_BINDING_POWER)?;
        return Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            g.span_from(start),
        ));
    }

    if g.eat_keyword(Keyword::Not)? {
        let operand = expression_bp(g, NOT_BINDING_POWER)?;
        let span = g.span_from(start);
        let kind = match operand.kind {
            ExprKind::Exists { query, negated } => ExprKind::Exists {
                query,
                negated: !negated,
            },
            kind => ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(Expr::new(kind, operand.span)),
            },
        };
        return Ok(Expr::new(kind, span));
    }

    primary(g)
}

/// Parses a primary expression.
fn primary(g: &mut Grammar) -> RuleResult<Expr> {
    let start = g.start()?;
    let token = g.peek()?.clone();

    let kind = match token.kind {
        // Literals
        TokenKind::Integer(n) => {
            g.bump()?;
            ExprKind::Literal(Literal::Integer(n))
        }
        TokenKind::Float(f) => {
            g.bump()?;
            ExprKind::Literal(Literal::Float(f))
        }
        TokenKind::String(s) => {
            g.bump()?;
            ExprKind::Literal(Literal::String(s))
        }
        TokenKind::Blob(b) => {
            g.bump()?;
            ExprKind::Literal(Literal::Blob(b))
        }

        // Parameter placeholders
        TokenKind::Question => {
            g.bump()?;
            let position = g.next_param();
            ExprKind::Parameter {
                name: None,
                position,
            }
        }
        TokenKind::Colon => {
            g.bump()?;
            let name = g.expect_identifier()?;
            ExprKind::Parameter {
                name: Some(name.value),
                position: 0,
            }
        }

        // Wildcard
        TokenKind::Star => {
            g.bump()?;
            ExprKind::Wildcard { table: None }
        }

        // Parenthesized expression or subquery
        TokenKind::LeftParen => {
            g.bump()?;
            let kind = if g.check_keyword(Keyword::Select)? {
                ExprKind::Subquery(Box::new(select_statement(g)?))
            } else {
                ExprKind::Paren(Box::new(expression(g)?))
            };
            g.expect(&TokenKind::RightParen)?;
            kind
        }

        TokenKind::Keyword(_) | TokenKind::Identifier(_) => return word(g, start),

        _ => return Err(g.fail("expression")),
    };

    Ok(Expr::new(kind, g.span_from(start)))
}

/// Keyword-led expression forms.
const KEYWORD_FORMS: &[(Keyword, Rule<Expr>)] = &[
    (Keyword::Case, case_expression),
    (Keyword::Cast, cast_expression),
    (Keyword::Exists, exists_expression),
];

/// Parses an expression that starts with a word: keyword-led forms, function
/// calls and (qualified) column references.
fn word(g: &mut Grammar, start: Position) -> RuleResult<Expr> {
    let reserved = matches!(g.peek()?.kind, TokenKind::Keyword(_));
    for &(keyword, form) in KEYWORD_FORMS {
        if g.check_keyword(keyword)? {
            // An unreserved spelling may just as well name a column.
            return if reserved {
                form(g)
            } else {
                g.choice(&[form, name_expression])
            };
        }
    }

    let literal = if g.eat_keyword(Keyword::Null)? {
        Some(Literal::Null)
    } else if g.eat_keyword(Keyword::True)? {
        Some(Literal::Boolean(true))
    } else if g.eat_keyword(Keyword::False)? {
        Some(Literal::Boolean(false))
    } else {
        None
    };
    if let Some(literal) = literal {
        return Ok(Expr::new(ExprKind::Literal(literal), g.span_from(start)));
    }

    let token = g.peek()?.clone();
    if let TokenKind::Keyword(keyword) = token.kind {
        // Aggregates and a few other functions are reserved words in some dialects
        if !matches!(
            keyword,
            Keyword::Count
                | Keyword::Sum
                | Keyword::Avg
                | Keyword::Min
                | Keyword::Max
                | Keyword::Left
                | Keyword::Right
        ) {
            return Err(g.fail("expression"));
        }
        g.bump()?;
        let name = Ident::new(token.text, false, token.span);
        return function_call(g, name, start);
    }

    name_expression(g)
}

/// Parses a function call or a (qualified) column reference.
fn name_expression(g: &mut Grammar) -> RuleResult<Expr> {
    let start = g.start()?;
    let name = g.expect_identifier()?;

    // Check for function call
    if g.check(&TokenKind::LeftParen)? {
        return function_call(g, name, start);
    }

    // Check for qualified name (table.column or table.*)
    let kind = if g.eat(&TokenKind::Dot)? {
        if g.eat(&TokenKind::Star)? {
            ExprKind::Wildcard { table: Some(name) }
        } else {
            let column = g.expect_identifier()?;
            ExprKind::Column {
                table: Some(name),
                name: column,
            }
        }
    } else {
        ExprKind::Column { table: None, name }
    };
    Ok(Expr::new(kind, g.span_from(start)))
}

/// Parses the argument list of a function call.
fn function_call(g: &mut Grammar, name: Ident, start: Position) -> RuleResult<Expr> {
    g.expect(&TokenKind::LeftParen)?;

    let distinct = g.eat_keyword(Keyword::Distinct)?;

    let args = if g.check(&TokenKind::RightParen)? {
        vec![]
    } else if g.check(&TokenKind::Star)? {
        let star = g.start()?;
        g.bump()?;
        vec![Expr::new(ExprKind::Wildcard { table: None }, g.span_from(star))]
    } else {
        g.comma_separated(expression)?
    };

    g.expect(&TokenKind::RightParen)?;

    Ok(Expr::new(
        ExprKind::Function(FunctionCall {
            name,
            args,
            distinct,
        }),
        g.span_from(start),
    ))
}

/// Parses a CAST expression.
fn cast_expression(g: &mut Grammar) -> RuleResult<Expr> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Cast)?;
    g.expect(&TokenKind::LeftParen)?;
    let expr = expression(g)?;
    g.expect_keyword(Keyword::As)?;
    let data_type = data_type(g)?;
    g.expect(&TokenKind::RightParen)?;

    Ok(Expr::new(
        ExprKind::Cast {
            expr: Box::new(expr),
            data_type,
        },
        g.span_from(start),
    ))
}

/// Parses `EXISTS (SELECT ...)`.
fn exists_expression(g: &mut Grammar) -> RuleResult<Expr> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Exists)?;
    g.expect(&TokenKind::LeftParen)?;
    let query = select_statement(g)?;
    g.expect(&TokenKind::RightParen)?;
    Ok(Expr::new(
        ExprKind::Exists {
            query: Box::new(query),
            negated: false,
        },
        g.span_from(start),
    ))
}

fn when_clause(g: &mut Grammar) -> RuleResult<WhenClause> {
    let start = g.start()?;
    g.expect_keyword(Keyword::When)?;
    let condition = expression(g)?;
    g.expect_keyword(Keyword::Then)?;
    let result = expression(g)?;
    Ok(WhenClause {
        condition,
        result,
        span: g.span_from(start),
    })
}

/// Parses a CASE expression.
fn case_expression(g: &mut Grammar) -> RuleResult<Expr> {
    let start = g.start()?;
    g.expect_keyword(Keyword::Case)?;

    // Check for simple CASE (CASE expr WHEN ...)
    let operand = if g.check_keyword(Keyword::When)? {
        None
    } else {
        Some(Box::new(expression(g)?))
    };

    let when_clauses = g.many(when_clause)?;
    if when_clauses.is_empty() {
        return Err(g.fail(Keyword::When.as_str()));
    }

    let else_clause = if g.eat_keyword(Keyword::Else)? {
        Some(Box::new(expression(g)?))
    } else {
        None
    };

    g.expect_keyword(Keyword::End)?;

    Ok(Expr::new(
        ExprKind::Case {
            operand,
            when_clauses,
            else_clause,
        },
        g.span_from(start),
    ))
}

const TYPE_KEYWORDS: &[Keyword] = &[
    Keyword::Int,
    Keyword::Integer,
    Keyword::Smallint,
    Keyword::Bigint,
    Keyword::Real,
    Keyword::Double,
    Keyword::Float,
    Keyword::Decimal,
    Keyword::Numeric,
    Keyword::Char,
    Keyword::Character,
    Keyword::Varchar,
    Keyword::Text,
    Keyword::Blob,
    Keyword::Boolean,
    Keyword::Date,
    Keyword::Time,
    Keyword::Timestamp,
    Keyword::Datetime,
];

/// Returns true if an unreserved `word` can be part of a type name.
fn continues_type(word: &str) -> bool {
    match Keyword::from_str(word) {
        Some(keyword) => TYPE_KEYWORDS.contains(&keyword),
        None => true,
    }
}

/// Consumes an unquoted identifier spelled `word` (case-insensitive).
fn eat_word(g: &mut Grammar, word: &str) -> RuleResult<bool> {
    let token = g.peek()?;
    let matches =
        matches!(token.kind, TokenKind::Identifier(_)) && token.text.eq_ignore_ascii_case(word);
    if matches {
        g.bump()?;
    }
    Ok(matches)
}

/// Returns the type name at the cursor, if the next token can be one.
fn type_name(g: &mut Grammar, continuation: bool) -> RuleResult<Option<String>> {
    let token = g.peek()?;
    let name = match &token.kind {
        // unreserved words must not read as keywords (e.g. AUTO_INCREMENT), and
        // only the first word may be quoted
        TokenKind::Identifier(name) => {
            let quoted = token.text != *name;
            let accepted = if quoted { !continuation } else { continues_type(name) };
            accepted.then(|| name.clone())
        }
        TokenKind::Keyword(kw) if TYPE_KEYWORDS.contains(kw) => Some(token.text.clone()),
        _ => None,
    };
    Ok(name)
}

/// Parses a data type.
pub fn data_type(g: &mut Grammar) -> RuleResult<DataType> {
    let Some(mut name) = type_name(g, false)? else {
        return Err(g.fail("data type"));
    };
    g.bump()?;

    if name.eq_ignore_ascii_case("DOUBLE") {
        g.eat_keyword(Keyword::Precision)?;
    } else if name.eq_ignore_ascii_case("CHARACTER") && eat_word(g, "VARYING")? {
        name = String::from("VARCHAR");
    }

    let data_type = match DataType::args_for(&name) {
        TypeArgs::None => DataType::from_parts(&name, None, None, None),
        TypeArgs::Length => {
            let length = optional_length(g)?;
            DataType::from_parts(&name, length, None, None)
        }
        TypeArgs::PrecisionScale => {
            let (precision, scale) = optional_precision_scale(g)?;
            DataType::from_parts(&name, None, precision, scale)
        }
        TypeArgs::Verbatim => custom_type(g, name)?,
    };
    Ok(data_type)
}

/// Parses the rest of a vendor type name such as `UNSIGNED BIG INT` or
/// `NVARCHAR(20)`, keeping it as written.
fn custom_type(g: &mut Grammar, mut name: String) -> RuleResult<DataType> {
    while let Some(word) = type_name(g, true)? {
        g.bump()?;
        name.push(' ');
        name.push_str(&word);
    }

    if g.check(&TokenKind::LeftParen)? {
        let open = g.start()?;
        let mut depth = 0usize;
        loop {
            let token = g.peek()?.clone();
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Eof => return Err(g.fail("')'")),
                _ => {}
            }
            g.bump()?;
            if depth == 0 {
                break;
            }
        }
        let span = g.span_from(open);
        name.push_str(g.slice(span.start, span.end));
    }

    Ok(DataType::Custom(name))
}

/// Parses an integer argument of a type.
fn integer_arg<T: TryFrom<i64>>(g: &mut Grammar, what: &str) -> RuleResult<T> {
    let token = g.peek()?;
    if let TokenKind::Integer(n) = token.kind {
        if let Ok(value) = T::try_from(n) {
            g.bump()?;
            return Ok(value);
        }
    }
    Err(g.fail(what))
}

/// Parses optional length (for CHAR/VARCHAR).
fn optional_length(g: &mut Grammar) -> RuleResult<Option<u32>> {
    if !g.eat(&TokenKind::LeftParen)? {
        return Ok(None);
    }
    let length = integer_arg(g, "length")?;
    g.expect(&TokenKind::RightParen)?;
    Ok(Some(length))
}

/// Parses optional precision and scale (for DECIMAL/NUMERIC).
fn optional_precision_scale(g: &mut Grammar) -> RuleResult<(Option<u16>, Option<u16>)> {
    if !g.eat(&TokenKind::LeftParen)? {
        return Ok((None, None));
    }
    let precision = integer_arg(g, "precision")?;
    let scale = if g.eat(&TokenKind::Comma)? {
        Some(integer_arg(g, "scale")?)
    } else {
        None
    };
    g.expect(&TokenKind::RightParen)?;
    Ok((Some(precision), scale))
}
