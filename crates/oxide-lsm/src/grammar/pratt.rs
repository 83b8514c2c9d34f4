//! Operator precedence for the Pratt expression parser.

use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// An operator that can follow a complete operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infix {
    Binary(BinaryOp),
    /// `IS [NOT] NULL`
    Is,
    /// `[NOT] IN (...)`
    In { negated: bool },
    /// `[NOT] BETWEEN a AND b`
    Between { negated: bool },
    /// `[NOT] LIKE` / `[NOT] ILIKE`
    Like { negated: bool, case_insensitive: bool },
    /// `expr::type`
    Cast,
}

/// Binding power of unary minus and bitwise NOT.
pub const UNARY_BINDING_POWER: u8 = 17;

/// Binding power of prefix NOT: looser than comparisons, tighter than AND.
pub const NOT_BINDING_POWER: u8 = 5;

/// Returns the infix binding power for an operator.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
#[must_use]
pub const fn infix_binding_power(op: Infix) -> (u8, u8) {
    match op {
        // Logical OR (lowest precedence)
        Infix::Binary(BinaryOp::Or) => (1, 2),

        // Logical AND
        Infix::Binary(BinaryOp::And) => (3, 4),

        // Comparison operators, IS, IN, BETWEEN, LIKE
        Infix::Binary(
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq,
        )
        | Infix::Is
        | Infix::In { .. }
        | Infix::Between { .. }
        | Infix::Like { .. } => (5, 6),

        // Bitwise OR
        Infix::Binary(BinaryOp::BitOr) => (7, 8),

        // Bitwise AND
        Infix::Binary(BinaryOp::BitAnd) => (9, 10),

        // Bit shifts
        Infix::Binary(BinaryOp::LeftShift | BinaryOp::RightShift) => (11, 12),

        // Additive (string concat has same precedence as addition)
        Infix::Binary(BinaryOp::Add | BinaryOp::Sub | BinaryOp::Concat) => (13, 14),

        // Multiplicative
        Infix::Binary(BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod) => (15, 16),

        // Postfix cast binds tightest
        Infix::Cast => (19, 20),
    }
}

/// Converts a token to a binary operator.
///
/// AND and OR only match as reserved keywords; every built-in dialect
/// reserves both.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::LeftShift => Some(BinaryOp::LeftShift),
        TokenKind::RightShift => Some(BinaryOp::RightShift),
        _ => None,
    }
}

/// Converts a token to a symbolic unary operator (`-`, `~`).
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}
