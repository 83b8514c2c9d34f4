//! Expression AST types.

use serde::Serialize;

use super::{DataType, Ident, SelectStatement};
use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    /// The function name.
    pub name: Ident,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
}

/// The right-hand side of an IN expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InList {
    /// `IN (a, b, c)`
    Values(Vec<Expr>),
    /// `IN (SELECT ...)`
    Subquery(Box<SelectStatement>),
}

/// A WHEN/THEN arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
    pub span: Span,
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// A literal value.
    Literal(Literal),

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table name or alias (optional).
        table: Option<Ident>,
        /// Column name.
        name: Ident,
    },

    /// A binary expression.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// A function call.
    Function(FunctionCall),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        query: Box<SelectStatement>,
        negated: bool,
    },

    /// IS NULL expression.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },

    /// IN expression.
    In {
        expr: Box<Expr>,
        list: InList,
        negated: bool,
    },

    /// BETWEEN expression.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// LIKE / ILIKE expression.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        /// True for ILIKE.
        case_insensitive: bool,
        negated: bool,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        when_clauses: Vec<WhenClause>,
        else_clause: Option<Box<Expr>>,
    },

    /// `CAST(expr AS type)` or `expr::type`.
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    /// Parenthesized expression.
    Paren(Box<Expr>),

    /// A parameter placeholder (? or :name).
    Parameter {
        /// The parameter name for `:name` placeholders.
        name: Option<String>,
        /// Position in the query (1-based for ? placeholders, 0 for named ones).
        position: usize,
    },

    /// Wildcard (*) in SELECT or `COUNT(*)`.
    Wildcard {
        /// Table qualifier (optional).
        table: Option<Ident>,
    },
}

/// An SQL expression with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    /// Creates an expression node.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `(qualifier, column)` if this is a column reference.
    #[must_use]
    pub fn as_column(&self) -> Option<(Option<&str>, &str)> {
        match &self.kind {
            ExprKind::Column { table, name } => {
                Some((table.as_ref().map(Ident::as_str), name.as_str()))
            }
            _ => None,
        }
    }

    /// Returns the literal if this is a literal expression.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for `*` and `t.*`.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.kind, ExprKind::Wildcard { .. })
    }

    /// Returns the direct sub-expressions in source order.
    ///
    /// Subqueries are not descended into.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match &self.kind {
            ExprKind::Literal(_)
            | ExprKind::Column { .. }
            | ExprKind::Subquery(_)
            | ExprKind::Exists { .. }
            | ExprKind::Parameter { .. }
            | ExprKind::Wildcard { .. } => Vec::new(),
            ExprKind::Binary { left, right, .. } => vec![&**left, &**right],
            ExprKind::Unary { operand, .. } => vec![&**operand],
            ExprKind::Function(call) => call.args.iter().collect(),
            ExprKind::IsNull { expr, .. } | ExprKind::Cast { expr, .. } | ExprKind::Paren(expr) => {
                vec![&**expr]
            }
            ExprKind::In { expr, list, .. } => {
                let mut children: Vec<&Self> = vec![&**expr];
                if let InList::Values(values) = list {
                    children.extend(values);
                }
                children
            }
            ExprKind::Between {
                expr, low, high, ..
            } => vec![&**expr, &**low, &**high],
            ExprKind::Like { expr, pattern, .. } => vec![&**expr, &**pattern],
            ExprKind::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                let mut children: Vec<&Self> = operand.iter().map(AsRef::as_ref).collect();
                for clause in when_clauses {
                    children.push(&clause.condition);
                    children.push(&clause.result);
                }
                children.extend(else_clause.iter().map(AsRef::as_ref));
                children
            }
        }
    }
}
