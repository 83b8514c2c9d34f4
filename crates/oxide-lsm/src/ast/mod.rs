//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Every node records the [`Span`](crate::lexer::Span) of source text it was
//! built from. Nodes are immutable once a grammar rule returns them.

mod ddl;
mod expression;
mod ident;
mod statement;
mod types;

pub use ddl::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, CreateTableStatement, ForeignKeyRef,
    PragmaStatement, ReferentialAction, TableConstraint, TableConstraintKind,
};
pub use expression::{
    BinaryOp, Expr, ExprKind, FunctionCall, InList, Literal, UnaryOp, WhenClause,
};
pub use ident::{Ident, ObjectName};
pub use statement::{
    DeleteStatement, InsertSource, InsertStatement, JoinClause, JoinType, Limit, NullOrdering,
    OrderBy, OrderDirection, Script, SelectColumn, SelectStatement, Statement, TableRef,
    UpdateAssignment, UpdateStatement,
};
pub use types::{DataType, TypeArgs};
