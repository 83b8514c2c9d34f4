//! Schema definition statements: CREATE TABLE and PRAGMA.

use serde::Serialize;

use super::{DataType, Expr, Ident, ObjectName, OrderDirection};
use crate::lexer::Span;

/// Action taken on the referencing rows when a referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ReferentialAction {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// The `REFERENCES table (cols) [ON DELETE ..] [ON UPDATE ..]` part of a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyRef {
    pub table: ObjectName,
    pub columns: Vec<Ident>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    pub span: Span,
}

/// A constraint attached to a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnConstraintKind {
    NotNull,
    Null,
    PrimaryKey { direction: Option<OrderDirection> },
    Unique,
    Default(Expr),
    Check(Expr),
    References(ForeignKeyRef),
    /// `AUTOINCREMENT` (SQLite) or `AUTO_INCREMENT` (MySQL).
    AutoIncrement,
}

/// A column constraint with its optional `CONSTRAINT name` prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnConstraint {
    pub name: Option<Ident>,
    pub kind: ColumnConstraintKind,
    pub span: Span,
}

/// A column definition for CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: Ident,
    /// Data type (SQLite allows it to be omitted).
    pub data_type: Option<DataType>,
    pub constraints: Vec<ColumnConstraint>,
    pub span: Span,
}

impl ColumnDef {
    fn has(&self, predicate: impl Fn(&ColumnConstraintKind) -> bool) -> bool {
        self.constraints.iter().any(|c| predicate(&c.kind))
    }

    /// Whether the column accepts NULL (no NOT NULL and not a primary key).
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        !self.has(|kind| {
            matches!(
                kind,
                ColumnConstraintKind::NotNull | ColumnConstraintKind::PrimaryKey { .. }
            )
        })
    }

    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.has(|kind| matches!(kind, ColumnConstraintKind::PrimaryKey { .. }))
    }

    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.has(|kind| matches!(kind, ColumnConstraintKind::Unique))
    }

    #[must_use]
    pub fn is_autoincrement(&self) -> bool {
        self.has(|kind| matches!(kind, ColumnConstraintKind::AutoIncrement))
    }

    /// Returns the DEFAULT expression, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Expr> {
        self.constraints.iter().find_map(|c| match &c.kind {
            ColumnConstraintKind::Default(expr) => Some(expr),
            _ => None,
        })
    }

    /// Returns the foreign key reference, if any.
    #[must_use]
    pub fn references(&self) -> Option<&ForeignKeyRef> {
        self.constraints.iter().find_map(|c| match &c.kind {
            ColumnConstraintKind::References(fk) => Some(fk),
            _ => None,
        })
    }
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableConstraintKind {
    PrimaryKey(Vec<Ident>),
    Unique(Vec<Ident>),
    ForeignKey {
        columns: Vec<Ident>,
        references: ForeignKeyRef,
    },
    Check(Expr),
}

/// A table constraint with its optional `CONSTRAINT name` prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableConstraint {
    pub name: Option<Ident>,
    pub kind: TableConstraintKind,
    pub span: Span,
}

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTableStatement {
    pub temporary: bool,
    pub if_not_exists: bool,
    pub name: ObjectName,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    pub span: Span,
}

impl CreateTableStatement {
    /// Looks up a column by name (case-insensitive).
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.as_str().eq_ignore_ascii_case(name))
    }

    /// Returns the primary key columns, from either a column or a table constraint.
    #[must_use]
    pub fn primary_key(&self) -> Vec<&str> {
        let table_level = self.constraints.iter().find_map(|c| match &c.kind {
            TableConstraintKind::PrimaryKey(columns) => Some(columns),
            _ => None,
        });
        match table_level {
            Some(columns) => columns.iter().map(Ident::as_str).collect(),
            None => self
                .columns
                .iter()
                .filter(|c| c.is_primary_key())
                .map(|c| c.name.as_str())
                .collect(),
        }
    }
}

/// A SQLite `PRAGMA [schema.]name [= value | (value)]` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PragmaStatement {
    pub name: ObjectName,
    pub value: Option<Expr>,
    pub span: Span,
}
