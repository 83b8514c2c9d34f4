//! SQL statement AST types.

use serde::Serialize;

use super::{CreateTableStatement, Expr, Ident, ObjectName, PragmaStatement};
use crate::lexer::Span;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction (ASC or DESC).
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
    pub span: Span,
}

/// A LIMIT/OFFSET clause, whatever syntax the dialect used to write it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Limit {
    /// Maximum number of rows (absent for a bare `OFFSET n`).
    pub count: Option<Expr>,
    /// Rows to skip.
    pub offset: Option<Expr>,
    pub span: Span,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinClause {
    /// The type of join.
    pub join_type: JoinType,
    /// Whether NATURAL was specified.
    pub natural: bool,
    /// The table to join.
    pub table: TableRef,
    /// The join condition.
    pub on: Option<Expr>,
    /// USING columns (alternative to ON).
    pub using: Vec<Ident>,
    pub span: Span,
}

/// A table reference in FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableRef {
    /// A named table.
    Table {
        name: ObjectName,
        alias: Option<Ident>,
        span: Span,
    },
    /// A derived table.
    Subquery {
        query: Box<SelectStatement>,
        alias: Option<Ident>,
        span: Span,
    },
    /// A joined table.
    Join {
        /// Left side of the join.
        left: Box<TableRef>,
        /// The join clause.
        join: Box<JoinClause>,
        span: Span,
    },
}

impl TableRef {
    /// Returns the table name for a named table.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Table { name, .. } => Some(name.name()),
            Self::Subquery { .. } | Self::Join { .. } => None,
        }
    }

    /// Returns the schema-qualified name for a named table.
    #[must_use]
    pub const fn object_name(&self) -> Option<&ObjectName> {
        match self {
            Self::Table { name, .. } => Some(name),
            Self::Subquery { .. } | Self::Join { .. } => None,
        }
    }

    /// Returns the alias of a named or derived table.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Table { alias, .. } | Self::Subquery { alias, .. } => {
                alias.as_ref().map(Ident::as_str)
            }
            Self::Join { .. } => None,
        }
    }

    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Table { span, .. } | Self::Subquery { span, .. } | Self::Join { span, .. } => {
                *span
            }
        }
    }

    /// Appends the leaf table references (named and derived tables) in source order.
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Self>) {
        match self {
            Self::Table { .. } | Self::Subquery { .. } => out.push(self),
            Self::Join { left, join, .. } => {
                left.collect_leaves(out);
                join.table.collect_leaves(out);
            }
        }
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    /// Whether to select DISTINCT values.
    pub distinct: bool,
    /// The columns to select.
    pub columns: Vec<SelectColumn>,
    /// The comma-separated FROM items.
    pub from: Vec<TableRef>,
    /// The WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// ORDER BY clauses.
    pub order_by: Vec<OrderBy>,
    /// LIMIT/OFFSET clause.
    pub limit: Option<Limit>,
    pub span: Span,
}

impl SelectStatement {
    /// Returns every named or derived table in the FROM clause, flattening
    /// comma lists and joins, in source order.
    #[must_use]
    pub fn table_refs(&self) -> Vec<&TableRef> {
        let mut out = Vec::new();
        for table in &self.from {
            table.collect_leaves(&mut out);
        }
        out
    }
}

/// A column in SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectColumn {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<Ident>,
    pub span: Span,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStatement {
    pub table: ObjectName,
    /// Column names (optional).
    pub columns: Vec<Ident>,
    /// Values to insert.
    pub source: InsertSource,
    pub returning: Vec<SelectColumn>,
    pub span: Span,
}

/// Source of data for INSERT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    /// VALUES (...), (...), ...
    Values(Vec<Vec<Expr>>),
    /// SELECT ...
    Query(Box<SelectStatement>),
    /// DEFAULT VALUES
    DefaultValues,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatement {
    pub table: ObjectName,
    pub alias: Option<Ident>,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<SelectColumn>,
    pub span: Span,
}

/// An assignment in UPDATE SET.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateAssignment {
    /// Column name.
    pub column: Ident,
    /// Value expression.
    pub value: Expr,
    pub span: Span,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStatement {
    pub table: ObjectName,
    pub alias: Option<Ident>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<SelectColumn>,
    pub span: Span,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// CREATE TABLE statement.
    CreateTable(CreateTableStatement),
    /// PRAGMA statement (SQLite).
    Pragma(PragmaStatement),
}

impl Statement {
    /// Returns the source span of the statement.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Select(s) => s.span,
            Self::Insert(s) => s.span,
            Self::Update(s) => s.span,
            Self::Delete(s) => s.span,
            Self::CreateTable(s) => s.span,
            Self::Pragma(s) => s.span,
        }
    }

    /// Returns the statement as a SELECT, if it is one.
    #[must_use]
    pub const fn as_select(&self) -> Option<&SelectStatement> {
        match self {
            Self::Select(s) => Some(s),
            _ => None,
        }
    }
}

/// A sequence of `;`-separated statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::lexer::Position;

    fn span(start: usize, end: usize) -> Span {
        Span::new(Position::new(start, 1, start + 1), Position::new(end, 1, end + 1))
    }

    fn named(name: &str, alias: Option<&str>, start: usize) -> TableRef {
        let name_span = span(start, start + name.len());
        TableRef::Table {
            name: ObjectName {
                schema: None,
                name: Ident::new(name, false, name_span),
                span: name_span,
            },
            alias: alias.map(|a| Ident::new(a, false, Span::default())),
            span: name_span,
        }
    }

    #[test]
    fn test_order_direction() {
        assert_eq!(OrderDirection::Asc.as_str(), "ASC");
        assert_eq!(OrderDirection::Desc.as_str(), "DESC");
    }

    #[test]
    fn test_join_type() {
        assert_eq!(JoinType::Inner.as_str(), "INNER JOIN");
        assert_eq!(JoinType::Left.as_str(), "LEFT JOIN");
    }

    #[test]
    fn test_table_ref_accessors() {
        let table = named("users", Some("u"), 0);
        assert_eq!(table.name(), Some("users"));
        assert_eq!(table.alias(), Some("u"));
        assert_eq!(table.span(), span(0, 5));
    }

    #[test]
    fn test_table_refs_flattens_joins() {
        let join = TableRef::Join {
            left: Box::new(named("a", None, 0)),
            join: Box::new(JoinClause {
                join_type: JoinType::Inner,
                natural: false,
                table: named("b", Some("bb"), 7),
                on: None,
                using: Vec::new(),
                span: span(2, 12),
            }),
            span: span(0, 12),
        };
        let select = SelectStatement {
            distinct: false,
            columns: vec![SelectColumn {
                expr: Expr::new(ExprKind::Wildcard { table: None }, span(0, 1)),
                alias: None,
                span: span(0, 1),
            }],
            from: vec![join, named("c", None, 14)],
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            span: span(0, 15),
        };

        let names: Vec<_> = select.table_refs().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec![Some("a"), Some("b"), Some("c")]);
    }
}
