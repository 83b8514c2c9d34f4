//! Grammar rules and the backtracking engine that evaluates them.
//!
//! A rule is a plain function `fn(&mut Grammar) -> RuleResult<T>`. Rules are
//! combined with [`Grammar::attempt`], [`Grammar::choice`], [`Grammar::many`]
//! and [`Grammar::optional`], which rewind the reader whenever an alternative
//! does not match. Expressions use a Pratt parser for precedence.
//!
//! Dialects share these rules and override parts of them through
//! [`GrammarRules`].

mod ddl;
mod engine;
mod expression;
mod failure;
mod pratt;
mod rules;
mod select;
mod statement;

pub use ddl::{
    column_constraint, column_constraint_kind, create_table_statement, named_column_constraint,
    pragma_statement,
};
pub use engine::{Grammar, GrammarMark, Rule, RuleResult, MAX_NESTING};
pub use expression::{data_type, expression, operand};
pub use failure::{RuleFailure, SyntaxFailure};
pub use rules::{GrammarRules, Syntax};
pub use select::{limit_clause, object_name, select_statement, table_ref};
pub use statement::{
    delete_statement, dialect_statement, insert_statement, script, statement, update_statement,
};

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use super::*;
    use crate::ast::{
        BinaryOp, ColumnConstraintKind, DataType, ExprKind, Ident, InList, InsertSource, JoinType,
        Literal, NullOrdering, ReferentialAction, Statement, TableConstraintKind, TableRef,
        UnaryOp,
    };
    use crate::dialect::dialect_for;
    use crate::source::SourceReader;

    fn parse_in<T>(dialect: &str, rule: Rule<T>, sql: &str) -> RuleResult<T> {
        let dialect = dialect_for(dialect).unwrap();
        let mut g = Grammar::new(
            SourceReader::new(sql),
            Arc::clone(dialect.syntax()),
            Arc::new(AtomicBool::new(false)),
        );
        g.run(rule)
    }

    fn parse<T>(rule: Rule<T>, sql: &str) -> T {
        parse_in("sqlite", rule, sql).unwrap()
    }

    fn syntax_failure<T: core::fmt::Debug>(dialect: &str, rule: Rule<T>, sql: &str) -> SyntaxFailure {
        match parse_in(dialect, rule, sql).unwrap_err() {
            RuleFailure::Syntax(failure) => failure,
            other => panic!("expected a syntax failure, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_select() {
        let select = parse(select_statement, "SELECT id, name FROM users");
        assert_eq!(select.columns.len(), 2);
        assert_eq!(select.from[0].name(), Some("users"));
    }

    #[test]
    fn test_select_with_where() {
        let select = parse(select_statement, "SELECT * FROM users WHERE id = 1");
        let where_clause = select.where_clause.unwrap();
        assert!(matches!(
            where_clause.kind,
            ExprKind::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn test_select_with_join() {
        let select = parse(
            select_statement,
            "SELECT * FROM users u LEFT OUTER JOIN orders o ON u.id = o.user_id",
        );
        let TableRef::Join { left, join, .. } = &select.from[0] else {
            panic!("expected a join");
        };
        assert_eq!(left.alias(), Some("u"));
        assert_eq!(join.join_type, JoinType::Left);
        assert_eq!(join.table.alias(), Some("o"));
        assert!(join.on.is_some());
    }

    #[test]
    fn test_join_requires_condition() {
        let failure = syntax_failure("sqlite", select_statement, "SELECT * FROM a JOIN b");
        assert_eq!(failure.expected, vec!["ON", "USING"]);
        assert_eq!(failure.position.offset, 22);
    }

    #[test]
    fn test_join_using_and_natural() {
        let select = parse(
            select_statement,
            "SELECT * FROM a JOIN b USING (id, kind) NATURAL JOIN c CROSS JOIN d",
        );
        let leaves: Vec<_> = select.table_refs().iter().filter_map(|t| t.name()).collect();
        assert_eq!(leaves, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parenthesized_join_and_derived_table() {
        let select = parse(
            select_statement,
            "SELECT * FROM (a JOIN b ON a.id = b.id), (SELECT 1 AS one) AS s",
        );
        assert_eq!(select.from.len(), 2);
        assert!(matches!(select.from[0], TableRef::Join { .. }));
        assert!(matches!(select.from[1], TableRef::Subquery { .. }));
        assert_eq!(select.from[1].alias(), Some("s"));
    }

    #[test]
    fn test_expression_precedence() {
        // 1 + 2 * 3 should parse as 1 + (2 * 3)
        let expr = parse(expression, "1 + 2 * 3");
        let ExprKind::Binary { left, op, right } = expr.kind else {
            panic!("expected a binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(left.as_literal(), Some(&Literal::Integer(1)));
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let expr = parse(expression, "NOT a = 1 AND b");
        let ExprKind::Binary { left, op, .. } = expr.kind else {
            panic!("expected AND at the top");
        };
        assert_eq!(op, BinaryOp::And);
        assert!(matches!(
            left.kind,
            ExprKind::Unary {
                op: UnaryOp::Not,
                ..
            }
        ));
    }

    #[test]
    fn test_negated_predicates() {
        let expr = parse(expression, "a NOT IN (1, 2) OR b NOT BETWEEN 1 AND 5");
        let ExprKind::Binary { left, right, .. } = expr.kind else {
            panic!("expected OR");
        };
        assert!(matches!(left.kind, ExprKind::In { negated: true, list: InList::Values(ref v), .. } if v.len() == 2));
        assert!(matches!(right.kind, ExprKind::Between { negated: true, .. }));

        let expr = parse(expression, "x IS NOT NULL");
        assert!(matches!(expr.kind, ExprKind::IsNull { negated: true, .. }));

        let expr = parse(expression, "NOT EXISTS (SELECT 1)");
        assert!(matches!(expr.kind, ExprKind::Exists { negated: true, .. }));
    }

    #[test]
    fn test_in_subquery() {
        let expr = parse(expression, "id IN (SELECT user_id FROM orders)");
        assert!(matches!(
            expr.kind,
            ExprKind::In {
                list: InList::Subquery(_),
                negated: false,
                ..
            }
        ));
    }

    #[test]
    fn test_parameter_placeholders() {
        let select = parse(select_statement, "SELECT * FROM t WHERE a = ? AND b = :name AND c = ?");
        let mut positions = Vec::new();
        let mut names = Vec::new();
        let mut stack = vec![select.where_clause.as_ref().unwrap()];
        while let Some(expr) = stack.pop() {
            if let ExprKind::Parameter { name, position } = &expr.kind {
                match name {
                    Some(name) => names.push(name.clone()),
                    None => positions.push(*position),
                }
            }
            stack.extend(expr.children());
        }
        positions.sort_unstable();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(names, vec![String::from("name")]);
    }

    #[test]
    fn test_case_expression() {
        let expr = parse(
            expression,
            "CASE status WHEN 1 THEN 'active' WHEN 2 THEN 'gone' ELSE 'unknown' END",
        );
        let ExprKind::Case {
            operand,
            when_clauses,
            else_clause,
        } = expr.kind
        else {
            panic!("expected CASE");
        };
        assert!(operand.is_some());
        assert_eq!(when_clauses.len(), 2);
        assert!(else_clause.is_some());
    }

    #[test]
    fn test_aggregate_functions() {
        let select = parse(
            select_statement,
            "SELECT COUNT(*), COUNT(DISTINCT user_id), max(total) FROM orders",
        );
        let ExprKind::Function(count) = &select.columns[1].expr.kind else {
            panic!("expected a function call");
        };
        assert!(count.distinct);
        assert_eq!(count.name.as_str(), "COUNT");
        assert!(select.columns[0].expr.children()[0].is_wildcard());
    }

    #[test]
    fn test_casts() {
        let expr = parse(expression, "CAST(price AS DECIMAL(10, 2))");
        assert!(matches!(
            expr.kind,
            ExprKind::Cast {
                data_type: DataType::Decimal {
                    precision: Some(10),
                    scale: Some(2)
                },
                ..
            }
        ));

        let expr = parse_in("postgresql", expression, "amount::text").unwrap();
        assert!(matches!(expr.kind, ExprKind::Cast { .. }));
        assert!(parse_in("sqlite", expression, "amount::text").is_err());
    }

    #[test]
    fn test_ilike_is_dialect_specific() {
        let expr = parse_in("postgresql", expression, "name ILIKE 'a%'").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Like {
                case_insensitive: true,
                ..
            }
        ));
        assert!(parse_in("sql92", expression, "name ILIKE 'a%'").is_err());
    }

    #[test]
    fn test_order_by_nulls() {
        let select = parse(select_statement, "SELECT a FROM t ORDER BY a DESC NULLS LAST, b");
        assert_eq!(select.order_by.len(), 2);
        assert_eq!(select.order_by[0].nulls, Some(NullOrdering::Last));
        assert_eq!(select.order_by[1].nulls, None);
    }

    #[test]
    fn test_limit_forms() {
        let select = parse(select_statement, "SELECT a FROM t LIMIT 10 OFFSET 5");
        let limit = select.limit.unwrap();
        assert_eq!(limit.count.unwrap().as_literal(), Some(&Literal::Integer(10)));
        assert_eq!(limit.offset.unwrap().as_literal(), Some(&Literal::Integer(5)));

        // LIMIT offset, count
        let select = parse(select_statement, "SELECT a FROM t LIMIT 5, 10");
        let limit = select.limit.unwrap();
        assert_eq!(limit.count.unwrap().as_literal(), Some(&Literal::Integer(10)));
        assert_eq!(limit.offset.unwrap().as_literal(), Some(&Literal::Integer(5)));
    }

    #[test]
    fn test_limit_is_an_identifier_in_sql92() {
        // Without a LIMIT clause the word is just a table alias.
        let failure = syntax_failure("sql92", select_statement, "SELECT a FROM t LIMIT 10");
        assert_eq!(failure.position.offset, 22);
        assert_eq!(failure.found, "'10'");

        let select = parse_in("sql92", select_statement, "SELECT limit FROM t").unwrap();
        assert_eq!(select.columns[0].expr.as_column(), Some((None, "limit")));
    }

    #[test]
    fn test_insert_forms() {
        let insert = parse(insert_statement, "INSERT INTO users (name, email) VALUES ('a', 'b'), ('c', 'd')");
        assert_eq!(insert.columns.len(), 2);
        assert!(matches!(insert.source, InsertSource::Values(ref rows) if rows.len() == 2));

        let insert = parse(insert_statement, "INSERT INTO users DEFAULT VALUES RETURNING id");
        assert_eq!(insert.source, InsertSource::DefaultValues);
        assert_eq!(insert.returning.len(), 1);

        let insert = parse(insert_statement, "INSERT INTO archive SELECT * FROM users");
        assert!(matches!(insert.source, InsertSource::Query(_)));
    }

    #[test]
    fn test_update_and_delete() {
        let update = parse(update_statement, "UPDATE users u SET name = 'x', age = age + 1 WHERE id = 1");
        assert_eq!(update.alias.as_ref().map(Ident::as_str), Some("u"));
        assert_eq!(update.assignments.len(), 2);
        assert!(update.where_clause.is_some());

        let delete = parse(delete_statement, "DELETE FROM main.users WHERE id = 1 RETURNING *");
        assert_eq!(delete.table.schema(), Some("main"));
        assert_eq!(delete.returning.len(), 1);
    }

    #[test]
    fn test_returning_is_dialect_specific() {
        assert!(parse_in("mysql", delete_statement, "DELETE FROM t RETURNING id").is_err());
    }

    #[test]
    fn test_create_table() {
        let create = parse(
            create_table_statement,
            "CREATE TEMP TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                total DECIMAL(10, 2) DEFAULT 0 NOT NULL,
                note,
                CONSTRAINT positive CHECK (total >= 0),
                UNIQUE (user_id, total)
            )",
        );
        assert!(create.temporary);
        assert!(create.if_not_exists);
        assert_eq!(create.columns.len(), 4);
        assert_eq!(create.constraints.len(), 2);

        let id = create.column("id").unwrap();
        assert!(id.is_primary_key());
        assert!(id.is_autoincrement());

        let user_id = create.column("user_id").unwrap();
        assert!(!user_id.is_nullable());
        let fk = user_id.references().unwrap();
        assert_eq!(fk.table.name(), "users");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));

        let total = create.column("total").unwrap();
        assert_eq!(total.default_value().unwrap().as_literal(), Some(&Literal::Integer(0)));
        assert!(!total.is_nullable());

        assert_eq!(create.column("note").unwrap().data_type, None);
        assert_eq!(create.constraints[0].name.as_ref().map(Ident::as_str), Some("positive"));
        assert!(matches!(create.constraints[1].kind, TableConstraintKind::Unique(ref c) if c.len() == 2));
        assert_eq!(create.primary_key(), vec!["id"]);
    }

    #[test]
    fn test_vendor_type_names() {
        let create = parse(
            create_table_statement,
            "CREATE TABLE t (a UNSIGNED BIG INT, b NVARCHAR(20), c DOUBLE PRECISION)",
        );
        assert_eq!(
            create.columns[0].data_type,
            Some(DataType::Custom(String::from("UNSIGNED BIG INT")))
        );
        assert_eq!(
            create.columns[1].data_type,
            Some(DataType::Custom(String::from("NVARCHAR(20)")))
        );
        assert_eq!(create.columns[2].data_type, Some(DataType::Double));
    }

    #[test]
    fn test_mysql_auto_increment() {
        let create = parse_in(
            "mysql",
            create_table_statement,
            "CREATE TABLE `t` (id INT NOT NULL AUTO_INCREMENT, PRIMARY KEY (id))",
        )
        .unwrap();
        let id = create.column("id").unwrap();
        assert!(id.constraints.iter().any(|c| c.kind == ColumnConstraintKind::AutoIncrement));
        assert_eq!(create.primary_key(), vec!["id"]);
    }

    #[test]
    fn test_statement_dispatch_reports_all_alternatives() {
        let failure = syntax_failure("sql92", statement, "VACUUM");
        assert_eq!(
            failure.expected,
            vec!["SELECT", "INSERT", "UPDATE", "DELETE", "CREATE"]
        );
        assert_eq!(
            failure.message(),
            "expected SELECT, INSERT, UPDATE, DELETE or CREATE, found 'VACUUM'"
        );
    }

    #[test]
    fn test_script() {
        let parsed = parse(script, ";SELECT 1; PRAGMA foreign_keys = ON;; DELETE FROM t;");
        assert_eq!(parsed.statements.len(), 3);
        assert!(matches!(parsed.statements[1], Statement::Pragma(_)));

        let empty = parse(script, "");
        assert!(empty.statements.is_empty());
        assert!(empty.span.is_empty());
    }

    #[test]
    fn test_pragma_is_sqlite_only() {
        let pragma = parse(pragma_statement, "PRAGMA main.cache_size(2000)");
        assert_eq!(pragma.name.schema(), Some("main"));
        assert_eq!(pragma.value.unwrap().as_literal(), Some(&Literal::Integer(2000)));
        assert!(parse_in("postgresql", script, "PRAGMA foreign_keys").is_err());
    }
}
