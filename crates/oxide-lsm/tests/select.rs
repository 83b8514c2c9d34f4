//! SELECT analyses: column lists, table references, joins and clauses.

mod common;
use common::*;

use oxide_lsm::analysis::AnalysisErrorKind;
use oxide_lsm::ast::{
    ExprKind, JoinType, Literal, NullOrdering, OrderDirection, SelectStatement, TableRef,
};

#[test]
fn select_columns_and_comma_separated_tables() {
    let s = parse_select("SELECT a, b, c FROM t1 x, t2 y");
    let columns: Vec<_> = s.columns.iter().map(|c| c.expr.as_column()).collect();
    assert_eq!(
        columns,
        vec![Some((None, "a")), Some((None, "b")), Some((None, "c"))]
    );

    let tables: Vec<_> = s
        .table_refs()
        .iter()
        .map(|t| (t.name(), t.alias()))
        .collect();
    assert_eq!(tables, vec![(Some("t1"), Some("x")), (Some("t2"), Some("y"))]);
}

#[test]
fn select_qualified_columns_and_wildcards() {
    let s = parse_select("SELECT u.name, o.*, * FROM users u JOIN orders o ON u.id = o.user_id");
    assert_eq!(s.columns[0].expr.as_column(), Some((Some("u"), "name")));
    assert!(matches!(
        &s.columns[1].expr.kind,
        ExprKind::Wildcard { table: Some(t) } if t.as_str() == "o"
    ));
    assert!(s.columns[2].expr.is_wildcard());
}

#[test]
fn select_column_aliases() {
    let s = parse_select("SELECT price * 2 AS doubled, name label FROM items");
    let aliases: Vec<_> = s
        .columns
        .iter()
        .map(|c| c.alias.as_ref().map(|a| a.as_str()))
        .collect();
    assert_eq!(aliases, vec![Some("doubled"), Some("label")]);
}

#[test]
fn select_without_from() {
    let s = parse_select("SELECT 1 + 1");
    assert!(s.from.is_empty());
    assert!(s.table_refs().is_empty());
}

#[test]
fn select_distinct_and_aggregates() {
    let s = parse_select("SELECT DISTINCT COUNT(*), MAX(price), COUNT(DISTINCT kind) FROM items");
    assert!(s.distinct);
    let ExprKind::Function(count) = &s.columns[0].expr.kind else {
        panic!("expected COUNT(*)");
    };
    assert!(count.name.as_str().eq_ignore_ascii_case("count"));
    assert!(count.args[0].is_wildcard());
    let ExprKind::Function(distinct) = &s.columns[2].expr.kind else {
        panic!("expected COUNT(DISTINCT kind)");
    };
    assert!(distinct.distinct);
}

#[test]
fn select_join_chain_flattens_to_leaves() {
    let s = parse_select(
        "SELECT * FROM a \
         INNER JOIN b ON a.id = b.a_id \
         LEFT JOIN c ON b.id = c.b_id \
         CROSS JOIN d",
    );
    assert_eq!(s.from.len(), 1);
    let names: Vec<_> = s.table_refs().iter().filter_map(|t| t.name()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);

    let TableRef::Join { join, left, .. } = &s.from[0] else {
        panic!("expected a join");
    };
    assert_eq!(join.join_type, JoinType::Cross);
    assert!(matches!(**left, TableRef::Join { .. }));
}

#[test]
fn select_derived_table_is_a_leaf() {
    let s = parse_select("SELECT s.n FROM (SELECT COUNT(*) AS n FROM t) s, u");
    let leaves = s.table_refs();
    assert_eq!(leaves.len(), 2);
    assert!(matches!(leaves[0], TableRef::Subquery { .. }));
    assert_eq!(leaves[0].alias(), Some("s"));
    assert_eq!(leaves[1].name(), Some("u"));
}

#[test]
fn select_schema_qualified_table() {
    let s = parse_select("SELECT * FROM sales.orders o");
    let name = s.table_refs()[0].object_name().unwrap();
    assert_eq!(name.schema(), Some("sales"));
    assert_eq!(name.name(), "orders");
}

#[test]
fn select_group_having_order() {
    let s = parse_select(
        "SELECT kind, COUNT(*) FROM items GROUP BY kind HAVING COUNT(*) > 1 ORDER BY kind DESC, 2",
    );
    assert_eq!(s.group_by.len(), 1);
    assert!(s.having.is_some());
    assert_eq!(s.order_by.len(), 2);
    assert_eq!(s.order_by[0].direction, OrderDirection::Desc);
    assert_eq!(s.order_by[1].direction, OrderDirection::Asc);
    assert_eq!(s.order_by[1].expr.as_literal(), Some(&Literal::Integer(2)));
}

#[test]
fn select_where_with_subquery_predicates() {
    let s = parse_select(
        "SELECT * FROM t WHERE EXISTS (SELECT 1 FROM u WHERE u.t_id = t.id) AND t.kind IN ('a', 'b')",
    );
    assert!(matches!(
        s.where_clause.as_ref().unwrap().kind,
        ExprKind::Binary { .. }
    ));
}

#[test]
fn select_limit_in_sqlite() {
    let s = parse_in::<SelectStatement>(
        "sqlite",
        "SELECT a FROM t ORDER BY a DESC NULLS LAST LIMIT 10 OFFSET 5",
    );
    assert_eq!(s.order_by[0].nulls, Some(NullOrdering::Last));
    let limit = s.limit.as_ref().unwrap();
    assert_eq!(limit.count.as_ref().unwrap().as_literal(), Some(&Literal::Integer(10)));
    assert_eq!(limit.offset.as_ref().unwrap().as_literal(), Some(&Literal::Integer(5)));
}

#[test]
fn select_limit_comma_form_swaps_operands() {
    let s = parse_in::<SelectStatement>("mysql", "SELECT a FROM t LIMIT 5, 10");
    let limit = s.limit.as_ref().unwrap();
    assert_eq!(limit.count.as_ref().unwrap().as_literal(), Some(&Literal::Integer(10)));
    assert_eq!(limit.offset.as_ref().unwrap().as_literal(), Some(&Literal::Integer(5)));
}

#[test]
fn limit_is_an_identifier_in_sql92() {
    let s = parse_select("SELECT limit FROM t");
    assert_eq!(s.columns[0].expr.as_column(), Some((None, "limit")));

    let err = parse_err_in::<SelectStatement>("sql92", "SELECT a FROM t LIMIT 5");
    assert_eq!(err.kind, AnalysisErrorKind::Syntax);
    assert_eq!(err.found.as_deref(), Some("'5'"));

    let s = parse_select("SELECT a FROM t limit");
    assert_eq!(s.table_refs()[0].alias(), Some("limit"));
}

#[test]
fn select_case_and_cast() {
    let s = parse_select(
        "SELECT CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END, CAST(b AS DECIMAL(10, 2)) FROM t",
    );
    assert!(matches!(s.columns[0].expr.kind, ExprKind::Case { .. }));
    assert!(matches!(s.columns[1].expr.kind, ExprKind::Cast { .. }));
}
