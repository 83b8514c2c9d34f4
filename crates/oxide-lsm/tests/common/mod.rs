#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use oxide_lsm::analysis::{AnalysisCase, AnalysisError, Scheduler, SchedulerConfig};
use oxide_lsm::ast::{CreateTableStatement, SelectStatement, Statement};
use oxide_lsm::dialect::{dialect_for, StatementModel};
use oxide_lsm::lexer::Span;
use oxide_lsm::source::Source;

pub const WAIT: Duration = Duration::from_secs(10);

pub fn case<M: StatementModel>(dialect: &str) -> AnalysisCase<M> {
    dialect_for(dialect)
        .unwrap_or_else(|e| panic!("unknown dialect {dialect}: {e}"))
        .find_analysis_case::<M>()
        .unwrap_or_else(|e| panic!("{dialect} cannot produce {}: {e}", M::KIND))
}

pub fn parse_in<M: StatementModel>(dialect: &str, sql: &str) -> Arc<M> {
    case::<M>(dialect)
        .parse(&Source::from(sql))
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err_in<M: StatementModel>(dialect: &str, sql: &str) -> AnalysisError {
    match case::<M>(dialect).parse(&Source::from(sql)) {
        Ok(model) => panic!("Expected an error for: {sql}\nGot: {model:?}"),
        Err(err) => err,
    }
}

pub fn parse_select(sql: &str) -> Arc<SelectStatement> {
    parse_in("sql92", sql)
}

pub fn parse_statement(dialect: &str, sql: &str) -> Arc<Statement> {
    parse_in(dialect, sql)
}

pub fn parse_create(dialect: &str, sql: &str) -> Arc<CreateTableStatement> {
    parse_in(dialect, sql)
}

pub fn scheduler(workers: usize) -> Scheduler {
    Scheduler::new(
        SchedulerConfig::default()
            .with_worker_threads(workers)
            .with_max_concurrent_analyses(workers),
    )
    .expect("scheduler runtime")
}

/// Returns the source text a span covers.
pub fn text<'a>(sql: &'a str, span: Span) -> &'a str {
    &sql[span.start.offset..span.end.offset]
}

/// Asserts spans are in order, do not overlap and lie inside `parent`.
pub fn assert_nested(parent: Span, children: &[Span]) {
    for child in children {
        assert!(
            parent.start.offset <= child.start.offset && child.end.offset <= parent.end.offset,
            "{child:?} escapes {parent:?}"
        );
    }
    for pair in children.windows(2) {
        assert!(
            pair[0].end.offset <= pair[1].start.offset,
            "{:?} overlaps {:?}",
            pair[0],
            pair[1]
        );
    }
}
