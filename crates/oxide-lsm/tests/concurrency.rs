//! Background analyses: concurrency, retrieval and cancellation.

mod common;
use common::*;

use std::sync::Arc;
use std::time::Duration;

use oxide_lsm::analysis::{AnalysisErrorKind, Scheduler, SchedulerConfig};
use oxide_lsm::ast::{Script, SelectStatement};
use oxide_lsm::dialect::dialect_for;
use oxide_lsm::source::Source;
use tokio::runtime::Handle;

fn long_script(statements: usize) -> Source {
    let mut sql = String::new();
    for i in 0..statements {
        sql.push_str(&format!(
            "SELECT a{i}, b + {i} FROM t{i} x JOIN u ON x.id = u.id WHERE c IN (1, 2, {i});\n"
        ));
    }
    Source::from(sql)
}

#[test]
fn concurrent_analyses_of_same_text_agree() {
    let scheduler = scheduler(4);
    let dialect = dialect_for("sql92").unwrap();
    let case = dialect.find_analysis_case::<SelectStatement>().unwrap();
    let source = Source::from("SELECT a, b, c FROM t1 x, t2 y WHERE x.id = y.id");

    let mut first = dialect.prepare_analysis(&source, &case).unwrap();
    let mut second = dialect.prepare_analysis(&source, &case).unwrap();
    let first = first.start(&scheduler);
    let second = second.start(&scheduler);
    assert_ne!(first.id(), second.id());

    let a = first.wait(Some(WAIT)).unwrap().unwrap();
    let b = second.wait(Some(WAIT)).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(*a, *b);
}

#[test]
fn many_analyses_share_a_small_pool() {
    let scheduler = scheduler(2);
    let dialect = dialect_for("sqlite").unwrap();
    let case = dialect.find_analysis_case::<SelectStatement>().unwrap();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let source = Source::from(format!("SELECT c{i} FROM t LIMIT {i}"));
            dialect.prepare_analysis(&source, &case).unwrap().start(&scheduler)
        })
        .collect();

    for (i, handle) in handles.iter().enumerate() {
        let select = handle.wait(Some(WAIT)).unwrap().unwrap();
        let name = format!("c{i}");
        assert_eq!(select.columns[0].expr.as_column(), Some((None, name.as_str())));
    }
}

#[test]
fn repeated_retrieval_returns_the_same_model() {
    let scheduler = scheduler(1);
    let dialect = dialect_for("postgresql").unwrap();
    let case = dialect.find_analysis_case::<SelectStatement>().unwrap();
    let mut analysis = dialect
        .prepare_analysis(&Source::from("SELECT 1"), &case)
        .unwrap();
    let handle = analysis.start(&scheduler);

    let first = handle.wait(Some(WAIT)).unwrap().unwrap();
    let again = handle.wait(None).unwrap().unwrap();
    let polled = handle.poll().unwrap().unwrap();
    let restarted = analysis.start(&scheduler).poll().unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert!(Arc::ptr_eq(&first, &polled));
    assert!(Arc::ptr_eq(&first, &restarted));
    assert!(!handle.cancel());
}

#[test]
fn repeated_retrieval_of_an_error_is_stable() {
    let scheduler = scheduler(1);
    let dialect = dialect_for("sql92").unwrap();
    let case = dialect.find_analysis_case::<SelectStatement>().unwrap();
    let handle = dialect
        .prepare_analysis(&Source::from("SELECT FROM"), &case)
        .unwrap()
        .start(&scheduler);

    let first = handle.wait(Some(WAIT)).unwrap().unwrap_err();
    let second = handle.wait(Some(WAIT)).unwrap().unwrap_err();
    assert_eq!(first.kind, AnalysisErrorKind::Syntax);
    assert_eq!(first, second);
}

#[test]
fn cancelled_analysis_never_completes() {
    let scheduler = scheduler(1);
    let dialect = dialect_for("sql92").unwrap();
    let case = dialect.find_analysis_case::<Script>().unwrap();
    let source = long_script(100_000);

    let handle = dialect.prepare_analysis(&source, &case).unwrap().start(&scheduler);
    assert!(handle.wait(Some(Duration::from_millis(20))).is_none());
    assert!(handle.cancel());
    for _ in 0..3 {
        let err = handle.wait(Some(WAIT)).unwrap().unwrap_err();
        assert_eq!(err.kind, AnalysisErrorKind::Cancelled);
    }

    // The only slot is released once the parse unwinds.
    let select = dialect.find_analysis_case::<SelectStatement>().unwrap();
    let next = dialect
        .prepare_analysis(&Source::from("SELECT a FROM t"), &select)
        .unwrap()
        .start(&scheduler);
    assert!(next.wait(Some(WAIT)).unwrap().is_ok());
    assert!(handle.poll().unwrap().unwrap_err().is_cancelled());
}

#[test]
fn dropping_the_scheduler_settles_every_handle() {
    let scheduler = scheduler(1);
    let dialect = dialect_for("sql92").unwrap();
    let script = dialect.find_analysis_case::<Script>().unwrap();
    let select = dialect.find_analysis_case::<SelectStatement>().unwrap();

    let first = dialect
        .prepare_analysis(&long_script(20_000), &script)
        .unwrap()
        .start(&scheduler);
    let second = dialect
        .prepare_analysis(&Source::from("SELECT a FROM t"), &select)
        .unwrap()
        .start(&scheduler);
    drop(scheduler);

    // Whichever got the slot finishes; anything still queued is abandoned.
    let first = first.wait(Some(WAIT)).expect("first analysis settled");
    let second = second.wait(Some(WAIT)).expect("second analysis settled");
    for err in [first.err(), second.err()].into_iter().flatten() {
        assert_eq!(err.kind, AnalysisErrorKind::Internal);
    }
}

#[test]
fn wait_times_out_while_running() {
    let scheduler = Scheduler::new(
        SchedulerConfig::default()
            .with_worker_threads(1)
            .with_max_concurrent_analyses(1),
    )
    .unwrap();
    let dialect = dialect_for("sql92").unwrap();
    let case = dialect.find_analysis_case::<Script>().unwrap();
    let source = long_script(50_000);

    let handle = dialect.prepare_analysis(&source, &case).unwrap().start(&scheduler);
    if handle.wait(Some(Duration::from_millis(1))).is_none() {
        assert!(handle.cancel() || handle.is_finished());
    }
    assert!(handle.wait(Some(WAIT)).is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn async_results_on_caller_runtime() {
    let scheduler = Scheduler::with_runtime(Handle::current(), SchedulerConfig::default());
    let dialect = dialect_for("sqlite").unwrap();
    let case = dialect.find_analysis_case::<Script>().unwrap();

    let mut analysis = dialect
        .prepare_analysis(&Source::from("SELECT 1; SELECT 2"), &case)
        .unwrap();
    let handle = analysis.start(&scheduler);
    let script = handle.result().await.unwrap();
    assert_eq!(script.statements.len(), 2);

    let timed = handle.result_timeout(Duration::from_millis(10)).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&script, &timed));
}

#[tokio::test(flavor = "multi_thread")]
async fn async_cancel_is_observed_by_awaiting_callers() {
    let scheduler = Scheduler::with_runtime(Handle::current(), SchedulerConfig::default());
    let dialect = dialect_for("sql92").unwrap();
    let case = dialect.find_analysis_case::<Script>().unwrap();
    let source = long_script(100_000);

    let handle = dialect.prepare_analysis(&source, &case).unwrap().start(&scheduler);
    let waiter = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.result().await })
    };
    assert!(handle.result_timeout(Duration::from_millis(20)).await.is_none());
    assert!(handle.cancel());

    let err = waiter.await.unwrap().unwrap_err();
    assert_eq!(err.kind, AnalysisErrorKind::Cancelled);
    assert!(handle.result().await.unwrap_err().is_cancelled());
}
