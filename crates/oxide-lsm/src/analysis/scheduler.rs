//! The worker pool analyses run on.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Semaphore;
use tracing::debug;

use super::{AnalysisCase, AnalysisError, AnalysisHandle};
use crate::dialect::StatementModel;
use crate::source::SourceReader;

/// Stack size of an owned runtime's threads: room for the deepest nesting
/// the grammar accepts, in unoptimized builds too.
pub const DEFAULT_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Worker threads of an owned runtime.
    pub worker_threads: usize,
    /// How many analyses may parse at the same time.
    pub max_concurrent_analyses: usize,
    /// Name given to the owned runtime's threads.
    pub thread_name: String,
    /// Stack size of the owned runtime's threads, parses included.
    pub stack_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let parallelism = thread::available_parallelism().map_or(4, NonZeroUsize::get);
        Self {
            worker_threads: parallelism,
            max_concurrent_analyses: parallelism,
            thread_name: String::from("oxide-lsm-worker"),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl SchedulerConfig {
    #[must_use]
    pub const fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    #[must_use]
    pub const fn with_max_concurrent_analyses(mut self, max: usize) -> Self {
        self.max_concurrent_analyses = max;
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    #[must_use]
    pub const fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Returns a multi-thread runtime builder with these settings.
    ///
    /// [`Scheduler::new`] builds its runtime this way; callers that pass their
    /// own runtime to [`Scheduler::with_runtime`] should too.
    #[must_use]
    pub fn runtime_builder(&self) -> Builder {
        let mut builder = Builder::new_multi_thread();
        builder
            .worker_threads(self.worker_threads.max(1))
            .thread_name(self.thread_name.clone())
            .thread_stack_size(self.stack_size)
            .enable_all();
        builder
    }
}

/// Settles an analysis that is dropped before it produced an outcome, as
/// happens to queued work when the runtime shuts down or to a parse that
/// panics.
///
/// Travels with the analysis from the queued task into the blocking parse,
/// so whichever of the two is dropped unfinished settles the handle.
struct Unsettled<M>(AnalysisHandle<M>);

impl<M> Unsettled<M> {
    const fn handle(&self) -> &AnalysisHandle<M> {
        &self.0
    }
}

impl<M> Drop for Unsettled<M> {
    fn drop(&mut self) {
        let err = AnalysisError::internal("analysis abandoned before it settled");
        if self.0.settle(Err(err)) {
            debug!(id = self.0.id(), "analysis dropped unsettled");
        }
    }
}


/// Runs analyses in the background.
///
/// Each analysis is a task that waits for one of
/// `max_concurrent_analyses` slots, then parses on the runtime's blocking
/// pool. Callers only ever interact with the returned [`AnalysisHandle`].
///
/// A scheduler created with [`Scheduler::new`] owns its runtime and must be
/// dropped outside of async code. Dropping it settles every analysis that has
/// not started parsing with an `Internal` error; running parses finish first.
#[derive(Debug)]
pub struct Scheduler {
    runtime: Handle,
    _owned: Option<Runtime>,
    permits: Arc<Semaphore>,
    next_id: AtomicU64,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Creates a scheduler with its own multi-thread runtime.
    pub fn new(config: SchedulerConfig) -> Result<Self, AnalysisError> {
        let runtime = config.runtime_builder().build()?;
        debug!(
            workers = config.worker_threads,
            max_concurrent = config.max_concurrent_analyses,
            "scheduler runtime started"
        );
        Ok(Self::build(runtime.handle().clone(), Some(runtime), config))
    }

    /// Creates a scheduler that spawns onto an existing runtime.
    ///
    /// Parses run on that runtime's blocking pool, so deep input needs the
    /// thread stacks [`SchedulerConfig::runtime_builder`] sets up. Only
    /// `max_concurrent_analyses` is read from `config` here.
    #[must_use]
    pub fn with_runtime(runtime: Handle, config: SchedulerConfig) -> Self {
        Self::build(runtime, None, config)
    }

    fn build(runtime: Handle, owned: Option<Runtime>, config: SchedulerConfig) -> Self {
        Self {
            runtime,
            _owned: owned,
            permits: Arc::new(Semaphore::new(config.max_concurrent_analyses.max(1))),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Submits a parse of `reader` with `case` and returns its handle.
    pub fn submit<M: StatementModel>(
        &self,
        case: AnalysisCase<M>,
        reader: SourceReader,
    ) -> AnalysisHandle<M> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = AnalysisHandle::new(id);
        debug!(id, dialect = case.dialect(), model = %M::KIND, "analysis submitted");

        let task = Unsettled(handle.clone());
        let permits = Arc::clone(&self.permits);
        self.runtime.spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = task.handle().result() => return,
                permit = permits.acquire_owned() => permit,
            };
            let Ok(permit) = permit else {
                task.handle().settle(Err(AnalysisError::internal("scheduler is shut down")));
                return;
            };

            debug!(id, "analysis started");
            let started = Instant::now();
            let worker = task.handle().clone();
            let joined = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let outcome = case.run(reader, task.handle().cancel_flag());
                let error = outcome.as_ref().err().map(|err| err.kind);
                (task.handle().settle(outcome), error)
            })
            .await;

            match joined {
                Ok((settled, error)) => debug!(
                    id,
                    elapsed = ?started.elapsed(),
                    ?error,
                    settled,
                    "analysis finished"
                ),
                Err(err) => {
                    worker.settle(Err(AnalysisError::internal(format!(
                        "analysis worker failed: {err}"
                    ))));
                }
            }
        });

        handle
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::analysis::AnalysisErrorKind;
    use crate::ast::{Script, SelectStatement};
    use crate::dialect::dialect_for;

    fn scheduler(max: usize) -> Scheduler {
        Scheduler::new(
            SchedulerConfig::default()
                .with_worker_threads(2)
                .with_max_concurrent_analyses(max),
        )
        .unwrap()
    }

    fn case() -> AnalysisCase<SelectStatement> {
        dialect_for("sqlite")
            .unwrap()
            .find_analysis_case::<SelectStatement>()
            .unwrap()
    }

    #[test]
    fn test_submit_completes() {
        let scheduler = scheduler(2);
        let handle = scheduler.submit(case(), SourceReader::new("SELECT a FROM t"));
        let select = handle.wait(Some(Duration::from_secs(5))).unwrap().unwrap();
        assert_eq!(select.columns.len(), 1);
        assert!(handle.is_finished());
    }

    #[test]
    fn test_ids_are_distinct() {
        let scheduler = scheduler(2);
        let first = scheduler.submit(case(), SourceReader::new("SELECT 1"));
        let second = scheduler.submit(case(), SourceReader::new("SELECT 2"));
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_cancel_while_queued_never_runs() {
        let scheduler = scheduler(1);
        let held = Arc::clone(&scheduler.permits).try_acquire_owned().unwrap();

        let handle = scheduler.submit(case(), SourceReader::new("SELECT a FROM t"));
        assert!(handle.wait(Some(Duration::from_millis(50))).is_none());
        assert!(handle.cancel());
        drop(held);

        for _ in 0..3 {
            let err = handle.wait(Some(Duration::from_secs(1))).unwrap().unwrap_err();
            assert_eq!(err.kind, AnalysisErrorKind::Cancelled);
        }
        assert!(!handle.cancel());
    }

    #[test]
    fn test_dropping_scheduler_settles_queued_analyses() {
        let scheduler = scheduler(1);
        let held = Arc::clone(&scheduler.permits).try_acquire_owned().unwrap();

        let queued = scheduler.submit(case(), SourceReader::new("SELECT a FROM t"));
        assert!(queued.wait(Some(Duration::from_millis(50))).is_none());
        drop(scheduler);
        drop(held);

        let err = queued.wait(Some(Duration::from_secs(1))).unwrap().unwrap_err();
        assert_eq!(err.kind, AnalysisErrorKind::Internal);
        assert!(!queued.cancel());
    }

    #[test]
    fn test_cancel_while_running_frees_the_slot() {
        let scheduler = scheduler(1);
        let script = dialect_for("sql92")
            .unwrap()
            .find_analysis_case::<Script>()
            .unwrap();
        let text = "SELECT a, b + 1 FROM t x JOIN u ON x.id = u.id WHERE c IN (1, 2);\n"
            .repeat(100_000);

        let running = scheduler.submit(script, SourceReader::new(text.as_str()));
        wait_until(|| scheduler.permits.available_permits() == 0);
        assert!(running.cancel());
        wait_until(|| scheduler.permits.available_permits() == 1);
        assert!(running.poll().unwrap().unwrap_err().is_cancelled());

        let next = scheduler.submit(case(), SourceReader::new("SELECT a FROM t"));
        assert!(next.wait(Some(Duration::from_secs(5))).unwrap().is_ok());
    }

    fn wait_until(condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "condition never held");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default()
            .with_thread_name("test-pool")
            .with_stack_size(4 * 1024 * 1024);
        assert!(config.worker_threads >= 1);
        assert_eq!(config.max_concurrent_analyses, config.worker_threads);
        assert_eq!(config.thread_name, "test-pool");
        assert_eq!(config.stack_size, 4 * 1024 * 1024);
        assert_eq!(SchedulerConfig::default().stack_size, DEFAULT_STACK_SIZE);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_with_runtime_handle() {
        let scheduler = Scheduler::with_runtime(Handle::current(), SchedulerConfig::default());
        let handle = scheduler.submit(case(), SourceReader::new("SELECT a FROM t WHERE"));
        let err = handle.result().await.unwrap_err();
        assert_eq!(err.kind, AnalysisErrorKind::Syntax);
    }
}
