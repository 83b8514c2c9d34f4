//! A single parse task.

use core::fmt;

use super::{AnalysisCase, AnalysisHandle, Scheduler};
use crate::dialect::StatementModel;
use crate::source::{Source, SourceReader};

enum State<M> {
    Prepared(SourceReader),
    Started(AnalysisHandle<M>),
}

/// One analysis of a source with a case, not yet or already submitted.
///
/// The analysis owns the reader it parses with; readers are never shared
/// between analyses.
pub struct Analysis<M> {
    case: AnalysisCase<M>,
    state: State<M>,
}

impl<M: StatementModel> Analysis<M> {
    pub(crate) fn new(source: &Source, case: AnalysisCase<M>) -> Self {
        Self {
            case,
            state: State::Prepared(source.reader()),
        }
    }

    #[must_use]
    pub const fn case(&self) -> &AnalysisCase<M> {
        &self.case
    }

    /// Submits the analysis to `scheduler`.
    ///
    /// Only the first call submits; later calls return the same handle.
    pub fn start(&mut self, scheduler: &Scheduler) -> AnalysisHandle<M> {
        let handle = match &self.state {
            State::Started(handle) => return handle.clone(),
            State::Prepared(reader) => scheduler.submit(self.case.clone(), reader.clone()),
        };
        self.state = State::Started(handle.clone());
        handle
    }

    /// Returns the handle once the analysis has been started.
    #[must_use]
    pub const fn handle(&self) -> Option<&AnalysisHandle<M>> {
        match &self.state {
            State::Started(handle) => Some(handle),
            State::Prepared(_) => None,
        }
    }
}

impl<M: StatementModel> fmt::Debug for Analysis<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analysis")
            .field("case", &self.case)
            .field("handle", &self.handle())
            .finish()
    }
}
