//! Analysis cases: a dialect's entry rule for one model type.

use core::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::AnalysisError;
use crate::dialect::{ModelKind, StatementModel};
use crate::grammar::{Grammar, Rule, Syntax};
use crate::source::{Source, SourceReader};

/// What an analysis settles to: a shared model or the reason there is none.
pub type AnalysisOutcome<M> = Result<Arc<M>, AnalysisError>;

/// A dialect's entry rule for the model type `M`.
///
/// Cases hold no per-analysis state, so one case can drive any number of
/// concurrent analyses.
pub struct AnalysisCase<M> {
    dialect: Arc<str>,
    syntax: Arc<Syntax>,
    entry: Rule<M>,
}

impl<M: StatementModel> AnalysisCase<M> {
    pub(crate) fn new(dialect: &str, syntax: Arc<Syntax>, entry: Rule<M>) -> Self {
        Self {
            dialect: Arc::from(dialect),
            syntax,
            entry,
        }
    }

    /// Returns the name of the dialect the case belongs to.
    #[must_use]
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        M::KIND
    }

    #[must_use]
    pub const fn syntax(&self) -> &Arc<Syntax> {
        &self.syntax
    }

    /// Runs the entry rule over `reader` on the calling thread.
    ///
    /// The input must be consumed completely (a trailing `;` is allowed).
    /// Setting `cancel` makes the run stop at its next rule attempt.
    pub fn run(&self, reader: SourceReader, cancel: Arc<AtomicBool>) -> AnalysisOutcome<M> {
        let mut grammar = Grammar::new(reader, Arc::clone(&self.syntax), cancel);
        grammar
            .run(self.entry)
            .map(Arc::new)
            .map_err(AnalysisError::from)
    }

    /// Parses `source` synchronously.
    pub fn parse(&self, source: &Source) -> AnalysisOutcome<M> {
        self.run(source.reader(), Arc::new(AtomicBool::new(false)))
    }
}

impl<M> Clone for AnalysisCase<M> {
    fn clone(&self) -> Self {
        Self {
            dialect: Arc::clone(&self.dialect),
            syntax: Arc::clone(&self.syntax),
            entry: self.entry,
        }
    }
}

impl<M: StatementModel> fmt::Debug for AnalysisCase<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisCase")
            .field("dialect", &self.dialect)
            .field("model", &M::KIND)
            .finish_non_exhaustive()
    }
}
