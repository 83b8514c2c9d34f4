//! Analyses and the scheduler that runs them.
//!
//! An [`AnalysisCase`] binds a dialect's entry rule to a model type. A case
//! and a [`Source`](crate::source::Source) make an [`Analysis`], which is
//! submitted to a [`Scheduler`] and observed through its [`AnalysisHandle`].

mod case;
mod error;
mod handle;
mod scheduler;
mod task;

pub use case::{AnalysisCase, AnalysisOutcome};
pub use error::{AnalysisError, AnalysisErrorKind};
pub use handle::AnalysisHandle;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use task::Analysis;
