//! Handles to submitted analyses.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::debug;

use super::{AnalysisError, AnalysisOutcome};

struct Shared<M> {
    id: u64,
    cancel: Arc<AtomicBool>,
    /// Write-once result slot.
    slot: watch::Sender<Option<AnalysisOutcome<M>>>,
    /// Wakes blocking waiters after the slot is settled.
    settled: (Mutex<()>, Condvar),
}

/// A handle to a submitted analysis.
///
/// The result slot is written exactly once, by whichever comes first: the
/// worker finishing or [`cancel`](Self::cancel). Every retrieval afterwards
/// returns a clone of the same outcome, so models are shared, never re-parsed.
pub struct AnalysisHandle<M> {
    shared: Arc<Shared<M>>,
}

impl<M> AnalysisHandle<M> {
    pub(crate) fn new(id: u64) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                id,
                cancel: Arc::new(AtomicBool::new(false)),
                slot,
                settled: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    /// Returns the id the scheduler assigned to the analysis.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub(crate) fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shared.cancel)
    }

    /// Writes the outcome unless the slot is already settled.
    ///
    /// Returns true if this call settled the slot.
    pub(crate) fn settle(&self, outcome: AnalysisOutcome<M>) -> bool {
        let settled = self.shared.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        });
        if settled {
            let (lock, condvar) = &self.shared.settled;
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            condvar.notify_all();
        }
        settled
    }

    /// Returns the outcome if the analysis has settled, without blocking.
    #[must_use]
    pub fn poll(&self) -> Option<AnalysisOutcome<M>> {
        self.shared.slot.borrow().clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.shared.slot.borrow().is_some()
    }

    /// Blocks the calling thread until the analysis settles.
    ///
    /// Returns `None` if `timeout` elapses first. Must not be called from
    /// inside an async context; use [`result`](Self::result) there.
    #[must_use]
    pub fn wait(&self, timeout: Option<Duration>) -> Option<AnalysisOutcome<M>> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let (lock, condvar) = &self.shared.settled;
        let mut guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(outcome) = self.poll() {
                return Some(outcome);
            }
            guard = match deadline {
                None => condvar.wait(guard).unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return None;
                    }
                    condvar
                        .wait_timeout(guard, remaining)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }

    /// Waits asynchronously for the analysis to settle.
    pub async fn result(&self) -> AnalysisOutcome<M> {
        let mut rx = self.shared.slot.subscribe();
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| Err(AnalysisError::internal("analysis result slot closed")))
    }

    /// Like [`result`](Self::result), giving up after `timeout`.
    pub async fn result_timeout(&self, timeout: Duration) -> Option<AnalysisOutcome<M>> {
        tokio::time::timeout(timeout, self.result()).await.ok()
    }

    /// Requests cancellation.
    ///
    /// A queued analysis never starts; a running one stops at its next rule
    /// attempt. Returns true if this call settled the slot to `Cancelled`,
    /// false if the analysis had already settled.
    pub fn cancel(&self) -> bool {
        self.shared.cancel.store(true, Ordering::Release);
        let settled = self.settle(Err(AnalysisError::cancelled()));
        if settled {
            debug!(id = self.shared.id, "analysis cancelled");
        }
        settled
    }
}

impl<M> Clone for AnalysisHandle<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M> fmt::Debug for AnalysisHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisHandle")
            .field("id", &self.shared.id)
            .field("finished", &self.is_finished())
            .finish()
    }
}
