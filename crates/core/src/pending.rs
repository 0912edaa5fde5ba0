//! One-shot pending operations.
//!
//! A [`PendingOperation`] couples one in-flight platform request to the
//! script call that started it. The calling task suspends on it; the notify
//! layer resolves it with the finished envelope, waking the caller. The
//! first-poll-vs-resumed-poll distinction is carried in explicit state, not
//! re-derived: a poll that observes `Issued` parks the waker, a poll that
//! observes `Resolved` extracts the envelope without re-issuing anything.
//!
//! There is no cancellation. Dropping the future leaves the shared state
//! alive through the notify handle; a late platform callback still resolves
//! it exactly once and the stored result is simply never read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use extwin_protocol::Status;
use parking_lot::Mutex;

use crate::envelope::ResultEnvelope;

#[derive(Debug)]
enum OpState {
    /// Request issued, callback not yet received.
    Issued { waker: Option<Waker> },
    /// Callback received; envelope stable and re-readable until taken.
    Resolved(ResultEnvelope),
    /// Envelope handed to the caller.
    Taken,
}

/// State shared between a [`PendingOperation`] and the notify handle that
/// resolves it.
#[derive(Debug)]
pub(crate) struct OpShared {
    state: Mutex<OpState>,
}

impl OpShared {
    /// Stores the envelope and wakes the waiting call. A pending operation
    /// resolves exactly once; later calls are discarded.
    pub(crate) fn resolve(&self, envelope: ResultEnvelope) {
        let waker = {
            let mut state = self.state.lock();
            match &mut *state {
                OpState::Issued { waker } => {
                    let waker = waker.take();
                    *state = OpState::Resolved(envelope);
                    waker
                }
                OpState::Resolved(_) | OpState::Taken => {
                    tracing::warn!(
                        kind = ?envelope.kind(),
                        "duplicate resolution discarded; operations resolve exactly once"
                    );
                    return;
                }
            }
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        !matches!(*self.state.lock(), OpState::Issued { .. })
    }
}

impl Drop for OpShared {
    fn drop(&mut self) {
        // Reached when a detached operation (caller gone) finally resolves
        // and the notify handle releases the last reference.
        if let OpState::Resolved(envelope) = &*self.state.lock() {
            tracing::debug!(kind = ?envelope.kind(), "result of detached operation discarded");
        }
    }
}

/// The waiting side of one asynchronous platform call.
#[derive(Debug)]
pub struct PendingOperation {
    shared: Arc<OpShared>,
}

impl PendingOperation {
    pub(crate) fn new() -> (PendingOperation, Arc<OpShared>) {
        let shared = Arc::new(OpShared {
            state: Mutex::new(OpState::Issued { waker: None }),
        });
        (
            PendingOperation {
                shared: Arc::clone(&shared),
            },
            shared,
        )
    }

    /// `false` until the platform callback has fired.
    pub fn is_finished(&self) -> bool {
        self.shared.is_finished()
    }

    /// Status of the finished operation; `None` while still in flight.
    pub fn status(&self) -> Option<Status> {
        match &*self.shared.state.lock() {
            OpState::Issued { .. } | OpState::Taken => None,
            OpState::Resolved(envelope) => Some(envelope.status()),
        }
    }
}

impl Future for PendingOperation {
    type Output = ResultEnvelope;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock();
        match &mut *state {
            OpState::Issued { waker } => {
                *waker = Some(cx.waker().clone());
                Poll::Pending
            }
            OpState::Resolved(_) => {
                let OpState::Resolved(envelope) = std::mem::replace(&mut *state, OpState::Taken)
                else {
                    unreachable!("state checked above");
                };
                Poll::Ready(envelope)
            }
            OpState::Taken => {
                tracing::warn!("pending operation polled after completion");
                Poll::Pending
            }
        }
    }
}
