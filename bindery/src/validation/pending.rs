//! Awaitable handle for whole-object validation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

/// Result of [`ValidationEngine::validate_all`](super::ValidationEngine::validate_all).
///
/// Resolves to `true` when the error map was empty after the pass. A panic
/// raised by a constraint during the pass resumes in the awaiting task.
#[derive(Debug)]
pub struct PendingValidation {
    state: PendingState,
}

#[derive(Debug)]
enum PendingState {
    Running(JoinHandle<bool>),
    Done(bool),
}

impl PendingValidation {
    pub(crate) fn running(handle: JoinHandle<bool>) -> Self {
        Self {
            state: PendingState::Running(handle),
        }
    }

    pub(crate) fn done(valid: bool) -> Self {
        Self {
            state: PendingState::Done(valid),
        }
    }
}

impl Future for PendingValidation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        match &mut self.state {
            PendingState::Done(valid) => Poll::Ready(*valid),
            PendingState::Running(handle) => match Pin::new(handle).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(valid)) => Poll::Ready(valid),
                Poll::Ready(Err(err)) if err.is_panic() => {
                    std::panic::resume_unwind(err.into_panic())
                }
                Poll::Ready(Err(err)) => {
                    log::warn!("[validation] whole-object pass did not complete: {}", err);
                    Poll::Ready(false)
                }
            },
        }
    }
}
