//! Cooperative cancellation for rate requests.

use super::error::{RateError, RateResult};
use std::future::Future;
use tokio::sync::watch;

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a cancellation signal. Cheap to clone and share between
/// calls.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires. Never resolves if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}

/// Runs `operation` unless `signal` fires first.
///
/// A signal that has already fired fails immediately without polling the
/// operation. The operation is dropped on cancellation, not awaited.
pub async fn run_cancellable<F, T>(signal: Option<&CancelSignal>, operation: F) -> RateResult<T>
where
    F: Future<Output = RateResult<T>>,
{
    let Some(signal) = signal else {
        return operation.await;
    };
    if signal.is_cancelled() {
        return Err(RateError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = signal.cancelled() => Err(RateError::Cancelled),
        result = operation => result,
    }
}
