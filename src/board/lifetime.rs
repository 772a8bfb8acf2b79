use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use super::errors::{BoardError, BoardResult};

/// Liveness token shared by a board and the operations it starts.
///
/// Once cancelled, in-flight operations resolve to [`BoardError::Cancelled`]
/// and their results are dropped instead of being applied.
#[derive(Clone, Debug)]
pub struct Lifetime {
    alive: Arc<watch::Sender<bool>>,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifetime {
    pub fn new() -> Self {
        let (alive, _) = watch::channel(true);
        Self {
            alive: Arc::new(alive),
        }
    }

    pub fn cancel(&self) {
        self.alive.send_replace(false);
    }

    pub fn is_alive(&self) -> bool {
        *self.alive.borrow()
    }

    /// Resolves once [`Lifetime::cancel`] has been called on any clone.
    pub async fn cancelled(&self) {
        let mut receiver = self.alive.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = receiver.wait_for(|alive| !*alive).await;
    }

    pub fn ensure_alive(&self) -> BoardResult<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(BoardError::Cancelled)
        }
    }

    /// Run `operation` unless the lifetime ends first. A result that arrives
    /// after cancellation is discarded.
    pub async fn guard<F: Future>(&self, operation: F) -> BoardResult<F::Output> {
        self.ensure_alive()?;

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(BoardError::Cancelled),
            output = operation => {
                self.ensure_alive()?;
                Ok(output)
            }
        }
    }
}
