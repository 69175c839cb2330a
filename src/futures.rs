//! Pending deletion futures
//!
//! Deletions are issued asynchronously and collected in a [`Futures`]
//! set. Callers decide when to wait for them with
//! [`Futures::block_for_pending`]; the node sweeper waits after every key.

use std::future::Future;

use tokio::task::JoinSet;

use crate::{Error, Result};

/// Collector for in-flight asynchronous deletions.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Futures {
    pending: JoinSet<Result<()>>,
}

impl Futures {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `future` and register it as pending.
    pub fn add<F>(&mut self, future: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.pending.spawn(future);
    }

    /// Number of registered futures that have not been awaited yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for every pending future to finish.
    ///
    /// All futures are drained even if some fail.
    ///
    /// # Errors
    ///
    /// Returns the first failure observed, or [`Error::Other`] if a
    /// deletion task panicked.
    pub async fn block_for_pending(&mut self) -> Result<()> {
        let mut first_error = None;
        while let Some(joined) = self.pending.join_next().await {
            let outcome = joined
                .map_err(|e| Error::Other(format!("deletion task failed: {e}")))
                .and_then(|result| result);
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_block_for_pending_waits_for_all() {
        let done = Arc::new(AtomicUsize::new(0));
        let mut futures = Futures::new();

        for _ in 0..10 {
            let done = Arc::clone(&done);
            futures.add(async move {
                tokio::task::yield_now().await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        assert_eq!(futures.pending(), 10);

        futures.block_for_pending().await.unwrap();

        assert!(futures.is_empty());
        assert_eq!(done.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_block_for_pending_reports_first_error_and_drains() {
        let mut futures = Futures::new();
        futures.add(async { Err(Error::Other("boom".to_string())) });
        futures.add(async { Ok(()) });

        let result = futures.block_for_pending().await;

        assert!(matches!(result, Err(Error::Other(msg)) if msg == "boom"));
        assert!(futures.is_empty());
    }

    #[tokio::test]
    async fn test_block_for_pending_when_empty() {
        let mut futures = Futures::new();
        assert!(futures.block_for_pending().await.is_ok());
    }
}
