//! Singleflight for cache stampede protection
//!
//! Wraps the `async_singleflight` crate: concurrent callers with the same key
//! share one execution and all receive its outcome, failures included. A
//! failed resolution is therefore reported to every waiter at once instead of
//! being recomputed by each of them in turn.
//!
//! # Example
//! ```rust,ignore
//! let flights: SingleFlight<Manifest, String> = SingleFlight::new();
//! let manifest = flights.do_work("anime:watch;12345".to_string(), resolve()).await;
//! ```

use std::sync::Arc;

/// Error type for SingleFlight operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum SingleFlightError<E> {
    /// The leading caller was dropped or panicked
    #[error("SingleFlight worker failed - leader dropped or panicked")]
    WorkerFailed,
    /// The shared operation failed
    #[error("{0}")]
    Inner(E),
}

/// Deduplicates concurrent executions per cache key
pub struct SingleFlight<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    group: Arc<async_singleflight::Group<String, V, E>>,
}

impl<V, E> SingleFlight<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: Arc::new(async_singleflight::Group::new()),
        }
    }

    /// Run `work` unless a call for `key` is already in progress, in which
    /// case wait for that call's outcome
    pub async fn do_work<Fut>(&self, key: String, work: Fut) -> Result<V, SingleFlightError<E>>
    where
        Fut: std::future::Future<Output = Result<V, E>> + Send,
    {
        self.group.work(&key, work).await.map_err(|err| match err {
            Some(inner) => SingleFlightError::Inner(inner),
            None => SingleFlightError::WorkerFailed,
        })
    }

    /// Like [`do_work`](Self::do_work), with `on_abandoned` standing in for
    /// the error of a leader that went away
    pub async fn do_work_with_fallback<Fut, Ef>(
        &self,
        key: String,
        work: Fut,
        on_abandoned: Ef,
    ) -> Result<V, E>
    where
        Fut: std::future::Future<Output = Result<V, E>> + Send,
        Ef: FnOnce() -> E,
    {
        self.do_work(key, work).await.map_err(|e| match e {
            SingleFlightError::WorkerFailed => on_abandoned(),
            SingleFlightError::Inner(err) => err,
        })
    }
}

impl<V, E> Clone for SingleFlight<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            group: self.group.clone(),
        }
    }
}

impl<V, E> Default for SingleFlight<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
