//! Bounded background task dispatcher.
//!
//! [`Dispatcher`] runs fire-and-forget side effects (emails, reaction
//! mirroring) outside the request task. Jobs go into a bounded
//! `tokio::sync::mpsc` queue drained by a fixed set of workers, so a burst
//! of requests can never spawn an unbounded number of tasks.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// A queued unit of background work.
pub type Job = BoxFuture<'static, ()>;

/// Default queue capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Default number of worker tasks.
pub const DEFAULT_WORKERS: usize = 4;

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Handle to the background worker pool. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    sender: mpsc::Sender<Job>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl Dispatcher {
    /// Start a pool with [`DEFAULT_CAPACITY`] and [`DEFAULT_WORKERS`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_WORKERS)
    }

    /// Start a pool with an explicit queue capacity and worker count.
    pub fn with_capacity(capacity: usize, workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        for worker in 0..workers {
            tracker.spawn(run_worker(worker, Arc::clone(&receiver), cancel.clone()));
        }
        tracker.close();

        Self {
            sender,
            cancel,
            tracker,
        }
    }

    /// Queue `job` without waiting.
    ///
    /// Returns `false` when the queue is full or the pool is shutting down;
    /// the job is dropped in that case.
    pub fn try_dispatch<F>(&self, name: &'static str, job: F) -> bool
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            tracing::warn!(job = name, "Dispatcher is shutting down, job dropped");
            return false;
        }
        match self.sender.try_send(Box::pin(job)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(job = name, "Background queue full, job dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(job = name, "Background queue closed, job dropped");
                false
            }
        }
    }

    /// Stop accepting work, let workers drain the queue, and wait for them
    /// up to `timeout`.
    pub async fn shutdown(&self, timeout: Duration) {
        self.cancel.cancel();
        if tokio::time::timeout(timeout, self.tracker.wait()).await.is_err() {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Background workers did not finish in time"
            );
        } else {
            tracing::info!("Background workers stopped");
        }
    }
}

// ---- private helpers ----

async fn run_worker(
    worker: usize,
    receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            job = async { receiver.lock().await.recv().await } => job,
        };
        match next {
            Some(job) => job.await,
            None => return,
        }
    }

    // Cancelled: run whatever is still queued, then exit.
    let mut drained = 0usize;
    loop {
        let job = receiver.lock().await.try_recv();
        match job {
            Ok(job) => {
                job.await;
                drained += 1;
            }
            Err(_) => break,
        }
    }
    tracing::debug!(worker, drained, "Background worker exiting");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn runs_dispatched_jobs() {
        let dispatcher = Dispatcher::start();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            assert!(dispatcher.try_dispatch("count", async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        dispatcher.shutdown(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn full_queue_drops_job() {
        // No workers, so nothing drains the single slot.
        let dispatcher = Dispatcher::with_capacity(1, 0);
        assert!(dispatcher.try_dispatch("first", async {}));
        assert!(!dispatcher.try_dispatch("second", async {}));
    }

    #[tokio::test]
    async fn rejects_jobs_after_shutdown() {
        let dispatcher = Dispatcher::with_capacity(4, 1);
        dispatcher.shutdown(Duration::from_secs(1)).await;
        assert!(!dispatcher.try_dispatch("late", async {}));
    }

    #[tokio::test]
    async fn shutdown_drains_queued_jobs() {
        let dispatcher = Dispatcher::with_capacity(16, 1);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            dispatcher.try_dispatch("slow", async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        dispatcher.shutdown(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
