//! Rate-limited request queue
//!
//! Every outbound vendor call is wrapped into a job and pushed onto a FIFO
//! channel. One worker task drains the channel, running a single job at a
//! time, and never starts more than `max_per_second` jobs inside a one-second
//! window. Each requester awaits only its own job's outcome.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::PlacesError;

const WINDOW: Duration = Duration::from_secs(1);

type Job = BoxFuture<'static, ()>;

/// FIFO queue that serializes vendor calls under a per-second budget
#[derive(Debug)]
pub struct RequestQueue {
    max_per_second: u32,
    sender: OnceLock<mpsc::UnboundedSender<Job>>,
    pending: Arc<AtomicUsize>,
}

impl RequestQueue {
    /// Create a queue allowing `max_per_second` calls per window (minimum 1)
    ///
    /// The worker task is spawned on first use, so the queue can be built
    /// outside a runtime.
    #[must_use]
    pub fn new(max_per_second: u32) -> Self {
        Self {
            max_per_second: max_per_second.max(1),
            sender: OnceLock::new(),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub const fn max_per_second(&self) -> u32 {
        self.max_per_second
    }

    /// Jobs queued but not yet started
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Queue `task` and wait for its result
    ///
    /// A failing or panicking task only affects its own caller; the worker
    /// logs it and moves on to the next job.
    pub async fn schedule<F, Fut, T>(&self, label: &'static str, task: F) -> Result<T, PlacesError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, PlacesError>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let job: Job = Box::pin(async move {
            let result = match AssertUnwindSafe(async move { task().await })
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(_) => {
                    error!(request = label, "Queued request panicked");
                    Err(PlacesError::RequestFailed(format!("{label} request panicked")))
                },
            };

            if let Err(ref e) = result {
                warn!(request = label, error = %e, "Queued request failed");
            }

            if tx.send(result).is_err() {
                debug!(request = label, "Requester went away before completion");
            }
        });

        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender().send(job).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(PlacesError::QueueClosed);
        }

        rx.await.map_err(|_| PlacesError::QueueClosed)?
    }

    fn sender(&self) -> &mpsc::UnboundedSender<Job> {
        self.sender.get_or_init(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            debug!(max_per_second = self.max_per_second, "Starting request queue worker");
            tokio::spawn(drain(rx, self.max_per_second, Arc::clone(&self.pending)));
            tx
        })
    }
}

/// Worker loop: one job at a time, at most `max_per_second` starts per window
///
/// The window opens with the first job started after the previous window
/// elapsed, so a burst can never exceed the budget within any window.
async fn drain(mut rx: mpsc::UnboundedReceiver<Job>, max_per_second: u32, pending: Arc<AtomicUsize>) {
    let mut window_start: Option<Instant> = None;
    let mut issued: u32 = 0;

    while let Some(job) = rx.recv().await {
        pending.fetch_sub(1, Ordering::SeqCst);

        match window_start {
            Some(start) if start.elapsed() < WINDOW => {
                if issued >= max_per_second {
                    let wait = WINDOW.saturating_sub(start.elapsed());
                    debug!(?wait, issued, "Request budget exhausted, waiting for next window");
                    tokio::time::sleep(wait).await;
                    window_start = Some(Instant::now());
                    issued = 0;
                }
            },
            _ => {
                window_start = Some(Instant::now());
                issued = 0;
            },
        }

        issued += 1;
        job.await;
    }

    debug!("Request queue worker stopped");
}
