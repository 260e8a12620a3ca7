//! Background write-back queue for best-effort cache persistence.
//!
//! Cache writes must never block or fail the read path a caller is waiting
//! on, so they are submitted here and executed on a dedicated worker task.
//! Job failures are logged centrally and swallowed; nothing is retried.

use futures::future::BoxFuture;
use std::future::Future;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

/// A single queued cache write.
struct Job {
    /// Short label for log lines, e.g. `"recipe put"`.
    label: &'static str,
    fut: BoxFuture<'static, anyhow::Result<()>>,
    /// Present for flush markers; the worker signals completion through it.
    done: Option<oneshot::Sender<()>>,
}

/// Handle to the write-back worker. Clone-cheap.
#[derive(Clone)]
pub struct Writeback {
    tx: mpsc::UnboundedSender<Job>,
}

impl Writeback {
    /// Start the worker task and return a handle to it.
    ///
    /// The worker runs until every handle is dropped and the queue drains.
    pub fn start() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let start = Instant::now();
                match job.fut.await {
                    Ok(()) => {
                        debug!(task = job.label, elapsed = ?start.elapsed(), "cache write-back completed");
                    }
                    Err(e) => {
                        warn!(task = job.label, error = %e, "cache write-back failed");
                    }
                }
                if let Some(done) = job.done {
                    let _ = done.send(());
                }
            }
        });
        Self { tx }
    }

    /// Queue a write. Returns immediately; the job's outcome is only logged.
    pub fn submit<F>(&self, label: &'static str, fut: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let job = Job {
            label,
            fut: Box::pin(fut),
            done: None,
        };
        if self.tx.send(job).is_err() {
            error!(task = label, "write-back worker is gone, dropping cache write");
        }
    }

    /// Wait until every write submitted before this call has finished.
    ///
    /// Used at shutdown so pending cache writes are not lost, and by tests
    /// to let fire-and-forget writes settle before asserting on the store.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        let job = Job {
            label: "flush",
            fut: Box::pin(async { Ok(()) }),
            done: Some(done_tx),
        };
        if self.tx.send(job).is_ok() {
            let _ = done_rx.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn flush_waits_for_queued_jobs() {
        let writeback = Writeback::start();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            writeback.submit("test job", async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        writeback.flush().await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_jobs_do_not_stall_the_worker() {
        let writeback = Writeback::start();
        let counter = Arc::new(AtomicUsize::new(0));

        writeback.submit("failing job", async { Err(anyhow::anyhow!("boom")) });
        let c = counter.clone();
        writeback.submit("after failure", async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        writeback.flush().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn jobs_run_in_submission_order() {
        let writeback = Writeback::start();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..4 {
            let order = order.clone();
            writeback.submit("ordered job", async move {
                order.lock().unwrap().push(i);
                Ok(())
            });
        }

        writeback.flush().await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
