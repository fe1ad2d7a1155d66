//! A serial execution context driven by a tokio task.

use herald_core::{ExecutionContext, Task};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::mpsc::{self, UnboundedSender};

/// A FIFO context that drains its queue on a spawned tokio task.
///
/// Offers the same contract as [`SerialContext`](crate::SerialContext) for
/// applications already running inside a tokio runtime: tasks run in
/// submission order on the runtime's workers instead of a dedicated
/// thread.
///
/// Observer callbacks are synchronous closures; a long-running callback
/// occupies a runtime worker for its duration, just as it would occupy the
/// serial context's thread.
pub struct TokioContext {
    label: String,
    tx: UnboundedSender<Task>,
}

impl TokioContext {
    /// Create a context draining on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, as `tokio::spawn` does.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<Task>();
        let worker_label = label.clone();
        tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                if catch_unwind(AssertUnwindSafe(task)).is_err() {
                    tracing::error!(context = %worker_label, "task panicked on tokio context");
                }
            }
        });
        Self { label, tx }
    }
}

impl ExecutionContext for TokioContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, task: Task) {
        if self.tx.send(task).is_err() {
            tracing::error!(context = %self.label, "context worker is gone, dropping task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn tasks_run_in_submission_order() {
        let context = TokioContext::new("tokio-test");
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let next = Arc::new(AtomicUsize::new(0));

        for i in 0..10 {
            let next = next.clone();
            let done_tx = done_tx.clone();
            context.execute(Box::new(move || {
                assert_eq!(next.swap(i + 1, Ordering::SeqCst), i);
                if i == 9 {
                    let _ = done_tx.send(());
                }
            }));
        }

        tokio::time::timeout(std::time::Duration::from_secs(2), done_rx.recv())
            .await
            .expect("queued tasks should drain")
            .unwrap();
        assert_eq!(next.load(Ordering::SeqCst), 10);
    }
}
