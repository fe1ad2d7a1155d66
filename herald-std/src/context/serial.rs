//! A serial execution context backed by a dedicated worker thread.

use herald_core::{ContextError, ExecutionContext, Task};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Sender};
use std::thread;

/// A FIFO context that runs every task on one named worker thread.
///
/// The serial-queue analogue: tasks run strictly in submission order, one
/// at a time, never on the submitting thread. A panicking task is caught
/// and logged and the worker keeps draining.
///
/// The worker thread is detached. It exits once every handle to the
/// context has been dropped and the remaining queued tasks have drained.
pub struct SerialContext {
    label: String,
    tx: Sender<Task>,
}

impl SerialContext {
    /// Spawn a serial context whose worker thread is named `label`.
    pub fn spawn(label: impl Into<String>) -> Result<Self, ContextError> {
        let label = label.into();
        let (tx, rx) = mpsc::channel::<Task>();
        let worker_label = label.clone();
        thread::Builder::new()
            .name(label.clone())
            .spawn(move || {
                while let Ok(task) = rx.recv() {
                    if catch_unwind(AssertUnwindSafe(task)).is_err() {
                        tracing::error!(context = %worker_label, "task panicked on serial context");
                    }
                }
            })
            .map_err(|source| ContextError::Spawn {
                label: label.clone(),
                source,
            })?;
        Ok(Self { label, tx })
    }
}

impl ExecutionContext for SerialContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, task: Task) {
        // The worker only exits after every sender is gone, so the channel
        // cannot be disconnected while `self` is alive.
        let _ = self.tx.send(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn tasks_run_in_submission_order_off_the_caller_thread() {
        let context = SerialContext::spawn("serial-test").unwrap();
        let (tx, rx) = mpsc::channel();

        let caller = thread::current().id();
        for i in 0..10 {
            let tx = tx.clone();
            context.execute(Box::new(move || {
                assert_ne!(thread::current().id(), caller);
                tx.send(i).unwrap();
            }));
        }

        for expected in 0..10 {
            let got = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(got, expected, "serial context must preserve FIFO order");
        }
    }

    #[test]
    fn worker_survives_a_panicking_task() {
        let context = SerialContext::spawn("serial-panic-test").unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        context.execute(Box::new(|| panic!("intentional failure")));
        let ran_clone = ran.clone();
        context.execute(Box::new(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
            tx.send(()).unwrap();
        }));

        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
