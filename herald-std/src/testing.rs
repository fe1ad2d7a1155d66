//! Testing utilities for Herald.
//!
//! This module provides utilities to make testing observers and dispatch
//! behavior easier.
//!
//! # Features
//!
//! - [`ManualContext`]: a context that queues tasks until the test pumps it
//! - [`CountingObserver`]: an observer that counts handled invocations
//! - [`RecordingObserver`]: an observer that records downcast arguments

use herald_core::{ExecutionContext, Invocation, Observer, OpId, Task};
use std::any::Any;
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Manual Context
// ============================================================================

/// A context that holds submitted tasks until the test runs them.
///
/// Nothing executes until [`run_next`](ManualContext::run_next) or
/// [`run_all`](ManualContext::run_all) is called, which makes
/// queue-affinity and non-blocking assertions deterministic: after a
/// forward, the delivery is visible as a pending task, and the observer
/// has demonstrably not yet run.
///
/// # Example
///
/// ```rust,ignore
/// let context = Arc::new(ManualContext::new("q1"));
/// delegate.add_on(observer, context.clone());
///
/// delegate.notify(PING, ());
/// assert_eq!(context.pending(), 1);   // scheduled, not yet delivered
/// context.run_all();                  // now it is
/// ```
pub struct ManualContext {
    label: String,
    queue: Mutex<VecDeque<Task>>,
}

impl ManualContext {
    /// Create a manual context with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of tasks waiting to be run.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Run the oldest pending task, if any. Returns whether one ran.
    pub fn run_next(&self) -> bool {
        // Pop under the lock, run outside it, so a task may re-submit.
        let task = self.queue.lock().unwrap().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run pending tasks in FIFO order until the queue is empty.
    ///
    /// Returns how many tasks ran, including any submitted while running.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl ExecutionContext for ManualContext {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, task: Task) {
        self.queue.lock().unwrap().push_back(task);
    }
}

// ============================================================================
// Counting Observer
// ============================================================================

/// An observer that counts the invocations it handles.
///
/// # Example
///
/// ```rust,ignore
/// let counter = Arc::new(CountingObserver::new(vec![PING]));
/// delegate.add_on(counter.clone(), context.clone());
///
/// delegate.notify_bare(PING);
/// context.run_all();
/// assert_eq!(counter.count(), 1);
/// ```
pub struct CountingObserver {
    ops: Vec<OpId>,
    count: Arc<AtomicUsize>,
}

impl CountingObserver {
    /// Create a counting observer responding to the given operations.
    pub fn new(ops: Vec<OpId>) -> Self {
        Self {
            ops,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of invocations handled so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Observer for CountingObserver {
    fn ops(&self) -> &[OpId] {
        &self.ops
    }

    fn handle(&self, _invocation: Invocation) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Recording Observer
// ============================================================================

/// An observer that records the downcast arguments of every invocation it
/// handles.
///
/// Invocations whose arguments are not an `A` are counted as
/// [`mismatches`](RecordingObserver::mismatches) instead of recorded.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Arc::new(RecordingObserver::<i32>::new(vec![NOTIFY]));
/// delegate.add_on(recorder.clone(), context.clone());
///
/// delegate.notify(NOTIFY, 5);
/// context.run_all();
/// assert_eq!(recorder.received(), vec![5]);
/// ```
pub struct RecordingObserver<A: Clone> {
    ops: Vec<OpId>,
    received: Arc<Mutex<Vec<A>>>,
    mismatches: Arc<AtomicUsize>,
}

impl<A: Clone> RecordingObserver<A> {
    /// Create a recording observer responding to the given operations.
    pub fn new(ops: Vec<OpId>) -> Self {
        Self {
            ops,
            received: Arc::new(Mutex::new(Vec::new())),
            mismatches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A clone of the recorded arguments, in delivery order.
    pub fn received(&self) -> Vec<A> {
        self.received.lock().unwrap().clone()
    }

    /// Number of recorded invocations.
    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// Number of invocations whose arguments failed to downcast to `A`.
    pub fn mismatches(&self) -> usize {
        self.mismatches.load(Ordering::SeqCst)
    }
}

impl<A: Any + Clone + Send + Sync> Observer for RecordingObserver<A> {
    fn ops(&self) -> &[OpId] {
        &self.ops
    }

    fn handle(&self, invocation: Invocation) {
        match invocation.args::<A>() {
            Some(args) => self.received.lock().unwrap().push(args.clone()),
            None => {
                self.mismatches.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PING: OpId = OpId::new("ping");

    #[test]
    fn manual_context_runs_tasks_in_fifo_order() {
        let context = ManualContext::new("manual-test");
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            context.execute(Box::new(move || order.lock().unwrap().push(i)));
        }

        assert_eq!(context.pending(), 3);
        assert_eq!(context.run_all(), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert!(!context.run_next());
    }

    #[test]
    fn recording_observer_counts_argument_mismatches() {
        let recorder = RecordingObserver::<i32>::new(vec![PING]);
        recorder.handle(Invocation::new(PING, 7i32));
        recorder.handle(Invocation::new(PING, "not an i32"));

        assert_eq!(recorder.received(), vec![7]);
        assert_eq!(recorder.mismatches(), 1);
    }
}
