use herald::{Invocation, Observer, OpId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

// ============================================================================
// Test Operations
// ============================================================================

pub const NOTIFY: OpId = OpId::new("notify");
pub const PING: OpId = OpId::new("ping");
pub const IGNORED: OpId = OpId::new("ignored");

// ============================================================================
// Test Observers
// ============================================================================

/// One delivered invocation, as seen from inside the observer.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub tag: &'static str,
    pub arg: i32,
    pub thread: Option<String>,
}

/// Sends a [`Signal`] over a channel for every handled invocation, so
/// tests can await asynchronous deliveries with a timeout.
pub struct SignalObserver {
    pub tag: &'static str,
    pub ops: Vec<OpId>,
    pub tx: Sender<Signal>,
}

impl Observer for SignalObserver {
    fn ops(&self) -> &[OpId] {
        &self.ops
    }

    fn handle(&self, invocation: Invocation) {
        let arg = invocation.args::<i32>().copied().unwrap_or(-1);
        let signal = Signal {
            tag: self.tag,
            arg,
            thread: thread::current().name().map(str::to_owned),
        };
        self.tx.send(signal).unwrap();
    }
}

/// Panics on every invocation it handles.
pub struct PanickyObserver {
    pub ops: Vec<OpId>,
}

impl Observer for PanickyObserver {
    fn ops(&self) -> &[OpId] {
        &self.ops
    }

    fn handle(&self, _invocation: Invocation) {
        panic!("intentional observer failure");
    }
}

/// An observer whose capability is gated on a runtime flag, for testing
/// that dispatch honors `responds_to` at forward time.
pub struct ToggleObserver {
    ops: [OpId; 1],
    enabled: AtomicBool,
    count: AtomicUsize,
}

impl ToggleObserver {
    pub fn new(op: OpId, enabled: bool) -> Self {
        Self {
            ops: [op],
            enabled: AtomicBool::new(enabled),
            count: AtomicUsize::new(0),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Observer for ToggleObserver {
    fn ops(&self) -> &[OpId] {
        &self.ops
    }

    fn responds_to(&self, op: OpId) -> bool {
        self.enabled.load(Ordering::SeqCst) && self.ops.contains(&op)
    }

    fn handle(&self, _invocation: Invocation) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Block until every task submitted to `context` before this call has run.
///
/// Relies on the context's FIFO guarantee: a marker task submitted now
/// runs only after everything already queued.
pub fn drain(context: &dyn herald::ExecutionContext) {
    let (tx, rx) = std::sync::mpsc::channel();
    context.execute(Box::new(move || tx.send(()).unwrap()));
    rx.recv_timeout(std::time::Duration::from_secs(2))
        .expect("context failed to drain in time");
}
