//! Execution context abstraction.
//!
//! A context is a FIFO task runner: submit a zero-argument unit of work
//! and it runs later, in submission order relative to other work submitted
//! to the same context. A context may be backed by a dedicated thread, an
//! async task, or a thread pool feeding a serial queue; the dispatcher
//! only relies on the submit-and-forget contract.

/// A zero-argument unit of work scheduled onto an [`ExecutionContext`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A FIFO task runner an observer binds its callbacks to.
///
/// # Contract
///
/// - `execute` never runs the task inline on the calling thread.
/// - Tasks submitted through one context run in submission order relative
///   to each other. Nothing is ordered across contexts.
/// - Once accepted, a task eventually runs; there is no cancellation.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `ExecutionContext`",
    label = "missing `ExecutionContext` implementation",
    note = "Execution contexts accept tasks for eventual FIFO execution off the caller's thread."
)]
pub trait ExecutionContext: Send + Sync + 'static {
    /// Human-readable label, used in logs and thread names.
    fn label(&self) -> &str;

    /// Submit a task for eventual execution.
    fn execute(&self, task: Task);
}

/// Shared handle to an execution context.
///
/// As with observers, identity is the allocation address: registering an
/// observer twice under clones of the same `ContextRef` is one pair.
pub type ContextRef = std::sync::Arc<dyn ExecutionContext>;
