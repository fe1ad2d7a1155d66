//! The multicast delegate: management API plus invocation fan-out.

use crate::context::default_context;
use crate::registry::{Registry, Snapshot, Visit};
use herald_core::{ContextRef, ExecutionContext, Invocation, Observer, ObserverRef, OpId};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// A dispatcher that fans invocations out to every registered observer.
///
/// Callers that own a delegate treat it as a stand-in for a single
/// observer of the relevant capability set: instead of calling one
/// observer's method, they [`notify`](MulticastDelegate::notify) the
/// delegate, which schedules one asynchronous call per responding
/// observer on that observer's own execution context and returns
/// immediately.
///
/// The management operations below are inherent methods of the delegate
/// itself and are never forwarded; only [`forward`](MulticastDelegate::forward)
/// and the `notify` conveniences enter the fan-out path.
///
/// # Example
///
/// ```rust,ignore
/// const DID_FIND: OpId = OpId::new("did_find_thing");
///
/// let delegate = MulticastDelegate::new();
/// delegate.add(logger);
/// delegate.add_on(renderer, render_context);
///
/// // Both observers receive this, each on its own context.
/// delegate.notify(DID_FIND, thing);
/// ```
pub struct MulticastDelegate {
    registry: Registry,
}

impl MulticastDelegate {
    /// Create a delegate with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Access the underlying registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register `observer` on the process-wide default context.
    ///
    /// Returns `false` when the exact (observer, default context) pair was
    /// already registered.
    pub fn add(&self, observer: ObserverRef) -> bool {
        self.registry.add(observer, default_context())
    }

    /// Register `observer` with callbacks delivered on `context`.
    pub fn add_on(&self, observer: ObserverRef, context: ContextRef) -> bool {
        self.registry.add(observer, context)
    }

    /// Remove `observer` from every context it was registered under.
    ///
    /// Returns how many entries were removed; unknown observers are a
    /// no-op.
    pub fn remove(&self, observer: &dyn Observer) -> usize {
        self.registry.remove(observer)
    }

    /// Remove only the exact (observer, context) pair.
    pub fn remove_from(&self, observer: &dyn Observer, context: &dyn ExecutionContext) -> bool {
        self.registry.remove_from(observer, context)
    }

    /// Remove every registration.
    pub fn remove_all(&self) {
        self.registry.remove_all();
    }

    /// Number of (observer, context) pairs.
    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Number of distinct observers, de-duplicated across contexts.
    pub fn count_observers(&self) -> usize {
        self.registry.count_observers()
    }

    /// Number of entries whose observer's concrete type is `K`.
    pub fn count_of<K: Observer>(&self) -> usize {
        self.registry.count_of::<K>()
    }

    /// Number of entries whose observer currently responds to `op`.
    pub fn count_for(&self, op: OpId) -> usize {
        self.registry.count_for(op)
    }

    /// Whether at least one registered observer responds to `op`.
    pub fn responds_to(&self, op: OpId) -> bool {
        self.registry.responds_to(op)
    }

    /// Capture an immutable copy of the current registrations.
    pub fn snapshot(&self) -> Snapshot {
        self.registry.snapshot()
    }

    /// Apply `visitor` to a snapshot of the registrations, in insertion
    /// order, stopping early on [`Visit::Stop`].
    pub fn enumerate(&self, visitor: impl FnMut(&ObserverRef, &ContextRef) -> Visit) {
        self.registry.enumerate(visitor);
    }

    /// Fan `invocation` out to every observer that responds to its op.
    ///
    /// Takes a snapshot of the registry, then schedules exactly one
    /// asynchronous call per matching entry on that entry's context, and
    /// returns immediately. Zero matching observers is a no-op, mirroring
    /// optional-method semantics. A removal that lands after the snapshot
    /// does not retract already-scheduled calls.
    ///
    /// Deliveries are independent: a panicking observer is caught and
    /// logged, and affects neither other observers nor the caller.
    pub fn forward(&self, invocation: Invocation) {
        let op = invocation.op();
        let snapshot = self.registry.snapshot();
        let mut scheduled = 0usize;
        for entry in snapshot.iter() {
            if !entry.observer().responds_to(op) {
                continue;
            }
            let observer = entry.observer().clone();
            let invocation = invocation.clone();
            entry.context().execute(Box::new(move || {
                let panicked =
                    catch_unwind(AssertUnwindSafe(move || observer.handle(invocation))).is_err();
                if panicked {
                    tracing::warn!(%op, "observer panicked while handling forwarded invocation");
                }
            }));
            scheduled += 1;
        }
        tracing::trace!(%op, scheduled, registered = snapshot.len(), "forwarded invocation");
    }

    /// Forward an invocation of `op` carrying `args`.
    pub fn notify<A: Any + Send + Sync>(&self, op: OpId, args: A) {
        self.forward(Invocation::new(op, args));
    }

    /// Forward an invocation of `op` with no arguments.
    pub fn notify_bare(&self, op: OpId) {
        self.forward(Invocation::bare(op));
    }
}

impl Default for MulticastDelegate {
    fn default() -> Self {
        Self::new()
    }
}
