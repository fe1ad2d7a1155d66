//! Observer capability model.
//!
//! An [`Observer`] is anything that can receive forwarded invocations. The
//! trait replaces runtime selector introspection with an explicit
//! capability set: an observer declares which operations it handles via
//! [`Observer::ops`], and the dispatcher asks [`Observer::responds_to`]
//! before scheduling a delivery.

use crate::invocation::Invocation;
use crate::op::OpId;
use std::any::Any;
use std::sync::Arc;

/// A receiver of forwarded invocations.
///
/// Observers are registered with a dispatcher together with the execution
/// context their callbacks should run on. The dispatcher never calls
/// [`Observer::handle`] on the registering or forwarding thread; delivery
/// always goes through the bound context.
///
/// # Capability
///
/// The default [`Observer::responds_to`] is membership in
/// [`Observer::ops`]. Observers whose capability changes at runtime can
/// override `responds_to` directly; `count_for`-style queries always go
/// through it.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be registered as an `Observer`",
    label = "missing `Observer` implementation",
    note = "Observers must be `Send + Sync + 'static` and declare the operations they handle."
)]
pub trait Observer: Any + Send + Sync {
    /// The set of operations this observer currently handles.
    fn ops(&self) -> &[OpId];

    /// Capability query: can this observer handle `op` right now?
    fn responds_to(&self, op: OpId) -> bool {
        self.ops().contains(&op)
    }

    /// Handle one forwarded invocation.
    ///
    /// Runs on the execution context the observer was registered with.
    /// Panics are caught at the dispatch boundary and do not affect other
    /// observers or the forwarding caller.
    fn handle(&self, invocation: Invocation);
}

/// Shared handle to a registered observer.
///
/// Registry identity is the allocation address of the `Arc`, so the same
/// observer value cloned into two separate `Arc`s counts as two distinct
/// observers, while clones of one `Arc` are the same observer.
pub type ObserverRef = Arc<dyn Observer>;

impl dyn Observer {
    /// Whether the underlying concrete type is `K`.
    pub fn is<K: Observer>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<K>()
    }

    /// Borrow the observer as its concrete type, if it is a `K`.
    pub fn downcast_ref<K: Observer>(&self) -> Option<&K> {
        let any: &dyn Any = self;
        any.downcast_ref::<K>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PING: OpId = OpId::new("ping");
    const PONG: OpId = OpId::new("pong");

    struct PingObserver;

    impl Observer for PingObserver {
        fn ops(&self) -> &[OpId] {
            const OPS: &[OpId] = &[PING];
            OPS
        }

        fn handle(&self, _invocation: Invocation) {}
    }

    #[test]
    fn responds_to_defaults_to_op_set_membership() {
        let observer = PingObserver;
        assert!(observer.responds_to(PING));
        assert!(!observer.responds_to(PONG));
    }

    #[test]
    fn dyn_observer_downcasts_to_concrete_type() {
        let observer: ObserverRef = Arc::new(PingObserver);
        assert!(observer.is::<PingObserver>());
        assert!(observer.downcast_ref::<PingObserver>().is_some());
    }
}
