//! Type-erased invocations forwarded to observers.

use crate::op::OpId;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One forwarded call: an operation identity plus its argument tuple.
///
/// The arguments are type-erased so that a dispatcher can forward
/// operations it was never statically declared to support. Cloning is
/// cheap (the argument tuple sits behind an [`Arc`]), which is what makes
/// one-invocation-per-observer fan-out affordable.
///
/// Argument shape is a contract between the caller and the observers of an
/// operation; the core matches by operation identity only. An observer
/// that downcasts to the wrong type simply sees `None` from
/// [`Invocation::args`].
#[derive(Clone)]
pub struct Invocation {
    op: OpId,
    args: Arc<dyn Any + Send + Sync>,
}

impl Invocation {
    /// Create an invocation of `op` carrying `args`.
    ///
    /// Multi-argument operations pass a tuple.
    pub fn new<A: Any + Send + Sync>(op: OpId, args: A) -> Self {
        Self {
            op,
            args: Arc::new(args),
        }
    }

    /// Create an invocation of `op` carrying no arguments.
    pub fn bare(op: OpId) -> Self {
        Self::new(op, ())
    }

    /// The operation this invocation targets.
    pub fn op(&self) -> OpId {
        self.op
    }

    /// The arguments, downcast to their concrete type.
    ///
    /// Returns `None` when `A` is not the type the caller supplied.
    pub fn args<A: Any + Send + Sync>(&self) -> Option<&A> {
        self.args.downcast_ref::<A>()
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation").field("op", &self.op).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_downcast_to_supplied_type() {
        let inv = Invocation::new(OpId::new("notify"), (5u32, "hello"));
        assert_eq!(inv.args::<(u32, &str)>(), Some(&(5u32, "hello")));
        assert_eq!(inv.args::<String>(), None);
    }

    #[test]
    fn bare_invocation_carries_unit() {
        let inv = Invocation::bare(OpId::new("ping"));
        assert_eq!(inv.op().name(), "ping");
        assert_eq!(inv.args::<()>(), Some(&()));
    }

    #[test]
    fn clones_share_the_argument_tuple() {
        let inv = Invocation::new(OpId::new("notify"), vec![1, 2, 3]);
        let copy = inv.clone();
        assert_eq!(copy.args::<Vec<i32>>(), inv.args::<Vec<i32>>());
    }
}
