//! Observer registry: exclusive-lock mutation, snapshot dispatch.
//!
//! The registry owns the ordered sequence of (observer, context) pairs.
//! Every structural read and write happens under one exclusive lock; the
//! lock is never held while observer code runs, so observers are free to
//! add and remove registrations from inside their own callbacks.

use herald_core::{ContextRef, ExecutionContext, Observer, ObserverRef, OpId};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A registered (observer, context) pair.
///
/// Immutable once created. Identity is the pair: the same observer may be
/// registered several times under different contexts, and each pairing is
/// its own entry.
#[derive(Clone)]
pub struct Entry {
    observer: ObserverRef,
    context: ContextRef,
}

impl Entry {
    fn new(observer: ObserverRef, context: ContextRef) -> Self {
        Self { observer, context }
    }

    /// The registered observer.
    pub fn observer(&self) -> &ObserverRef {
        &self.observer
    }

    /// The context its callbacks run on.
    pub fn context(&self) -> &ContextRef {
        &self.context
    }
}

// Identity is the allocation address. `Arc::ptr_eq` would also compare
// vtable pointers, which may differ for one allocation across codegen
// units, so compare data addresses only.
fn same_observer(a: &ObserverRef, b: &dyn Observer) -> bool {
    ptr::addr_eq(Arc::as_ptr(a), b as *const dyn Observer)
}

fn same_context(a: &ContextRef, b: &dyn ExecutionContext) -> bool {
    ptr::addr_eq(Arc::as_ptr(a), b as *const dyn ExecutionContext)
}

/// Outcome of one visitor call during [`Registry::enumerate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Continue with the next entry.
    Next,
    /// Stop the enumeration early.
    Stop,
}

/// A point-in-time immutable copy of the registry's entries.
///
/// Taken under the registry lock, iterated outside it. Registry mutations
/// after the snapshot was captured are never reflected in it.
pub struct Snapshot {
    entries: Vec<Entry>,
}

impl Snapshot {
    /// Iterate the captured entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot captured no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Snapshot {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The ordered, thread-safe set of (observer, context) pairs.
///
/// Insertion order is preserved for enumeration determinism. All methods
/// take `&self`; the registry is meant to be shared behind an `Arc` (or
/// owned by a `MulticastDelegate`) and mutated concurrently with dispatch.
pub struct Registry {
    entries: Mutex<Vec<Entry>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    // The lock is only held around structural reads/writes, so the
    // sequence is consistent even if a holder panicked; recover instead
    // of propagating the poison.
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert the (observer, context) pair unless it is already present.
    ///
    /// Returns `true` if the pair was inserted. Re-adding an exact pair is
    /// a silent no-op; the same observer under a different context is a
    /// new entry.
    pub fn add(&self, observer: ObserverRef, context: ContextRef) -> bool {
        let mut entries = self.lock();
        let duplicate = entries.iter().any(|e| {
            same_observer(&e.observer, observer.as_ref())
                && same_context(&e.context, context.as_ref())
        });
        if duplicate {
            return false;
        }
        entries.push(Entry::new(observer, context));
        true
    }

    /// Remove every entry for `observer`, across all contexts.
    ///
    /// Returns how many entries were removed; removing an unregistered
    /// observer is a no-op.
    pub fn remove(&self, observer: &dyn Observer) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| !same_observer(&e.observer, observer));
        before - entries.len()
    }

    /// Remove only the exact (observer, context) pair.
    ///
    /// Returns whether a matching entry existed.
    pub fn remove_from(&self, observer: &dyn Observer, context: &dyn ExecutionContext) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| {
            !(same_observer(&e.observer, observer) && same_context(&e.context, context))
        });
        before != entries.len()
    }

    /// Remove every entry.
    pub fn remove_all(&self) {
        self.lock().clear();
    }

    /// Number of (observer, context) pairs.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of distinct observers, de-duplicated across contexts.
    pub fn count_observers(&self) -> usize {
        let entries = self.lock();
        let mut seen: Vec<*const ()> = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            let addr = Arc::as_ptr(&entry.observer) as *const ();
            if !seen.contains(&addr) {
                seen.push(addr);
            }
        }
        seen.len()
    }

    /// Number of entries whose observer's concrete type is `K`.
    pub fn count_of<K: Observer>(&self) -> usize {
        self.lock().iter().filter(|e| e.observer.is::<K>()).count()
    }

    /// Number of entries whose observer currently responds to `op`.
    pub fn count_for(&self, op: OpId) -> usize {
        self.lock()
            .iter()
            .filter(|e| e.observer.responds_to(op))
            .count()
    }

    /// Whether at least one registered observer responds to `op`.
    pub fn responds_to(&self, op: OpId) -> bool {
        self.lock().iter().any(|e| e.observer.responds_to(op))
    }

    /// Capture an immutable copy of the current entries.
    ///
    /// The copy is taken under the lock and safe to iterate outside it;
    /// this is what dispatch runs against.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self.lock().clone(),
        }
    }

    /// Apply `visitor` to a snapshot of the entries, in insertion order.
    ///
    /// The visitor may stop early by returning [`Visit::Stop`]. Because it
    /// runs against a snapshot with the lock released, the visitor may
    /// freely mutate the registry; in-progress enumeration is unaffected.
    pub fn enumerate(&self, mut visitor: impl FnMut(&ObserverRef, &ContextRef) -> Visit) {
        let snapshot = self.snapshot();
        for entry in snapshot.iter() {
            if visitor(&entry.observer, &entry.context) == Visit::Stop {
                break;
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingObserver, ManualContext};

    const PING: OpId = OpId::new("ping");

    #[test]
    fn exact_pair_is_deduplicated() {
        let registry = Registry::new();
        let observer: ObserverRef = Arc::new(CountingObserver::new(vec![PING]));
        let context: ContextRef = Arc::new(ManualContext::new("q1"));

        assert!(registry.add(observer.clone(), context.clone()));
        assert!(!registry.add(observer.clone(), context.clone()));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn same_observer_under_two_contexts_is_two_entries() {
        let registry = Registry::new();
        let observer: ObserverRef = Arc::new(CountingObserver::new(vec![PING]));
        let q1: ContextRef = Arc::new(ManualContext::new("q1"));
        let q2: ContextRef = Arc::new(ManualContext::new("q2"));

        registry.add(observer.clone(), q1);
        registry.add(observer.clone(), q2);

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.count_observers(), 1);
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let registry = Registry::new();
        let observer: ObserverRef = Arc::new(CountingObserver::new(vec![PING]));
        let context: ContextRef = Arc::new(ManualContext::new("q1"));
        registry.add(observer.clone(), context);

        let snapshot = registry.snapshot();
        registry.remove_all();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.count(), 0);
    }
}
