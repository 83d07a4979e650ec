//! Per-session in-flight work counter.
//!
//! The undo/redo controller must not replay history while a mutation
//! is still pending, or two writes to the same row could interleave.
//! The gate counts the session's own in-flight remote calls; it is
//! scoped to one session, not the whole process, so an unrelated
//! background poll can never block (or race) this map's history.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cloneable handle to a session's in-flight counter.
#[derive(Debug, Clone, Default)]
pub struct InFlightGate {
    count: Arc<AtomicUsize>,
}

/// RAII guard for one unit of in-flight work; decrements on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    count: Arc<AtomicUsize>,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one unit of work as in flight until the guard drops.
    pub fn begin(&self) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Number of units currently in flight.
    pub fn in_flight(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Whether the session has no pending work.
    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_scopes_the_in_flight_count() {
        let gate = InFlightGate::new();
        assert!(gate.is_idle());

        let outer = gate.begin();
        let inner = gate.begin();
        assert_eq!(gate.in_flight(), 2);

        drop(inner);
        assert_eq!(gate.in_flight(), 1);
        drop(outer);
        assert!(gate.is_idle());
    }

    #[test]
    fn clones_share_the_same_counter() {
        let gate = InFlightGate::new();
        let clone = gate.clone();
        let _guard = clone.begin();
        assert!(!gate.is_idle());
    }
}
