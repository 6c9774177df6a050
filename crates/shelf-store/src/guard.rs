//! Handshake between a caller that may give up on a mutation and the
//! store that would commit it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const PENDING: u8 = 0;
const COMMITTING: u8 = 1;
const ABANDONED: u8 = 2;

/// Decides, exactly once, whether a mutation commits or is abandoned.
///
/// The store calls [`begin_commit`](Self::begin_commit) while holding its
/// writer lock, immediately before making the change visible. The caller
/// calls [`abandon`](Self::abandon) when it stops waiting. Whichever runs
/// first wins; the other observes the outcome.
#[derive(Clone, Debug, Default)]
pub struct CommitGuard {
    state: Option<Arc<AtomicU8>>,
}

impl CommitGuard {
    /// A guard that can be abandoned.
    pub fn new() -> Self {
        Self {
            state: Some(Arc::new(AtomicU8::new(PENDING))),
        }
    }

    /// A guard that always allows the commit.
    pub fn unguarded() -> Self {
        Self { state: None }
    }

    /// Store side. Returns `false` if the caller already abandoned the
    /// mutation, in which case nothing may be committed.
    pub fn begin_commit(&self) -> bool {
        match &self.state {
            None => true,
            Some(state) => state
                .compare_exchange(PENDING, COMMITTING, Ordering::AcqRel, Ordering::Acquire)
                .is_ok(),
        }
    }

    /// Caller side. Returns `true` if the mutation is now guaranteed not to
    /// commit; `false` if the store has already started committing.
    pub fn abandon(&self) -> bool {
        match &self.state {
            None => false,
            Some(state) => state
                .compare_exchange(PENDING, ABANDONED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_then_abandon_fails() {
        let guard = CommitGuard::new();
        assert!(guard.begin_commit());
        assert!(!guard.abandon());
    }

    #[test]
    fn abandon_then_commit_fails() {
        let guard = CommitGuard::new();
        let store_side = guard.clone();
        assert!(guard.abandon());
        assert!(!store_side.begin_commit());
    }

    #[test]
    fn unguarded_always_commits() {
        let guard = CommitGuard::unguarded();
        assert!(!guard.abandon());
        assert!(guard.begin_commit());
    }
}
