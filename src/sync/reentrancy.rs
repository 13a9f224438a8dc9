//! Re-entrancy guard separating self-inflicted engine notifications from
//! user-originated ones.

use std::cell::Cell;
use std::rc::Rc;

/// Set exactly while the synchronization core is issuing engine commands.
///
/// Not a lock: the model is single-threaded, and the flag only tells the
/// notification handler that a change it sees was caused by the core's own
/// commands. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyFlag(Rc<Cell<bool>>);

impl ReentrancyFlag {
    /// A cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an outgoing command batch is in progress.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Set the flag until the returned guard is dropped.
    #[must_use = "the flag is cleared as soon as the guard is dropped"]
    pub fn enter(&self) -> ReentrancyGuard {
        let previous = self.0.replace(true);
        ReentrancyGuard {
            flag: Rc::clone(&self.0),
            previous,
        }
    }
}

/// Restores the flag on drop, including during unwinding.
#[derive(Debug)]
pub struct ReentrancyGuard {
    flag: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    #[test]
    fn guard_sets_and_clears() {
        let flag = ReentrancyFlag::new();
        assert!(!flag.is_set());
        {
            let _guard = flag.enter();
            assert!(flag.is_set());
        }
        assert!(!flag.is_set());
    }

    #[test]
    fn nested_guards_clear_only_at_the_outermost() {
        let flag = ReentrancyFlag::new();
        let outer = flag.enter();
        {
            let _inner = flag.enter();
        }
        assert!(flag.is_set());
        drop(outer);
        assert!(!flag.is_set());
    }

    #[test]
    fn clones_share_state() {
        let flag = ReentrancyFlag::new();
        let observer = flag.clone();
        let _guard = flag.enter();
        assert!(observer.is_set());
    }

    #[test]
    fn cleared_after_panic() {
        let flag = ReentrancyFlag::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = flag.enter();
            panic!("command failed");
        }));
        assert!(result.is_err());
        assert!(!flag.is_set());
    }
}
