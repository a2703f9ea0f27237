use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct FrontierState {
    pending: Vec<String>,
    /// Every path ever accepted, only tracked when deduplication is on
    seen: Option<HashSet<String>>,
}

impl FrontierState {
    fn accept(&mut self, path: String) -> bool {
        if let Some(seen) = self.seen.as_mut()
            && !seen.insert(path.clone())
        {
            return false;
        }
        self.pending.push(path);
        true
    }
}

/// The shared stack of paths still waiting to be fetched.
///
/// Every push and pop goes through one mutex; the lock is never held across
/// I/O. The most recently pushed path is popped first.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A frontier that silently drops any path it has already accepted once.
    pub fn with_dedup() -> Self {
        Self {
            state: Mutex::new(FrontierState {
                pending: Vec::new(),
                seen: Some(HashSet::new()),
            }),
        }
    }

    pub fn is_dedup(&self) -> bool {
        self.lock().seen.is_some()
    }

    /// Returns false when the path was dropped as already seen.
    pub fn push(&self, path: String) -> bool {
        self.lock().accept(path)
    }

    /// Push a whole batch under a single lock acquisition. Returns how many were accepted.
    pub fn push_all<I>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut state = self.lock();
        let mut accepted = 0;
        for path in paths {
            if state.accept(path) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn pop(&self) -> Option<String> {
        self.lock().pending.pop()
    }

    /// Pop up to `max` paths at once, in the order `pop` would have returned them.
    pub fn drain_batch(&self, max: usize) -> Vec<String> {
        let mut state = self.lock();
        let keep = state.pending.len().saturating_sub(max);
        let mut batch = state.pending.split_off(keep);
        batch.reverse();
        batch
    }

    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Snapshot of the pending paths, bottom of the stack first
    pub fn pending(&self) -> Vec<String> {
        self.lock().pending.clone()
    }

    // Push and pop never leave the state half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
