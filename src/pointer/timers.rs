use std::time::Instant;

/// Keyed cancellable deadlines. Scheduling a key that is already pending
/// replaces its deadline, so at most one timer per key is ever live.
///
/// The set is tiny (one entry per [`crate::pointer::TimerKey`]) so a flat
/// vector beats anything tree-shaped.
#[derive(Debug, Default)]
pub struct TimerSet<K> {
    entries: Vec<(K, Instant)>,
}

impl<K: Copy + Ord> TimerSet<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Schedule `key` to fire at `deadline`, cancelling any pending
    /// instance of the same key first.
    pub fn schedule(&mut self, key: K, deadline: Instant) {
        self.cancel(key);
        self.entries.push((key, deadline));
    }

    pub fn cancel(&mut self, key: K) {
        self.entries.retain(|(k, _)| *k != key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, key: K) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(_, at)| *at).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    /// Equal deadlines resolve in key order.
    pub fn pop_due(&mut self, now: Instant) -> Option<(K, Instant)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (_, at))| *at <= now)
            .min_by_key(|&(_, &(k, at))| (at, k))
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(idx))
    }
}
