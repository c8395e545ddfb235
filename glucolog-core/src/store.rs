//! Session-scoped, in-memory store of glucose logs.
//!
//! The store is a cheap handle around a [`tokio::sync::watch`] channel, so
//! every clone sees the same collection and every mutation wakes the
//! subscribed observers. Mutations are synchronous and replace the whole
//! collection in one step; observers never see a half-applied update.
//!
//! Ordering is display order: newest-created first. It is not sorted by
//! `taken_at`, and ids are not deduplicated.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::GlucoseLog;

#[derive(Debug, Clone)]
pub struct LogStore {
    logs: Arc<watch::Sender<Vec<GlucoseLog>>>,
}

impl LogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (logs, _) = watch::channel(Vec::new());
        Self {
            logs: Arc::new(logs),
        }
    }

    /// Discards the current collection and installs `logs` in the given order.
    pub fn replace_all(&self, logs: Vec<GlucoseLog>) {
        tracing::info!("Replacing log store with {} log(s)", logs.len());
        self.logs.send_replace(logs);
    }

    /// Inserts `log` at the head of the collection.
    pub fn prepend(&self, log: GlucoseLog) {
        tracing::debug!("Prepending log {}", log.id);
        self.logs.send_modify(|logs| logs.insert(0, log));
    }

    /// Removes every entry whose id equals `id`. Unknown ids are a no-op.
    ///
    /// Returns the number of entries removed.
    pub fn remove_by_id(&self, id: &str) -> usize {
        let mut removed = 0;
        self.logs.send_if_modified(|logs| {
            let before = logs.len();
            logs.retain(|log| log.id != id);
            removed = before - logs.len();
            removed > 0
        });
        tracing::debug!("Removed {} log(s) with id {}", removed, id);
        removed
    }

    /// Drops every entry, e.g. on logout.
    pub fn clear(&self) {
        self.replace_all(Vec::new());
    }

    /// Ordered copy of the current collection.
    pub fn snapshot(&self) -> Vec<GlucoseLog> {
        self.logs.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.logs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.borrow().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.logs.borrow().iter().any(|log| log.id == id)
    }

    /// Observer handle. `changed().await` resolves after each mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<GlucoseLog>> {
        self.logs.subscribe()
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: &str) -> GlucoseLog {
        GlucoseLog::new(id, 120, "fasting", "2025-01-01T08:00:00.000Z")
    }

    fn ids(store: &LogStore) -> Vec<String> {
        store.snapshot().into_iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = LogStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_replace_all_preserves_order() {
        let store = LogStore::new();
        store.prepend(log("old"));

        store.replace_all(vec![log("a"), log("b"), log("c")]);

        assert_eq!(ids(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replace_all_keeps_duplicates() {
        let store = LogStore::new();
        store.replace_all(vec![log("a"), log("a")]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let store = LogStore::new();
        store.replace_all(vec![log("a"), log("b")]);

        store.prepend(log("c"));
        store.prepend(log("d"));

        assert_eq!(ids(&store), vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_prepend_ignores_taken_at_order() {
        let store = LogStore::new();
        store.prepend(GlucoseLog::new("recent", 100, "random", "2025-06-01T00:00:00Z"));
        store.prepend(GlucoseLog::new("backdated", 100, "random", "2020-01-01T00:00:00Z"));

        assert_eq!(ids(&store), vec!["backdated", "recent"]);
    }

    #[test]
    fn test_prepend_same_id_twice_keeps_both() {
        let store = LogStore::new();
        store.prepend(log("a"));
        store.prepend(log("a"));
        assert_eq!(ids(&store), vec!["a", "a"]);
    }

    #[test]
    fn test_remove_by_id_removes_every_match() {
        let store = LogStore::new();
        store.replace_all(vec![log("a"), log("b"), log("a")]);

        assert_eq!(store.remove_by_id("a"), 2);
        assert_eq!(ids(&store), vec!["b"]);
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let store = LogStore::new();
        store.replace_all(vec![log("a"), log("b")]);
        let before = store.snapshot();

        assert_eq!(store.remove_by_id("zzz"), 0);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_mixed_prepend_remove_sequence() {
        let store = LogStore::new();
        store.replace_all(vec![log("x")]);

        let ops: &[(&str, bool)] = &[
            ("a", true),
            ("b", true),
            ("a", false),
            ("c", true),
            ("x", false),
            ("b", false),
            ("d", true),
        ];
        let mut removed = Vec::new();
        for (id, is_prepend) in ops {
            if *is_prepend {
                let existing = ids(&store);
                store.prepend(log(id));
                let after = ids(&store);
                assert_eq!(after[0], *id);
                assert_eq!(&after[1..], existing.as_slice());
                removed.retain(|r| r != id);
            } else {
                store.remove_by_id(id);
                removed.push(id.to_string());
            }
            for r in &removed {
                assert!(!store.contains(r), "{} should be gone", r);
            }
        }
        assert_eq!(ids(&store), vec!["d", "c"]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = LogStore::new();
        let other = store.clone();
        other.prepend(log("a"));
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[tokio::test]
    async fn test_observers_are_notified() {
        let store = LogStore::new();
        let mut rx = store.subscribe();

        store.prepend(log("a"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.replace_all(vec![log("b"), log("c")]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 2);

        store.remove_by_id("b");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[0].id, "c");
    }

    #[test]
    fn test_missing_remove_does_not_notify() {
        let store = LogStore::new();
        let rx = store.subscribe();

        store.remove_by_id("nope");
        assert!(!rx.has_changed().unwrap());

        store.prepend(log("a"));
        assert!(rx.has_changed().unwrap());
    }
}
