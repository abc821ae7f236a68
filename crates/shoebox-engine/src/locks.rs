//! # Keyed Locks
//!
//! Serializes mutations per logical key without a global lock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KeyedLocks<(product, size)>                                            │
//! │                                                                         │
//! │  ("runner-x","42") ──► Arc<Mutex<()>> ◄── sale A (holds)                │
//! │                                       ◄── sale B (waits)                │
//! │  ("runner-x","43") ──► Arc<Mutex<()>> ◄── sale C (holds, in parallel)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Guards are owned so they can be held across `.await`. Callers always take
//! locks before opening a transaction, and multi-key callers take them in
//! sorted order.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table size above which idle entries are dropped on the next lock call.
const PRUNE_THRESHOLD: usize = 1024;

/// A table of async mutexes created on demand, one per key.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    table: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        KeyedLocks {
            table: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone + Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        let slot = self.slot(key);
        slot.lock_owned().await
    }

    /// Locks several keys in sorted order, skipping duplicates.
    pub async fn lock_many(&self, keys: impl IntoIterator<Item = K>) -> Vec<OwnedMutexGuard<()>> {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.lock(key).await);
        }
        guards
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: K) -> Arc<AsyncMutex<()>> {
        // The map holds no invariant a panic could break.
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());

        if table.len() > PRUNE_THRESHOLD {
            // Only this table references an idle slot.
            table.retain(|_, slot| Arc::strong_count(slot) > 1);
        }

        table
            .entry(key)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::<String>::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock("k".to_string()).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedLocks::<u32>::new();
        let _a = locks.lock(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_lock_many_dedups() {
        let locks = KeyedLocks::<u32>::new();
        let guards = locks.lock_many(vec![3, 1, 3, 2]).await;
        assert_eq!(guards.len(), 3);
        assert_eq!(locks.len(), 3);
    }
}
