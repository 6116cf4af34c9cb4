//! # Per-Variation Locks
//!
//! Serializes sales and refunds touching the same product variation within
//! one process. Operations on different variations run in parallel.
//!
//! ```text
//! sell(v-1) ──► acquire("v-1") ──► tx ──► commit ──► release
//! sell(v-1) ──► acquire("v-1") ─ waits ─────────────────────► tx ...
//! sell(v-2) ──► acquire("v-2") ──► tx ──► commit ──► release
//! ```
//!
//! Cross-process writers are handled by the guarded UPDATEs in the
//! repositories; this registry only removes in-process contention.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async locks keyed by variation id.
#[derive(Debug, Default)]
pub struct VariationLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl VariationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `variation_id`.
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn acquire(&self, variation_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());

            // Drop entries nobody holds or waits on
            map.retain(|_, lock| Arc::strong_count(lock) > 1);

            map.entry(variation_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// Number of variations currently tracked.
    pub fn tracked(&self) -> usize {
        self.inner.lock().map(|map| map.len()).unwrap_or(0)
    }
}
