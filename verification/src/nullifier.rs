//! Duplicate-claim detection by nullifier hash.
//!
//! A nullifier is unique per verified human and action, so seeing one twice
//! means the same person is claiming again. The bundled registry lives in
//! memory for the lifetime of the process and is not persisted.

use std::collections::HashSet;
use std::sync::Mutex;

pub trait NullifierRegistry: Send + Sync {
    fn contains(&self, nullifier_hash: &str) -> bool;

    /// Record a nullifier. Returns `false` if it was already present.
    fn record(&self, nullifier_hash: &str) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryNullifierRegistry {
    seen: Mutex<HashSet<String>>,
}

impl InMemoryNullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NullifierRegistry for InMemoryNullifierRegistry {
    fn contains(&self, nullifier_hash: &str) -> bool {
        self.lock().contains(&nullifier_hash.to_lowercase())
    }

    fn record(&self, nullifier_hash: &str) -> bool {
        self.lock().insert(nullifier_hash.to_lowercase())
    }
}
