//! In-memory document backend.
//!
//! Used by tests and dry runs. Counts saves and can be told to fail writes so
//! callers' recovery paths can be exercised.

use super::{Document, PersistError, Persistence};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Document>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    /// Last successfully saved document.
    pub fn snapshot(&self) -> Document {
        self.document.lock().clone()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn load(&self) -> Result<Document, PersistError> {
        Ok(self.snapshot())
    }

    async fn save(&self, document: &Document) -> Result<(), PersistError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(PersistError::Unavailable("writes disabled".into()));
        }
        *self.document.lock() = document.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
