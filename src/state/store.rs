//! Shared in-memory copy of the persisted document.
//!
//! Mutations run synchronously under a short lock and never across an await.
//! Persisting clones the document after the lock is released, so two
//! in-flight writers are last-writer-wins at the storage layer.

use crate::persistence::{Document, PersistError, Persistence};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DocumentStore {
    document: RwLock<Document>,
    backend: Arc<dyn Persistence>,
}

impl DocumentStore {
    /// Load the document from `backend`.
    pub async fn init(backend: Arc<dyn Persistence>) -> Result<Self, PersistError> {
        let document = backend.load().await?;
        debug!(guilds = document.guilds.len(), "Server document loaded");
        Ok(Self::from_document(document, backend))
    }

    /// Wrap an already loaded document.
    pub fn from_document(document: Document, backend: Arc<dyn Persistence>) -> Self {
        Self {
            document: RwLock::new(document),
            backend,
        }
    }

    /// Run `f` against the current document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.document.read())
    }

    /// Mutate the in-memory document. Does not persist.
    pub fn apply<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.document.write())
    }

    /// Write the full document through the backend.
    ///
    /// Failures are logged and reported as `false`; the in-memory copy stays
    /// authoritative for the life of the process.
    pub async fn persist(&self) -> bool {
        let snapshot = self.document.read().clone();
        match self.backend.save(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to persist server document; keeping in-memory state");
                false
            }
        }
    }
}
