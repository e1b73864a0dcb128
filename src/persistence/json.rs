//! JSON file backend for the server document.

use super::{Document, PersistError, Persistence};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Stores the document as pretty-printed JSON (4-space indent) at `path`.
///
/// A missing file is created with an empty document on first load.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(document: &Document) -> Result<Vec<u8>, PersistError> {
        let mut buf = Vec::with_capacity(256);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut ser)?;
        Ok(buf)
    }
}

#[async_trait]
impl Persistence for JsonFileStore {
    async fn load(&self) -> Result<Document, PersistError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let document = Document::default();
                self.save(&document).await?;
                info!(path = %self.path.display(), "Created server document as it did not exist");
                Ok(document)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &Document) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = Self::encode(document)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
