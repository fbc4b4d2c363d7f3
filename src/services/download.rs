use std::sync::Arc;

use bytes::Bytes;
use log::debug;

use crate::chunking::merge;
use crate::error::{Error, Result};
use crate::store::ChunkStore;

/// Rebuilds a file's content from its stored chunks.
#[derive(Clone)]
pub struct RetrievalMerger {
    store: Arc<dyn ChunkStore>,
}

impl RetrievalMerger {
    pub fn new(store: Arc<dyn ChunkStore>) -> Self {
        Self { store }
    }

    /// Fetches and concatenates the chunks of `file_id`.
    ///
    /// An id with no chunks yields empty content rather than an error; a
    /// zero-length upload and an unknown id look the same here.
    pub async fn fetch(&self, file_id: &str) -> Result<Bytes> {
        let chunks = self.store.list(file_id).await.map_err(Error::Retrieval)?;
        let content = merge(file_id, &chunks)?;
        debug!("Assembled file {} from {} chunks ({} bytes)", file_id, chunks.len(), content.len());
        Ok(content)
    }
}
