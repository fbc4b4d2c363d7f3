use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use log::{info, warn};
use metrics::{counter, histogram};

use crate::chunking::splitter::{split, CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::models::ChunkRecord;
use crate::services::download::RetrievalMerger;
use crate::services::upload::UploadCoordinator;
use crate::store::ChunkStore;
use crate::utils::file_id::generate_file_id;

/// Upload and download entry points over one chunk store.
#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn ChunkStore>,
    coordinator: UploadCoordinator,
    merger: RetrievalMerger,
    chunk_size: NonZeroUsize,
}

impl FileService {
    pub fn new(store: Arc<dyn ChunkStore>, upload_concurrency: usize) -> Self {
        Self::with_chunk_size(store, upload_concurrency, CHUNK_SIZE)
    }

    pub fn with_chunk_size(store: Arc<dyn ChunkStore>, upload_concurrency: usize, chunk_size: NonZeroUsize) -> Self {
        Self {
            coordinator: UploadCoordinator::new(Arc::clone(&store), upload_concurrency),
            merger: RetrievalMerger::new(Arc::clone(&store)),
            store,
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Stores `content` under a fresh file id and returns the id.
    ///
    /// On `Error::Persistence` the chunks that were written under the new id
    /// stay in the store; the id itself is not returned to the caller.
    pub async fn upload(&self, content: Bytes) -> Result<String> {
        let start = Instant::now();
        counter!("dfs_uploads_total").increment(1);

        let file_id = generate_file_id().inspect_err(|_| {
            counter!("dfs_upload_failures_total").increment(1);
        })?;
        let chunks = split(&content, self.chunk_size);
        info!("Uploading file {} ({} bytes, {} chunks)", file_id, content.len(), chunks.len());

        match self.coordinator.upload(&file_id, chunks).await {
            Ok(report) => {
                histogram!("dfs_upload_duration_seconds").record(start.elapsed().as_secs_f64());
                info!("Uploaded file {} ({} chunks)", file_id, report.written.len());
                Ok(file_id)
            }
            Err(e) => {
                counter!("dfs_upload_failures_total").increment(1);
                warn!("Upload of file {} failed: {}", file_id, e);
                Err(e)
            }
        }
    }

    /// Returns the reassembled content of `file_id`.
    pub async fn download(&self, file_id: &str) -> Result<Bytes> {
        counter!("dfs_downloads_total").increment(1);
        self.merger.fetch(file_id).await
    }

    /// Lists every stored chunk record.
    pub async fn list_chunks(&self) -> Result<Vec<ChunkRecord>> {
        self.store.list_all().await.map_err(Error::Retrieval)
    }
}
