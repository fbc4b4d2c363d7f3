use std::result::Result as StdResult;
use std::sync::Arc;

use log::{debug, warn};
use metrics::counter;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::error::{Error, Result, StoreError};
use crate::models::Chunk;
use crate::store::ChunkStore;

/// A chunk whose write did not succeed.
#[derive(Debug)]
pub struct ChunkFailure {
    pub index: u32,
    pub error: StoreError,
}

/// Outcome of every chunk write of one upload.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub total: usize,
    /// Indices written, ascending.
    pub written: Vec<u32>,
    /// Failed writes, ascending by index.
    pub failures: Vec<ChunkFailure>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns a report with failures into a `Persistence` error carrying the
    /// lowest failing index as its representative cause.
    pub fn into_result(self, file_id: &str) -> Result<UploadReport> {
        let failed = self.failures.len();
        let mut failures = self.failures.into_iter();
        match failures.next() {
            None => Ok(UploadReport {
                total: self.total,
                written: self.written,
                failures: Vec::new(),
            }),
            Some(ChunkFailure { index, error }) => Err(Error::Persistence {
                file_id: file_id.to_string(),
                index,
                failed,
                total: self.total,
                source: error,
            }),
        }
    }
}

/// Writes the chunks of a file to a `ChunkStore`, one task per chunk.
///
/// Every chunk is attempted even after a sibling fails, and the result is
/// only decided once all tasks have finished. At most `concurrency` writes
/// are in flight at any time. Nothing is rolled back on failure.
#[derive(Clone)]
pub struct UploadCoordinator {
    store: Arc<dyn ChunkStore>,
    concurrency: usize,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn ChunkStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Persists every chunk and reports success only if every write succeeded.
    pub async fn upload(&self, file_id: &str, chunks: Vec<Chunk>) -> Result<UploadReport> {
        self.write_all(file_id, chunks).await.into_result(file_id)
    }

    /// Persists every chunk and returns the outcome of each write.
    ///
    /// Writes are spawned detached: dropping the returned future stops the
    /// wait, not the writes, which still run to completion.
    pub async fn write_all(&self, file_id: &str, chunks: Vec<Chunk>) -> UploadReport {
        let total = chunks.len();
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let shared_id: Arc<str> = Arc::from(file_id);

        let handles: Vec<(u32, JoinHandle<StdResult<(), StoreError>>)> = chunks
            .into_iter()
            .map(|chunk| {
                let index = chunk.index;
                let store = Arc::clone(&self.store);
                let permits = Arc::clone(&permits);
                let file_id = Arc::clone(&shared_id);
                let handle = tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                    store.put(&file_id, index, chunk.content).await
                });
                (index, handle)
            })
            .collect();

        let mut report = UploadReport {
            total,
            ..UploadReport::default()
        };

        for (index, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(StoreError::TaskFailed(format!(
                    "write task for chunk {} died: {}",
                    index, join_err
                ))),
            };
            match outcome {
                Ok(()) => {
                    debug!("Stored chunk {} of file {}", index, file_id);
                    report.written.push(index);
                }
                Err(error) => {
                    warn!("Failed to store chunk {} of file {}: {}", index, file_id, error);
                    report.failures.push(ChunkFailure { index, error });
                }
            }
        }

        report.written.sort_unstable();
        report.failures.sort_by_key(|f| f.index);

        counter!("dfs_chunks_written_total").increment(report.written.len() as u64);
        counter!("dfs_chunk_write_failures_total").increment(report.failures.len() as u64);

        report
    }
}
