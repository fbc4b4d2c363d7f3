#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use chunked_file_storage::models::ChunkRecord;
use chunked_file_storage::{Chunk, ChunkStore, MemoryChunkStore, StoreError};

/// Memory store that refuses writes for chosen chunk indices.
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryChunkStore,
    fail: HashSet<u32>,
    fail_reads: bool,
}

impl FailingStore {
    pub fn failing_writes(indices: &[u32]) -> Arc<Self> {
        Arc::new(Self {
            fail: indices.iter().copied().collect(),
            ..Self::default()
        })
    }

    pub fn failing_reads() -> Arc<Self> {
        Arc::new(Self {
            fail_reads: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl ChunkStore for FailingStore {
    async fn put(&self, file_id: &str, index: u32, content: Bytes) -> Result<(), StoreError> {
        if self.fail.contains(&index) {
            return Err(StoreError::Unavailable(format!(
                "connection reset writing chunk {index} to db-internal-7"
            )));
        }
        self.inner.put(file_id, index, content).await
    }

    async fn list(&self, file_id: &str) -> Result<Vec<Chunk>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("read replica down".to_string()));
        }
        self.inner.list(file_id).await
    }

    async fn list_all(&self) -> Result<Vec<ChunkRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("read replica down".to_string()));
        }
        self.inner.list_all().await
    }
}

/// Deterministic, non-repeating-looking test content.
pub fn pattern(len: usize) -> Bytes {
    (0..len as u64)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
        .collect::<Vec<u8>>()
        .into()
}
