use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{Chunk, ChunkRecord};
use super::ChunkStore;

struct StoredChunk {
    id: i64,
    created_at: DateTime<Utc>,
    content: Bytes,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    chunks: BTreeMap<(String, u32), StoredChunk>,
}

/// Process-local chunk store. Used when no database is configured, and as
/// the store double in tests.
#[derive(Default)]
pub struct MemoryChunkStore {
    inner: RwLock<Inner>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, file_id: &str, index: u32) -> bool {
        self.inner
            .read()
            .await
            .chunks
            .contains_key(&(file_id.to_string(), index))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.chunks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn put(&self, file_id: &str, index: u32, content: Bytes) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let key = (file_id.to_string(), index);
        if inner.chunks.contains_key(&key) {
            return Err(StoreError::Conflict {
                file_id: file_id.to_string(),
                index,
            });
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.chunks.insert(
            key,
            StoredChunk {
                id,
                created_at: Utc::now(),
                content,
            },
        );
        Ok(())
    }

    async fn list(&self, file_id: &str) -> Result<Vec<Chunk>, StoreError> {
        let inner = self.inner.read().await;
        let start = (file_id.to_string(), 0);
        let chunks = inner
            .chunks
            .range(start..)
            .take_while(|((id, _), _)| id == file_id)
            .map(|((_, index), stored)| Chunk::new(*index, stored.content.clone()))
            .collect();
        Ok(chunks)
    }

    async fn list_all(&self) -> Result<Vec<ChunkRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<ChunkRecord> = inner
            .chunks
            .iter()
            .map(|((file_id, index), stored)| ChunkRecord {
                id: stored.id,
                created_at: stored.created_at,
                updated_at: stored.created_at,
                file_id: file_id.clone(),
                chunk_id: *index as i32,
                chunk_content: stored.content.to_vec(),
            })
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}
