//! The persistence interface the core writes chunks to and reads them from.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::models::{Chunk, ChunkRecord};

pub mod memory;

pub use memory::MemoryChunkStore;

/// Storage keyed by `(file_id, index)`.
///
/// Implementations must accept concurrent `put` calls for distinct keys.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persists one chunk.
    async fn put(&self, file_id: &str, index: u32, content: Bytes) -> Result<(), StoreError>;

    /// Returns every chunk of `file_id`, ascending by index. An unknown id
    /// yields an empty list.
    async fn list(&self, file_id: &str) -> Result<Vec<Chunk>, StoreError>;

    /// Returns every stored chunk row.
    async fn list_all(&self) -> Result<Vec<ChunkRecord>, StoreError>;
}
