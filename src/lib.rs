//! Chunked file storage: files are split into fixed-size chunks, written
//! concurrently to a chunk store, and reassembled in index order on download.

pub mod chunking;
pub mod cli;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routers;
pub mod services;
pub mod store;
pub mod utils;

pub use error::{Error, Result, StoreError};
pub use models::Chunk;
pub use services::{FileService, RetrievalMerger, UploadCoordinator, UploadReport};
pub use store::{ChunkStore, MemoryChunkStore};
