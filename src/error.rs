use thiserror::Error;

/// Failure reported by a chunk store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Chunk {index} of file {file_id} already exists")]
    Conflict { file_id: String, index: u32 },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Chunk write task failed: {0}")]
    TaskFailed(String),
}

/// Errors surfaced by the upload and download paths.
///
/// A `Persistence` error does not undo anything: chunks that were written
/// before or alongside the failing one stay in the store. Callers that need
/// cleanup have to arrange it themselves.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Error generating file ID: {0}")]
    Generation(#[source] rand::Error),

    #[error("Error reading upload content: {0}")]
    Split(#[source] std::io::Error),

    #[error("Error persisting file {file_id}: {failed} of {total} chunk writes failed (first at index {index}): {source}")]
    Persistence {
        file_id: String,
        index: u32,
        failed: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    #[error("Error retrieving chunks: {0}")]
    Retrieval(#[source] StoreError),

    #[error("Incomplete file {file_id}: expected chunk index {expected}, found {found}")]
    IncompleteFile {
        file_id: String,
        expected: u32,
        found: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
