use async_trait::async_trait;
use bytes::Bytes;
use log::info;
use sqlx::{Pool, Postgres};

use crate::error::StoreError;
use crate::models::{Chunk, ChunkRecord};
use crate::store::ChunkStore;

pub mod file_chunks;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS file_chunks (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        file_id TEXT NOT NULL,
        chunk_id INTEGER NOT NULL CHECK (chunk_id >= 0),
        chunk_content BYTEA NOT NULL,
        UNIQUE (file_id, chunk_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_file_chunks_file_id ON file_chunks (file_id)",
];

pub async fn init_pool(database_url: &str) -> Result<Pool<Postgres>, sqlx::Error> {
    let pool = Pool::<Postgres>::connect(database_url).await?;
    Ok(pool)
}

/// Creates the chunk table and its index if they are missing.
pub async fn migrate(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema up to date.");
    Ok(())
}

/// `ChunkStore` over the `file_chunks` table.
#[derive(Clone)]
pub struct PgChunkStore {
    pool: Pool<Postgres>,
}

impl PgChunkStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkStore for PgChunkStore {
    async fn put(&self, file_id: &str, index: u32, content: Bytes) -> Result<(), StoreError> {
        let chunk_id = i32::try_from(index)
            .map_err(|_| StoreError::Unavailable(format!("chunk index {index} out of range")))?;
        match file_chunks::insert_file_chunk(&self.pool, file_id, chunk_id, &content).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict {
                file_id: file_id.to_string(),
                index,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, file_id: &str) -> Result<Vec<Chunk>, StoreError> {
        let rows = file_chunks::get_chunks_by_file_id(&self.pool, file_id).await?;
        let chunks = rows
            .into_iter()
            .map(|row| Chunk::new(row.chunk_id as u32, row.chunk_content))
            .collect();
        Ok(chunks)
    }

    async fn list_all(&self) -> Result<Vec<ChunkRecord>, StoreError> {
        Ok(file_chunks::list_all_chunks(&self.pool).await?)
    }
}
