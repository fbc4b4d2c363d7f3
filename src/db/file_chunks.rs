use sqlx::{Pool, Postgres};
use crate::models::ChunkRecord;

#[derive(sqlx::FromRow)]
pub struct ChunkContent {
    pub chunk_id: i32,
    pub chunk_content: Vec<u8>,
}

pub async fn insert_file_chunk(
    pool: &Pool<Postgres>,
    file_id: &str,
    chunk_id: i32,
    chunk_content: &[u8]
) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO file_chunks (file_id, chunk_id, chunk_content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
        .bind(file_id)
        .bind(chunk_id)
        .bind(chunk_content)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub async fn get_chunks_by_file_id(pool: &Pool<Postgres>, file_id: &str) -> Result<Vec<ChunkContent>, sqlx::Error> {
    let records = sqlx::query_as::<_, ChunkContent>(
        r#"
        SELECT chunk_id, chunk_content
        FROM file_chunks
        WHERE file_id = $1
        ORDER BY chunk_id ASC
        "#,
    )
        .bind(file_id)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

pub async fn list_all_chunks(pool: &Pool<Postgres>) -> Result<Vec<ChunkRecord>, sqlx::Error> {
    let records = sqlx::query_as::<_, ChunkRecord>(
        r#"
        SELECT id, created_at, updated_at, file_id, chunk_id, chunk_content
        FROM file_chunks
        ORDER BY id ASC
        "#,
    )
        .fetch_all(pool)
        .await?;
    Ok(records)
}
