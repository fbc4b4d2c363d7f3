use std::num::NonZeroUsize;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};
use crate::models::Chunk;

/// Chunk size used for every stored file: 1 MiB.
pub const CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(1024 * 1024) {
    Some(size) => size,
    None => unreachable!(),
};

const READ_BUF_SIZE: usize = 64 * 1024;

/// Number of chunks `split` produces for `len` bytes.
pub fn chunk_count(len: usize, chunk_size: NonZeroUsize) -> usize {
    len.div_ceil(chunk_size.get())
}

/// Splits `content` into consecutive chunks of `chunk_size` bytes.
/// The last chunk may be shorter; empty content yields no chunks.
///
/// Chunks share `content`'s buffer, nothing is copied.
pub fn split(content: &Bytes, chunk_size: NonZeroUsize) -> Vec<Chunk> {
    let size = chunk_size.get();
    let mut chunks = Vec::with_capacity(chunk_count(content.len(), chunk_size));
    let mut offset = 0;
    let mut index = 0u32;

    while offset < content.len() {
        let end = (offset + size).min(content.len());
        chunks.push(Chunk::new(index, content.slice(offset..end)));
        offset = end;
        index += 1;
    }

    chunks
}

/// Drains `reader` into a single buffer.
pub async fn read_content<R>(mut reader: R) -> Result<Bytes>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::new();
    loop {
        buf.reserve(READ_BUF_SIZE);
        let n = reader.read_buf(&mut buf).await.map_err(Error::Split)?;
        if n == 0 {
            break;
        }
    }
    Ok(buf.freeze())
}
