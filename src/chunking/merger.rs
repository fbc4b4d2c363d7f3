use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::models::Chunk;

/// Concatenates `chunks` back into the original content.
///
/// `chunks` must be sorted by index and cover exactly `0..N-1`; a gap or a
/// duplicate is reported as `IncompleteFile` instead of producing corrupt
/// output. No chunks merge to an empty stream.
pub fn merge(file_id: &str, chunks: &[Chunk]) -> Result<Bytes> {
    for (position, chunk) in chunks.iter().enumerate() {
        let expected = position as u32;
        if chunk.index != expected {
            return Err(Error::IncompleteFile {
                file_id: file_id.to_string(),
                expected,
                found: chunk.index,
            });
        }
    }

    // A single chunk needs no copy.
    if let [only] = chunks {
        return Ok(only.content.clone());
    }

    let total: usize = chunks.iter().map(Chunk::len).sum();
    let mut merged = BytesMut::with_capacity(total);
    for chunk in chunks {
        merged.extend_from_slice(&chunk.content);
    }
    Ok(merged.freeze())
}
