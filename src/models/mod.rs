use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous slice of a file, addressed by its zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u32,
    pub content: Bytes,
}

impl Chunk {
    pub fn new(index: u32, content: impl Into<Bytes>) -> Self {
        Chunk {
            index,
            content: content.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A persisted chunk row, as listed by `GET /files`.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct ChunkRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub file_id: String,
    pub chunk_id: i32,
    #[serde(with = "base64_bytes")]
    pub chunk_content: Vec<u8>,
}

/// Byte content as a standard base64 string in JSON.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &[u8]) -> ChunkRecord {
        let now = Utc::now();
        ChunkRecord {
            id: 1,
            created_at: now,
            updated_at: now,
            file_id: "0123456789abcdef0123456789abcdef".to_string(),
            chunk_id: 0,
            chunk_content: content.to_vec(),
        }
    }

    #[test]
    fn test_chunk_content_is_base64_in_json() {
        let json = serde_json::to_value(record(b"hi")).unwrap();
        assert_eq!(json["chunk_content"], "aGk=");

        let empty = serde_json::to_value(record(b"")).unwrap();
        assert_eq!(empty["chunk_content"], "");
    }

    #[test]
    fn test_chunk_content_rejects_bad_base64() {
        let mut json = serde_json::to_value(record(b"hi")).unwrap();
        json["chunk_content"] = "not base64!".into();
        assert!(serde_json::from_value::<ChunkRecord>(json).is_err());
    }
}
