// End-to-end tests of the write and read paths over in-memory stores.

mod common;

use std::num::NonZeroUsize;
use std::sync::Arc;

use bytes::Bytes;

use chunked_file_storage::chunking::{merge, split, CHUNK_SIZE};
use chunked_file_storage::{
    ChunkStore, Error, FileService, MemoryChunkStore, RetrievalMerger, UploadCoordinator,
};
use common::{pattern, FailingStore};

// ============================================================================
// Splitting and merging
// ============================================================================

#[test]
fn test_two_and_a_half_mib_splits_into_three() {
    let content = pattern(2_621_440);
    let chunks = split(&content, CHUNK_SIZE);

    let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(sizes, vec![1_048_576, 1_048_576, 524_288]);

    let merged = merge("f", &chunks).unwrap();
    assert_eq!(merged.len(), 2_621_440);
    assert_eq!(merged, content);
}

#[test]
fn test_empty_content_has_no_chunks() {
    let chunks = split(&Bytes::new(), CHUNK_SIZE);
    assert!(chunks.is_empty());
    assert!(merge("f", &chunks).unwrap().is_empty());
}

#[test]
fn test_round_trip_various_lengths_and_sizes() {
    for len in [0, 1, 2, 17, 255, 256, 1000, 4097] {
        let content = pattern(len);
        for s in [1, 3, 16, 256, 1000, 5000] {
            let chunks = split(&content, NonZeroUsize::new(s).unwrap());
            assert_eq!(chunks.len(), len.div_ceil(s));
            assert_eq!(merge("f", &chunks).unwrap(), content, "len {len}, size {s}");
        }
    }
}

// ============================================================================
// Upload coordinator against a store
// ============================================================================

#[tokio::test]
async fn test_successful_upload_stores_every_index() {
    let store = Arc::new(MemoryChunkStore::new());
    let coordinator = UploadCoordinator::new(store.clone(), 8);
    let content = pattern(10_000);
    let chunks = split(&content, NonZeroUsize::new(1024).unwrap());

    let report = coordinator.upload("file-a", chunks.clone()).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.written, (0..10).collect::<Vec<u32>>());

    let stored = store.list("file-a").await.unwrap();
    assert_eq!(stored, chunks);
}

#[tokio::test]
async fn test_failed_chunk_leaves_siblings_in_store() {
    let store = FailingStore::failing_writes(&[3]);
    let coordinator = UploadCoordinator::new(store.clone(), 16);
    let content = pattern(5 * 64);
    let chunks = split(&content, NonZeroUsize::new(64).unwrap());
    assert_eq!(chunks.len(), 5);

    let err = coordinator.upload("file-c", chunks).await.unwrap_err();
    assert!(matches!(err, Error::Persistence { index: 3, failed: 1, total: 5, .. }));

    for index in [0, 1, 2, 4] {
        assert!(store.inner.contains("file-c", index).await, "chunk {index} missing");
    }
    assert!(!store.inner.contains("file-c", 3).await);

    // The leftovers do not form a complete file.
    let merger = RetrievalMerger::new(store.clone());
    let err = merger.fetch("file-c").await.unwrap_err();
    assert!(matches!(err, Error::IncompleteFile { expected: 3, found: 4, .. }));
}

#[tokio::test]
async fn test_many_failures_do_not_block() {
    let failing: Vec<u32> = (0..500).collect();
    let store = FailingStore::failing_writes(&failing);
    let coordinator = UploadCoordinator::new(store, 4);
    let chunks = split(&pattern(500), NonZeroUsize::new(1).unwrap());

    let report = coordinator.write_all("file", chunks).await;
    assert_eq!(report.failures.len(), 500);
    assert!(!report.is_success());
}

// ============================================================================
// File service
// ============================================================================

#[tokio::test]
async fn test_service_round_trip_with_default_chunk_size() {
    let service = FileService::new(Arc::new(MemoryChunkStore::new()), 4);
    let content = pattern(2_621_440);

    let file_id = service.upload(content.clone()).await.unwrap();
    assert_eq!(file_id.len(), 32);
    assert_eq!(service.list_chunks().await.unwrap().len(), 3);
    assert_eq!(service.download(&file_id).await.unwrap(), content);
}

#[tokio::test]
async fn test_service_empty_upload() {
    let service = FileService::new(Arc::new(MemoryChunkStore::new()), 4);
    let file_id = service.upload(Bytes::new()).await.unwrap();
    assert!(service.list_chunks().await.unwrap().is_empty());
    assert!(service.download(&file_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_service_upload_failure_is_persistence_error() {
    let store = FailingStore::failing_writes(&[0]);
    let service = FileService::with_chunk_size(store.clone(), 4, NonZeroUsize::new(4).unwrap());

    let err = service.upload(Bytes::from_static(b"abcdefgh")).await.unwrap_err();
    assert!(matches!(err, Error::Persistence { index: 0, .. }));
    assert_eq!(store.inner.len().await, 1);
}

#[tokio::test]
async fn test_service_read_failure_is_retrieval_error() {
    let service = FileService::new(FailingStore::failing_reads(), 4);
    let err = service.download("00000000000000000000000000000000").await.unwrap_err();
    assert!(matches!(err, Error::Retrieval(_)));
}
