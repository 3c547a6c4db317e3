use common::storage::DocumentStore;
use common::storage::memory::MemoryDocumentStore;
use media::{AssetKind, AssetLayout, AssetService, ChunkingConfig, IntegrityMode, MediaError};

use crate::support::{FaultyStore, base64_payload, memory_store};

fn config(integrity: IntegrityMode) -> ChunkingConfig {
    ChunkingConfig {
        fragment_size: 8,
        max_fragments: 10,
        inline_threshold: 5,
        integrity,
        ..Default::default()
    }
}

#[tokio::test]
async fn partial_save_leaves_stray_fragments_until_next_upload() {
    let store = FaultyStore::new();
    let service = AssetService::new(config(IntegrityMode::Warn)).unwrap();
    store.fail_put("videos/v1/chunks/chunk2");

    let result = service
        .upload(&store, "v1", AssetKind::Video, &base64_payload(40))
        .await;
    assert!(matches!(result, Err(MediaError::Storage(_))));

    // No parent was written, but some fragments were.
    assert!(matches!(
        service.read(&store, "v1").await,
        Err(MediaError::NotFound(_))
    ));
    assert!(service.fragments().count(&store, "v1").await.unwrap() > 0);

    store.heal();
    let receipt = service
        .upload(&store, "v1", AssetKind::Video, "QUJD")
        .await
        .unwrap();
    assert_eq!(
        receipt.layout,
        AssetLayout::Inline {
            kind: AssetKind::Video
        }
    );
    assert_eq!(service.fragments().count(&store, "v1").await.unwrap(), 0);
    assert_eq!(service.read(&store, "v1").await.unwrap(), "QUJD");
}

#[tokio::test]
async fn delete_continues_past_failed_fragment() {
    let store = FaultyStore::new();
    let service = AssetService::new(config(IntegrityMode::Warn)).unwrap();
    service
        .upload(&store, "v1", AssetKind::Video, &base64_payload(32))
        .await
        .unwrap();

    store.fail_delete("videos/v1/chunks/chunk1");
    let summary = service.fragments().delete(&store, "v1").await.unwrap();
    assert_eq!(summary.deleted, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(service.fragments().count(&store, "v1").await.unwrap(), 1);
}

#[tokio::test]
async fn failed_cleanup_does_not_block_new_upload() {
    let store = FaultyStore::new();
    let service = AssetService::new(config(IntegrityMode::Warn)).unwrap();
    service
        .upload(&store, "v1", AssetKind::Video, &base64_payload(32))
        .await
        .unwrap();

    store.fail_delete("videos/v1/chunks/chunk0");
    service
        .upload(&store, "v1", AssetKind::Video, "Zm9v")
        .await
        .unwrap();
    // The stray fragment is ignored because the parent is no longer flagged.
    assert_eq!(service.read(&store, "v1").await.unwrap(), "Zm9v");

    store.heal();
    store.fail_lists(true);
    service
        .upload(&store, "v1", AssetKind::Video, "YmFy")
        .await
        .unwrap();
    store.fail_lists(false);
    assert_eq!(service.read(&store, "v1").await.unwrap(), "YmFy");
}

async fn upload_then_lose_fragment(service: &AssetService) -> (MemoryDocumentStore, String) {
    let store = memory_store();
    let payload = base64_payload(24);
    service
        .upload(&store, "v1", AssetKind::Video, &payload)
        .await
        .unwrap();
    let path = service.fragments().fragment_path("v1", 1).unwrap();
    assert!(store.delete_record(&path).await.unwrap());
    (store, payload)
}

#[tokio::test]
async fn missing_fragment_reads_short_payload_when_unchecked() {
    for mode in [IntegrityMode::Off, IntegrityMode::Warn] {
        let service = AssetService::new(config(mode)).unwrap();
        let (store, payload) = upload_then_lose_fragment(&service).await;

        let read = service.read(&store, "v1").await.unwrap();
        assert_eq!(read.len(), 16);
        assert_eq!(read, format!("{}{}", &payload[..8], &payload[16..]));
    }
}

#[tokio::test]
async fn missing_fragment_fails_when_enforced() {
    let service = AssetService::new(config(IntegrityMode::Enforce)).unwrap();
    let (store, _) = upload_then_lose_fragment(&service).await;

    match service.read(&store, "v1").await {
        Err(MediaError::IntegrityMismatch {
            expected_length,
            actual_length,
            ..
        }) => {
            assert_eq!(expected_length, Some(24));
            assert_eq!(actual_length, 16);
        }
        other => panic!("expected integrity mismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn tampered_fragment_fails_digest_when_enforced() {
    let service = AssetService::new(config(IntegrityMode::Enforce)).unwrap();
    let store = memory_store();
    service
        .upload(&store, "v1", AssetKind::Video, &base64_payload(24))
        .await
        .unwrap();

    // Same length, different content.
    service
        .fragments()
        .save(&store, "v1", &["AAAAAAAA"])
        .await
        .unwrap();
    assert!(matches!(
        service.read(&store, "v1").await,
        Err(MediaError::IntegrityMismatch { .. })
    ));
}
