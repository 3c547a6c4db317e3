use common::storage::{DocumentStore, Record, RecordPath};
use media::{AssetKind, AssetLayout, AssetService, ChunkingConfig, IntegrityMode};

use crate::support::{base64_payload, memory_store};

fn parent(id: &str) -> RecordPath {
    RecordPath::new("videos", id).unwrap()
}

fn enforcing_service() -> AssetService {
    AssetService::new(ChunkingConfig {
        integrity: IntegrityMode::Enforce,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn chunk_fields_win_over_stale_inline_field() {
    let store = memory_store();
    let service = enforcing_service();
    store
        .put_record(
            &parent("old-2"),
            Record::new()
                .with("useSubcollection", false)
                .with("chunkCount", 2)
                .with("chunk1", "MTAx")
                .with("chunk0", "U3Fh")
                .with("videoUrl", "c3RhbGU="),
        )
        .await
        .unwrap();

    let summary = service.inspect(&store, "old-2").await.unwrap();
    assert_eq!(summary.layout, Some(AssetLayout::InlineChunked { count: 2 }));
    assert_eq!(service.read(&store, "old-2").await.unwrap(), "U3FhMTAx");
}

#[tokio::test]
async fn corrupt_chunk_count_reads_present_fields() {
    let store = memory_store();
    let service = AssetService::new(ChunkingConfig::default()).unwrap();
    store
        .put_record(
            &parent("corrupt"),
            Record::new()
                .with("chunkCount", 1_000_000_000_000_u64)
                .with("chunk0", "QUJD"),
        )
        .await
        .unwrap();

    assert_eq!(service.read(&store, "corrupt").await.unwrap(), "QUJD");
}

#[tokio::test]
async fn reads_inline_chunked_record_without_integrity_fields() {
    let store = memory_store();
    let service = enforcing_service();
    store
        .put_record(
            &parent("old-1"),
            Record::new()
                .with("title", "Legacy upload")
                .with("chunkCount", 3)
                .with("chunk0", "U3Fh")
                .with("chunk1", "dHMg")
                .with("chunk2", "MTAx"),
        )
        .await
        .unwrap();

    let summary = service.inspect(&store, "old-1").await.unwrap();
    assert_eq!(summary.layout, Some(AssetLayout::InlineChunked { count: 3 }));
    assert_eq!(summary.stored_fragments, 0);
    assert_eq!(summary.payload_length, None);

    assert_eq!(
        service.read(&store, "old-1").await.unwrap(),
        "U3FhdHMgMTAx"
    );
}

#[tokio::test]
async fn reads_single_field_records() {
    let store = memory_store();
    let service = enforcing_service();
    store
        .put_record(&parent("old-v"), Record::new().with("videoUrl", "dmlk"))
        .await
        .unwrap();
    store
        .put_record(&parent("old-i"), Record::new().with("imageUrl", "aW1n"))
        .await
        .unwrap();

    assert_eq!(service.read(&store, "old-v").await.unwrap(), "dmlk");
    assert_eq!(service.read(&store, "old-i").await.unwrap(), "aW1n");
}

#[tokio::test]
async fn subcollection_written_by_older_client_reads_without_digest() {
    let store = memory_store();
    let service = enforcing_service();
    let fragments = [base64_payload(900_000), base64_payload(10)];
    service
        .fragments()
        .save(&store, "old-s", &fragments)
        .await
        .unwrap();
    store
        .put_record(
            &parent("old-s"),
            Record::new()
                .with("useSubcollection", true)
                .with("chunkCount", 2),
        )
        .await
        .unwrap();

    assert_eq!(
        service.read(&store, "old-s").await.unwrap(),
        format!("{}{}", fragments[0], fragments[1])
    );
}

#[tokio::test]
async fn new_upload_replaces_legacy_chunk_fields() {
    let store = memory_store();
    let service = enforcing_service();
    store
        .put_record(
            &parent("old-1"),
            Record::new()
                .with("title", "Legacy upload")
                .with("chunkCount", 2)
                .with("chunk0", "YWJj")
                .with("chunk1", "ZGVm"),
        )
        .await
        .unwrap();

    service
        .upload(&store, "old-1", AssetKind::Video, "bmV3")
        .await
        .unwrap();

    let record = store.get_record(&parent("old-1")).await.unwrap().unwrap();
    assert!(!record.contains("chunk0"));
    assert!(!record.contains("chunk1"));
    assert!(!record.contains("chunkCount"));
    assert_eq!(record.get_str("title"), Some("Legacy upload"));
    assert_eq!(service.read(&store, "old-1").await.unwrap(), "bmV3");
}
