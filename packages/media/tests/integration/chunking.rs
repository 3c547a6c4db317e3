use media::{ChunkingConfig, EncodedAsset, MediaError, OverflowPolicy, encode, reconstruct_base64};

use crate::support::base64_payload;

fn fragments_of(asset: EncodedAsset) -> Vec<String> {
    match asset {
        EncodedAsset::Inline(value) => vec![value],
        EncodedAsset::Subcollection { fragments } => fragments,
    }
}

#[test]
fn inline_iff_below_threshold_within_one_fragment() {
    let config = ChunkingConfig::default();
    for len in [1, 1_000, 499_999, 500_000, 500_001, 750_000, 900_000] {
        let payload = base64_payload(len);
        let encoding = encode(&payload, &config).unwrap();
        assert_eq!(
            encoding.asset.uses_subcollection(),
            len >= 500_000,
            "length {len}"
        );
    }
}

#[test]
fn split_then_join_reproduces_payload() {
    let config = ChunkingConfig::default();
    for len in [900_001, 1_800_000, 2_796_204, 13_500_017] {
        let payload = base64_payload(len);
        let encoding = encode(&payload, &config).unwrap();
        assert_eq!(encoding.truncated_chars, 0);

        let fragments = fragments_of(encoding.asset);
        assert_eq!(fragments.len(), len.div_ceil(900_000));
        assert!(fragments.iter().all(|f| f.len() <= 900_000));
        assert_eq!(reconstruct_base64(&fragments), payload, "length {len}");
    }
}

#[test]
fn full_budget_round_trips_without_loss() {
    let config = ChunkingConfig::default();
    let payload = base64_payload(45_000_000);
    let encoding = encode(&payload, &config).unwrap();
    assert_eq!(encoding.truncated_chars, 0);
    let fragments = fragments_of(encoding.asset);
    assert_eq!(fragments.len(), 50);
    assert_eq!(reconstruct_base64(&fragments), payload);
}

#[test]
fn oversize_payload_is_truncated_to_exact_prefix() {
    let config = ChunkingConfig::default();
    let payload = base64_payload(45_000_123);
    let encoding = encode(&payload, &config).unwrap();
    assert_eq!(encoding.truncated_chars, 123);

    let joined = reconstruct_base64(&fragments_of(encoding.asset));
    assert_eq!(joined.len(), 45_000_000);
    assert!(payload.starts_with(&joined));
    assert_ne!(joined, payload);
}

#[test]
fn oversize_payload_is_refused_under_reject_policy() {
    let config = ChunkingConfig {
        overflow: OverflowPolicy::Reject,
        ..Default::default()
    };
    let payload = base64_payload(45_000_001);
    assert!(matches!(
        encode(&payload, &config),
        Err(MediaError::PayloadTooLarge {
            length: 45_000_001,
            limit: 45_000_000
        })
    ));
}

#[test]
fn fragment_boundaries_ignore_base64_quanta() {
    // 7-character fragments split every 4-character quantum somewhere.
    let config = ChunkingConfig {
        fragment_size: 7,
        max_fragments: 10,
        inline_threshold: 3,
        ..Default::default()
    };
    let payload = "U3F1YXRzIGFuZCBsdW5nZXM=";
    let fragments = fragments_of(encode(payload, &config).unwrap().asset);
    assert_eq!(fragments[0], "U3F1YXR");
    assert_eq!(reconstruct_base64(&fragments), payload);
}
