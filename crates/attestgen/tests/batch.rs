//! End-to-end batch tests: planning, concurrent signing, export.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use attestgen::core::{
    Address, AttestationKind, AttestationRequest, BoxError, ContentId, KeyProvider, Subject,
};
use attestgen::export::{TimestampedPath, SCHEMA_ID_SENTINEL};
use attestgen::{
    Batch, EndorsementMode, GenerateCounts, Generator, GeneratorConfig, GeneratorError,
    IdentityPool, PlannedAttestation, SnapPool,
};
use attestgen_testkit::{fixed_clock, FailingKeyProvider, StubKeyProvider};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Signs like the stub but finishes in reverse order of its delay.
struct DelayedProvider {
    inner: StubKeyProvider,
    delay: Duration,
}

#[async_trait]
impl KeyProvider for DelayedProvider {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign(&self, message: &[u8]) -> Result<String, BoxError> {
        tokio::time::sleep(self.delay).await;
        self.inner.sign(message).await
    }
}

fn test_generator(dir: &std::path::Path) -> Generator<attestgen::export::FixedClock> {
    Generator::with_output(
        &GeneratorConfig::default(),
        fixed_clock(),
        TimestampedPath::new(dir),
    )
}

fn approve(issuer: Address, content: &str, signer: usize) -> PlannedAttestation {
    PlannedAttestation {
        request: AttestationRequest::audit_report(
            AttestationKind::AuditReportApproveCredential,
            issuer,
            ContentId::new(content),
        ),
        signer,
    }
}

#[tokio::test]
async fn test_three_attestations_export_three_rows() {
    let dir = tempfile::tempdir().unwrap();
    let generator = test_generator(dir.path());

    let stub: Arc<dyn KeyProvider> = Arc::new(StubKeyProvider::from_byte(0xbb));
    let issuer = stub.address();
    let batch = Batch {
        identities: IdentityPool::from_providers(vec![stub]),
        snaps: SnapPool::default(),
        plan: vec![
            approve(issuer, "a", 0),
            approve(issuer, "b", 0),
            approve(issuer, "c", 0),
        ],
    };

    let signed = generator.sign_batch(&batch).await.unwrap();
    let path = generator.export(&signed).unwrap();

    let contents = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.splitn(4, ';').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], (i + 1).to_string());
        assert_eq!(fields[2], "2");

        let payload: serde_json::Value = serde_json::from_str(fields[3]).unwrap();
        assert_eq!(
            payload["credentialSubject"]["id"],
            format!("snap://{}", ["a", "b", "c"][i])
        );
    }
}

#[tokio::test]
async fn test_completion_order_does_not_reorder_output() {
    let dir = tempfile::tempdir().unwrap();
    let generator = test_generator(dir.path());

    // Earlier plan entries are signed by slower providers, so they finish last.
    let count = 6;
    let providers: Vec<Arc<dyn KeyProvider>> = (0..count)
        .map(|i| {
            Arc::new(DelayedProvider {
                inner: StubKeyProvider::from_byte(i as u8 + 1),
                delay: Duration::from_millis(10 * (count - i) as u64),
            }) as Arc<dyn KeyProvider>
        })
        .collect();
    let plan = providers
        .iter()
        .enumerate()
        .map(|(i, p)| approve(p.address(), &format!("snap-{i}"), i))
        .collect();
    let batch = Batch {
        identities: IdentityPool::from_providers(providers),
        snaps: SnapPool::default(),
        plan,
    };

    let signed = generator.sign_batch(&batch).await.unwrap();
    assert_eq!(signed.len(), count);
    for (i, attestation) in signed.iter().enumerate() {
        let json = serde_json::to_value(attestation).unwrap();
        assert_eq!(json["credentialSubject"]["id"], format!("snap://snap-{i}"));
    }
}

#[tokio::test]
async fn test_signing_failure_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    let generator = test_generator(dir.path());

    let good: Arc<dyn KeyProvider> = Arc::new(StubKeyProvider::from_byte(1));
    let bad: Arc<dyn KeyProvider> =
        Arc::new(FailingKeyProvider::new(Address::from_bytes([2; 20])));
    let plan = vec![
        approve(good.address(), "ok", 0),
        approve(bad.address(), "fails", 1),
    ];
    let batch = Batch {
        identities: IdentityPool::from_providers(vec![good, bad]),
        snaps: SnapPool::default(),
        plan,
    };

    let err = generator.sign_batch(&batch).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Attest(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_level_mode_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        endorsement_mode: EndorsementMode::Level,
        ..GeneratorConfig::default()
    };
    let generator =
        Generator::with_output(&config, fixed_clock(), TimestampedPath::new(dir.path()));

    let path = generator
        .run_with_rng(
            GenerateCounts {
                wallets: 3,
                snaps: 0,
                p2p_attestations: 6,
                snap_attestations: 0,
            },
            &mut StdRng::seed_from_u64(11),
        )
        .await
        .unwrap();

    let contents = std::fs::read_to_string(path).unwrap();
    for line in contents.lines() {
        let fields: Vec<&str> = line.splitn(4, ';').collect();
        assert_eq!(fields[2], "4");
        let payload: serde_json::Value = serde_json::from_str(fields[3]).unwrap();
        let subject = payload["credentialSubject"].as_object().unwrap();
        assert!(subject.contains_key("trustworthiness"));
        assert!(!subject.contains_key("currentStatus"));
        assert!(payload["proof"]["signature"].as_str().unwrap().starts_with("0x"));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_plan_respects_counts(
        wallets in 1usize..5,
        snaps in 1usize..5,
        p2p in 0usize..12,
        snap in 0usize..12,
        seed in any::<u64>(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let generator = test_generator(dir.path());
        let batch = generator
            .prepare(
                GenerateCounts { wallets, snaps, p2p_attestations: p2p, snap_attestations: snap },
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap();

        prop_assert_eq!(batch.identities.len(), wallets);
        prop_assert_eq!(batch.snaps.len(), snaps);
        prop_assert_eq!(batch.plan.len(), p2p + snap);

        let addresses = batch.identities.addresses();
        for (i, planned) in batch.plan.iter().enumerate() {
            prop_assert_eq!(planned.request.issuer, addresses[planned.signer]);
            match &planned.request.subject {
                Subject::Identity(subject) => {
                    prop_assert!(i < p2p);
                    prop_assert!(addresses.contains(subject));
                }
                Subject::Content(id) => {
                    prop_assert!(i >= p2p);
                    prop_assert!(batch.snaps.ids().contains(id));
                }
            }
        }
    }

    #[test]
    fn prop_rows_are_sequential(count in 0usize..20) {
        let dir = tempfile::tempdir().unwrap();
        let generator = test_generator(dir.path());
        let stub = StubKeyProvider::from_byte(7);
        let issuer = stub.address();
        let batch = Batch {
            identities: IdentityPool::from_providers(vec![Arc::new(stub) as Arc<dyn KeyProvider>]),
            snaps: SnapPool::default(),
            plan: (0..count).map(|i| approve(issuer, &i.to_string(), 0)).collect(),
        };

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let signed = runtime.block_on(generator.sign_batch(&batch)).unwrap();
        let rows = generator.encode(&signed);

        prop_assert_eq!(rows.len(), count);
        for (i, row) in rows.iter().enumerate() {
            prop_assert_eq!(&row.id, &format!("{:x}", i + 1));
            prop_assert_ne!(row.schema_id, SCHEMA_ID_SENTINEL);
        }
    }
}
