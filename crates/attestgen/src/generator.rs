//! Batch generation.
//!
//! A run has three phases:
//!
//! 1. **Prepare**: build the identity and snap pools and plan every
//!    attestation (issuer, subject, kind, parameters). All randomness lives here.
//! 2. **Sign**: build each draft and sign them all concurrently. Results are
//!    written into a slot per plan index, so output order is plan order
//!    regardless of completion order.
//! 3. **Export**: encode rows and hand them to the sink.
//!
//! Any failure aborts the whole batch. Outstanding signing tasks are
//! cancelled when the task set is dropped.

use std::path::PathBuf;
use std::sync::Arc;

use attestgen_core::{
    Address, AttestationKind, AttestationRequest, AttestationSigner, KeyProvider, SchemaBuilder,
    SignedAttestation, StatusReason,
};
use attestgen_export::{
    Clock, CsvFileSink, ExportRow, OutputPathResolver, RowEncoder, SystemClock, TimestampedPath,
};
use rand::rngs::StdRng;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use tokio::task::JoinSet;

use crate::config::{EndorsementMode, GeneratorConfig};
use crate::error::{GeneratorError, Result};
use crate::pool::{IdentityPool, SnapPool};

/// Trust levels drawn in level mode.
pub const TRUST_LEVELS: [i32; 2] = [1, -1];

/// The four counts a run is parameterized by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateCounts {
    pub wallets: usize,
    pub snaps: usize,
    pub p2p_attestations: usize,
    pub snap_attestations: usize,
}

/// One attestation to produce: the request plus which pool member signs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAttestation {
    pub request: AttestationRequest,
    pub signer: usize,
}

/// Pools and plan for one run.
#[derive(Debug, Clone)]
pub struct Batch {
    pub identities: IdentityPool,
    pub snaps: SnapPool,
    pub plan: Vec<PlannedAttestation>,
}

/// Drives a generation run.
pub struct Generator<C = SystemClock, P = TimestampedPath> {
    endorsement_mode: EndorsementMode,
    builder: SchemaBuilder,
    signer: AttestationSigner,
    encoder: RowEncoder<C>,
    sink: CsvFileSink<C, P>,
}

impl Generator {
    /// Wall clock, timestamped files under the configured output directory.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self::with_output(
            config,
            SystemClock,
            TimestampedPath::new(config.output_dir.clone()),
        )
    }
}

impl<C, P> Generator<C, P>
where
    C: Clock + Clone,
    P: OutputPathResolver,
{
    /// Generator with an injected clock and path resolver.
    pub fn with_output(config: &GeneratorConfig, clock: C, resolver: P) -> Self {
        Self {
            endorsement_mode: config.endorsement_mode,
            builder: SchemaBuilder::new(config.schema),
            signer: AttestationSigner::new(config.canonicalization),
            encoder: RowEncoder::new(clock.clone()),
            sink: CsvFileSink::new(clock, resolver),
        }
    }

    /// Fresh pools of the requested sizes plus a plan over them.
    pub fn prepare<R: CryptoRng + RngCore>(
        &self,
        counts: GenerateCounts,
        rng: &mut R,
    ) -> Result<Batch> {
        let identities = IdentityPool::random(counts.wallets, rng);
        let snaps = SnapPool::random(counts.snaps, rng);
        let plan = self.plan(
            &identities,
            &snaps,
            counts.p2p_attestations,
            counts.snap_attestations,
            rng,
        )?;
        Ok(Batch {
            identities,
            snaps,
            plan,
        })
    }

    /// Plan `p2p` identity attestations followed by `snap` content attestations.
    pub fn plan<R: Rng>(
        &self,
        identities: &IdentityPool,
        snaps: &SnapPool,
        p2p: usize,
        snap: usize,
        rng: &mut R,
    ) -> Result<Vec<PlannedAttestation>> {
        let mut plan = Vec::with_capacity(p2p + snap);

        for _ in 0..p2p {
            let signer = identities.pick(rng).ok_or(GeneratorError::EmptyPool("wallet"))?;
            let subject = identities
                .pick(rng)
                .and_then(|i| identities.get(i))
                .ok_or(GeneratorError::EmptyPool("wallet"))?
                .address();
            let issuer = identity_address(identities, signer)?;

            let request = match self.endorsement_mode {
                EndorsementMode::Status => {
                    // Disputes go out without a reason and render the default text.
                    let kind = choose(&AttestationKind::ENDORSEMENT, rng);
                    AttestationRequest::endorsement(kind, issuer, subject)
                }
                EndorsementMode::Level => {
                    let level = choose(&TRUST_LEVELS, rng);
                    let kind = if level > 0 {
                        AttestationKind::EndorsementCredential
                    } else {
                        AttestationKind::DisputeCredential
                    };
                    AttestationRequest::endorsement(kind, issuer, subject).with_level(level)
                }
            };
            plan.push(PlannedAttestation { request, signer });
        }

        for _ in 0..snap {
            let signer = identities.pick(rng).ok_or(GeneratorError::EmptyPool("wallet"))?;
            let content = snaps.pick(rng).ok_or(GeneratorError::EmptyPool("snap"))?.clone();
            let issuer = identity_address(identities, signer)?;

            let kind = choose(&AttestationKind::AUDIT_REPORT, rng);
            let request = AttestationRequest::audit_report(kind, issuer, content);
            let request = if kind == AttestationKind::AuditReportDisapproveCredential {
                request.with_reason(choose(&StatusReason::ALL, rng))
            } else {
                request
            };
            plan.push(PlannedAttestation { request, signer });
        }

        Ok(plan)
    }

    /// Build and sign every planned attestation. Output order is plan order.
    pub async fn sign_batch(&self, batch: &Batch) -> Result<Vec<SignedAttestation>> {
        let mut jobs: Vec<(_, Arc<dyn KeyProvider>)> = Vec::with_capacity(batch.plan.len());
        for planned in &batch.plan {
            let draft = self.builder.build(&planned.request)?;
            let provider = batch
                .identities
                .get(planned.signer)
                .ok_or(GeneratorError::EmptyPool("wallet"))?;
            jobs.push((draft, Arc::clone(provider)));
        }

        let mut slots: Vec<Option<SignedAttestation>> = vec![None; jobs.len()];
        let mut tasks = JoinSet::new();
        for (index, (draft, provider)) in jobs.into_iter().enumerate() {
            let signer = self.signer;
            tasks.spawn(async move { (index, signer.sign(draft, &*provider).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, signed) = joined?;
            slots[index] = Some(signed?);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Rows for a signed batch, ids starting at 1.
    pub fn encode(&self, attestations: &[SignedAttestation]) -> Vec<ExportRow> {
        self.encoder.encode_batch(attestations)
    }

    /// Encode and write a signed batch. Returns the file written.
    pub fn export(&self, attestations: &[SignedAttestation]) -> Result<PathBuf> {
        let rows = self.encode(attestations);
        Ok(self.sink.write(&rows)?)
    }

    /// Prepare, sign and export one batch using OS entropy.
    pub async fn run(&self, counts: GenerateCounts) -> Result<PathBuf> {
        self.run_with_rng(counts, &mut StdRng::from_entropy()).await
    }

    /// Like [`run`](Self::run) with a caller-supplied RNG.
    pub async fn run_with_rng<R>(&self, counts: GenerateCounts, rng: &mut R) -> Result<PathBuf>
    where
        R: CryptoRng + RngCore + Send,
    {
        tracing::info!(
            wallets = counts.wallets,
            snaps = counts.snaps,
            p2p = counts.p2p_attestations,
            snap_attestations = counts.snap_attestations,
            canonicalization = %self.signer.canonicalization(),
            endorsement_mode = %self.endorsement_mode,
            "generating attestations"
        );

        let batch = self.prepare(counts, rng)?;
        let signed = self.sign_batch(&batch).await?;

        let warnings: usize = signed.iter().map(|a| a.warnings.len()).sum();
        if warnings > 0 {
            tracing::warn!(warnings, "batch contains attestations with integrity warnings");
        }

        self.export(&signed)
    }
}

fn identity_address(identities: &IdentityPool, index: usize) -> Result<Address> {
    identities
        .get(index)
        .map(|p| p.address())
        .ok_or(GeneratorError::EmptyPool("wallet"))
}

fn choose<T: Copy, R: Rng>(items: &[T], rng: &mut R) -> T {
    items[rng.gen_range(0..items.len())]
}
