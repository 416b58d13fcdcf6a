//! Row encoding for the indexer's tabular input.

use attestgen_core::SignedAttestation;

use crate::clock::{Clock, SystemClock};
use crate::schema_id::schema_id;

/// One exported record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Lowercase hex of the 1-based position in the batch.
    pub id: String,
    /// Unix milliseconds at encode time.
    pub timestamp: String,
    pub schema_id: i64,
    /// JSON of the full signed attestation.
    pub payload: String,
}

impl ExportRow {
    /// Fields in column order.
    pub fn fields(&self) -> [String; 4] {
        [
            self.id.clone(),
            self.timestamp.clone(),
            self.schema_id.to_string(),
            self.payload.clone(),
        ]
    }
}

/// Converts signed attestations to rows. Infallible.
#[derive(Debug, Clone, Default)]
pub struct RowEncoder<C = SystemClock> {
    clock: C,
}

impl<C: Clock> RowEncoder<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Encode one attestation at zero-based `ordinal`.
    pub fn encode_row(&self, attestation: &SignedAttestation, ordinal: usize) -> ExportRow {
        // String keys and plain values only; serde_json cannot fail here.
        let payload =
            serde_json::to_string(attestation).expect("signed attestation serializes to JSON");

        ExportRow {
            id: format!("{:x}", ordinal + 1),
            timestamp: self.clock.now_millis().to_string(),
            schema_id: schema_id(attestation.kind().as_str()),
            payload,
        }
    }

    /// Encode a batch, preserving input order. Ordinals restart at zero per call.
    pub fn encode_batch(&self, attestations: &[SignedAttestation]) -> Vec<ExportRow> {
        attestations
            .iter()
            .enumerate()
            .map(|(ordinal, attestation)| self.encode_row(attestation, ordinal))
            .collect()
    }
}
