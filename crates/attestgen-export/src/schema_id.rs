//! Attestation kind to numeric schema id.
//!
//! The indexer keys its decoders on these ids, so the table is fixed.
//! Both endorsement-family kinds share one schema.

use attestgen_core::AttestationKind;

/// Returned for any type name outside the table.
pub const SCHEMA_ID_SENTINEL: i64 = 0;

const SCHEMA_IDS: &[(&str, i64)] = &[
    ("AuditReportApproveCredential", 2),
    ("AuditReportDisapproveCredential", 3),
    ("EndorsementCredential", 4),
    ("DisputeCredential", 4),
];

/// Look up a schema id by payload `type` name. Misses degrade to the sentinel.
pub fn schema_id(type_name: &str) -> i64 {
    SCHEMA_IDS
        .iter()
        .find(|(name, _)| *name == type_name)
        .map_or(SCHEMA_ID_SENTINEL, |(_, id)| *id)
}

/// Schema id for a typed kind.
pub fn schema_id_for(kind: AttestationKind) -> i64 {
    schema_id(kind.as_str())
}
