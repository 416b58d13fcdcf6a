//! Golden test vectors for canonical encoding.
//!
//! Any verifier of these attestations must rebuild the same pre-image and
//! digest from the same inputs. Issuer is always [`KNOWN_ADDRESS`].

use attestgen_core::{
    Address, AttestationKind, AttestationRequest, Canonicalization, ContentId, Draft, ReasonRef,
    SchemaBuilder, StatusReason,
};

use crate::fixtures::KNOWN_ADDRESS;

/// Subject used by the identity vectors.
pub const SUBJECT_ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

/// What the vector's request is about.
#[derive(Debug, Clone, Copy)]
pub enum VectorSubject {
    Identity(&'static str),
    Content(&'static str),
}

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub kind: AttestationKind,
    pub subject: VectorSubject,
    pub level: Option<i32>,
    pub reason: Option<&'static str>,
    /// Expected canonical bytes (hex).
    pub canonical: &'static str,
    /// Expected `ByteConcat` digest (hex, no prefix).
    pub byte_concat_digest: &'static str,
    /// Expected `MessageHash` digest (hex, no prefix), where pinned.
    pub message_hash_digest: Option<&'static str>,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Endorsement in status mode",
            kind: AttestationKind::EndorsementCredential,
            subject: VectorSubject::Identity(SUBJECT_ADDRESS),
            level: None,
            reason: None,
            canonical: "002c7536e3605d9c16a7a3d7b1898e529396a65c2301",
            byte_concat_digest: "fd9662c9898dfbf570190b870cef6ab0ff52d7f1bb71ccdb13d7277d614fda27",
            message_hash_digest: Some(
                "6cc085eeab3da3d77e8ec31f67c8405c3186111c6737340ffc9054b40b78acd6",
            ),
        },
        GoldenVector {
            name: "Dispute in status mode",
            kind: AttestationKind::DisputeCredential,
            subject: VectorSubject::Identity(SUBJECT_ADDRESS),
            level: None,
            reason: Some("Scam"),
            canonical: "002c7536e3605d9c16a7a3d7b1898e529396a65c2300",
            byte_concat_digest: "941a5d96b5f3187841aa65d40f418f086d478fa18375a81e5c1411c391134329",
            message_hash_digest: None,
        },
        GoldenVector {
            name: "Positive level endorsement",
            kind: AttestationKind::EndorsementCredential,
            subject: VectorSubject::Identity(SUBJECT_ADDRESS),
            level: Some(1),
            reason: None,
            canonical: "002c7536e3605d9c16a7a3d7b1898e529396a65c2300",
            byte_concat_digest: "941a5d96b5f3187841aa65d40f418f086d478fa18375a81e5c1411c391134329",
            message_hash_digest: None,
        },
        GoldenVector {
            name: "Audit approval",
            kind: AttestationKind::AuditReportApproveCredential,
            subject: VectorSubject::Content("abc123"),
            level: None,
            reason: None,
            canonical: "616263313233",
            byte_concat_digest: "719accc61a9cc126830e5906f9d672d06eab6f8597287095a2c55a8b775e7016",
            message_hash_digest: Some(
                "b8d008db479523794f7b02b1534421398de521a8864c4ed9e8f746ee7880d0b1",
            ),
        },
        GoldenVector {
            name: "Audit disapproval for scam",
            kind: AttestationKind::AuditReportDisapproveCredential,
            subject: VectorSubject::Content("abc123"),
            level: None,
            reason: Some("Scam"),
            canonical: "61626331323301",
            byte_concat_digest: "1bcc42d26df5feb99e48fe36cfff0f96d4129a16e07f2d0c49b188f461b6ca6c",
            message_hash_digest: None,
        },
        GoldenVector {
            name: "Audit disapproval of a snap id",
            kind: AttestationKind::AuditReportDisapproveCredential,
            subject: VectorSubject::Content("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            level: None,
            reason: Some("Unreliable"),
            canonical: "30783561616562363035336633653934633962396130396633333636393433356537656631626561656400",
            byte_concat_digest: "70eaee542eee222495268ee81969eb9c70a99e8c4defbf92b31ff01fb60612a0",
            message_hash_digest: None,
        },
        GoldenVector {
            name: "Audit disapproval with unresolvable reason",
            kind: AttestationKind::AuditReportDisapproveCredential,
            subject: VectorSubject::Content("abc123"),
            level: None,
            reason: Some("Spam"),
            canonical: "616263313233",
            byte_concat_digest: "719accc61a9cc126830e5906f9d672d06eab6f8597287095a2c55a8b775e7016",
            message_hash_digest: None,
        },
    ]
}

/// The request a vector describes.
pub fn request_from_vector(vector: &GoldenVector) -> AttestationRequest {
    let issuer: Address = KNOWN_ADDRESS.parse().expect("valid issuer address");
    let mut request = match vector.subject {
        VectorSubject::Identity(address) => AttestationRequest::endorsement(
            vector.kind,
            issuer,
            address.parse().expect("valid subject address"),
        ),
        VectorSubject::Content(id) => {
            AttestationRequest::audit_report(vector.kind, issuer, ContentId::new(id))
        }
    };
    request.params.level = vector.level;
    request.params.reason = vector.reason.map(ReasonRef::parse);
    request
}

/// Build the draft for a vector with the default schema config.
pub fn draft_from_vector(vector: &GoldenVector) -> Draft {
    SchemaBuilder::default()
        .build(&request_from_vector(vector))
        .expect("golden vectors are valid requests")
}

/// Check every vector. Returns `(name, matches, canonical hex, byte-concat digest hex)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let draft = draft_from_vector(v);
            let canonical = hex::encode(&draft.canonical);
            let digest = Canonicalization::ByteConcat
                .digest(&draft)
                .map(|d| hex::encode(d.as_bytes()))
                .unwrap_or_default();

            let mut matches = canonical == v.canonical && digest == v.byte_concat_digest;
            if let Some(expected) = v.message_hash_digest {
                let message = Canonicalization::MessageHash
                    .digest(&draft)
                    .map(|d| hex::encode(d.as_bytes()))
                    .unwrap_or_default();
                matches &= message == expected;
            }

            (v.name.to_string(), matches, canonical, digest)
        })
        .collect()
}

/// Reason code pinned for each vocabulary entry.
pub fn reason_codes() -> [(StatusReason, u8); 3] {
    [
        (StatusReason::Unreliable, 0x00),
        (StatusReason::Scam, 0x01),
        (StatusReason::Incomplete, 0x02),
    ]
}
