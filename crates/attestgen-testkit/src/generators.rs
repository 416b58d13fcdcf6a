//! Proptest generators for property-based testing.

use proptest::prelude::*;

use attestgen_core::{
    Address, AttestationKind, AttestationRequest, ContentId, Family, ReasonRef, StatusReason,
    Subject,
};

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Generate a printable content id.
pub fn content_id() -> impl Strategy<Value = ContentId> {
    "[ -~]{0,64}".prop_map(ContentId::new)
}

/// Generate a snap-shaped content id (`0x` + 40 lowercase hex).
pub fn snap_id() -> impl Strategy<Value = ContentId> {
    "0x[0-9a-f]{40}".prop_map(ContentId::new)
}

/// Generate an AttestationKind.
pub fn attestation_kind() -> impl Strategy<Value = AttestationKind> {
    prop::sample::select(AttestationKind::ALL.to_vec())
}

/// Generate a StatusReason.
pub fn status_reason() -> impl Strategy<Value = StatusReason> {
    prop::sample::select(StatusReason::ALL.to_vec())
}

/// Generate a reason, mostly from the vocabulary, sometimes unresolvable.
pub fn reason_ref() -> impl Strategy<Value = ReasonRef> {
    prop_oneof![
        4 => status_reason().prop_map(ReasonRef::Known),
        1 => "[A-Z][a-z]{2,10}".prop_map(|s| ReasonRef::parse(&s)),
    ]
}

/// Generate a trust level as issued in level mode.
pub fn trust_level() -> impl Strategy<Value = i32> {
    prop_oneof![Just(1), Just(-1)]
}

/// Generate a request whose subject matches its kind's family.
///
/// Disapprovals always carry a reason; other parameters are optional.
pub fn attestation_request() -> impl Strategy<Value = AttestationRequest> {
    (
        attestation_kind(),
        address(),
        address(),
        content_id(),
        prop::option::of(trust_level()),
        prop::option::of(reason_ref()),
        reason_ref(),
    )
        .prop_map(|(kind, issuer, peer, content, level, reason, fallback)| {
            let subject = match kind.family() {
                Family::Endorsement => Subject::Identity(peer),
                Family::AuditReport => Subject::Content(content),
            };
            let mut request = AttestationRequest::new(kind, issuer, subject);
            if kind.family() == Family::Endorsement {
                request.params.level = level;
            }
            request.params.reason = match kind {
                AttestationKind::AuditReportDisapproveCredential => Some(reason.unwrap_or(fallback)),
                _ => reason,
            };
            request
        })
}

/// Generate a request whose subject belongs to the other family.
pub fn mismatched_request() -> impl Strategy<Value = AttestationRequest> {
    (attestation_kind(), address(), address(), content_id()).prop_map(
        |(kind, issuer, peer, content)| {
            let subject = match kind.family() {
                Family::Endorsement => Subject::Content(content),
                Family::AuditReport => Subject::Identity(peer),
            };
            AttestationRequest::new(kind, issuer, subject)
        },
    )
}
