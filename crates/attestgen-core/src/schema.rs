//! Credential schemas and the builder that produces them.
//!
//! A [`SchemaBuilder`] turns an [`AttestationRequest`] into a [`Draft`]: the
//! JSON credential payload plus the canonical byte pre-image. Which subject
//! fields appear is decided here and nowhere else:
//!
//! | kind | mode | subject fields |
//! |---|---|---|
//! | EndorsementCredential | status | `currentStatus: "Endorsed"` |
//! | DisputeCredential | status | `currentStatus: "Disputed"`, `statusReason` |
//! | Endorsement / Dispute | level | `trustworthiness` |
//! | AuditReportApproveCredential | - | none |
//! | AuditReportDisapproveCredential | - | `statusReason` |
//!
//! Level mode is selected by supplying [`ClaimParams::level`].

use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::canonical::{audit_report_bytes, endorsement_bytes};
use crate::did::Did;
use crate::error::{AttestError, IntegrityWarning, Result};
use crate::kind::{AttestationKind, CurrentStatus, Family, ReasonRef};
use crate::types::{Address, ContentId};

/// Scope recorded on level-mode trust arcs.
pub const TRUST_SCOPE: &str = "Software security";

/// Placeholder used when a reason or explanation was not supplied.
pub const NOT_PROVIDED: &str = "Not provided";

/// Text-form dispute reason used when the caller supplied none.
pub const DEFAULT_DISPUTE_REASON: &str = "None";

/// Who or what an attestation is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    Identity(Address),
    Content(ContentId),
}

/// Optional, variant-specific inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimParams {
    /// Numeric trust level. When present, endorsements use level mode.
    pub level: Option<i32>,
    /// Dispute or disapproval reason.
    pub reason: Option<ReasonRef>,
}

/// Everything needed to build one attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest {
    pub kind: AttestationKind,
    pub issuer: Address,
    pub subject: Subject,
    pub params: ClaimParams,
}

impl AttestationRequest {
    pub fn new(kind: AttestationKind, issuer: Address, subject: Subject) -> Self {
        Self {
            kind,
            issuer,
            subject,
            params: ClaimParams::default(),
        }
    }

    /// Identity-to-identity request.
    pub fn endorsement(kind: AttestationKind, issuer: Address, subject: Address) -> Self {
        Self::new(kind, issuer, Subject::Identity(subject))
    }

    /// Identity-to-content request.
    pub fn audit_report(kind: AttestationKind, issuer: Address, content: ContentId) -> Self {
        Self::new(kind, issuer, Subject::Content(content))
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.params.level = Some(level);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<ReasonRef>) -> Self {
        self.params.reason = Some(reason.into());
        self
    }
}

/// How a dispute's `statusReason` is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisputeReasonForm {
    /// A bare string.
    #[default]
    Text,
    /// `{ "type", "value", "lang" }`
    Structured,
}

impl std::str::FromStr for DisputeReasonForm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "structured" => Ok(Self::Structured),
            other => Err(format!(
                "unknown dispute reason form {other:?} (expected text or structured)"
            )),
        }
    }
}

/// Builder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    pub dispute_reason_form: DisputeReasonForm,
}

/// Structured dispute reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub lang: String,
}

/// Dispute reason in either rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DisputeReason {
    Text(String),
    Structured(ReasonDetail),
}

/// One trust arc in level mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustArc {
    pub scope: String,
    pub level: i32,
    pub reason: Vec<String>,
}

/// Variant-specific subject fields. Each variant is exactly one row of the
/// table in the module docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectClaims {
    Endorsed,
    Disputed { status_reason: DisputeReason },
    Trust { trustworthiness: Vec<TrustArc> },
    Approved,
    Disapproved { status_reason: ReasonRef },
}

impl SubjectClaims {
    /// JSON field names this variant contributes beside `id`.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Endorsed => &["currentStatus"],
            Self::Disputed { .. } => &["currentStatus", "statusReason"],
            Self::Trust { .. } => &["trustworthiness"],
            Self::Approved => &[],
            Self::Disapproved { .. } => &["statusReason"],
        }
    }
}

/// The `credentialSubject` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSubject {
    pub id: Did,
    pub claims: SubjectClaims,
}

impl Serialize for CredentialSubject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = 1 + self.claims.field_names().len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("id", &self.id)?;
        match &self.claims {
            SubjectClaims::Endorsed => {
                map.serialize_entry("currentStatus", &CurrentStatus::Endorsed)?;
            }
            SubjectClaims::Disputed { status_reason } => {
                map.serialize_entry("currentStatus", &CurrentStatus::Disputed)?;
                map.serialize_entry("statusReason", status_reason)?;
            }
            SubjectClaims::Trust { trustworthiness } => {
                map.serialize_entry("trustworthiness", trustworthiness)?;
            }
            SubjectClaims::Approved => {}
            SubjectClaims::Disapproved { status_reason } => {
                map.serialize_entry("statusReason", status_reason)?;
            }
        }
        map.end()
    }
}

/// The human-readable claim, before a proof is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialPayload {
    #[serde(rename = "type")]
    pub kind: AttestationKind,
    pub issuer: Did,
    #[serde(rename = "credentialSubject")]
    pub credential_subject: CredentialSubject,
}

/// A built but unsigned attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub issuer: Address,
    pub payload: CredentialPayload,
    /// Byte pre-image for [`Canonicalization::ByteConcat`](crate::Canonicalization).
    pub canonical: Bytes,
    pub warnings: Vec<IntegrityWarning>,
}

impl Draft {
    pub fn kind(&self) -> AttestationKind {
        self.payload.kind
    }
}

/// Builds payloads and canonical bytes from requests.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    config: SchemaConfig,
}

impl SchemaBuilder {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Build the payload and pre-image for one request.
    pub fn build(&self, request: &AttestationRequest) -> Result<Draft> {
        match request.kind.family() {
            Family::Endorsement => self.build_endorsement(request),
            Family::AuditReport => self.build_audit_report(request),
        }
    }

    fn build_endorsement(&self, request: &AttestationRequest) -> Result<Draft> {
        let Subject::Identity(subject) = &request.subject else {
            return Err(AttestError::invalid_subject(request.kind));
        };

        let (claims, status_byte) = match request.params.level {
            // No textual status exists in level mode, so the status byte is never "endorsed".
            Some(level) => {
                let reason = request
                    .params
                    .reason
                    .as_ref()
                    .map_or(NOT_PROVIDED, ReasonRef::as_str);
                let arc = TrustArc {
                    scope: TRUST_SCOPE.to_string(),
                    level,
                    reason: vec![reason.to_string()],
                };
                (
                    SubjectClaims::Trust {
                        trustworthiness: vec![arc],
                    },
                    CurrentStatus::Disputed.to_byte(),
                )
            }
            None if request.kind == AttestationKind::DisputeCredential => (
                SubjectClaims::Disputed {
                    status_reason: self.dispute_reason(request.params.reason.as_ref()),
                },
                CurrentStatus::Disputed.to_byte(),
            ),
            None => (SubjectClaims::Endorsed, CurrentStatus::Endorsed.to_byte()),
        };

        Ok(Draft {
            issuer: request.issuer,
            payload: CredentialPayload {
                kind: request.kind,
                issuer: Did::identity(&request.issuer),
                credential_subject: CredentialSubject {
                    id: Did::identity(subject),
                    claims,
                },
            },
            canonical: endorsement_bytes(&request.issuer, status_byte),
            warnings: Vec::new(),
        })
    }

    fn build_audit_report(&self, request: &AttestationRequest) -> Result<Draft> {
        let Subject::Content(content) = &request.subject else {
            return Err(AttestError::invalid_subject(request.kind));
        };

        let mut warnings = Vec::new();
        let (claims, reason_code) = match request.kind {
            AttestationKind::AuditReportDisapproveCredential => {
                let reason =
                    request
                        .params
                        .reason
                        .clone()
                        .ok_or(AttestError::MissingParameter {
                            kind: request.kind,
                            parameter: "reason",
                        })?;
                let code = reason.encoded();
                if code.is_none() {
                    let warning = IntegrityWarning::ReasonLookupFailed {
                        reason: reason.as_str().to_string(),
                    };
                    tracing::warn!(content = %content, "{}; hashing without reason bytes", warning);
                    warnings.push(warning);
                }
                (SubjectClaims::Disapproved { status_reason: reason }, code)
            }
            _ => (SubjectClaims::Approved, None),
        };

        Ok(Draft {
            issuer: request.issuer,
            payload: CredentialPayload {
                kind: request.kind,
                issuer: Did::identity(&request.issuer),
                credential_subject: CredentialSubject {
                    id: Did::content(content),
                    claims,
                },
            },
            canonical: audit_report_bytes(content, reason_code),
            warnings,
        })
    }

    fn dispute_reason(&self, reason: Option<&ReasonRef>) -> DisputeReason {
        match self.config.dispute_reason_form {
            DisputeReasonForm::Text => DisputeReason::Text(
                reason
                    .map_or(DEFAULT_DISPUTE_REASON, ReasonRef::as_str)
                    .to_string(),
            ),
            DisputeReasonForm::Structured => {
                let (kind, value) = match reason {
                    Some(ReasonRef::Known(r)) => (r.as_str(), r.description()),
                    Some(ReasonRef::Unresolved(name)) => (name.as_str(), NOT_PROVIDED),
                    None => (DEFAULT_DISPUTE_REASON, NOT_PROVIDED),
                };
                DisputeReason::Structured(ReasonDetail {
                    kind: kind.to_string(),
                    value: value.to_string(),
                    lang: "en".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::StatusReason;
    use proptest::prelude::*;
    use serde_json::Value;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn subject_keys(draft: &Draft) -> Vec<String> {
        let json = serde_json::to_value(&draft.payload).unwrap();
        let mut keys: Vec<String> = json["credentialSubject"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_dispute_scenario() {
        let request =
            AttestationRequest::endorsement(AttestationKind::DisputeCredential, addr(0xbb), addr(0xaa));
        let draft = SchemaBuilder::default().build(&request).unwrap();

        let json = serde_json::to_value(&draft.payload).unwrap();
        assert_eq!(json["type"], "DisputeCredential");
        assert_eq!(json["credentialSubject"]["currentStatus"], "Disputed");
        assert_eq!(json["credentialSubject"]["statusReason"], "None");
        assert_eq!(
            json["credentialSubject"]["id"],
            format!("did:pkh:eth:{}", addr(0xaa))
        );
        assert_eq!(json["issuer"], format!("did:pkh:eth:{}", addr(0xbb)));

        let mut expected = vec![0x00];
        expected.extend_from_slice(&[0xbb; 20]);
        expected.push(0x00);
        assert_eq!(&draft.canonical[..], &expected[..]);
    }

    #[test]
    fn test_endorsement_status_byte() {
        let request = AttestationRequest::endorsement(
            AttestationKind::EndorsementCredential,
            addr(0xbb),
            addr(0xaa),
        );
        let draft = SchemaBuilder::default().build(&request).unwrap();

        assert_eq!(draft.canonical[21], 0x01);
        assert_eq!(subject_keys(&draft), vec!["currentStatus", "id"]);
        let json = serde_json::to_value(&draft.payload).unwrap();
        assert_eq!(json["credentialSubject"]["currentStatus"], "Endorsed");
    }

    #[test]
    fn test_structured_dispute_reason() {
        let builder = SchemaBuilder::new(SchemaConfig {
            dispute_reason_form: DisputeReasonForm::Structured,
        });
        let request =
            AttestationRequest::endorsement(AttestationKind::DisputeCredential, addr(1), addr(2))
                .with_reason(StatusReason::Scam);
        let draft = builder.build(&request).unwrap();

        let json = serde_json::to_value(&draft.payload).unwrap();
        let reason = &json["credentialSubject"]["statusReason"];
        assert_eq!(reason["type"], "Scam");
        assert_eq!(reason["value"], "Interact with a fraudulent smart contract");
        assert_eq!(reason["lang"], "en");
    }

    #[test]
    fn test_level_mode() {
        let request = AttestationRequest::endorsement(
            AttestationKind::EndorsementCredential,
            addr(0xbb),
            addr(0xaa),
        )
        .with_level(1);
        let draft = SchemaBuilder::default().build(&request).unwrap();

        assert_eq!(subject_keys(&draft), vec!["id", "trustworthiness"]);
        let json = serde_json::to_value(&draft.payload).unwrap();
        let arc = &json["credentialSubject"]["trustworthiness"][0];
        assert_eq!(arc["scope"], "Software security");
        assert_eq!(arc["level"], 1);
        assert_eq!(arc["reason"][0], "Not provided");
        assert_eq!(draft.canonical[21], 0x00);
    }

    #[test]
    fn test_audit_approve_scenario() {
        let request = AttestationRequest::audit_report(
            AttestationKind::AuditReportApproveCredential,
            addr(1),
            ContentId::new("abc123"),
        );
        let draft = SchemaBuilder::default().build(&request).unwrap();

        assert_eq!(subject_keys(&draft), vec!["id"]);
        assert_eq!(&draft.canonical[..], b"abc123");
        let json = serde_json::to_value(&draft.payload).unwrap();
        assert_eq!(json["credentialSubject"]["id"], "snap://abc123");
    }

    #[test]
    fn test_audit_disapprove_reason_byte() {
        let request = AttestationRequest::audit_report(
            AttestationKind::AuditReportDisapproveCredential,
            addr(1),
            ContentId::new("abc123"),
        )
        .with_reason(StatusReason::Incomplete);
        let draft = SchemaBuilder::default().build(&request).unwrap();

        assert_eq!(&draft.canonical[..], b"abc123\x02");
        assert!(draft.warnings.is_empty());
        let json = serde_json::to_value(&draft.payload).unwrap();
        assert_eq!(json["credentialSubject"]["statusReason"], "Incomplete");
    }

    #[test]
    fn test_unresolved_reason_degrades_to_empty_bytes() {
        let request = AttestationRequest::audit_report(
            AttestationKind::AuditReportDisapproveCredential,
            addr(1),
            ContentId::new("abc123"),
        )
        .with_reason(ReasonRef::parse("Spam"));
        let draft = SchemaBuilder::default().build(&request).unwrap();

        assert_eq!(&draft.canonical[..], b"abc123");
        assert_eq!(
            draft.warnings,
            vec![IntegrityWarning::ReasonLookupFailed {
                reason: "Spam".to_string()
            }]
        );
        let json = serde_json::to_value(&draft.payload).unwrap();
        assert_eq!(json["credentialSubject"]["statusReason"], "Spam");
    }

    #[test]
    fn test_disapprove_requires_reason() {
        let request = AttestationRequest::audit_report(
            AttestationKind::AuditReportDisapproveCredential,
            addr(1),
            ContentId::new("abc123"),
        );
        let err = SchemaBuilder::default().build(&request).unwrap_err();
        assert!(matches!(err, AttestError::MissingParameter { parameter: "reason", .. }));
    }

    #[test]
    fn test_subject_family_mismatch() {
        let wrong_content = AttestationRequest::new(
            AttestationKind::EndorsementCredential,
            addr(1),
            Subject::Content(ContentId::new("abc")),
        );
        assert!(matches!(
            SchemaBuilder::default().build(&wrong_content),
            Err(AttestError::InvalidSubject { .. })
        ));

        let wrong_identity = AttestationRequest::new(
            AttestationKind::AuditReportApproveCredential,
            addr(1),
            Subject::Identity(addr(2)),
        );
        assert!(matches!(
            SchemaBuilder::default().build(&wrong_identity),
            Err(AttestError::InvalidSubject { .. })
        ));
    }

    #[test]
    fn test_payload_key_order() {
        let request = AttestationRequest::audit_report(
            AttestationKind::AuditReportApproveCredential,
            addr(1),
            ContentId::new("x"),
        );
        let draft = SchemaBuilder::default().build(&request).unwrap();
        let json = serde_json::to_string(&draft.payload).unwrap();

        let type_at = json.find("\"type\"").unwrap();
        let issuer_at = json.find("\"issuer\"").unwrap();
        let subject_at = json.find("\"credentialSubject\"").unwrap();
        assert!(type_at < issuer_at && issuer_at < subject_at);
    }

    fn any_request() -> impl Strategy<Value = AttestationRequest> {
        let reason = prop_oneof![
            Just(None),
            prop::sample::select(StatusReason::ALL.to_vec()).prop_map(|r| Some(ReasonRef::Known(r))),
            "[A-Za-z]{1,12}".prop_map(|s| Some(ReasonRef::parse(&s))),
        ];
        (
            prop::sample::select(AttestationKind::ALL.to_vec()),
            any::<[u8; 20]>(),
            any::<[u8; 20]>(),
            "[ -~]{0,48}",
            prop::option::of(prop_oneof![Just(1i32), Just(-1i32)]),
            reason,
        )
            .prop_map(|(kind, issuer, subject, snap, level, reason)| {
                let subject = match kind.family() {
                    Family::Endorsement => Subject::Identity(Address::from_bytes(subject)),
                    Family::AuditReport => Subject::Content(ContentId::new(snap)),
                };
                let mut request = AttestationRequest::new(kind, Address::from_bytes(issuer), subject);
                request.params.level = level;
                request.params.reason = reason;
                request
            })
    }

    proptest! {
        #[test]
        fn prop_field_presence_matches_claims(request in any_request()) {
            match SchemaBuilder::default().build(&request) {
                Ok(draft) => {
                    let json = serde_json::to_value(&draft.payload).unwrap();
                    let subject = json["credentialSubject"].as_object().unwrap();
                    let mut expected: Vec<&str> = draft.payload.credential_subject.claims.field_names().to_vec();
                    expected.push("id");
                    expected.sort();
                    let mut actual: Vec<&str> = subject.keys().map(String::as_str).collect();
                    actual.sort();
                    prop_assert_eq!(actual, expected);

                    let has_status = subject.contains_key("currentStatus");
                    let has_trust = subject.contains_key("trustworthiness");
                    let has_reason = subject.contains_key("statusReason");
                    match (request.kind, request.params.level) {
                        (AttestationKind::EndorsementCredential, None) => prop_assert!(has_status && !has_reason && !has_trust),
                        (AttestationKind::DisputeCredential, None) => prop_assert!(has_status && has_reason && !has_trust),
                        (k, Some(_)) if k.family() == Family::Endorsement => prop_assert!(has_trust && !has_status && !has_reason),
                        (AttestationKind::AuditReportApproveCredential, _) => prop_assert!(!has_status && !has_reason && !has_trust),
                        (AttestationKind::AuditReportDisapproveCredential, _) => prop_assert!(has_reason && !has_status && !has_trust),
                        _ => unreachable!(),
                    }
                }
                Err(AttestError::MissingParameter { kind, .. }) => {
                    prop_assert_eq!(kind, AttestationKind::AuditReportDisapproveCredential);
                    prop_assert!(request.params.reason.is_none());
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        #[test]
        fn prop_canonical_bytes_deterministic(request in any_request()) {
            let builder = SchemaBuilder::default();
            if let (Ok(a), Ok(b)) = (builder.build(&request), builder.build(&request)) {
                prop_assert_eq!(&a.canonical, &b.canonical);
                prop_assert_eq!(
                    serde_json::to_string(&a.payload).unwrap(),
                    serde_json::to_string(&b.payload).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_subject_value_is_object() {
        let request = AttestationRequest::endorsement(
            AttestationKind::EndorsementCredential,
            addr(3),
            addr(4),
        );
        let draft = SchemaBuilder::default().build(&request).unwrap();
        let json = serde_json::to_value(&draft.payload).unwrap();
        assert!(matches!(json["credentialSubject"], Value::Object(_)));
    }
}
