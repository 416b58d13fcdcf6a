//! Closed vocabularies: attestation kinds, statuses, and status reasons.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AttestError;

/// Credential family, which fixes the subject type and canonical byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Peer-to-peer trust signal between two identities.
    Endorsement,
    /// Signal about a content identifier.
    AuditReport,
}

/// The kind of attestation, serialized as the payload's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttestationKind {
    EndorsementCredential,
    DisputeCredential,
    AuditReportApproveCredential,
    AuditReportDisapproveCredential,
}

impl AttestationKind {
    /// Every kind, in table order.
    pub const ALL: [AttestationKind; 4] = [
        Self::EndorsementCredential,
        Self::DisputeCredential,
        Self::AuditReportApproveCredential,
        Self::AuditReportDisapproveCredential,
    ];

    /// Kinds of the endorsement family.
    pub const ENDORSEMENT: [AttestationKind; 2] =
        [Self::EndorsementCredential, Self::DisputeCredential];

    /// Kinds of the audit report family.
    pub const AUDIT_REPORT: [AttestationKind; 2] = [
        Self::AuditReportApproveCredential,
        Self::AuditReportDisapproveCredential,
    ];

    pub fn family(self) -> Family {
        match self {
            Self::EndorsementCredential | Self::DisputeCredential => Family::Endorsement,
            Self::AuditReportApproveCredential | Self::AuditReportDisapproveCredential => {
                Family::AuditReport
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EndorsementCredential => "EndorsementCredential",
            Self::DisputeCredential => "DisputeCredential",
            Self::AuditReportApproveCredential => "AuditReportApproveCredential",
            Self::AuditReportDisapproveCredential => "AuditReportDisapproveCredential",
        }
    }

    /// Whether this kind carries a negative signal (dispute / disapprove).
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Self::DisputeCredential | Self::AuditReportDisapproveCredential
        )
    }
}

impl fmt::Display for AttestationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttestationKind {
    type Err = AttestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AttestError::UnsupportedKind(s.to_string()))
    }
}

/// Textual status carried by status-mode endorsements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CurrentStatus {
    Endorsed,
    Disputed,
}

impl CurrentStatus {
    /// Canonical status byte: 0x01 when endorsed, 0x00 otherwise.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Endorsed => 0x01,
            Self::Disputed => 0x00,
        }
    }
}

/// Why content was disapproved (or an identity disputed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum StatusReason {
    Unreliable = 0x00,
    Scam = 0x01,
    Incomplete = 0x02,
}

impl StatusReason {
    pub const ALL: [StatusReason; 3] = [Self::Unreliable, Self::Scam, Self::Incomplete];

    /// Single-byte canonical code.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unreliable => "Unreliable",
            Self::Scam => "Scam",
            Self::Incomplete => "Incomplete",
        }
    }

    /// Human-readable explanation used by the structured reason object.
    pub fn description(self) -> &'static str {
        match self {
            Self::Unreliable => "Behaves inconsistently or fails under normal use",
            Self::Scam => "Interact with a fraudulent smart contract",
            Self::Incomplete => "Missing functionality or unfinished implementation",
        }
    }

    /// Look up a reason by name. `None` when the name is outside the vocabulary.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status reason as supplied by a caller: either resolved against the
/// vocabulary or kept verbatim when it could not be.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReasonRef {
    Known(StatusReason),
    Unresolved(String),
}

impl ReasonRef {
    /// Resolve a reason name, keeping unknown names as [`ReasonRef::Unresolved`].
    pub fn parse(name: &str) -> Self {
        match StatusReason::lookup(name) {
            Some(reason) => Self::Known(reason),
            None => Self::Unresolved(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(reason) => reason.as_str(),
            Self::Unresolved(name) => name,
        }
    }

    /// Canonical encoding: the 1-byte code, or nothing when unresolved.
    pub fn encoded(&self) -> Option<u8> {
        match self {
            Self::Known(reason) => Some(reason.code()),
            Self::Unresolved(_) => None,
        }
    }
}

impl From<StatusReason> for ReasonRef {
    fn from(reason: StatusReason) -> Self {
        Self::Known(reason)
    }
}

impl Serialize for ReasonRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
