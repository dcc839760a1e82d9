//! Core data model: identifiers, certificates, revocation material,
//! timestamped references, and the central `TimestampToken` entity.

use crate::digest::Digest;
use crate::identifier::Identifier;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A parsed X.509 certificate, immutable once produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateToken {
    pub id: Identifier,
    pub issuer: String,
    pub subject: String,
    pub is_self_signed: bool,
    digests: HashMap<crate::digest::DigestAlgorithm, Vec<u8>>,
}

impl CertificateToken {
    pub fn new(
        encoded: &[u8],
        issuer: impl Into<String>,
        subject: impl Into<String>,
        is_self_signed: bool,
    ) -> Self {
        CertificateToken {
            id: Identifier::from_encapsulated_bytes(encoded),
            issuer: issuer.into(),
            subject: subject.into(),
            is_self_signed,
            digests: HashMap::new(),
        }
    }

    /// Record the digest of this certificate under `algorithm`, so later
    /// certificate-ref resolution can match on any algorithm the dialect uses.
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digests.insert(digest.algorithm, digest.value);
        self
    }

    pub fn digest(&self, algorithm: crate::digest::DigestAlgorithm) -> Option<&[u8]> {
        self.digests.get(&algorithm).map(|v| v.as_slice())
    }
}

/// Either a CRL blob or an OCSP response blob recovered from the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationBinary {
    Crl {
        id: Identifier,
        digests: HashMap<crate::digest::DigestAlgorithm, Vec<u8>>,
    },
    Ocsp {
        id: Identifier,
        digests: HashMap<crate::digest::DigestAlgorithm, Vec<u8>>,
    },
}

impl RevocationBinary {
    pub fn crl(encoded: &[u8]) -> Self {
        RevocationBinary::Crl {
            id: Identifier::from_encapsulated_bytes(encoded),
            digests: HashMap::new(),
        }
    }

    pub fn ocsp(encoded: &[u8]) -> Self {
        RevocationBinary::Ocsp {
            id: Identifier::from_encapsulated_bytes(encoded),
            digests: HashMap::new(),
        }
    }

    pub fn id(&self) -> &Identifier {
        match self {
            RevocationBinary::Crl { id, .. } | RevocationBinary::Ocsp { id, .. } => id,
        }
    }
}

/// A digest referencing an unrecovered certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRef {
    pub digest: Digest,
}

impl CertificateRef {
    pub fn new(digest: Digest) -> Self {
        CertificateRef { digest }
    }

    pub fn id(&self) -> Identifier {
        Identifier::from_reference_digest(&self.digest)
    }
}

/// A digest referencing an unrecovered CRL or OCSP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationRef {
    pub digest: Digest,
}

impl RevocationRef {
    pub fn new(digest: Digest) -> Self {
        RevocationRef { digest }
    }

    pub fn id(&self) -> Identifier {
        Identifier::from_reference_digest(&self.digest)
    }
}

/// The kind of object a `TimestampedReference` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    SignedData,
    Signature,
    Certificate,
    Revocation,
    Timestamp,
}

/// A logical pointer to a specific object that a timestamp cryptographically
/// covers. Equality is structural, the `(id, object_type)` pair only, with no
/// provenance field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimestampedReference {
    pub referenced_id: Identifier,
    pub object_type: ObjectType,
}

impl TimestampedReference {
    pub fn new(referenced_id: Identifier, object_type: ObjectType) -> Self {
        TimestampedReference {
            referenced_id,
            object_type,
        }
    }
}

/// The classification a builder assigns an unsigned (or signed) timestamp
/// attribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampKind {
    Content,
    AllDataObjects,
    IndividualDataObjects,
    Signature,
    ValidationDataRefsOnly,
    ValidationData,
    Archive,
    Document,
}

/// Dialect-specific sub-classification of an `Archive` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveSubKind {
    CadesV2,
    CadesV3,
    XadesV141,
    PadesLta,
    AsicArchiveManifest,
}

/// The result of matching a timestamp's message imprint against rebuilt data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Unset,
    Matched,
    Mismatched,
}

/// The central entity: a parsed timestamp token together with the set of
/// references it has been determined to cover.
#[derive(Debug, Clone)]
pub struct TimestampToken {
    pub id: Identifier,
    pub kind: TimestampKind,
    pub archive_sub_kind: Option<ArchiveSubKind>,
    /// When the dialect can recover it from the parsed token. Plays no role
    /// in any invariant, purely informational.
    pub generation_time: Option<DateTime<Utc>>,
    pub certificates: Vec<CertificateToken>,
    pub crl_binaries: Vec<RevocationBinary>,
    pub ocsp_binaries: Vec<RevocationBinary>,
    pub message_imprint: Digest,
    timestamped_references: crate::reference_set::ReferenceSet,
    processed: bool,
    match_result: MatchResult,
}

impl TimestampToken {
    pub fn new(id: Identifier, kind: TimestampKind, message_imprint: Digest) -> Self {
        TimestampToken {
            id,
            kind,
            archive_sub_kind: None,
            generation_time: None,
            certificates: Vec::new(),
            crl_binaries: Vec::new(),
            ocsp_binaries: Vec::new(),
            message_imprint,
            timestamped_references: crate::reference_set::ReferenceSet::new(),
            processed: false,
            match_result: MatchResult::Unset,
        }
    }

    pub fn with_archive_sub_kind(mut self, sub_kind: ArchiveSubKind) -> Self {
        self.archive_sub_kind = Some(sub_kind);
        self
    }

    pub fn with_generation_time(mut self, time: DateTime<Utc>) -> Self {
        self.generation_time = Some(time);
        self
    }

    pub fn timestamped_references(&self) -> &[TimestampedReference] {
        self.timestamped_references.as_slice()
    }

    /// Seed the reference set at emission time. Only the builder and the
    /// external-intake path are expected to call this.
    pub(crate) fn reference_set_mut(&mut self) -> &mut crate::reference_set::ReferenceSet {
        &mut self.timestamped_references
    }

    pub fn processed(&self) -> bool {
        self.processed
    }

    pub fn match_result(&self) -> MatchResult {
        self.match_result
    }

    /// State machine transition: `Created --match_data--> {Matched,
    /// Mismatched}`. A second call once `processed` is set is a no-op, so
    /// repeated validation passes never flip an already-recorded verdict.
    pub fn match_data(&mut self, rebuilt: &[u8]) {
        if self.processed {
            return;
        }
        self.match_result = if self.message_imprint.matches_bytes(rebuilt) {
            MatchResult::Matched
        } else {
            MatchResult::Mismatched
        };
        self.processed = true;
    }

    /// Expand this already-emitted timestamp into the references a later
    /// covering timestamp must absorb: itself as a `Timestamp` reference,
    /// every reference it already covers, and a `Certificate` reference for
    /// each certificate it embeds.
    pub fn expanded_references(&self) -> Vec<TimestampedReference> {
        let mut refs = Vec::with_capacity(
            1 + self.timestamped_references.len() + self.certificates.len(),
        );
        refs.push(TimestampedReference::new(self.id.clone(), ObjectType::Timestamp));
        refs.extend(self.timestamped_references.iter().cloned());
        refs.extend(
            self.certificates
                .iter()
                .map(|c| TimestampedReference::new(c.id.clone(), ObjectType::Certificate)),
        );
        refs
    }
}
