//! Revocation/certificate aggregators: append-only collections that
//! merge material found in the signature itself with material found inside
//! each timestamp, with digest-indexed lookup and identifier-based
//! deduplication. Grounded on `tdf-core::revocation::RevocationManager`'s
//! multi-list aggregation shape.

use crate::digest::{Digest, DigestAlgorithm};
use crate::identifier::Identifier;
use crate::model::{CertificateToken, RevocationBinary};
use std::collections::HashMap;

/// An append-only, identifier-deduplicated, digest-searchable collection of
/// `CertificateToken`s.
#[derive(Debug, Clone, Default)]
pub struct ListCertificateSource {
    certificates: Vec<CertificateToken>,
    by_id: HashMap<Identifier, usize>,
    by_digest: HashMap<(DigestAlgorithm, Vec<u8>), usize>,
}

impl ListCertificateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a certificate if its identifier hasn't been seen before. Returns
    /// whether it was newly added. Aggregate sources monotonically grow,
    /// entries never disappear, so "added" here is the only mutation.
    pub fn add(&mut self, certificate: CertificateToken) -> bool {
        if self.by_id.contains_key(&certificate.id) {
            return false;
        }
        let index = self.certificates.len();
        self.by_id.insert(certificate.id.clone(), index);
        for algorithm in [
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
            DigestAlgorithm::Sha3_256,
            DigestAlgorithm::Sha3_512,
            DigestAlgorithm::Blake3,
        ] {
            if let Some(value) = certificate.digest(algorithm) {
                self.by_digest.insert((algorithm, value.to_vec()), index);
            }
        }
        self.certificates.push(certificate);
        true
    }

    pub fn add_all(&mut self, certificates: impl IntoIterator<Item = CertificateToken>) {
        for certificate in certificates {
            self.add(certificate);
        }
    }

    pub fn by_id(&self, id: &Identifier) -> Option<&CertificateToken> {
        self.by_id.get(id).map(|&index| &self.certificates[index])
    }

    pub fn find_by_digest(&self, digest: &Digest) -> Option<&CertificateToken> {
        self.by_digest
            .get(&(digest.algorithm, digest.value.clone()))
            .map(|&index| &self.certificates[index])
    }

    pub fn certificates(&self) -> &[CertificateToken] {
        &self.certificates
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

/// Resolve a certificate digest against multiple sources in priority order
/// (e.g. the signature's own certificate source, then the timestamp
/// certificate source), following the "resolve in signature cert-source
/// then in timestamp cert-source" rule.
pub fn resolve_certificate_by_digest<'a>(
    digest: &Digest,
    sources: &[&'a ListCertificateSource],
) -> Option<&'a CertificateToken> {
    sources.iter().find_map(|source| source.find_by_digest(digest))
}

/// Resolve a revocation-entry digest against multiple sources in priority
/// order, mirroring `resolve_certificate_by_digest`.
pub fn resolve_revocation_by_digest<'a>(
    digest: &Digest,
    sources: &[&'a ListRevocationSource],
) -> Option<&'a RevocationBinary> {
    sources.iter().find_map(|source| source.find_by_digest(digest))
}

/// An append-only, identifier-deduplicated, digest-searchable collection of
/// CRL and OCSP binaries. A single source serves both kinds, treating
/// "aggregate CRL/OCSP sources" as the same shape of collection applied
/// twice.
#[derive(Debug, Clone, Default)]
pub struct ListRevocationSource {
    binaries: Vec<RevocationBinary>,
    by_id: HashMap<Identifier, usize>,
    by_digest: HashMap<(DigestAlgorithm, Vec<u8>), usize>,
}

impl ListRevocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, binary: RevocationBinary) -> bool {
        let id = binary.id().clone();
        if self.by_id.contains_key(&id) {
            return false;
        }
        let index = self.binaries.len();
        self.by_id.insert(id, index);
        let digests = match &binary {
            RevocationBinary::Crl { digests, .. } | RevocationBinary::Ocsp { digests, .. } => digests,
        };
        for (&algorithm, value) in digests {
            self.by_digest.insert((algorithm, value.clone()), index);
        }
        self.binaries.push(binary);
        true
    }

    pub fn add_all(&mut self, binaries: impl IntoIterator<Item = RevocationBinary>) {
        for binary in binaries {
            self.add(binary);
        }
    }

    /// Merge another source's contents into this one, preserving the other
    /// source's relative insertion order for any not-yet-seen entries.
    pub fn merge(&mut self, other: &ListRevocationSource) {
        self.add_all(other.binaries.iter().cloned());
    }

    pub fn by_id(&self, id: &Identifier) -> Option<&RevocationBinary> {
        self.by_id.get(id).map(|&index| &self.binaries[index])
    }

    pub fn find_by_digest(&self, digest: &Digest) -> Option<&RevocationBinary> {
        self.by_digest
            .get(&(digest.algorithm, digest.value.clone()))
            .map(|&index| &self.binaries[index])
    }

    pub fn binaries(&self) -> &[RevocationBinary] {
        &self.binaries
    }

    pub fn len(&self) -> usize {
        self.binaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty()
    }
}
