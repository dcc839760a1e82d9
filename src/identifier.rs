//! Stable string identities for certificates, revocation entries, references
//! and timestamps.
//!
//! An `Identifier` is opaque: callers must not parse it, only compare it for
//! equality. It is always derived deterministically from bytes, never
//! randomly generated, so that re-parsing the same signature twice yields the
//! same identifiers.

use crate::digest::{Digest, DigestAlgorithm};
use std::fmt;

/// The default algorithm used to derive identifiers when the dialect doesn't
/// otherwise constrain the choice. Identifiers are internal bookkeeping, not
/// security-relevant digests, so SHA-256 is a reasonable fixed default rather
/// than something a caller needs to configure.
const IDENTIFIER_ALGORITHM: DigestAlgorithm = DigestAlgorithm::Sha256;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Derive an identifier from the raw encoded bytes of a certificate, CRL,
    /// or OCSP response (an "encapsulated value" per the glossary).
    pub fn from_encapsulated_bytes(bytes: &[u8]) -> Self {
        let digest = IDENTIFIER_ALGORITHM.digest(bytes);
        Identifier(hex::encode(digest))
    }

    /// Derive an identifier from a reference digest (digest-of-digest), used
    /// for certificate-refs / revocation-refs that point at material that
    /// hasn't been recovered as a binary.
    pub fn from_reference_digest(digest: &Digest) -> Self {
        let mut preimage = Vec::with_capacity(digest.value.len() + 1);
        preimage.push(algorithm_tag(digest.algorithm));
        preimage.extend_from_slice(&digest.value);
        let outer = IDENTIFIER_ALGORITHM.digest(&preimage);
        Identifier(hex::encode(outer))
    }

    /// Wrap an already-stable string as an identifier (e.g. a signature id or
    /// signature-scope id supplied verbatim by the parsed signature).
    pub fn from_stable_string(id: impl Into<String>) -> Self {
        Identifier(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn algorithm_tag(algorithm: DigestAlgorithm) -> u8 {
    match algorithm {
        DigestAlgorithm::Sha256 => 0x01,
        DigestAlgorithm::Sha384 => 0x02,
        DigestAlgorithm::Sha512 => 0x03,
        DigestAlgorithm::Sha3_256 => 0x04,
        DigestAlgorithm::Sha3_512 => 0x05,
        DigestAlgorithm::Blake3 => 0x06,
    }
}
