//! Digest algorithms and values used for identifiers and message imprints.

use sha2::{Digest as Sha2Digest, Sha256, Sha384, Sha512};
use sha3::{Digest as Sha3DigestTrait, Sha3_256, Sha3_512};
use subtle::ConstantTimeEq;

/// Digest algorithms a timestamp's message imprint (or an embedded
/// certificate/revocation digest) may be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_512,
    Blake3,
}

impl DigestAlgorithm {
    /// Hash `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
            DigestAlgorithm::Sha3_256 => Sha3_256::digest(data).to_vec(),
            DigestAlgorithm::Sha3_512 => Sha3_512::digest(data).to_vec(),
            DigestAlgorithm::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }
}

/// An (algorithm, value) pair: a digest over some externally-defined bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    pub algorithm: DigestAlgorithm,
    pub value: Vec<u8>,
}

impl Digest {
    pub fn new(algorithm: DigestAlgorithm, value: Vec<u8>) -> Self {
        Digest { algorithm, value }
    }

    /// Compute the digest of `data` under `algorithm`.
    pub fn of(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        Digest {
            value: algorithm.digest(data),
            algorithm,
        }
    }

    /// Constant-time comparison against a freshly-rebuilt digest value,
    /// avoiding timing side channels when comparing message imprints.
    pub fn matches_bytes(&self, data: &[u8]) -> bool {
        let recomputed = self.algorithm.digest(data);
        if recomputed.len() != self.value.len() {
            return false;
        }
        recomputed.ct_eq(&self.value).into()
    }
}
