//! Advanced-signature timestamp source: discovers every timestamp token
//! embedded in a parsed CAdES/XAdES/PAdES/ASiC signature, classifies it,
//! computes the exact set of signed/validation artifacts it covers, binds
//! validation material found inside timestamps into aggregate sources, and
//! verifies each timestamp's message imprint against the re-materialised
//! octet stream it was computed over.
//!
//! This crate is a single focused library; it does not parse signature
//! containers, build certificate chains, or talk to TSA/OCSP/CRL endpoints.
//! Those are the enclosing validator's job, injected here through
//! [`dialect::DialectOps`] and [`builder::ParsedSignature`].

pub mod builder;
pub mod config;
pub mod dialect;
pub mod digest;
pub mod error;
pub mod external;
pub mod identifier;
pub mod model;
pub mod rebuild;
pub mod reference_set;
pub mod sources;

pub use builder::{ParsedSignature, TimestampSource};
pub use config::TimestampSourceConfig;
pub use dialect::DialectOps;
pub use digest::{Digest, DigestAlgorithm};
pub use error::{TimestampSourceError, TimestampSourceResult};
pub use identifier::Identifier;
pub use model::{
    ArchiveSubKind, CertificateRef, CertificateToken, MatchResult, ObjectType, RevocationBinary,
    RevocationRef, TimestampKind, TimestampToken, TimestampedReference,
};
pub use sources::{ListCertificateSource, ListRevocationSource};
