//! External interfaces: the attribute classifier, material extractors, and
//! data rebuilder functions a dialect (CAdES, XAdES, PAdES, ASiC-*) must
//! supply. The core is generic over the attribute representation `A` and
//! never interprets it itself, it only calls the closures a `DialectOps<A>`
//! bundles up.
//!
//! Grounded on `tdf-core::timestamp::TimestampProvider`: a trait (there) /
//! struct-of-closures (here) is how this crate family injects an externally
//! supplied, dialect- or deployment-specific operation into otherwise
//! dialect-agnostic core logic.

use crate::digest::Digest;
use crate::identifier::Identifier;
use crate::model::{ArchiveSubKind, CertificateToken, RevocationBinary, TimestampToken, TimestampedReference};

type Predicate<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;
type TokenExtractor<A> = Box<dyn Fn(&A) -> Option<TimestampToken> + Send + Sync>;
type DigestListExtractor<A> = Box<dyn Fn(&A) -> Vec<Digest> + Send + Sync>;
type CertificateListExtractor<A> = Box<dyn Fn(&A) -> Vec<CertificateToken> + Send + Sync>;
type RevocationListExtractor<A> = Box<dyn Fn(&A) -> Vec<RevocationBinary> + Send + Sync>;
type DataBuilder = Box<dyn Fn(&TimestampToken) -> Vec<u8> + Send + Sync>;

/// The classification an attribute resolves to, used during Phase A
/// (signed properties) of the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedAttributeClass {
    Content,
    AllDataObjects,
    IndividualDataObjects,
}

/// The classification an attribute resolves to during Phase B (unsigned
/// properties), in the dispatch order the component design specifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsignedAttributeClass {
    CompleteCertificateRef,
    AttributeCertificateRef,
    CompleteRevocationRef,
    AttributeRevocationRef,
    CertificateValues,
    RevocationValues,
    TimestampValidationData,
    SignatureTimestamp,
    RefsOnlyTimestamp,
    SigAndRefsTimestamp,
    ArchiveTimestamp,
}

/// A dialect's full set of predicates, extractors, and data-rebuilder
/// functions, injected into a `TimestampSource` at construction. The core
/// never constructs one of these itself.
pub struct DialectOps<A> {
    // classifier predicates
    pub is_content_timestamp: Predicate<A>,
    pub is_all_data_objects_timestamp: Predicate<A>,
    pub is_individual_data_objects_timestamp: Predicate<A>,
    pub is_signature_timestamp: Predicate<A>,
    pub is_complete_certificate_ref: Predicate<A>,
    pub is_attribute_certificate_ref: Predicate<A>,
    pub is_complete_revocation_ref: Predicate<A>,
    pub is_attribute_revocation_ref: Predicate<A>,
    pub is_refs_only_timestamp: Predicate<A>,
    pub is_sig_and_refs_timestamp: Predicate<A>,
    pub is_certificate_values: Predicate<A>,
    pub is_revocation_values: Predicate<A>,
    pub is_archive_timestamp: Predicate<A>,
    pub is_timestamp_validation_data: Predicate<A>,

    // material extractors
    pub extract_timestamp_token: TokenExtractor<A>,
    pub extract_certificate_ref_digests: DigestListExtractor<A>,
    pub extract_crl_ref_digests: DigestListExtractor<A>,
    pub extract_ocsp_ref_digests: DigestListExtractor<A>,
    pub extract_certificate_values: CertificateListExtractor<A>,
    pub extract_crl_values: RevocationListExtractor<A>,
    pub extract_ocsp_values: RevocationListExtractor<A>,
    /// The subset of signature-scope ids an individual-data-objects timestamp
    /// attribute actually covers (a dialect-specific partition of the full
    /// scope list).
    pub extract_individual_data_object_references: Box<dyn Fn(&A) -> Vec<Identifier> + Send + Sync>,
    /// The archive-profile sub-kind of an archive-timestamp attribute, when
    /// the dialect distinguishes more than one archive encoding.
    pub extract_archive_sub_kind: Box<dyn Fn(&A) -> Option<ArchiveSubKind> + Send + Sync>,

    // data rebuilder
    pub content_timestamp_data: DataBuilder,
    pub signature_timestamp_data: DataBuilder,
    pub timestamp_x1_data: DataBuilder,
    pub timestamp_x2_data: DataBuilder,
    pub archive_timestamp_data: DataBuilder,

    /// The dialect-specific signature-CMS `SignedData` references an
    /// archive timestamp (internal or external) must additionally cover.
    pub signed_data_references: Box<dyn Fn() -> Vec<TimestampedReference> + Send + Sync>,
}


impl<A> DialectOps<A> {
    /// Classify a signed-property attribute for Phase A. Predicates
    /// are tried in the order the component design lists them; a
    /// well-behaved dialect's predicates are mutually exclusive so order
    /// only matters for malformed dialects, where it at least gives
    /// deterministic behaviour.
    pub fn classify_signed(&self, attribute: &A) -> Option<SignedAttributeClass> {
        if (self.is_content_timestamp)(attribute) {
            Some(SignedAttributeClass::Content)
        } else if (self.is_all_data_objects_timestamp)(attribute) {
            Some(SignedAttributeClass::AllDataObjects)
        } else if (self.is_individual_data_objects_timestamp)(attribute) {
            Some(SignedAttributeClass::IndividualDataObjects)
        } else {
            None
        }
    }

    /// Classify an unsigned-property attribute for Phase B.
    pub fn classify_unsigned(&self, attribute: &A) -> Option<UnsignedAttributeClass> {
        use UnsignedAttributeClass::*;

        if (self.is_complete_certificate_ref)(attribute) {
            Some(CompleteCertificateRef)
        } else if (self.is_attribute_certificate_ref)(attribute) {
            Some(AttributeCertificateRef)
        } else if (self.is_complete_revocation_ref)(attribute) {
            Some(CompleteRevocationRef)
        } else if (self.is_attribute_revocation_ref)(attribute) {
            Some(AttributeRevocationRef)
        } else if (self.is_certificate_values)(attribute) {
            Some(CertificateValues)
        } else if (self.is_revocation_values)(attribute) {
            Some(RevocationValues)
        } else if (self.is_timestamp_validation_data)(attribute) {
            Some(TimestampValidationData)
        } else if (self.is_signature_timestamp)(attribute) {
            Some(SignatureTimestamp)
        } else if (self.is_refs_only_timestamp)(attribute) {
            Some(RefsOnlyTimestamp)
        } else if (self.is_sig_and_refs_timestamp)(attribute) {
            Some(SigAndRefsTimestamp)
        } else if (self.is_archive_timestamp)(attribute) {
            Some(ArchiveTimestamp)
        } else {
            None
        }
    }
}
