//! A hand-written, in-memory dialect used only by the integration suite,
//! since no real ASN.1/XML parser is in scope for this core and the
//! end-to-end scenarios run against this fixture instead. Not part of the
//! published crate API.

use adsig_timestamp_source::{
    ArchiveSubKind, CertificateToken, Digest, DialectOps, DigestAlgorithm, Identifier,
    ListCertificateSource, ListRevocationSource, ObjectType, ParsedSignature, RevocationBinary,
    TimestampKind, TimestampToken, TimestampedReference,
};

/// One signed or unsigned attribute in a fixture signature's attribute
/// stream. `None` payloads simulate an unparseable timestamp value, where
/// an extractor fails soft.
#[derive(Clone)]
pub enum Attr {
    Content(Option<(&'static str, &'static [u8])>),
    Signature(Option<(&'static str, &'static [u8])>),
    CertificateValues(Vec<CertificateToken>),
    RevocationValues(Vec<RevocationBinary>, Vec<RevocationBinary>),
    Archive(Option<(&'static str, &'static [u8])>, Option<ArchiveSubKind>),
    Unknown,
}

fn make_token(kind: TimestampKind, spec: (&'static str, &'static [u8])) -> TimestampToken {
    TimestampToken::new(
        Identifier::from_stable_string(spec.0),
        kind,
        Digest::of(DigestAlgorithm::Sha256, spec.1),
    )
}

/// The id this fixture dialect's `signed_data_references` always reports,
/// standing in for the dialect-reconstructed CMS `SignedData` reference a
/// real CAdES/XAdES implementation would compute from the container itself.
pub const CMS_SIGNED_DATA_ID: &str = "cms-signed-data";

pub fn fixture_dialect() -> DialectOps<Attr> {
    DialectOps {
        is_content_timestamp: Box::new(|a| matches!(a, Attr::Content(_))),
        is_all_data_objects_timestamp: Box::new(|_| false),
        is_individual_data_objects_timestamp: Box::new(|_| false),
        is_signature_timestamp: Box::new(|a| matches!(a, Attr::Signature(_))),
        is_complete_certificate_ref: Box::new(|_| false),
        is_attribute_certificate_ref: Box::new(|_| false),
        is_complete_revocation_ref: Box::new(|_| false),
        is_attribute_revocation_ref: Box::new(|_| false),
        is_refs_only_timestamp: Box::new(|_| false),
        is_sig_and_refs_timestamp: Box::new(|_| false),
        is_certificate_values: Box::new(|a| matches!(a, Attr::CertificateValues(_))),
        is_revocation_values: Box::new(|a| matches!(a, Attr::RevocationValues(_, _))),
        is_archive_timestamp: Box::new(|a| matches!(a, Attr::Archive(_, _))),
        is_timestamp_validation_data: Box::new(|_| false),

        extract_timestamp_token: Box::new(|a| match a {
            Attr::Content(Some(spec)) => Some(make_token(TimestampKind::Content, *spec)),
            Attr::Content(None) => None,
            Attr::Signature(Some(spec)) => Some(make_token(TimestampKind::Signature, *spec)),
            Attr::Signature(None) => None,
            Attr::Archive(Some(spec), _) => Some(make_token(TimestampKind::Archive, *spec)),
            Attr::Archive(None, _) => None,
            _ => None,
        }),
        extract_certificate_ref_digests: Box::new(|_| Vec::new()),
        extract_crl_ref_digests: Box::new(|_| Vec::new()),
        extract_ocsp_ref_digests: Box::new(|_| Vec::new()),
        extract_certificate_values: Box::new(|a| match a {
            Attr::CertificateValues(certs) => certs.clone(),
            _ => Vec::new(),
        }),
        extract_crl_values: Box::new(|a| match a {
            Attr::RevocationValues(crls, _) => crls.clone(),
            _ => Vec::new(),
        }),
        extract_ocsp_values: Box::new(|a| match a {
            Attr::RevocationValues(_, ocsps) => ocsps.clone(),
            _ => Vec::new(),
        }),
        extract_individual_data_object_references: Box::new(|_| Vec::new()),
        extract_archive_sub_kind: Box::new(|a| match a {
            Attr::Archive(_, sub) => sub.clone(),
            _ => None,
        }),

        content_timestamp_data: Box::new(|_| Vec::new()),
        signature_timestamp_data: Box::new(|_| Vec::new()),
        timestamp_x1_data: Box::new(|_| Vec::new()),
        timestamp_x2_data: Box::new(|_| Vec::new()),
        archive_timestamp_data: Box::new(|_| Vec::new()),
        signed_data_references: Box::new(|| {
            vec![TimestampedReference::new(
                Identifier::from_stable_string(CMS_SIGNED_DATA_ID),
                ObjectType::SignedData,
            )]
        }),
    }
}

pub struct FixtureSignature {
    pub signed: Vec<Attr>,
    pub unsigned: Vec<Attr>,
    pub id: Identifier,
    pub scopes: Vec<Identifier>,
    pub signing_certificates: Vec<CertificateToken>,
    pub certificate_source: ListCertificateSource,
    pub revocation_source: ListRevocationSource,
}

impl FixtureSignature {
    pub fn new() -> Self {
        FixtureSignature {
            signed: Vec::new(),
            unsigned: Vec::new(),
            id: Identifier::from_stable_string("sig-1"),
            scopes: vec![Identifier::from_stable_string("scope-1")],
            signing_certificates: vec![CertificateToken::new(b"signer-cert", "issuer", "subject", false)],
            certificate_source: ListCertificateSource::new(),
            revocation_source: ListRevocationSource::new(),
        }
    }
}

impl Default for FixtureSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsedSignature<Attr> for FixtureSignature {
    fn signed_properties(&self) -> &[Attr] {
        &self.signed
    }
    fn unsigned_properties(&self) -> &[Attr] {
        &self.unsigned
    }
    fn signature_id(&self) -> &Identifier {
        &self.id
    }
    fn signature_scopes(&self) -> &[Identifier] {
        &self.scopes
    }
    fn signing_certificates(&self) -> &[CertificateToken] {
        &self.signing_certificates
    }
    fn certificate_source(&self) -> &ListCertificateSource {
        &self.certificate_source
    }
    fn revocation_source(&self) -> &ListRevocationSource {
        &self.revocation_source
    }
}

pub fn contains_ref(refs: &[TimestampedReference], id: &Identifier, object_type: ObjectType) -> bool {
    refs.iter().any(|r| &r.referenced_id == id && r.object_type == object_type)
}
