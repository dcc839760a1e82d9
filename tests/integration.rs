//! End-to-end scenarios S1-S7 from the spec's testable-properties section,
//! each run against the in-memory fixture dialect in `support/`.

mod support;

use adsig_timestamp_source::config::TimestampSourceConfig;
use adsig_timestamp_source::digest::{Digest, DigestAlgorithm};
use adsig_timestamp_source::identifier::Identifier;
use adsig_timestamp_source::model::{CertificateToken, ObjectType, RevocationBinary, TimestampKind};
use adsig_timestamp_source::{TimestampSource, TimestampSourceError};
use support::{contains_ref, fixture_dialect, Attr, FixtureSignature, CMS_SIGNED_DATA_ID};

fn source(signature: &FixtureSignature) -> TimestampSource<Attr> {
    TimestampSource::from_signature(signature, fixture_dialect(), TimestampSourceConfig::default())
}

/// S1 - B-level: no timestamp attributes anywhere. All five lists empty;
/// `certificate_map_within_timestamps(false)` is empty.
#[test]
fn s1_b_level_has_no_timestamps() {
    let signature = FixtureSignature::new();
    let source = source(&signature);

    assert!(source.content_timestamps().unwrap().is_empty());
    assert!(source.signature_timestamps().unwrap().is_empty());
    assert!(source.sig_and_refs_timestamps().unwrap().is_empty());
    assert!(source.refs_only_timestamps().unwrap().is_empty());
    assert!(source.archive_timestamps().unwrap().is_empty());
    assert!(source.certificate_map_within_timestamps(false).unwrap().is_empty());
}

/// S2 - T-level: one signature timestamp; its covered refs are the signing
/// certificate, the signature id, and the signature's content scopes; the
/// archive list stays empty.
#[test]
fn s2_t_level_signature_timestamp_covers_signing_cert_and_signature() {
    let mut signature = FixtureSignature::new();
    signature.unsigned.push(Attr::Signature(Some(("sig-ts-1", b"sig-ts-bytes"))));
    let source = source(&signature);

    let sig_timestamps = source.signature_timestamps().unwrap();
    assert_eq!(sig_timestamps.len(), 1);
    let token = &sig_timestamps[0];

    assert!(contains_ref(token.timestamped_references(), &signature.id, ObjectType::Signature));
    for cert in &signature.signing_certificates {
        assert!(contains_ref(token.timestamped_references(), &cert.id, ObjectType::Certificate));
    }
    for scope in &signature.scopes {
        assert!(contains_ref(token.timestamped_references(), scope, ObjectType::SignedData));
    }
    assert!(source.archive_timestamps().unwrap().is_empty());
}

/// S3 - LT-level: signature timestamp plus certificate-values and
/// revocation-values attributes. Aggregate sources pick up the embedded
/// CRL/OCSP binaries; no archive timestamp appears.
#[test]
fn s3_lt_level_absorbs_cert_and_revocation_values() {
    let mut signature = FixtureSignature::new();
    signature.unsigned.push(Attr::Signature(Some(("sig-ts-1", b"sig-ts-bytes"))));

    let embedded_cert = CertificateToken::new(b"embedded-cert", "issuer", "subject", false);
    signature.unsigned.push(Attr::CertificateValues(vec![embedded_cert.clone()]));

    let crl = RevocationBinary::crl(b"crl-1");
    let ocsp = RevocationBinary::ocsp(b"ocsp-1");
    signature.unsigned.push(Attr::RevocationValues(vec![crl.clone()], vec![ocsp.clone()]));

    let source = source(&signature);

    assert!(source.archive_timestamps().unwrap().is_empty());

    let cert_source = source.timestamp_certificate_source().unwrap();
    assert!(cert_source.by_id(&embedded_cert.id).is_some());

    let revocation_source = source.revocation_source().unwrap();
    assert!(revocation_source.by_id(crl.id()).is_some());
    assert!(revocation_source.by_id(ocsp.id()).is_some());
}

/// S4 - LTA-level: an archive timestamp after the LT content must reference
/// the prior signature timestamp (and its certificates), plus whatever the
/// LT phase accumulated, plus the dialect's own signed-data references.
#[test]
fn s4_lta_level_archive_covers_prior_signature_timestamp() {
    let mut signature = FixtureSignature::new();
    signature.unsigned.push(Attr::Signature(Some(("sig-ts-1", b"sig-ts-bytes"))));

    let embedded_cert = CertificateToken::new(b"embedded-cert", "issuer", "subject", false);
    signature.unsigned.push(Attr::CertificateValues(vec![embedded_cert.clone()]));
    signature
        .unsigned
        .push(Attr::RevocationValues(vec![RevocationBinary::crl(b"crl-1")], Vec::new()));

    signature.unsigned.push(Attr::Archive(Some(("archive-ts-1", b"archive-ts-bytes")), None));

    let source = source(&signature);

    let archives = source.archive_timestamps().unwrap();
    assert_eq!(archives.len(), 1);
    let archive = &archives[0];

    let sig_ts_id = Identifier::from_stable_string("sig-ts-1");
    assert!(contains_ref(archive.timestamped_references(), &sig_ts_id, ObjectType::Timestamp));
    assert!(contains_ref(archive.timestamped_references(), &signature.id, ObjectType::Signature));
    for cert in &signature.signing_certificates {
        assert!(contains_ref(archive.timestamped_references(), &cert.id, ObjectType::Certificate));
    }
    assert!(contains_ref(archive.timestamped_references(), &embedded_cert.id, ObjectType::Certificate));

    let cms_id = Identifier::from_stable_string(CMS_SIGNED_DATA_ID);
    assert!(contains_ref(archive.timestamped_references(), &cms_id, ObjectType::SignedData));
}

/// S5 - external archive intake on an LTA signature.
#[test]
fn s5_external_intake_rejects_non_archive_and_accepts_archive() {
    let mut signature = FixtureSignature::new();
    signature.unsigned.push(Attr::Signature(Some(("sig-ts-1", b"sig-ts-bytes"))));
    signature.unsigned.push(Attr::Archive(Some(("archive-ts-1", b"archive-ts-bytes")), None));
    let source = source(&signature);

    let non_archive = adsig_timestamp_source::model::TimestampToken::new(
        Identifier::from_stable_string("not-archive"),
        TimestampKind::Signature,
        Digest::of(DigestAlgorithm::Sha256, b"whatever"),
    );
    let err = source.add_external_timestamp(non_archive).unwrap_err();
    assert!(matches!(err, TimestampSourceError::UnsupportedExternalTimestampKind(TimestampKind::Signature)));

    let external_archive = adsig_timestamp_source::model::TimestampToken::new(
        Identifier::from_stable_string("external-archive-1"),
        TimestampKind::Archive,
        Digest::of(DigestAlgorithm::Sha256, b"external-archive-bytes"),
    );
    source.add_external_timestamp(external_archive).unwrap();

    let archives = source.archive_timestamps().unwrap();
    assert_eq!(archives.len(), 2);
    let external = &archives[1];

    let sig_ts_id = Identifier::from_stable_string("sig-ts-1");
    let first_archive_id = Identifier::from_stable_string("archive-ts-1");
    assert!(contains_ref(external.timestamped_references(), &sig_ts_id, ObjectType::Timestamp));
    assert!(contains_ref(external.timestamped_references(), &first_archive_id, ObjectType::Timestamp));
}

/// S6 - a malformed timestamp attribute among signed properties is skipped;
/// the remaining timestamp still appears, in order, and nothing panics or
/// returns an error.
#[test]
fn s6_malformed_signed_attribute_is_skipped() {
    let mut signature = FixtureSignature::new();
    signature.signed.push(Attr::Content(None));
    signature.signed.push(Attr::Content(Some(("content-ts-1", b"content-bytes"))));

    let source = source(&signature);
    let content_timestamps = source.content_timestamps().unwrap();
    assert_eq!(content_timestamps.len(), 1);
    assert_eq!(content_timestamps[0].id, Identifier::from_stable_string("content-ts-1"));
}

/// S7 - a resource guard: an unsigned-property stream whose accumulated
/// references exceed `max_timestamped_references` fails the whole build with
/// `TooManyReferences` rather than returning a partial result.
#[test]
fn s7_resource_guard_trips_on_runaway_reference_growth() {
    let mut signature = FixtureSignature::new();
    let certs: Vec<CertificateToken> = (0..10)
        .map(|i| CertificateToken::new(format!("cert-{i}").as_bytes(), "issuer", "subject", false))
        .collect();
    signature.unsigned.push(Attr::CertificateValues(certs));

    let tight_config = TimestampSourceConfig {
        max_timestamped_references: 3,
        strict_unknown_attributes: false,
    };
    let source = TimestampSource::from_signature(&signature, fixture_dialect(), tight_config);

    let err = source.content_timestamps().unwrap_err();
    assert!(matches!(err, TimestampSourceError::TooManyReferences { limit: 3 }));
}
