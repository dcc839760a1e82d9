//! The timestamp builder: a one-shot traversal of a signature's signed
//! and unsigned properties that emits classified `TimestampToken`s with their
//! covered-reference sets computed at the moment of emission.
//!
//! Grounded on `tdf-core::timestamp::TimestampProvider` for the dispatch-by-
//! closure shape, and on `tdf-core::revocation::RevocationManager` for the
//! "accumulate into append-only aggregate sources as you go" traversal shape.

use crate::config::TimestampSourceConfig;
use crate::dialect::{DialectOps, SignedAttributeClass, UnsignedAttributeClass};
use crate::error::{TimestampSourceError, TimestampSourceResult};
use crate::identifier::Identifier;
use crate::model::{
    CertificateRef, CertificateToken, ObjectType, RevocationRef, TimestampKind, TimestampToken,
    TimestampedReference,
};
use crate::sources::{resolve_certificate_by_digest, resolve_revocation_by_digest, ListCertificateSource, ListRevocationSource};
use once_cell::sync::OnceCell;
use std::sync::Mutex;

/// The four shared sources and identity facts the core needs from the
/// enclosing signature, captured once at construction so the core never
/// calls back into it, breaking the cyclic reference between a signature and
/// its timestamp source.
pub trait ParsedSignature<A> {
    fn signed_properties(&self) -> &[A];
    fn unsigned_properties(&self) -> &[A];
    fn signature_id(&self) -> &Identifier;
    fn signature_scopes(&self) -> &[Identifier];
    fn signing_certificates(&self) -> &[CertificateToken];
    fn certificate_source(&self) -> &ListCertificateSource;
    fn revocation_source(&self) -> &ListRevocationSource;
}

/// All state produced by the one-shot build, frozen behind the
/// `OnceCell`-guarded `Mutex` that also serialises `add_external_timestamp`.
pub(crate) struct BuiltState {
    pub(crate) content_timestamps: Vec<TimestampToken>,
    pub(crate) signature_timestamps: Vec<TimestampToken>,
    pub(crate) sig_and_refs_timestamps: Vec<TimestampToken>,
    pub(crate) refs_only_timestamps: Vec<TimestampToken>,
    pub(crate) archive_timestamps: Vec<TimestampToken>,
    pub(crate) timestamp_certificate_source: ListCertificateSource,
    pub(crate) revocation_source: ListRevocationSource,
    /// Phase B's `emitted_timestamps` accumulator, frozen in document
    /// order: every signature/refs-only/sig-and-refs/archive timestamp in
    /// the order its attribute was encountered. Content timestamps are
    /// excluded, matching what Phase B itself ever saw. `add_external_timestamp`
    /// both reads this to expand references and appends to it, so a
    /// second external intake call sees the first external token too.
    pub(crate) emitted_timestamps: Vec<TimestampToken>,
}

pub struct TimestampSource<A> {
    signed_properties: Vec<A>,
    unsigned_properties: Vec<A>,
    signature_id: Identifier,
    signature_scopes: Vec<Identifier>,
    signing_certificates: Vec<CertificateToken>,
    signature_certificate_source: ListCertificateSource,
    signature_revocation_source: ListRevocationSource,
    dialect: DialectOps<A>,
    config: TimestampSourceConfig,
    state: OnceCell<Mutex<BuiltState>>,
}

fn check_limit(len: usize, limit: usize) -> TimestampSourceResult<()> {
    if len > limit {
        Err(TimestampSourceError::TooManyReferences { limit })
    } else {
        Ok(())
    }
}

fn absorb_materials(
    token: &TimestampToken,
    certificate_source: &mut ListCertificateSource,
    revocation_source: &mut ListRevocationSource,
) {
    certificate_source.add_all(token.certificates.iter().cloned());
    revocation_source.add_all(token.crl_binaries.iter().cloned());
    revocation_source.add_all(token.ocsp_binaries.iter().cloned());
}

impl<A> TimestampSource<A> {
    /// Capture exactly what the core needs from a parsed signature, so the
    /// core never calls back into the enclosing signature once constructed.
    pub fn from_signature(
        signature: &impl ParsedSignature<A>,
        dialect: DialectOps<A>,
        config: TimestampSourceConfig,
    ) -> Self
    where
        A: Clone,
    {
        TimestampSource {
            signed_properties: signature.signed_properties().to_vec(),
            unsigned_properties: signature.unsigned_properties().to_vec(),
            signature_id: signature.signature_id().clone(),
            signature_scopes: signature.signature_scopes().to_vec(),
            signing_certificates: signature.signing_certificates().to_vec(),
            signature_certificate_source: signature.certificate_source().clone(),
            signature_revocation_source: signature.revocation_source().clone(),
            dialect,
            config,
            state: OnceCell::new(),
        }
    }

    /// Run (or wait for another thread already running) the one-shot build,
    /// then return the guarded, built state. Every public accessor funnels
    /// through here.
    pub(crate) fn state(&self) -> TimestampSourceResult<&Mutex<BuiltState>> {
        self.state.get_or_try_init(|| self.build().map(Mutex::new))
    }

    fn content_references(&self) -> Vec<TimestampedReference> {
        self.signature_scopes
            .iter()
            .map(|scope| TimestampedReference::new(scope.clone(), ObjectType::SignedData))
            .collect()
    }

    fn build(&self) -> TimestampSourceResult<BuiltState> {
        let mut timestamp_certificate_source = ListCertificateSource::new();
        let mut revocation_source = ListRevocationSource::new();

        let mut content_timestamps = Vec::new();
        let content_refs = self.content_references();

        for attribute in &self.signed_properties {
            match self.dialect.classify_signed(attribute) {
                Some(SignedAttributeClass::Content) | Some(SignedAttributeClass::AllDataObjects) => {
                    match (self.dialect.extract_timestamp_token)(attribute) {
                        Some(mut token) => {
                            token.reference_set_mut().add_many(content_refs.clone());
                            check_limit(token.timestamped_references().len(), self.config.max_timestamped_references)?;
                            absorb_materials(&token, &mut timestamp_certificate_source, &mut revocation_source);
                            content_timestamps.push(token);
                        }
                        None => log::warn!("malformed timestamp attribute in signed properties, kind=content"),
                    }
                }
                Some(SignedAttributeClass::IndividualDataObjects) => {
                    match (self.dialect.extract_timestamp_token)(attribute) {
                        Some(mut token) => {
                            let refs = (self.dialect.extract_individual_data_object_references)(attribute)
                                .into_iter()
                                .map(|scope| TimestampedReference::new(scope, ObjectType::SignedData));
                            token.reference_set_mut().add_many(refs);
                            check_limit(token.timestamped_references().len(), self.config.max_timestamped_references)?;
                            absorb_materials(&token, &mut timestamp_certificate_source, &mut revocation_source);
                            content_timestamps.push(token);
                        }
                        None => log::warn!("malformed timestamp attribute in signed properties, kind=individual-data-objects"),
                    }
                }
                None => {
                    log::debug!("signed attribute matched no timestamp classifier, skipping");
                }
            }
        }

        let mut encapsulated_refs = crate::reference_set::ReferenceSet::new();
        let mut emitted_timestamps: Vec<TimestampToken> = Vec::new();
        let mut signature_timestamps = Vec::new();
        let mut sig_and_refs_timestamps = Vec::new();
        let mut refs_only_timestamps = Vec::new();
        let mut archive_timestamps = Vec::new();

        for attribute in &self.unsigned_properties {
            match self.dialect.classify_unsigned(attribute) {
                Some(UnsignedAttributeClass::CompleteCertificateRef)
                | Some(UnsignedAttributeClass::AttributeCertificateRef) => {
                    for digest in (self.dialect.extract_certificate_ref_digests)(attribute) {
                        let id = resolve_certificate_by_digest(
                            &digest,
                            &[&self.signature_certificate_source, &timestamp_certificate_source],
                        )
                        .map(|c| c.id.clone())
                        .unwrap_or_else(|| CertificateRef::new(digest).id());
                        encapsulated_refs.add_one(TimestampedReference::new(id, ObjectType::Certificate));
                    }
                    check_limit(encapsulated_refs.len(), self.config.max_timestamped_references)?;
                }
                Some(UnsignedAttributeClass::CompleteRevocationRef)
                | Some(UnsignedAttributeClass::AttributeRevocationRef) => {
                    for digest in (self.dialect.extract_crl_ref_digests)(attribute)
                        .into_iter()
                        .chain((self.dialect.extract_ocsp_ref_digests)(attribute))
                    {
                        let id = resolve_revocation_by_digest(
                            &digest,
                            &[&self.signature_revocation_source, &revocation_source],
                        )
                        .map(|b| b.id().clone())
                        .unwrap_or_else(|| RevocationRef::new(digest).id());
                        encapsulated_refs.add_one(TimestampedReference::new(id, ObjectType::Revocation));
                    }
                    check_limit(encapsulated_refs.len(), self.config.max_timestamped_references)?;
                }
                Some(UnsignedAttributeClass::CertificateValues) => {
                    absorb_encapsulated_certificates(
                        attribute,
                        &self.dialect,
                        &mut timestamp_certificate_source,
                        &mut encapsulated_refs,
                    );
                    check_limit(encapsulated_refs.len(), self.config.max_timestamped_references)?;
                }
                Some(UnsignedAttributeClass::RevocationValues) => {
                    absorb_encapsulated_revocation(
                        attribute,
                        &self.dialect,
                        &mut revocation_source,
                        &mut encapsulated_refs,
                    );
                    check_limit(encapsulated_refs.len(), self.config.max_timestamped_references)?;
                }
                Some(UnsignedAttributeClass::TimestampValidationData) => {
                    absorb_encapsulated_certificates(
                        attribute,
                        &self.dialect,
                        &mut timestamp_certificate_source,
                        &mut encapsulated_refs,
                    );
                    absorb_encapsulated_revocation(
                        attribute,
                        &self.dialect,
                        &mut revocation_source,
                        &mut encapsulated_refs,
                    );
                    check_limit(encapsulated_refs.len(), self.config.max_timestamped_references)?;
                }
                Some(UnsignedAttributeClass::SignatureTimestamp) => {
                    match (self.dialect.extract_timestamp_token)(attribute) {
                        Some(mut token) => {
                            let mut refs = content_refs.clone();
                            refs.push(TimestampedReference::new(self.signature_id.clone(), ObjectType::Signature));
                            refs.extend(
                                self.signing_certificates
                                    .iter()
                                    .map(|c| TimestampedReference::new(c.id.clone(), ObjectType::Certificate)),
                            );
                            token.reference_set_mut().add_many(refs);
                            check_limit(token.timestamped_references().len(), self.config.max_timestamped_references)?;
                            absorb_materials(&token, &mut timestamp_certificate_source, &mut revocation_source);
                            emitted_timestamps.push(token.clone());
                            signature_timestamps.push(token);
                        }
                        None => log::warn!("malformed timestamp attribute in unsigned properties, kind=signature"),
                    }
                }
                Some(UnsignedAttributeClass::RefsOnlyTimestamp) => {
                    match (self.dialect.extract_timestamp_token)(attribute) {
                        Some(mut token) => {
                            token.reference_set_mut().add_many(encapsulated_refs.iter().cloned());
                            check_limit(token.timestamped_references().len(), self.config.max_timestamped_references)?;
                            absorb_materials(&token, &mut timestamp_certificate_source, &mut revocation_source);
                            emitted_timestamps.push(token.clone());
                            refs_only_timestamps.push(token);
                        }
                        None => log::warn!("malformed timestamp attribute in unsigned properties, kind=refs-only"),
                    }
                }
                Some(UnsignedAttributeClass::SigAndRefsTimestamp) => {
                    match (self.dialect.extract_timestamp_token)(attribute) {
                        Some(mut token) => {
                            let mut refs: Vec<TimestampedReference> = emitted_timestamps
                                .iter()
                                .filter(|t| t.kind == TimestampKind::Signature)
                                .flat_map(|t| t.expanded_references())
                                .collect();
                            refs.extend(encapsulated_refs.iter().cloned());
                            token.reference_set_mut().add_many(refs);
                            check_limit(token.timestamped_references().len(), self.config.max_timestamped_references)?;
                            absorb_materials(&token, &mut timestamp_certificate_source, &mut revocation_source);
                            emitted_timestamps.push(token.clone());
                            sig_and_refs_timestamps.push(token);
                        }
                        None => log::warn!("malformed timestamp attribute in unsigned properties, kind=sig-and-refs"),
                    }
                }
                Some(UnsignedAttributeClass::ArchiveTimestamp) => {
                    match (self.dialect.extract_timestamp_token)(attribute) {
                        Some(mut token) => {
                            let mut refs: Vec<TimestampedReference> = emitted_timestamps
                                .iter()
                                .flat_map(|t| t.expanded_references())
                                .collect();
                            refs.extend(encapsulated_refs.iter().cloned());
                            refs.extend((self.dialect.signed_data_references)());
                            token.reference_set_mut().add_many(refs);
                            check_limit(token.timestamped_references().len(), self.config.max_timestamped_references)?;
                            if let Some(sub_kind) = (self.dialect.extract_archive_sub_kind)(attribute) {
                                token = token.with_archive_sub_kind(sub_kind);
                            }
                            absorb_materials(&token, &mut timestamp_certificate_source, &mut revocation_source);
                            emitted_timestamps.push(token.clone());
                            archive_timestamps.push(token);
                        }
                        None => log::warn!("malformed timestamp attribute in unsigned properties, kind=archive"),
                    }
                }
                None => {
                    if self.config.strict_unknown_attributes {
                        return Err(TimestampSourceError::UnknownAttribute);
                    }
                    log::warn!("unsigned attribute matched no timestamp classifier, skipping");
                }
            }
        }

        Ok(BuiltState {
            content_timestamps,
            signature_timestamps,
            sig_and_refs_timestamps,
            refs_only_timestamps,
            archive_timestamps,
            timestamp_certificate_source,
            revocation_source,
            emitted_timestamps,
        })
    }

    /// Mutably visit every token across all five lists, in `all_timestamps()`
    /// order, under the one lock acquisition, the shape the validator
    /// driver and any future bulk-mutation need.
    pub(crate) fn for_each_token_mut(
        &self,
        mut visit: impl FnMut(&DialectOps<A>, &mut TimestampToken),
    ) -> TimestampSourceResult<()> {
        let mut guard = self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?;
        for token in guard
            .content_timestamps
            .iter_mut()
            .chain(guard.signature_timestamps.iter_mut())
            .chain(guard.sig_and_refs_timestamps.iter_mut())
            .chain(guard.refs_only_timestamps.iter_mut())
            .chain(guard.archive_timestamps.iter_mut())
        {
            visit(&self.dialect, token);
        }
        Ok(())
    }

    pub fn content_timestamps(&self) -> TimestampSourceResult<Vec<TimestampToken>> {
        Ok(self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?.content_timestamps.clone())
    }

    pub fn signature_timestamps(&self) -> TimestampSourceResult<Vec<TimestampToken>> {
        Ok(self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?.signature_timestamps.clone())
    }

    pub fn sig_and_refs_timestamps(&self) -> TimestampSourceResult<Vec<TimestampToken>> {
        Ok(self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?.sig_and_refs_timestamps.clone())
    }

    pub fn refs_only_timestamps(&self) -> TimestampSourceResult<Vec<TimestampToken>> {
        Ok(self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?.refs_only_timestamps.clone())
    }

    pub fn archive_timestamps(&self) -> TimestampSourceResult<Vec<TimestampToken>> {
        Ok(self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?.archive_timestamps.clone())
    }

    /// Always empty in this port, the seam a PDF-capable dialect
    /// would extend. Deliberately **not** folded into [`Self::all_timestamps`].
    pub fn document_timestamps(&self) -> Vec<TimestampToken> {
        Vec::new()
    }

    /// Concatenation in the order content, signature, x1, x2, archive.
    pub fn all_timestamps(&self) -> TimestampSourceResult<Vec<TimestampToken>> {
        let guard = self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?;
        let mut all = Vec::with_capacity(
            guard.content_timestamps.len()
                + guard.signature_timestamps.len()
                + guard.sig_and_refs_timestamps.len()
                + guard.refs_only_timestamps.len()
                + guard.archive_timestamps.len(),
        );
        all.extend(guard.content_timestamps.iter().cloned());
        all.extend(guard.signature_timestamps.iter().cloned());
        all.extend(guard.sig_and_refs_timestamps.iter().cloned());
        all.extend(guard.refs_only_timestamps.iter().cloned());
        all.extend(guard.archive_timestamps.iter().cloned());
        Ok(all)
    }

    pub fn timestamp_certificate_source(&self) -> TimestampSourceResult<ListCertificateSource> {
        Ok(self
            .state()?
            .lock()
            .map_err(|_| TimestampSourceError::LockPoisoned)?
            .timestamp_certificate_source
            .clone())
    }

    pub fn revocation_source(&self) -> TimestampSourceResult<ListRevocationSource> {
        Ok(self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?.revocation_source.clone())
    }

    /// A synthetic-key export over content, x1, x2, signature, archive, in
    /// that order, which differs from [`Self::all_timestamps`]'s ordering.
    pub fn certificate_map_within_timestamps(
        &self,
        skip_last_archive: bool,
    ) -> TimestampSourceResult<std::collections::HashMap<String, Vec<CertificateToken>>> {
        let guard = self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?;
        let mut archive = guard.archive_timestamps.clone();
        if skip_last_archive {
            archive.pop();
        }
        let lists: [(&str, &[TimestampToken]); 5] = [
            ("content", &guard.content_timestamps),
            ("x1", &guard.sig_and_refs_timestamps),
            ("x2", &guard.refs_only_timestamps),
            ("signature", &guard.signature_timestamps),
            ("archive", &archive),
        ];
        let mut map = std::collections::HashMap::new();
        let mut counter = 0usize;
        for (kind_name, tokens) in lists {
            for token in tokens {
                map.insert(format!("{kind_name}{counter}"), token.certificates.clone());
                counter += 1;
            }
        }
        Ok(map)
    }
}

fn absorb_encapsulated_certificates<A>(
    attribute: &A,
    dialect: &DialectOps<A>,
    timestamp_certificate_source: &mut ListCertificateSource,
    encapsulated_refs: &mut crate::reference_set::ReferenceSet,
) {
    for certificate in (dialect.extract_certificate_values)(attribute) {
        let id = certificate.id.clone();
        timestamp_certificate_source.add(certificate);
        encapsulated_refs.add_one(TimestampedReference::new(id, ObjectType::Certificate));
    }
}

fn absorb_encapsulated_revocation<A>(
    attribute: &A,
    dialect: &DialectOps<A>,
    revocation_source: &mut ListRevocationSource,
    encapsulated_refs: &mut crate::reference_set::ReferenceSet,
) {
    for binary in (dialect.extract_crl_values)(attribute)
        .into_iter()
        .chain((dialect.extract_ocsp_values)(attribute))
    {
        let id = binary.id().clone();
        revocation_source.add(binary);
        encapsulated_refs.add_one(TimestampedReference::new(id, ObjectType::Revocation));
    }
}
