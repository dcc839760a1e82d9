//! External-timestamp intake: accepts a post-hoc archive timestamp, one
//! produced by a TSA call the enclosing application made itself, outside
//! this core's own discovery pass. Enriches its covered-reference list, and
//! appends it to the archive list.
//!
//! Grounded on `tdf-core::revocation::SignedRevocationList::add_entry`'s
//! "validate the incoming entry, then extend and append" shape: both are the
//! one place in their respective modules where an aggregate that's otherwise
//! built in one pass grows again after the fact.

use crate::builder::TimestampSource;
use crate::error::{TimestampSourceError, TimestampSourceResult};
use crate::model::{TimestampKind, TimestampToken, TimestampedReference};

impl<A> TimestampSource<A> {
    /// Accept `token` only if `kind == Archive`. On success, extend its
    /// references with the dialect's signature-CMS `SignedData` references
    /// and the expanded references of every timestamp emitted before
    /// it, absorb its certificates into the timestamp certificate source,
    /// and append it to `archive_timestamps`.
    pub fn add_external_timestamp(&self, mut token: TimestampToken) -> TimestampSourceResult<()> {
        if token.kind != TimestampKind::Archive {
            return Err(TimestampSourceError::UnsupportedExternalTimestampKind(token.kind));
        }

        let mut guard = self.state()?.lock().map_err(|_| TimestampSourceError::LockPoisoned)?;

        let mut refs: Vec<TimestampedReference> = (self.dialect.signed_data_references)();
        refs.extend(guard.emitted_timestamps.iter().flat_map(|t| t.expanded_references()));
        token.reference_set_mut().add_many(refs);

        guard
            .timestamp_certificate_source
            .add_all(token.certificates.iter().cloned());
        guard.revocation_source.add_all(token.crl_binaries.iter().cloned());
        guard.revocation_source.add_all(token.ocsp_binaries.iter().cloned());

        guard.emitted_timestamps.push(token.clone());
        guard.archive_timestamps.push(token);
        Ok(())
    }
}

/// `(id, Signature/Certificate/...)`-style helper used only by tests here to
/// assert on reference shape without reaching into builder internals.
#[cfg(test)]
fn contains_timestamp_ref(refs: &[TimestampedReference], id: &crate::identifier::Identifier) -> bool {
    use crate::model::ObjectType;
    refs.iter()
        .any(|r| r.object_type == ObjectType::Timestamp && &r.referenced_id == id)
}
