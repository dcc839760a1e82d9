//! Error taxonomy for the timestamp source.
//!
//! Most of the failure modes named in the design (malformed attribute, unknown
//! attribute, unresolvable digest, imprint mismatch) are *not* represented here
//! as variants that bubble out of the builder: they are logged and folded into
//! a partial result, per the "never abort on a single-attribute failure"
//! contract. The variants below are the ones that legitimately abort a whole
//! operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimestampSourceError {
    #[error("external timestamp has unsupported kind: {0:?}")]
    UnsupportedExternalTimestampKind(crate::model::TimestampKind),

    #[error("timestamped reference accumulator exceeded {limit} entries")]
    TooManyReferences { limit: usize },

    #[error("unsigned attribute matched no classifier predicate under strict_unknown_attributes")]
    UnknownAttribute,

    #[error("internal lock was poisoned by a panicking initializer")]
    LockPoisoned,
}

pub type TimestampSourceResult<T> = Result<T, TimestampSourceError>;
