//! Ambient configuration for the timestamp source.
//!
//! Mirrors the tiered-knob shape used elsewhere in this crate family's
//! `SecurityConfig`, scaled down to the two settings this subsystem actually
//! needs.

/// Tunable limits and strictness knobs for a [`crate::builder::TimestampSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampSourceConfig {
    /// Upper bound on the number of entries any single `ReferenceSet` may hold
    /// before the build aborts with `TooManyReferences`. Guards against a
    /// malformed or hostile unsigned-properties stream exhausting memory.
    pub max_timestamped_references: usize,
    /// When `true`, an attribute matching no classifier predicate is a hard
    /// error instead of a logged skip. Off by default, matching the
    /// conservative "log and skip" behaviour expected in production; useful
    /// for conformance-testing harnesses that want to catch classifier gaps
    /// early.
    pub strict_unknown_attributes: bool,
}

impl TimestampSourceConfig {
    /// Generous defaults suited to validating signatures from unknown sources.
    pub fn permissive() -> Self {
        TimestampSourceConfig {
            max_timestamped_references: 100_000,
            strict_unknown_attributes: false,
        }
    }

    /// Tight limits suited to conformance testing against known-good fixtures.
    pub fn strict() -> Self {
        TimestampSourceConfig {
            max_timestamped_references: 10_000,
            strict_unknown_attributes: true,
        }
    }
}

impl Default for TimestampSourceConfig {
    fn default() -> Self {
        Self::permissive()
    }
}
