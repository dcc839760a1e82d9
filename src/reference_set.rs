//! Ordered, duplicate-free accumulator of `TimestampedReference` values.
//!
//! The order references are added in is externally observable: accessors
//! return the set in insertion order, never re-sorted. Grounded on
//! `tdf-core::revocation::RevocationList`'s append-and-dedup shape.

use crate::model::TimestampedReference;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    order: Vec<TimestampedReference>,
    seen: HashSet<TimestampedReference>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        ReferenceSet {
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append a single reference, refusing it if already present so the set
    /// never holds a duplicate. Returns whether it was newly added.
    pub fn add_one(&mut self, reference: TimestampedReference) -> bool {
        if self.seen.insert(reference.clone()) {
            self.order.push(reference);
            true
        } else {
            false
        }
    }

    /// Append many references in order, deduplicating each against the set
    /// built so far (including ones just added by this same call).
    pub fn add_many(&mut self, references: impl IntoIterator<Item = TimestampedReference>) {
        for reference in references {
            self.add_one(reference);
        }
    }

    pub fn contains(&self, reference: &TimestampedReference) -> bool {
        self.seen.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[TimestampedReference] {
        &self.order
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimestampedReference> {
        self.order.iter()
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a TimestampedReference;
    type IntoIter = std::slice::Iter<'a, TimestampedReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
