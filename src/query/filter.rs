// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Equality filters and scan plans for range queries.

use crate::types::{range_bounds, MetaRecord, RowKey};

/// Which predicates a filter applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    RangeOnly,
    QualifierOnly,
    OwnerOnly,
    OwnerAndQualifier,
}

/// Optional equality predicates on owner id and qualifier, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub owner_id: Option<String>,
    pub qualifier: Option<Vec<u8>>,
}

impl RecordFilter {
    /// Builds a filter where an empty owner id or qualifier means "any".
    pub fn from_parts(owner_id: &str, qualifier: &[u8]) -> Self {
        Self {
            owner_id: (!owner_id.is_empty()).then(|| owner_id.to_string()),
            qualifier: (!qualifier.is_empty()).then(|| qualifier.to_vec()),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match (&self.owner_id, &self.qualifier) {
            (None, None) => FilterKind::RangeOnly,
            (None, Some(_)) => FilterKind::QualifierOnly,
            (Some(_), None) => FilterKind::OwnerOnly,
            (Some(_), Some(_)) => FilterKind::OwnerAndQualifier,
        }
    }

    #[inline]
    pub fn matches(&self, record: &MetaRecord) -> bool {
        let owner_ok = self
            .owner_id
            .as_deref()
            .map_or(true, |owner| record.owner_id == owner);
        let qualifier_ok = self
            .qualifier
            .as_deref()
            .map_or(true, |q| record.qualifier == q);
        owner_ok && qualifier_ok
    }
}

/// Metadata keyspace scan over `[low, high)` with a per-record filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub low: RowKey,
    pub high: RowKey,
    pub filter: RecordFilter,
}

impl ScanPlan {
    /// Plans a scan of `[start, end)` in nanoseconds. Callers check `start <= end`.
    pub fn new(start: u64, end: u64, filter: RecordFilter) -> Self {
        let (low, high) = range_bounds(start, end);
        Self { low, high, filter }
    }

    /// True when the domain cannot contain any key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str, qualifier: &[u8]) -> MetaRecord {
        MetaRecord::new(RowKey::new(1, 0), owner, qualifier.to_vec())
    }

    #[test]
    fn test_empty_parts_mean_any() {
        let filter = RecordFilter::from_parts("", b"");
        assert_eq!(filter.kind(), FilterKind::RangeOnly);
        assert!(filter.matches(&record("o1", b"Memory")));
        assert!(filter.matches(&record("o2", b"")));
    }

    #[test]
    fn test_four_combinations() {
        let a = record("o1", b"Memory");
        let b = record("o2", b"Speed");

        let qualifier_only = RecordFilter::from_parts("", b"Memory");
        assert_eq!(qualifier_only.kind(), FilterKind::QualifierOnly);
        assert!(qualifier_only.matches(&a));
        assert!(!qualifier_only.matches(&b));

        let owner_only = RecordFilter::from_parts("o2", b"");
        assert_eq!(owner_only.kind(), FilterKind::OwnerOnly);
        assert!(!owner_only.matches(&a));
        assert!(owner_only.matches(&b));

        let both = RecordFilter::from_parts("o1", b"Memory");
        assert_eq!(both.kind(), FilterKind::OwnerAndQualifier);
        assert!(both.matches(&a));
        assert!(!both.matches(&b));

        // AND, not OR
        let crossed = RecordFilter::from_parts("o1", b"Speed");
        assert!(!crossed.matches(&a));
        assert!(!crossed.matches(&b));
    }

    #[test]
    fn test_scan_plan_bounds() {
        let plan = ScanPlan::new(100, 102, RecordFilter::default());
        assert_eq!(plan.low, RowKey::new(100, 0));
        assert_eq!(plan.high, RowKey::new(102, 0));
        assert!(!plan.is_empty());

        assert!(ScanPlan::new(5, 5, RecordFilter::default()).is_empty());
    }
}
