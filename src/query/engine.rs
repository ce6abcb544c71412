// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Executes range scans and payload fetches against committed state.

use tracing::debug;

use crate::storage::{ColumnStore, Keyspace, StorageError};
use crate::types::{MetaRecord, PayloadRecord, RowKey};

use super::filter::ScanPlan;
use super::request::{FetchQuery, Query, QueryOutput, RangeQuery};
use super::QueryError;

/// Read-only query executor over a [`ColumnStore`].
pub struct QueryEngine<'a> {
    store: &'a ColumnStore,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a ColumnStore) -> Self {
        Self { store }
    }

    /// Runs a decoded query.
    pub fn execute(&self, query: &Query) -> Result<QueryOutput, QueryError> {
        match query {
            Query::Range(range) => self.range(range).map(QueryOutput::Meta),
            Query::Fetch(fetch) => self.fetch(fetch).map(QueryOutput::Payload),
        }
    }

    /// Metadata records in `[start, end)` matching the query's filters, oldest first.
    pub fn range(&self, query: &RangeQuery) -> Result<Vec<MetaRecord>, QueryError> {
        let plan = query.plan()?;
        Ok(self.scan(&plan)?)
    }

    /// Executes a scan plan over the metadata keyspace.
    pub fn scan(&self, plan: &ScanPlan) -> Result<Vec<MetaRecord>, StorageError> {
        let mut records = Vec::new();
        if plan.is_empty() {
            return Ok(records);
        }

        let cursor = self.store.iterate(
            Keyspace::Metadata,
            Some(plan.low.as_bytes()),
            Some(plan.high.as_bytes()),
        )?;

        let mut scanned = 0usize;
        for entry in cursor {
            let (key, value) = entry?;
            scanned += 1;

            let row_key = RowKey::from_slice(&key)
                .map_err(|e| StorageError::Corruption(format!("metadata key: {e}")))?;
            let record = MetaRecord::decode_value(row_key, &value).map_err(|e| {
                StorageError::Corruption(format!("metadata value at {row_key}: {e}"))
            })?;

            if plan.filter.matches(&record) {
                records.push(record);
            }
        }

        debug!(
            filter = ?plan.filter.kind(),
            scanned,
            matched = records.len(),
            "metadata scan"
        );
        Ok(records)
    }

    /// Payloads for each requested key, in request order; unknown keys are skipped.
    pub fn fetch(&self, query: &FetchQuery) -> Result<Vec<PayloadRecord>, QueryError> {
        let mut records = Vec::with_capacity(query.row_keys.len());
        for row_key in &query.row_keys {
            if let Some(data) = self.store.get(Keyspace::Payload, row_key.as_bytes())? {
                records.push(PayloadRecord::new(*row_key, data));
            }
        }
        debug!(
            requested = query.row_keys.len(),
            found = records.len(),
            "payload fetch"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DurabilityMode;
    use crate::types::WriteUnit;
    use tempfile::TempDir;

    const T0: u64 = 1_545_982_882_435_375_000;

    fn create_test_store() -> (ColumnStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ColumnStore::open_with_options(dir.path(), DurabilityMode::WalOnly, 8 << 20)
            .unwrap();
        (store, dir)
    }

    fn put_units(store: &ColumnStore, units: &[WriteUnit]) {
        let mut batch = store.new_batch();
        for unit in units {
            batch.put(
                Keyspace::Metadata,
                unit.row_key().as_bytes().to_vec(),
                unit.meta.encode_value().unwrap(),
            );
            batch.put(
                Keyspace::Payload,
                unit.row_key().as_bytes().to_vec(),
                unit.payload.data.clone(),
            );
        }
        store.write(batch).unwrap();
    }

    fn fixture() -> (ColumnStore, TempDir, WriteUnit, WriteUnit) {
        let (store, dir) = create_test_store();
        let a = WriteUnit::new(RowKey::new(T0, 0), "o1", b"Memory".to_vec(), b"aw".to_vec());
        let b = WriteUnit::new(RowKey::new(T0 + 1, 0), "o2", b"Speed".to_vec(), b"good".to_vec());
        // Insert out of order; scans must still come back chronologically.
        put_units(&store, &[b.clone(), a.clone()]);
        (store, dir, a, b)
    }

    #[test]
    fn test_range_without_filters() {
        let (store, _dir, a, b) = fixture();
        let engine = QueryEngine::new(&store);

        let records = engine.range(&RangeQuery::new(T0, T0 + 2)).unwrap();
        assert_eq!(records, vec![a.meta, b.meta]);
    }

    #[test]
    fn test_range_qualifier_only() {
        let (store, _dir, a, _b) = fixture();
        let engine = QueryEngine::new(&store);

        let query = RangeQuery::new(T0, T0 + 2).with_qualifier(b"Memory".to_vec());
        assert_eq!(engine.range(&query).unwrap(), vec![a.meta]);
    }

    #[test]
    fn test_range_owner_only() {
        let (store, _dir, _a, b) = fixture();
        let engine = QueryEngine::new(&store);

        let query = RangeQuery::new(T0, T0 + 2).with_owner("o2");
        assert_eq!(engine.range(&query).unwrap(), vec![b.meta]);
    }

    #[test]
    fn test_range_owner_and_qualifier() {
        let (store, _dir, a, _b) = fixture();
        let engine = QueryEngine::new(&store);

        let query = RangeQuery::new(T0, T0 + 2)
            .with_owner("o1")
            .with_qualifier(b"Memory".to_vec());
        assert_eq!(engine.range(&query).unwrap(), vec![a.meta]);

        let crossed = RangeQuery::new(T0, T0 + 2)
            .with_owner("o1")
            .with_qualifier(b"Speed".to_vec());
        assert!(engine.range(&crossed).unwrap().is_empty());
    }

    #[test]
    fn test_range_end_is_exclusive() {
        let (store, _dir, a, _b) = fixture();
        let engine = QueryEngine::new(&store);

        assert_eq!(engine.range(&RangeQuery::new(T0, T0 + 1)).unwrap(), vec![a.meta]);
        assert!(engine.range(&RangeQuery::new(T0, T0)).unwrap().is_empty());
    }

    #[test]
    fn test_range_includes_every_salt_of_start() {
        let (store, _dir) = create_test_store();
        let hi_salt = WriteUnit::new(RowKey::new(T0, u16::MAX), "o", Vec::new(), Vec::new());
        put_units(&store, &[hi_salt.clone()]);

        let records = QueryEngine::new(&store)
            .range(&RangeQuery::new(T0, T0 + 1))
            .unwrap();
        assert_eq!(records, vec![hi_salt.meta]);
    }

    #[test]
    fn test_range_inverted_is_error() {
        let (store, _dir, _a, _b) = fixture();
        let result = QueryEngine::new(&store).range(&RangeQuery::new(T0 + 2, T0));
        assert!(matches!(result, Err(QueryError::InvalidRange { .. })));
    }

    #[test]
    fn test_range_corrupt_value_is_storage_error() {
        let (store, _dir) = create_test_store();
        store
            .put(Keyspace::Metadata, RowKey::new(T0, 0).as_bytes(), b"garbage")
            .unwrap();

        let result = QueryEngine::new(&store).range(&RangeQuery::new(T0, T0 + 1));
        assert!(matches!(
            result,
            Err(QueryError::Storage(StorageError::Corruption(_)))
        ));
    }

    #[test]
    fn test_fetch_in_input_order_skipping_unknown() {
        let (store, _dir, a, b) = fixture();
        let engine = QueryEngine::new(&store);

        let unknown = RowKey::new(T0 + 100, 5);
        let query = FetchQuery::new(vec![b.row_key(), unknown, a.row_key()]);
        let records = engine.fetch(&query).unwrap();

        assert_eq!(records, vec![b.payload, a.payload]);
    }

    #[test]
    fn test_fetch_empty() {
        let (store, _dir, _a, _b) = fixture();
        let records = QueryEngine::new(&store).fetch(&FetchQuery::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_execute_dispatches_by_variant() {
        let (store, _dir, a, _b) = fixture();
        let engine = QueryEngine::new(&store);

        let output = engine
            .execute(&Query::Fetch(FetchQuery::new(vec![a.row_key()])))
            .unwrap();
        assert_eq!(output, QueryOutput::Payload(vec![a.payload.clone()]));

        let output = engine
            .execute(&Query::Range(RangeQuery::new(T0, T0 + 1)))
            .unwrap();
        assert_eq!(output, QueryOutput::Meta(vec![a.meta]));
    }
}
