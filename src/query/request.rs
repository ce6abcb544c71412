// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Query request and result shapes.

use serde::{Deserialize, Serialize};

use crate::types::{MetaRecord, PayloadRecord, RowKey};

use super::filter::{RecordFilter, ScanPlan};
use super::QueryError;

/// Request path of a range query.
pub const QUERY_PATH: &str = "/query";

/// Request path of a fetch query.
pub const FETCH_PATH: &str = "/fetch";

/// The closed set of query shapes, decided once from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Range,
    Fetch,
}

impl QueryKind {
    pub fn from_path(path: &str) -> Result<Self, QueryError> {
        match path {
            QUERY_PATH => Ok(QueryKind::Range),
            FETCH_PATH => Ok(QueryKind::Fetch),
            other => Err(QueryError::UnknownPath(other.to_string())),
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            QueryKind::Range => QUERY_PATH,
            QueryKind::Fetch => FETCH_PATH,
        }
    }
}

/// Metadata over `[start, end)` nanoseconds, optionally filtered.
///
/// An empty owner id or qualifier disables that filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub owner_id: String,
    #[serde(with = "crate::types::b64", default)]
    pub qualifier: Vec<u8>,
}

impl RangeQuery {
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<Vec<u8>>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter::from_parts(&self.owner_id, &self.qualifier)
    }

    /// Builds the scan plan. `start == end` is valid and plans an empty scan.
    pub fn plan(&self) -> Result<ScanPlan, QueryError> {
        if self.start > self.end {
            return Err(QueryError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(ScanPlan::new(self.start, self.end, self.filter()))
    }
}

/// Payloads for explicit row keys, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchQuery {
    #[serde(default)]
    pub row_keys: Vec<RowKey>,
}

impl FetchQuery {
    pub fn new(row_keys: impl Into<Vec<RowKey>>) -> Self {
        Self {
            row_keys: row_keys.into(),
        }
    }
}

/// A decoded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Range(RangeQuery),
    Fetch(FetchQuery),
}

impl Query {
    /// Decodes a JSON request body for the given shape.
    pub fn decode(kind: QueryKind, body: &[u8]) -> Result<Self, QueryError> {
        match kind {
            QueryKind::Range => serde_json::from_slice(body)
                .map(Query::Range)
                .map_err(QueryError::Decode),
            QueryKind::Fetch => serde_json::from_slice(body)
                .map(Query::Fetch)
                .map_err(QueryError::Decode),
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::Range(_) => QueryKind::Range,
            Query::Fetch(_) => QueryKind::Fetch,
        }
    }
}

/// One row of a range query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResult {
    pub id: RowKey,
    pub timestamp: u64,
    pub owner_id: String,
    #[serde(with = "crate::types::b64", default)]
    pub qualifier: Vec<u8>,
}

impl From<MetaRecord> for MetaResult {
    fn from(record: MetaRecord) -> Self {
        Self {
            id: record.row_key,
            timestamp: record.row_key.timestamp(),
            owner_id: record.owner_id,
            qualifier: record.qualifier,
        }
    }
}

/// One row of a fetch response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadResult {
    pub id: RowKey,
    pub timestamp: u64,
    #[serde(with = "crate::types::b64", default)]
    pub data: Vec<u8>,
}

impl From<PayloadRecord> for PayloadResult {
    fn from(record: PayloadRecord) -> Self {
        Self {
            id: record.row_key,
            timestamp: record.row_key.timestamp(),
            data: record.data,
        }
    }
}

/// Result records of a query, in response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutput {
    Meta(Vec<MetaRecord>),
    Payload(Vec<PayloadRecord>),
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        match self {
            QueryOutput::Meta(records) => records.len(),
            QueryOutput::Payload(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the response body.
    pub fn encode(self) -> Result<Vec<u8>, QueryError> {
        match self {
            QueryOutput::Meta(records) => {
                let rows: Vec<MetaResult> = records.into_iter().map(MetaResult::from).collect();
                serde_json::to_vec(&rows).map_err(QueryError::Encode)
            }
            QueryOutput::Payload(records) => {
                let rows: Vec<PayloadResult> =
                    records.into_iter().map(PayloadResult::from).collect();
                serde_json::to_vec(&rows).map_err(QueryError::Encode)
            }
        }
    }
}
