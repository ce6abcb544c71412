// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Metadata and payload records.

use serde::{Deserialize, Serialize};

use super::RowKey;

/// Metadata half of a write: who wrote it and what kind of record it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRecord {
    pub row_key: RowKey,
    pub owner_id: String,
    /// Application-defined tag. May be empty.
    pub qualifier: Vec<u8>,
}

impl MetaRecord {
    pub fn new(row_key: RowKey, owner_id: impl Into<String>, qualifier: impl Into<Vec<u8>>) -> Self {
        Self {
            row_key,
            owner_id: owner_id.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Encodes the value stored under `row_key` in the metadata keyspace.
    pub fn encode_value(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&StoredMeta {
            owner_id: self.owner_id.clone(),
            qualifier: self.qualifier.clone(),
        })
    }

    /// Rebuilds a record from a metadata keyspace entry.
    pub fn decode_value(row_key: RowKey, value: &[u8]) -> Result<Self, serde_json::Error> {
        let stored: StoredMeta = serde_json::from_slice(value)?;
        Ok(Self {
            row_key,
            owner_id: stored.owner_id,
            qualifier: stored.qualifier,
        })
    }
}

/// Payload half of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadRecord {
    pub row_key: RowKey,
    pub data: Vec<u8>,
}

impl PayloadRecord {
    pub fn new(row_key: RowKey, data: impl Into<Vec<u8>>) -> Self {
        Self {
            row_key,
            data: data.into(),
        }
    }
}

/// A metadata and payload pair sharing one row key.
///
/// Only the transaction validator constructs these from wire input, after
/// checking that both halves carry the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteUnit {
    pub meta: MetaRecord,
    pub payload: PayloadRecord,
}

impl WriteUnit {
    pub fn new(
        row_key: RowKey,
        owner_id: impl Into<String>,
        qualifier: impl Into<Vec<u8>>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            meta: MetaRecord::new(row_key, owner_id, qualifier),
            payload: PayloadRecord::new(row_key, data),
        }
    }

    #[inline]
    pub fn row_key(&self) -> RowKey {
        self.meta.row_key
    }

    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.meta.row_key.timestamp()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMeta {
    owner_id: String,
    #[serde(with = "super::b64", default)]
    qualifier: Vec<u8>,
}
