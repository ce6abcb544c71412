// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction error types.

use crate::types::{RowKey, RowKeyError};

/// Which half of a write unit a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Meta,
    Payload,
}

impl std::fmt::Display for Half {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Half::Meta => f.write_str("meta"),
            Half::Payload => f.write_str("payload"),
        }
    }
}

/// Semantic violations found in a well-formed transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("transaction carries no write units")]
    Empty,

    #[error("unit {index}: {half} row key: {source}")]
    MalformedRowKey {
        index: usize,
        half: Half,
        #[source]
        source: RowKeyError,
    },

    #[error("unit {index}: meta row key {meta} differs from payload row key {payload}")]
    RowKeyMismatch {
        index: usize,
        meta: RowKey,
        payload: RowKey,
    },

    #[error("unit {index}: timestamp must be non-zero")]
    ZeroTimestamp { index: usize },

    #[error("unit {index}: owner id is empty")]
    EmptyOwnerId { index: usize },

    #[error("unit {index}: owner id is {len} bytes, max {max}")]
    OwnerIdTooLong { index: usize, len: usize, max: usize },

    #[error("unit {index}: payload is {size} bytes, max {max}")]
    PayloadTooLarge { index: usize, size: usize, max: usize },

    #[error("unit {index}: row key {row_key} repeats an earlier unit")]
    DuplicateRowKey { index: usize, row_key: RowKey },
}

/// Errors that reject a transaction.
///
/// None of these change state; the caller reports them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    #[error("malformed transaction: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    #[error("row key {row_key} is already written")]
    Conflict { row_key: RowKey },
}
