// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Query error types.

use crate::storage::StorageError;

/// Errors that fail a query. None of them change state.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("unknown query path {0:?}")]
    UnknownPath(String),

    #[error("malformed query body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode query result: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid time range: start {start} is after end {end}")]
    InvalidRange { start: u64, end: u64 },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
