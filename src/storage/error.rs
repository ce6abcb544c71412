// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Storage error types.

use super::Keyspace;

/// Errors that can occur in storage operations.
///
/// Any of these surfacing while a block is applied or committed is fatal
/// for the node: replicas must either succeed identically or halt.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("column family for keyspace {0:?} is missing")]
    MissingKeyspace(Keyspace),

    #[error("cursor advanced past its end")]
    CursorExhausted,

    #[error("storage corruption: {0}")]
    Corruption(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}
