// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! paust-db: a time-series key-value store replicated as a BFT consensus state machine
//!
//! Records are addressed by time-ordered row keys and split into a metadata
//! half and a payload half, each in its own RocksDB column family. The
//! [`app::Application`] applies ordered blocks of transactions atomically and
//! serves range and fetch queries over committed state.

pub mod app;
pub mod query;
pub mod storage;
pub mod tx;
pub mod types;

pub use app::{
    AppConfig, AppError, AppHash, Application, CommitResponse, InfoResponse, QueryRequest,
    QueryResponse, ResponseCode, TxResponse,
};
pub use query::{FetchQuery, Query, QueryEngine, QueryError, RangeQuery};
pub use storage::{Batch, ColumnStore, DurabilityMode, Keyspace, StorageError};
pub use tx::{TxError, ValidationError, Validator};
pub use types::{MetaRecord, PayloadRecord, RowKey, RowKeyError, WriteUnit};
