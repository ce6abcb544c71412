// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Column store over RocksDB.
//!
//! Three logically isolated keyspaces live in one database directory, one
//! column family each:
//!
//! - [`Keyspace::Default`]: node bookkeeping (last committed height and app hash)
//! - [`Keyspace::Metadata`]: owner and qualifier per row key
//! - [`Keyspace::Payload`]: opaque data per row key
//!
//! Writes that must land together go through a [`Batch`], which is applied
//! atomically across keyspaces. Reads go through point lookups or a bounded
//! [`Cursor`].
//!
//! # Example
//!
//! ```no_run
//! use paustdb::storage::{ColumnStore, Keyspace};
//! use std::path::Path;
//!
//! let store = ColumnStore::open(Path::new("/tmp/paustdb.db")).unwrap();
//!
//! let mut batch = store.new_batch();
//! batch.put(Keyspace::Metadata, b"key".to_vec(), b"meta".to_vec());
//! batch.put(Keyspace::Payload, b"key".to_vec(), b"data".to_vec());
//! store.write(batch).unwrap();
//!
//! for entry in store.iterate(Keyspace::Metadata, None, None).unwrap() {
//!     let (key, value) = entry.unwrap();
//!     println!("{:?} => {:?}", key, value);
//! }
//! ```

mod batch;
mod cursor;
mod error;
mod keyspace;
mod rocks;

pub use batch::{Batch, BatchOp};
pub use cursor::Cursor;
pub use error::StorageError;
pub use keyspace::Keyspace;
pub use rocks::{ColumnStore, DurabilityMode, DEFAULT_BLOCK_CACHE_SIZE};
