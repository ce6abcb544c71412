// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Cross-keyspace write batches.

use super::Keyspace;

/// A single buffered mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put {
        keyspace: Keyspace,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Delete {
        keyspace: Keyspace,
        key: Vec<u8>,
    },
}

/// Mutations across any mix of keyspaces, applied all-or-nothing.
///
/// Nothing is visible until the batch is handed to
/// [`ColumnStore::write`](super::ColumnStore::write).
#[derive(Debug, Clone, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers a put.
    pub fn put(&mut self, keyspace: Keyspace, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Put {
            keyspace,
            key: key.into(),
            value: value.into(),
        });
    }

    /// Buffers a delete.
    pub fn delete(&mut self, keyspace: Keyspace, key: impl Into<Vec<u8>>) {
        self.ops.push(BatchOp::Delete {
            keyspace,
            key: key.into(),
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
