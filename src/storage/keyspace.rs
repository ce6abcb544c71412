// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Logical keyspaces and their column family names.

/// A logically isolated keyspace, backed by one RocksDB column family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyspace {
    /// Node bookkeeping: last committed height and app hash.
    Default,
    /// Owner and qualifier per row key.
    Metadata,
    /// Opaque payload per row key.
    Payload,
}

impl Keyspace {
    /// Every keyspace, in column family creation order.
    pub const ALL: [Keyspace; 3] = [Keyspace::Default, Keyspace::Metadata, Keyspace::Payload];

    /// Returns the column family name.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Keyspace::Default => rocksdb::DEFAULT_COLUMN_FAMILY_NAME,
            Keyspace::Metadata => "metadata",
            Keyspace::Payload => "realdata",
        }
    }
}

impl std::fmt::Display for Keyspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
