// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RocksDB-backed column store implementation.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BlockBasedOptions, BoundColumnFamily, Cache, ColumnFamilyDescriptor, DBWithThreadMode,
    MultiThreaded, Options, WriteBatch, WriteOptions,
};

use super::{Batch, BatchOp, Cursor, Keyspace, StorageError};

/// Default LRU block cache size shared by all keyspaces.
pub const DEFAULT_BLOCK_CACHE_SIZE: usize = 1 << 30; // 1GB

/// Durability mode for write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Writes are synced to WAL but not fsynced to disk.
    /// Durable against process crashes but not power failures.
    #[default]
    WalOnly,
    /// Writes are fsynced to disk on every operation.
    FsyncEveryWrite,
}

/// RocksDB-backed store with one column family per [`Keyspace`].
///
/// Safe for concurrent readers and a single writer sequence. A [`Batch`]
/// written through [`ColumnStore::write`] is the only multi-key atomicity
/// boundary.
pub struct ColumnStore {
    db: DBWithThreadMode<MultiThreaded>,
    write_opts: WriteOptions,
    sync_write_opts: WriteOptions,
}

impl ColumnStore {
    /// Opens or creates a store at the given path.
    ///
    /// Uses `DurabilityMode::WalOnly` by default (fast, durable against process crash).
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with_durability(path, DurabilityMode::default())
    }

    /// Opens or creates a store with the specified durability mode.
    pub fn open_with_durability(
        path: &Path,
        durability: DurabilityMode,
    ) -> Result<Self, StorageError> {
        Self::open_with_options(path, durability, DEFAULT_BLOCK_CACHE_SIZE)
    }

    /// Opens or creates a store with an explicit block cache size.
    pub fn open_with_options(
        path: &Path,
        durability: DurabilityMode,
        block_cache_size: usize,
    ) -> Result<Self, StorageError> {
        let cache = Cache::new_lru_cache(block_cache_size);
        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        // Point lookups on the payload keyspace
        block_opts.set_bloom_filter(10.0, false);

        let mut cf_opts = Options::default();
        cf_opts.set_block_based_table_factory(&block_opts);

        let mut opts = cf_opts.clone();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64MB
        opts.set_max_write_buffer_number(4);
        opts.set_level_compaction_dynamic_level_bytes(true);

        let descriptors = Keyspace::ALL
            .iter()
            .map(|ks| ColumnFamilyDescriptor::new(ks.name(), cf_opts.clone()));

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, descriptors)?;

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(durability == DurabilityMode::FsyncEveryWrite);

        let mut sync_write_opts = WriteOptions::default();
        sync_write_opts.set_sync(true);

        Ok(Self {
            db,
            write_opts,
            sync_write_opts,
        })
    }

    fn handle(&self, keyspace: Keyspace) -> Result<Arc<BoundColumnFamily<'_>>, StorageError> {
        self.db
            .cf_handle(keyspace.name())
            .ok_or(StorageError::MissingKeyspace(keyspace))
    }

    /// Reads a value. Returns `None` when the key is absent.
    pub fn get(&self, keyspace: Keyspace, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let cf = self.handle(keyspace)?;
        Ok(self.db.get_cf(&cf, key)?)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, keyspace: Keyspace, key: &[u8]) -> Result<bool, StorageError> {
        let cf = self.handle(keyspace)?;
        Ok(self.db.get_pinned_cf(&cf, key)?.is_some())
    }

    /// Writes a single value.
    pub fn put(&self, keyspace: Keyspace, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let cf = self.handle(keyspace)?;
        self.db.put_cf_opt(&cf, key, value, &self.write_opts)?;
        Ok(())
    }

    /// Deletes a single key. Deleting an absent key is not an error.
    pub fn delete(&self, keyspace: Keyspace, key: &[u8]) -> Result<(), StorageError> {
        let cf = self.handle(keyspace)?;
        self.db.delete_cf_opt(&cf, key, &self.write_opts)?;
        Ok(())
    }

    /// Creates an empty batch.
    #[inline]
    pub fn new_batch(&self) -> Batch {
        Batch::new()
    }

    /// Atomically applies a batch.
    pub fn write(&self, batch: Batch) -> Result<(), StorageError> {
        let raw = self.to_write_batch(batch)?;
        self.db.write_opt(raw, &self.write_opts)?;
        Ok(())
    }

    /// Atomically applies a batch with explicit fsync, regardless of durability mode.
    pub fn write_sync(&self, batch: Batch) -> Result<(), StorageError> {
        let raw = self.to_write_batch(batch)?;
        self.db.write_opt(raw, &self.sync_write_opts)?;
        Ok(())
    }

    fn to_write_batch(&self, batch: Batch) -> Result<WriteBatch, StorageError> {
        // Resolve every handle before building so a missing family aborts the whole batch.
        let handles = Keyspace::ALL
            .iter()
            .map(|ks| self.handle(*ks))
            .collect::<Result<Vec<_>, _>>()?;
        let handle_of = |ks: Keyspace| &handles[ks as usize];

        let mut raw = WriteBatch::default();
        for op in batch {
            match op {
                BatchOp::Put {
                    keyspace,
                    key,
                    value,
                } => raw.put_cf(handle_of(keyspace), key, value),
                BatchOp::Delete { keyspace, key } => raw.delete_cf(handle_of(keyspace), key),
            }
        }
        Ok(raw)
    }

    /// Opens a cursor over `[start, end)` of one keyspace.
    ///
    /// `None` for `start` means the first key; `None` for `end` means through the last key.
    /// The cursor reads from an implicit snapshot taken when it is created.
    pub fn iterate(
        &self,
        keyspace: Keyspace,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Cursor<'_>, StorageError> {
        let cf = self.handle(keyspace)?;
        Cursor::new(self.db.raw_iterator_cf(&cf), start, end)
    }

    /// Flushes every keyspace's memtable to disk.
    pub fn flush(&self) -> Result<(), StorageError> {
        for ks in Keyspace::ALL {
            let cf = self.handle(ks)?;
            self.db.flush_cf(&cf)?;
        }
        Ok(())
    }

    /// SHA-256 over every entry of every keyspace, in keyspace then key order.
    ///
    /// Intended for consistency checks in tests and tooling; it reads the whole store.
    pub fn fingerprint(&self) -> Result<[u8; 32], StorageError> {
        let mut ctx = ring::digest::Context::new(&ring::digest::SHA256);
        for ks in Keyspace::ALL {
            ctx.update(ks.name().as_bytes());
            for entry in self.iterate(ks, None, None)? {
                let (key, value) = entry?;
                ctx.update(&(key.len() as u64).to_be_bytes());
                ctx.update(&key);
                ctx.update(&(value.len() as u64).to_be_bytes());
                ctx.update(&value);
            }
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(ctx.finish().as_ref());
        Ok(out)
    }
}
