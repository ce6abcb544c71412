// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Commit digest chaining.
//!
//! Each block's app hash is
//! `SHA-256(prev_app_hash || height_be || unit_0 || unit_1 || ...)` over the
//! accepted units in apply order, where a unit is
//! `row_key || len || owner_id || len || qualifier || len || data` with
//! big-endian `u64` lengths.

use std::fmt;

use ring::digest::{Context, SHA256};
use serde::{Serialize, Serializer};

use crate::storage::StorageError;
use crate::types::WriteUnit;

/// Width of an app hash in bytes.
pub const APP_HASH_LEN: usize = 32;

/// Digest of committed state after a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AppHash([u8; APP_HASH_LEN]);

impl AppHash {
    /// The hash before any block has been committed.
    pub const ZERO: AppHash = AppHash([0u8; APP_HASH_LEN]);

    pub fn from_bytes(bytes: [u8; APP_HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AppHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppHash({self})")
    }
}

impl fmt::Display for AppHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Serialize for AppHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::types::b64::serialize(&self.0, serializer)
    }
}

/// Running digest of one block.
#[derive(Clone)]
pub struct BlockDigest {
    ctx: Context,
}

impl BlockDigest {
    /// Starts the digest of block `height` on top of `prev`.
    pub fn begin(prev: &AppHash, height: u64) -> Self {
        let mut ctx = Context::new(&SHA256);
        ctx.update(prev.as_bytes());
        ctx.update(&height.to_be_bytes());
        Self { ctx }
    }

    /// Folds in one accepted unit.
    pub fn absorb(&mut self, unit: &WriteUnit) {
        self.ctx.update(unit.row_key().as_bytes());
        self.update_framed(unit.meta.owner_id.as_bytes());
        self.update_framed(&unit.meta.qualifier);
        self.update_framed(&unit.payload.data);
    }

    fn update_framed(&mut self, bytes: &[u8]) {
        self.ctx.update(&(bytes.len() as u64).to_be_bytes());
        self.ctx.update(bytes);
    }

    pub fn finish(self) -> AppHash {
        let mut out = [0u8; APP_HASH_LEN];
        out.copy_from_slice(self.ctx.finish().as_ref());
        AppHash(out)
    }
}

/// Key of the last commit record in the default keyspace.
pub const COMMIT_INFO_KEY: &[u8] = b"lastCommit";

const COMMIT_INFO_LEN: usize = 8 + APP_HASH_LEN;

/// Height and app hash of the last committed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitInfo {
    pub height: u64,
    pub app_hash: AppHash,
}

impl CommitInfo {
    /// Encodes as `[height BE][app hash]`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(COMMIT_INFO_LEN);
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(self.app_hash.as_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StorageError> {
        if bytes.len() != COMMIT_INFO_LEN {
            return Err(StorageError::Corruption(format!(
                "commit info is {} bytes, expected {}",
                bytes.len(),
                COMMIT_INFO_LEN
            )));
        }
        let mut height = [0u8; 8];
        height.copy_from_slice(&bytes[..8]);
        let mut hash = [0u8; APP_HASH_LEN];
        hash.copy_from_slice(&bytes[8..]);
        Ok(Self {
            height: u64::from_be_bytes(height),
            app_hash: AppHash(hash),
        })
    }
}
