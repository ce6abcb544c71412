// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the application.

use std::path::PathBuf;

use crate::storage::{DurabilityMode, DEFAULT_BLOCK_CACHE_SIZE};
use crate::tx::{Validator, DEFAULT_MAX_OWNER_ID_LEN, DEFAULT_MAX_PAYLOAD_SIZE};

/// Default database name under the data directory.
pub const DEFAULT_DB_NAME: &str = "paustdb";

/// Default data directory name, relative to the user's home.
pub const DEFAULT_DATA_DIR_NAME: &str = ".paust-db";

/// Configuration for [`Application`](super::Application) startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the database.
    pub data_dir: PathBuf,
    /// Database name; the store lives at `<data_dir>/<db_name>.db`.
    pub db_name: String,
    /// Upper bound on owner id length, in bytes.
    pub max_owner_id_len: usize,
    /// Upper bound on payload size, in bytes.
    pub max_payload_size: usize,
    /// Durability of non-commit writes. Commits always sync.
    pub durability: DurabilityMode,
    /// Shared LRU block cache size, in bytes.
    pub block_cache_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR_NAME),
            db_name: DEFAULT_DB_NAME.to_string(),
            max_owner_id_len: DEFAULT_MAX_OWNER_ID_LEN,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            durability: DurabilityMode::default(),
            block_cache_size: DEFAULT_BLOCK_CACHE_SIZE,
        }
    }
}

impl AppConfig {
    /// Creates a configuration rooted at `data_dir` with every other setting at its default.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_db_name(mut self, name: impl Into<String>) -> Self {
        self.db_name = name.into();
        self
    }

    pub fn with_max_owner_id_len(mut self, len: usize) -> Self {
        self.max_owner_id_len = len;
        self
    }

    pub fn with_max_payload_size(mut self, size: usize) -> Self {
        self.max_payload_size = size;
        self
    }

    pub fn with_durability(mut self, durability: DurabilityMode) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_block_cache_size(mut self, size: usize) -> Self {
        self.block_cache_size = size;
        self
    }

    /// Path of the database directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.db_name))
    }

    /// Validator carrying this configuration's limits.
    pub fn validator(&self) -> Validator {
        Validator::new(self.max_owner_id_len, self.max_payload_size)
    }
}
