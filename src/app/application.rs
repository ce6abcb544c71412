// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! The replicated state machine.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use crate::query::{Query, QueryEngine, QueryError, QueryKind, QueryOutput};
use crate::storage::{Batch, ColumnStore, Keyspace, StorageError};
use crate::tx::{TxError, Validator};
use crate::types::{RowKey, WriteUnit};

use super::config::AppConfig;
use super::digest::{BlockDigest, CommitInfo, COMMIT_INFO_KEY};
use super::error::{AppError, BlockPhase};
use super::response::{CommitResponse, InfoResponse, QueryRequest, QueryResponse, TxResponse};

/// Writes staged for the open block.
struct PendingBlock {
    height: u64,
    batch: Batch,
    staged: HashSet<RowKey>,
    digest: BlockDigest,
    accepted_txs: usize,
    accepted_units: usize,
    ended: bool,
}

enum BlockState {
    Idle,
    Open(PendingBlock),
}

impl BlockState {
    fn phase(&self) -> BlockPhase {
        match self {
            BlockState::Idle => BlockPhase::Idle,
            BlockState::Open(p) if p.ended => BlockPhase::Ended,
            BlockState::Open(_) => BlockPhase::InProgress,
        }
    }
}

/// Deterministic state machine over a [`ColumnStore`].
///
/// The host drives `begin_block`, `deliver_tx`*, `end_block` and `commit`
/// from a single thread. `check_tx`, `query` and `info` may run on any
/// thread at any time: they never take the block lock, and `query` only
/// sees committed state because staged writes stay in memory until commit.
///
/// Any storage failure latches the application into a halted state in
/// which every lifecycle call returns [`AppError::Halted`].
pub struct Application {
    config: AppConfig,
    store: ColumnStore,
    validator: Validator,
    block: Mutex<BlockState>,
    committed: RwLock<CommitInfo>,
    halted: AtomicBool,
}

impl Application {
    /// Opens or creates the store under `config.data_dir` and reloads the last commit.
    pub fn open(config: AppConfig) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.data_dir).map_err(StorageError::from)?;
        let path = config.db_path();
        let store = ColumnStore::open_with_options(&path, config.durability, config.block_cache_size)?;

        let committed = match store.get(Keyspace::Default, COMMIT_INFO_KEY)? {
            Some(bytes) => CommitInfo::decode(&bytes)?,
            None => CommitInfo::default(),
        };

        info!(
            path = %path.display(),
            height = committed.height,
            app_hash = %committed.app_hash,
            "application opened"
        );

        Ok(Self {
            validator: config.validator(),
            config,
            store,
            block: Mutex::new(BlockState::Idle),
            committed: RwLock::new(committed),
            halted: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &ColumnStore {
        &self.store
    }

    /// Read-only query access to committed state.
    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.store)
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Height and app hash of the last committed block.
    pub fn last_commit(&self) -> CommitInfo {
        *self.committed.read()
    }

    pub fn info(&self) -> InfoResponse {
        let last = self.last_commit();
        InfoResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            last_height: last.height,
            last_app_hash: last.app_hash,
        }
    }

    /// Stateless admission check. Never touches the store.
    #[instrument(skip(self, tx), fields(size = tx.len()))]
    pub fn check_tx(&self, tx: &[u8]) -> TxResponse {
        match self.validator.parse(tx) {
            Ok(units) => {
                debug!(units = units.len(), size = tx.len(), "check_tx accepted");
                TxResponse::ok()
            }
            Err(e) => {
                warn!(error = %e, size = tx.len(), "check_tx rejected");
                TxResponse::rejected(&e)
            }
        }
    }

    /// Opens the next block.
    #[instrument(skip(self))]
    pub fn begin_block(&self) -> Result<(), AppError> {
        self.ensure_running()?;
        let mut block = self.block.lock();
        if let BlockState::Open(_) = *block {
            return Err(AppError::InvalidState {
                call: "begin_block",
                phase: block.phase(),
            });
        }

        let last = self.last_commit();
        let height = last.height + 1;
        *block = BlockState::Open(PendingBlock {
            height,
            batch: self.store.new_batch(),
            staged: HashSet::new(),
            digest: BlockDigest::begin(&last.app_hash, height),
            accepted_txs: 0,
            accepted_units: 0,
            ended: false,
        });
        debug!(height, "block opened");
        Ok(())
    }

    /// Validates a transaction and stages its writes into the open block.
    ///
    /// A rejected transaction stages nothing and is reported through the
    /// response code. Only lifecycle misuse and storage faults are errors.
    #[instrument(skip(self, tx), fields(size = tx.len()))]
    pub fn deliver_tx(&self, tx: &[u8]) -> Result<TxResponse, AppError> {
        self.ensure_running()?;
        let mut block = self.block.lock();
        let phase = block.phase();
        let pending = match &mut *block {
            BlockState::Open(p) if !p.ended => p,
            _ => {
                return Err(AppError::InvalidState {
                    call: "deliver_tx",
                    phase,
                })
            }
        };

        let units = match self.validator.parse(tx) {
            Ok(units) => units,
            Err(e) => {
                warn!(error = %e, height = pending.height, "deliver_tx rejected");
                return Ok(TxResponse::rejected(&e));
            }
        };

        let encoded = match self.prepare(pending, &units) {
            Ok(encoded) => encoded,
            Err(Prepare::Rejected(e)) => {
                warn!(error = %e, height = pending.height, "deliver_tx rejected");
                return Ok(TxResponse::rejected(&e));
            }
            Err(Prepare::Fault(e)) => return Err(self.fault(e)),
        };

        for (unit, meta_value) in units.iter().zip(encoded) {
            let key = unit.row_key();
            pending
                .batch
                .put(Keyspace::Metadata, key.as_bytes().to_vec(), meta_value);
            pending
                .batch
                .put(Keyspace::Payload, key.as_bytes().to_vec(), unit.payload.data.clone());
            pending.staged.insert(key);
            pending.digest.absorb(unit);
        }
        pending.accepted_txs += 1;
        pending.accepted_units += units.len();

        info!(
            state = "staged",
            units = units.len(),
            height = pending.height,
            "deliver_tx accepted"
        );
        Ok(TxResponse::ok())
    }

    /// Checks every unit for collisions and encodes metadata values, staging nothing.
    fn prepare(&self, pending: &PendingBlock, units: &[WriteUnit]) -> Result<Vec<Vec<u8>>, Prepare> {
        let mut encoded = Vec::with_capacity(units.len());
        for unit in units {
            let key = unit.row_key();
            if pending.staged.contains(&key)
                || self
                    .store
                    .contains(Keyspace::Metadata, key.as_bytes())
                    .map_err(Prepare::Fault)?
            {
                return Err(Prepare::Rejected(TxError::Conflict { row_key: key }));
            }
            let value = unit
                .meta
                .encode_value()
                .map_err(|e| Prepare::Rejected(TxError::Decode(e)))?;
            encoded.push(value);
        }
        Ok(encoded)
    }

    /// Closes the open block to further transactions.
    #[instrument(skip(self))]
    pub fn end_block(&self) -> Result<(), AppError> {
        self.ensure_running()?;
        let mut block = self.block.lock();
        let phase = block.phase();
        match &mut *block {
            BlockState::Open(p) if !p.ended => {
                p.ended = true;
                debug!(height = p.height, txs = p.accepted_txs, "block ended");
                Ok(())
            }
            _ => Err(AppError::InvalidState {
                call: "end_block",
                phase,
            }),
        }
    }

    /// Durably writes the open block in one synced batch and returns the new app hash.
    ///
    /// The commit record for the block travels in the same batch, so the
    /// stored height never disagrees with the stored records.
    #[instrument(skip(self))]
    pub fn commit(&self) -> Result<CommitResponse, AppError> {
        self.ensure_running()?;
        let mut block = self.block.lock();
        let pending = match std::mem::replace(&mut *block, BlockState::Idle) {
            BlockState::Open(p) => p,
            BlockState::Idle => {
                return Err(AppError::InvalidState {
                    call: "commit",
                    phase: BlockPhase::Idle,
                })
            }
        };

        let commit = CommitInfo {
            height: pending.height,
            app_hash: pending.digest.finish(),
        };
        let mut batch = pending.batch;
        batch.put(Keyspace::Default, COMMIT_INFO_KEY.to_vec(), commit.encode());

        let size = batch.len();
        if let Err(e) = self.store.write_sync(batch) {
            return Err(self.fault(e));
        }
        *self.committed.write() = commit;

        info!(
            height = commit.height,
            app_hash = %commit.app_hash,
            txs = pending.accepted_txs,
            units = pending.accepted_units,
            size,
            "block committed"
        );
        Ok(CommitResponse {
            height: commit.height,
            app_hash: commit.app_hash,
        })
    }

    /// Serves a query against committed state.
    ///
    /// Malformed or unknown requests come back as a failed response; only a
    /// storage fault is an error.
    #[instrument(skip(self, request), fields(path = %request.path))]
    pub fn query(&self, request: &QueryRequest) -> Result<QueryResponse, AppError> {
        match self.run_query(request) {
            Ok(value) => Ok(QueryResponse::ok(value)),
            Err(QueryError::Storage(e)) => Err(self.fault(e)),
            Err(e) => {
                debug!(error = %e, "query failed");
                Ok(QueryResponse::failed(&e))
            }
        }
    }

    fn run_query(&self, request: &QueryRequest) -> Result<Vec<u8>, QueryError> {
        let kind = QueryKind::from_path(&request.path)?;
        let query = Query::decode(kind, &request.data)?;
        let output = self.engine().execute(&query)?;
        debug!(kind = ?kind, results = output.len(), "query served");
        QueryOutput::encode(output)
    }

    /// SHA-256 over all committed entries.
    pub fn fingerprint(&self) -> Result<[u8; 32], AppError> {
        Ok(self.store.fingerprint()?)
    }

    fn ensure_running(&self) -> Result<(), AppError> {
        if self.is_halted() {
            return Err(AppError::Halted);
        }
        Ok(())
    }

    fn fault(&self, err: StorageError) -> AppError {
        self.halted.store(true, Ordering::Release);
        error!(error = %err, "storage fault, halting");
        AppError::Storage(err)
    }
}

enum Prepare {
    Rejected(TxError),
    Fault(StorageError),
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::tx::wire;
    use proptest::prelude::*;
    use tempfile::TempDir;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn committed_count_matches_accepted_units(
            keys in prop::collection::btree_set((1u64..1_000, 0u16..4), 1..20)
        ) {
            let dir = TempDir::new().unwrap();
            let app = Application::open(AppConfig::new(dir.path()).with_block_cache_size(8 << 20)).unwrap();

            let units: Vec<WriteUnit> = keys
                .iter()
                .map(|(ts, salt)| WriteUnit::new(RowKey::new(*ts, *salt), "o", Vec::new(), vec![1u8]))
                .collect();

            app.begin_block().unwrap();
            prop_assert!(app.deliver_tx(&wire::encode(&units).unwrap()).unwrap().is_ok());
            app.end_block().unwrap();
            app.commit().unwrap();

            let meta = app.store().iterate(Keyspace::Metadata, None, None).unwrap().count();
            let payload = app.store().iterate(Keyspace::Payload, None, None).unwrap().count();
            prop_assert_eq!(meta, units.len());
            prop_assert_eq!(payload, units.len());
        }
    }
}
