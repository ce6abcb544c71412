// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Application error types.

use crate::storage::StorageError;

/// Where the block lifecycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPhase {
    /// No block open.
    Idle,
    /// Between `begin_block` and `end_block`.
    InProgress,
    /// After `end_block`, before `commit`.
    Ended,
}

impl std::fmt::Display for BlockPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockPhase::Idle => f.write_str("idle"),
            BlockPhase::InProgress => f.write_str("in progress"),
            BlockPhase::Ended => f.write_str("ended"),
        }
    }
}

/// Errors the host must act on.
///
/// Rejected transactions and failed queries are not errors at this level;
/// they come back as response codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The store failed. The process must stop.
    #[error("storage fault: {0}")]
    Storage(#[from] StorageError),

    /// A lifecycle callback arrived out of order.
    #[error("{call} called while block is {phase}")]
    InvalidState {
        call: &'static str,
        phase: BlockPhase,
    },

    #[error("application halted after a storage fault")]
    Halted,
}
