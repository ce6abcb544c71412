// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Record and row key error types.

/// Errors raised when decoding a row key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowKeyError {
    #[error("malformed row key: expected {expected} bytes, got {actual}")]
    Malformed { expected: usize, actual: usize },
}
