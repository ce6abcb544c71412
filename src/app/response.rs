// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Request and response envelopes exchanged with the consensus host.

use serde::Serialize;

use crate::query::QueryError;
use crate::tx::TxError;

use super::digest::AppHash;

/// Outcome code carried by every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum ResponseCode {
    Ok = 0,
    EncodingError = 1,
    ValidationError = 2,
    Conflict = 3,
    QueryError = 4,
    UnknownPath = 5,
}

impl ResponseCode {
    #[inline]
    pub fn value(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        self == ResponseCode::Ok
    }
}

impl From<&TxError> for ResponseCode {
    fn from(err: &TxError) -> Self {
        match err {
            TxError::Decode(_) => ResponseCode::EncodingError,
            TxError::Validation(_) => ResponseCode::ValidationError,
            TxError::Conflict { .. } => ResponseCode::Conflict,
        }
    }
}

impl From<&QueryError> for ResponseCode {
    fn from(err: &QueryError) -> Self {
        match err {
            QueryError::UnknownPath(_) => ResponseCode::UnknownPath,
            _ => ResponseCode::QueryError,
        }
    }
}

/// Answer to `check_tx` and `deliver_tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxResponse {
    pub code: ResponseCode,
    /// Empty on success.
    pub log: String,
}

impl TxResponse {
    pub fn ok() -> Self {
        Self {
            code: ResponseCode::Ok,
            log: String::new(),
        }
    }

    pub fn rejected(err: &TxError) -> Self {
        Self {
            code: err.into(),
            log: err.to_string(),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

/// A query as delivered by the host: a path and an opaque body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub path: String,
    pub data: Vec<u8>,
}

impl QueryRequest {
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResponse {
    pub code: ResponseCode,
    pub log: String,
    /// JSON result body; empty on failure.
    #[serde(serialize_with = "crate::types::b64::serialize")]
    pub value: Vec<u8>,
}

impl QueryResponse {
    pub fn ok(value: Vec<u8>) -> Self {
        Self {
            code: ResponseCode::Ok,
            log: String::new(),
            value,
        }
    }

    pub fn failed(err: &QueryError) -> Self {
        Self {
            code: err.into(),
            log: err.to_string(),
            value: Vec::new(),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub height: u64,
    pub app_hash: AppHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub version: String,
    pub last_height: u64,
    pub last_app_hash: AppHash,
}
