// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Block lifecycle state machine driven by a BFT consensus host.
//!
//! The host calls, per block:
//!
//! ```text
//! begin_block -> deliver_tx* -> end_block -> commit
//! ```
//!
//! and may call `check_tx`, `query` and `info` at any time. Accepted
//! transactions are staged in memory and written in one synced batch at
//! commit together with the block's height and app hash.
//!
//! # Example
//!
//! ```no_run
//! use paustdb::app::{AppConfig, Application, QueryRequest};
//!
//! let app = Application::open(AppConfig::new("/tmp/paust-db")).unwrap();
//!
//! app.begin_block().unwrap();
//! let resp = app.deliver_tx(br#"[]"#).unwrap();
//! assert!(!resp.is_ok());
//! app.end_block().unwrap();
//! let commit = app.commit().unwrap();
//! println!("height {} hash {}", commit.height, commit.app_hash);
//!
//! let body = br#"{"start":0,"end":100}"#.to_vec();
//! let result = app.query(&QueryRequest::new("/query", body)).unwrap();
//! println!("{}", String::from_utf8_lossy(&result.value));
//! ```

mod application;
mod config;
mod digest;
mod error;
mod response;

pub use application::Application;
pub use config::{AppConfig, DEFAULT_DATA_DIR_NAME, DEFAULT_DB_NAME};
pub use digest::{AppHash, BlockDigest, CommitInfo, APP_HASH_LEN, COMMIT_INFO_KEY};
pub use error::{AppError, BlockPhase};
pub use response::{
    CommitResponse, InfoResponse, QueryRequest, QueryResponse, ResponseCode, TxResponse,
};
