// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Range and fetch queries over committed records.
//!
//! Two shapes are served, selected by request path:
//!
//! - `/query` ([`RangeQuery`]): metadata with timestamps in `[start, end)`,
//!   optionally restricted to one owner id and/or one qualifier (AND)
//! - `/fetch` ([`FetchQuery`]): payloads for explicit row keys, in request
//!   order, silently skipping keys that were never written
//!
//! An empty result is not an error.

mod engine;
mod error;
mod filter;
mod request;

pub use engine::QueryEngine;
pub use error::QueryError;
pub use filter::{FilterKind, RecordFilter, ScanPlan};
pub use request::{
    FetchQuery, MetaResult, PayloadResult, Query, QueryKind, QueryOutput, RangeQuery,
    FETCH_PATH, QUERY_PATH,
};
