// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Core record types shared by every layer.
//!
//! Every record is addressed by a [`RowKey`]: an 8-byte big-endian nanosecond
//! timestamp followed by a 2-byte salt. The same key addresses the metadata
//! and the payload of one [`WriteUnit`].

pub(crate) mod b64;
mod error;
mod record;
mod rowkey;

pub use error::RowKeyError;
pub use record::{MetaRecord, PayloadRecord, WriteUnit};
pub use rowkey::{
    decode_timestamp, encode, range_bounds, RowKey, ROW_KEY_LEN, SALT_LEN, TIMESTAMP_LEN,
};
