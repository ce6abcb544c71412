// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction decoding and validation.
//!
//! A transaction is an ordered, non-empty list of write units. Each unit is
//! checked for:
//!
//! - well-formed 10-byte row keys on both halves, and equal to each other
//! - a non-zero timestamp
//! - an owner id of 1 to `max_owner_id_len` bytes
//! - a payload of at most `max_payload_size` bytes
//! - a row key not repeated earlier in the same transaction
//!
//! Validation never reads storage, so it is safe to run any number of times
//! and concurrently with block application.

mod error;
mod validate;
pub mod wire;

pub use error::{Half, TxError, ValidationError};
pub use validate::{Validator, DEFAULT_MAX_OWNER_ID_LEN, DEFAULT_MAX_PAYLOAD_SIZE};
pub use wire::{WireMeta, WirePayload, WireUnit};
