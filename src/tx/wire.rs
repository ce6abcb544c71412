// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Wire format of a transaction.
//!
//! A transaction is a JSON array of units, byte fields in standard base64:
//!
//! ```json
//! [{"meta": {"rowKey": "...", "ownerId": "o1", "qualifier": "..."},
//!   "real": {"rowKey": "...", "data": "..."}}]
//! ```
//!
//! Row keys are carried as raw bytes here; the validator checks their shape.

use serde::{Deserialize, Serialize};

use crate::types::WriteUnit;

use super::TxError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMeta {
    #[serde(with = "crate::types::b64")]
    pub row_key: Vec<u8>,
    pub owner_id: String,
    #[serde(with = "crate::types::b64", default)]
    pub qualifier: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePayload {
    #[serde(with = "crate::types::b64")]
    pub row_key: Vec<u8>,
    #[serde(with = "crate::types::b64", default)]
    pub data: Vec<u8>,
}

/// One unit as submitted, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireUnit {
    pub meta: WireMeta,
    pub real: WirePayload,
}

impl From<&WriteUnit> for WireUnit {
    fn from(unit: &WriteUnit) -> Self {
        Self {
            meta: WireMeta {
                row_key: unit.meta.row_key.as_bytes().to_vec(),
                owner_id: unit.meta.owner_id.clone(),
                qualifier: unit.meta.qualifier.clone(),
            },
            real: WirePayload {
                row_key: unit.payload.row_key.as_bytes().to_vec(),
                data: unit.payload.data.clone(),
            },
        }
    }
}

/// Parses transaction bytes into unvalidated units.
pub fn decode(tx: &[u8]) -> Result<Vec<WireUnit>, TxError> {
    Ok(serde_json::from_slice(tx)?)
}

/// Encodes validated units into transaction bytes.
pub fn encode(units: &[WriteUnit]) -> Result<Vec<u8>, TxError> {
    let wire: Vec<WireUnit> = units.iter().map(WireUnit::from).collect();
    Ok(serde_json::to_vec(&wire)?)
}
