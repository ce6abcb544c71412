// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction validation.
//!
//! The same checks run at pre-check and again at apply, so a transaction
//! accepted on one replica is accepted on every replica.

use std::collections::HashSet;

use crate::types::{RowKey, WriteUnit};

use super::error::{Half, TxError, ValidationError};
use super::wire::{self, WireUnit};

/// Default upper bound on owner id length, in bytes.
pub const DEFAULT_MAX_OWNER_ID_LEN: usize = 64;

/// Default upper bound on payload size, in bytes.
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Stateless transaction validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_owner_id_len: usize,
    max_payload_size: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OWNER_ID_LEN, DEFAULT_MAX_PAYLOAD_SIZE)
    }
}

impl Validator {
    pub fn new(max_owner_id_len: usize, max_payload_size: usize) -> Self {
        Self {
            max_owner_id_len,
            max_payload_size,
        }
    }

    #[inline]
    pub fn max_owner_id_len(&self) -> usize {
        self.max_owner_id_len
    }

    #[inline]
    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    /// Decodes and validates transaction bytes.
    pub fn parse(&self, tx: &[u8]) -> Result<Vec<WriteUnit>, TxError> {
        let units = wire::decode(tx)?;
        Ok(self.validate(units)?)
    }

    /// Validates decoded units, in order, stopping at the first violation.
    pub fn validate(&self, units: Vec<WireUnit>) -> Result<Vec<WriteUnit>, ValidationError> {
        if units.is_empty() {
            return Err(ValidationError::Empty);
        }

        let mut seen = HashSet::with_capacity(units.len());
        let mut out = Vec::with_capacity(units.len());
        for (index, unit) in units.into_iter().enumerate() {
            let checked = self.validate_unit(index, unit)?;
            if !seen.insert(checked.row_key()) {
                return Err(ValidationError::DuplicateRowKey {
                    index,
                    row_key: checked.row_key(),
                });
            }
            out.push(checked);
        }
        Ok(out)
    }

    fn validate_unit(&self, index: usize, unit: WireUnit) -> Result<WriteUnit, ValidationError> {
        let meta_key = parse_key(index, Half::Meta, &unit.meta.row_key)?;
        let payload_key = parse_key(index, Half::Payload, &unit.real.row_key)?;
        if meta_key != payload_key {
            return Err(ValidationError::RowKeyMismatch {
                index,
                meta: meta_key,
                payload: payload_key,
            });
        }

        if meta_key.timestamp() == 0 {
            return Err(ValidationError::ZeroTimestamp { index });
        }

        let owner_len = unit.meta.owner_id.len();
        if owner_len == 0 {
            return Err(ValidationError::EmptyOwnerId { index });
        }
        if owner_len > self.max_owner_id_len {
            return Err(ValidationError::OwnerIdTooLong {
                index,
                len: owner_len,
                max: self.max_owner_id_len,
            });
        }

        if unit.real.data.len() > self.max_payload_size {
            return Err(ValidationError::PayloadTooLarge {
                index,
                size: unit.real.data.len(),
                max: self.max_payload_size,
            });
        }

        Ok(WriteUnit::new(
            meta_key,
            unit.meta.owner_id,
            unit.meta.qualifier,
            unit.real.data,
        ))
    }
}

fn parse_key(index: usize, half: Half, bytes: &[u8]) -> Result<RowKey, ValidationError> {
    RowKey::from_slice(bytes).map_err(|source| ValidationError::MalformedRowKey {
        index,
        half,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::wire::{WireMeta, WirePayload};

    fn wire_unit(ts: u64, owner: &str, data: &[u8]) -> WireUnit {
        let key = RowKey::new(ts, 0).as_bytes().to_vec();
        WireUnit {
            meta: WireMeta {
                row_key: key.clone(),
                owner_id: owner.to_string(),
                qualifier: b"Memory".to_vec(),
            },
            real: WirePayload {
                row_key: key,
                data: data.to_vec(),
            },
        }
    }

    #[test]
    fn test_valid_transaction() {
        let validator = Validator::default();
        let units = validator
            .validate(vec![wire_unit(1, "o1", b"a"), wire_unit(2, "o2", b"b")])
            .unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].meta.owner_id, "o1");
        assert_eq!(units[1].payload.data, b"b");
        assert_eq!(units[1].row_key(), RowKey::new(2, 0));
    }

    #[test]
    fn test_empty_transaction() {
        let result = Validator::default().validate(Vec::new());
        assert_eq!(result, Err(ValidationError::Empty));
    }

    #[test]
    fn test_empty_array_bytes() {
        let result = Validator::default().parse(b"[]");
        assert!(matches!(result, Err(TxError::Validation(ValidationError::Empty))));
    }

    #[test]
    fn test_owner_id_bounds() {
        let validator = Validator::new(4, 1024);

        assert!(validator.validate(vec![wire_unit(1, "abcd", b"")]).is_ok());
        assert_eq!(
            validator.validate(vec![wire_unit(1, "abcde", b"")]),
            Err(ValidationError::OwnerIdTooLong { index: 0, len: 5, max: 4 })
        );
        assert_eq!(
            validator.validate(vec![wire_unit(1, "", b"")]),
            Err(ValidationError::EmptyOwnerId { index: 0 })
        );
    }

    #[test]
    fn test_zero_timestamp() {
        let result = Validator::default().validate(vec![wire_unit(1, "o", b""), wire_unit(0, "o", b"")]);
        assert_eq!(result, Err(ValidationError::ZeroTimestamp { index: 1 }));
    }

    #[test]
    fn test_row_key_mismatch() {
        let mut unit = wire_unit(5, "o", b"");
        unit.real.row_key = RowKey::new(6, 0).as_bytes().to_vec();

        let result = Validator::default().validate(vec![unit]);
        assert!(matches!(result, Err(ValidationError::RowKeyMismatch { index: 0, .. })));
    }

    #[test]
    fn test_malformed_row_key() {
        let mut unit = wire_unit(5, "o", b"");
        unit.meta.row_key.truncate(3);

        let result = Validator::default().validate(vec![unit]);
        assert!(matches!(
            result,
            Err(ValidationError::MalformedRowKey { index: 0, half: Half::Meta, .. })
        ));
    }

    #[test]
    fn test_payload_too_large() {
        let validator = Validator::new(64, 4);
        let result = validator.validate(vec![wire_unit(1, "o", b"12345")]);
        assert_eq!(
            result,
            Err(ValidationError::PayloadTooLarge { index: 0, size: 5, max: 4 })
        );
    }

    #[test]
    fn test_duplicate_row_key_in_one_transaction() {
        let result = Validator::default().validate(vec![wire_unit(7, "a", b""), wire_unit(7, "b", b"")]);
        assert!(matches!(
            result,
            Err(ValidationError::DuplicateRowKey { index: 1, .. })
        ));
    }

    #[test]
    fn test_reason_is_readable() {
        let err = Validator::new(2, 16).validate(vec![wire_unit(1, "long", b"")]).unwrap_err();
        assert_eq!(err.to_string(), "unit 0: owner id is 4 bytes, max 2");
    }

    #[test]
    fn test_parse_is_repeatable() {
        let validator = Validator::default();
        let tx = wire::encode(&[WriteUnit::new(RowKey::new(3, 9), "o", Vec::new(), b"x".to_vec())])
            .unwrap();

        let first = validator.parse(&tx).unwrap();
        let second = validator.parse(&tx).unwrap();
        assert_eq!(first, second);
    }
}
