// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Row key encoding and decoding.
//!
//! Format: `[timestamp:u64 BE][salt:u16 BE]`, 10 bytes total.
//!
//! Big-endian timestamps make RocksDB's default byte-order comparator sort
//! keys chronologically. The salt only reduces collisions between records
//! sharing a timestamp; it does not make keys unique.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::RowKeyError;

/// Width of the timestamp prefix in bytes.
pub const TIMESTAMP_LEN: usize = 8;

/// Width of the salt suffix in bytes.
pub const SALT_LEN: usize = 2;

/// Total encoded row key width in bytes.
pub const ROW_KEY_LEN: usize = TIMESTAMP_LEN + SALT_LEN;

/// A fixed-width, time-ordered record identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey([u8; ROW_KEY_LEN]);

impl RowKey {
    /// Encodes a nanosecond timestamp and salt into a row key.
    #[inline]
    pub fn new(timestamp: u64, salt: u16) -> Self {
        Self(encode(timestamp, salt))
    }

    /// Creates a row key with a random salt.
    pub fn with_random_salt(timestamp: u64) -> Self {
        Self::new(timestamp, rand::random::<u16>())
    }

    /// Parses an encoded row key. The slice must be exactly 10 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RowKeyError> {
        let arr: [u8; ROW_KEY_LEN] =
            bytes.try_into().map_err(|_| RowKeyError::Malformed {
                expected: ROW_KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Returns the timestamp prefix.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        let mut ts = [0u8; TIMESTAMP_LEN];
        ts.copy_from_slice(&self.0[..TIMESTAMP_LEN]);
        u64::from_be_bytes(ts)
    }

    /// Returns the salt suffix.
    #[inline]
    pub fn salt(&self) -> u16 {
        u16::from_be_bytes([self.0[TIMESTAMP_LEN], self.0[TIMESTAMP_LEN + 1]])
    }

    /// Returns the encoded bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the encoded bytes by value.
    #[inline]
    pub fn to_bytes(self) -> [u8; ROW_KEY_LEN] {
        self.0
    }
}

impl AsRef<[u8]> for RowKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for RowKey {
    type Error = RowKeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowKey({}#{:04x})", self.timestamp(), self.salt())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        super::b64::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for RowKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = super::b64::deserialize(deserializer)?;
        Self::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Encodes a timestamp and salt as `[ts BE][salt BE]`.
#[inline]
pub fn encode(timestamp: u64, salt: u16) -> [u8; ROW_KEY_LEN] {
    let mut key = [0u8; ROW_KEY_LEN];
    key[..TIMESTAMP_LEN].copy_from_slice(&timestamp.to_be_bytes());
    key[TIMESTAMP_LEN..].copy_from_slice(&salt.to_be_bytes());
    key
}

/// Reads the timestamp prefix of an encoded key.
///
/// Fails if the key is shorter than a full row key.
pub fn decode_timestamp(key: &[u8]) -> Result<u64, RowKeyError> {
    if key.len() < ROW_KEY_LEN {
        return Err(RowKeyError::Malformed {
            expected: ROW_KEY_LEN,
            actual: key.len(),
        });
    }
    let mut ts = [0u8; TIMESTAMP_LEN];
    ts.copy_from_slice(&key[..TIMESTAMP_LEN]);
    Ok(u64::from_be_bytes(ts))
}

/// Returns the half-open iteration domain `[low, high)` covering `[start, end)` in time.
#[inline]
pub fn range_bounds(start: u64, end: u64) -> (RowKey, RowKey) {
    (RowKey::new(start, 0), RowKey::new(end, 0))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn timestamp_roundtrip(timestamp in any::<u64>(), salt in any::<u16>()) {
            let key = RowKey::new(timestamp, salt);
            prop_assert_eq!(decode_timestamp(key.as_bytes()).unwrap(), timestamp);
            prop_assert_eq!(key.salt(), salt);
        }

        #[test]
        fn byte_order_is_time_order(
            a in any::<u64>(),
            b in any::<u64>(),
            salt_a in any::<u16>(),
            salt_b in any::<u16>(),
        ) {
            prop_assume!(a != b);
            let ka = RowKey::new(a, salt_a);
            let kb = RowKey::new(b, salt_b);
            prop_assert_eq!(a < b, ka.as_bytes() < kb.as_bytes());
        }
    }
}
