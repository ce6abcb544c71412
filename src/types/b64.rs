// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Serde helpers that carry byte fields as standard base64 strings.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Null and absent fields decode as empty.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded {
        Some(s) => STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}

/// Same encoding for sequences of byte strings.
pub mod list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&STANDARD.encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded: Option<Vec<String>> = Option::deserialize(deserializer)?;
        encoded
            .unwrap_or_default()
            .iter()
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .collect()
    }
}
