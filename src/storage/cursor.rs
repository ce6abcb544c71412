// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Bounded forward cursor over one keyspace.

use rocksdb::{DBRawIteratorWithThreadMode, DBWithThreadMode, MultiThreaded};

use super::StorageError;

type RawIter<'a> = DBRawIteratorWithThreadMode<'a, DBWithThreadMode<MultiThreaded>>;

/// Ascending cursor over `[start, end)` of a single keyspace.
///
/// Once a cursor reports exhausted it stays exhausted. Advancing an
/// exhausted cursor returns [`StorageError::CursorExhausted`].
///
/// As an [`Iterator`], an entry read before a failed move is still
/// yielded; the failure comes back on the following call.
pub struct Cursor<'a> {
    inner: RawIter<'a>,
    end: Option<Vec<u8>>,
    exhausted: bool,
    deferred: Option<StorageError>,
}

impl<'a> Cursor<'a> {
    /// Positions `inner` at `start` (or the first key) and checks the end bound.
    pub(super) fn new(
        mut inner: RawIter<'a>,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
    ) -> Result<Self, StorageError> {
        match start {
            Some(start) => inner.seek(start),
            None => inner.seek_to_first(),
        }
        let mut cursor = Self {
            inner,
            end: end.map(<[u8]>::to_vec),
            exhausted: false,
            deferred: None,
        };
        cursor.settle()?;
        Ok(cursor)
    }

    /// Re-evaluates validity after a move of the underlying iterator.
    fn settle(&mut self) -> Result<(), StorageError> {
        if self.exhausted {
            return Ok(());
        }
        if let Err(e) = self.inner.status() {
            self.exhausted = true;
            return Err(e.into());
        }
        let past_end = match (self.inner.key(), self.end.as_deref()) {
            (None, _) => true,
            (Some(key), Some(end)) => key >= end,
            (Some(_), None) => false,
        };
        if past_end {
            self.exhausted = true;
        }
        Ok(())
    }

    /// Returns true while the cursor points at an entry inside its domain.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.exhausted
    }

    /// Returns the current key, or `None` once exhausted.
    #[inline]
    pub fn key(&self) -> Option<&[u8]> {
        if self.exhausted {
            return None;
        }
        self.inner.key()
    }

    /// Returns the current value, or `None` once exhausted.
    #[inline]
    pub fn value(&self) -> Option<&[u8]> {
        if self.exhausted {
            return None;
        }
        self.inner.value()
    }

    /// Moves to the next entry.
    pub fn advance(&mut self) -> Result<(), StorageError> {
        if self.exhausted {
            return Err(StorageError::CursorExhausted);
        }
        self.inner.next();
        self.settle()
    }
}

impl Cursor<'_> {
    /// Yields `entry` and holds back a failed move for the next call.
    fn hand_out(
        &mut self,
        entry: (Vec<u8>, Vec<u8>),
        moved: Result<(), StorageError>,
    ) -> Result<(Vec<u8>, Vec<u8>), StorageError> {
        if let Err(e) = moved {
            self.deferred = Some(e);
        }
        Ok(entry)
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<(Vec<u8>, Vec<u8>), StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.deferred.take() {
            return Some(Err(e));
        }
        let entry = match (self.key(), self.value()) {
            (Some(k), Some(v)) => (k.to_vec(), v.to_vec()),
            _ => return None,
        };
        let moved = self.advance();
        Some(self.hand_out(entry, moved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ColumnStore, DurabilityMode, Keyspace};
    use tempfile::TempDir;

    #[test]
    fn test_failed_move_still_yields_entry() {
        let dir = TempDir::new().unwrap();
        let store = ColumnStore::open_with_options(dir.path(), DurabilityMode::WalOnly, 8 << 20)
            .unwrap();
        store.put(Keyspace::Payload, b"a", b"1").unwrap();
        store.put(Keyspace::Payload, b"b", b"2").unwrap();

        let mut cursor = store.iterate(Keyspace::Payload, None, None).unwrap();
        assert_eq!(cursor.next().unwrap().unwrap(), (b"a".to_vec(), b"1".to_vec()));

        // "b" was read, then moving past it failed.
        let entry = (cursor.key().unwrap().to_vec(), cursor.value().unwrap().to_vec());
        cursor.exhausted = true;
        let yielded = cursor.hand_out(entry, Err(StorageError::Corruption("bad block".into())));

        assert_eq!(yielded.unwrap(), (b"b".to_vec(), b"2".to_vec()));
        assert!(matches!(cursor.next(), Some(Err(StorageError::Corruption(_)))));
        assert!(cursor.next().is_none());
    }
}
