//! Concurrent word -> count table.
//!
//! A fixed number of rows, each a chain of entries behind its own lock.
//! Only supports increment-or-insert while workers are running; reading
//! everything back needs exclusive access to the table.

use bytes::Bytes;
use log::debug;
use parking_lot::Mutex;

use crate::error::CountError;

pub type Count = u32;

/// Default number of rows, enough for typical text inputs.
pub const DEFAULT_ROWS: u32 = 5000;

/// Receiver for words found by a scanner.
pub trait CountSink: Sync {
    fn record(&self, word: &[u8]) -> Result<(), CountError>;
}

/// Jenkins one-at-a-time hash over the raw key bytes.
#[inline]
pub fn one_at_a_time(key: &[u8]) -> u32 {
    let mut hash: u32 = 0;
    for &byte in key {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

struct Entry {
    key: Bytes,
    hash: u32,
    count: Count,
}

impl Entry {
    #[inline]
    fn matches(&self, hash: u32, key: &[u8]) -> bool {
        self.hash == hash && self.key.len() == key.len() && self.key[..] == *key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Bytes,
    pub count: Count,
}

pub struct Table {
    rows: Box<[Mutex<Vec<Entry>>]>,
}

impl Table {
    pub fn new(rows: u32) -> Result<Self, CountError> {
        if rows == 0 {
            return Err(CountError::InvalidRowCount);
        }

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(rows as usize)?;
        buckets.extend((0..rows).map(|_| Mutex::new(Vec::new())));

        Ok(Table {
            rows: buckets.into_boxed_slice(),
        })
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    #[inline]
    fn row_for(&self, hash: u32) -> usize {
        (hash % self.row_count()) as usize
    }

    /// Adds one to the count of `key`, inserting it with a count of 1 if it
    /// is not in the table yet.
    ///
    /// The lookup and the update happen under the row lock. On allocation
    /// failure the row is left exactly as it was.
    pub fn increment_or_insert(&self, key: &[u8]) -> Result<(), CountError> {
        if key.is_empty() {
            return Err(CountError::EmptyKey);
        }

        let hash = one_at_a_time(key);
        let mut chain = self.rows[self.row_for(hash)].lock();

        if let Some(entry) = chain.iter_mut().find(|entry| entry.matches(hash, key)) {
            entry.count = entry.count.wrapping_add(1);
            return Ok(());
        }

        let mut owned = Vec::new();
        owned.try_reserve_exact(key.len())?;
        owned.extend_from_slice(key);
        chain.try_reserve(1)?;

        chain.push(Entry {
            key: Bytes::from(owned),
            hash,
            count: 1,
        });

        Ok(())
    }

    pub fn get(&self, key: &[u8]) -> Option<Count> {
        let hash = one_at_a_time(key);
        let chain = self.rows[self.row_for(hash)].lock();
        chain
            .iter()
            .find(|entry| entry.matches(hash, key))
            .map(|entry| entry.count)
    }

    /// Every key with its count, in no particular order.
    ///
    /// Taking `&mut self` rules out concurrent writers, so the rows are read
    /// without locking.
    pub fn enumerate(&mut self) -> Vec<KeyValue> {
        let mut pairs = Vec::with_capacity(self.len());
        for row in self.rows.iter_mut() {
            pairs.extend(row.get_mut().iter().map(|entry| KeyValue {
                key: entry.key.clone(),
                count: entry.count,
            }));
        }
        pairs
    }

    pub fn len(&mut self) -> usize {
        self.rows.iter_mut().map(|row| row.get_mut().len()).sum()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    pub fn chain_lengths(&mut self) -> Vec<usize> {
        self.rows.iter_mut().map(|row| row.get_mut().len()).collect()
    }

    pub fn log_entries(&mut self) {
        debug!("table has {} rows", self.rows.len());
        for (idx, row) in self.rows.iter_mut().enumerate() {
            for entry in row.get_mut().iter() {
                debug!(
                    "row {}: key={} count={} len={} hash={:#010x}",
                    idx,
                    String::from_utf8_lossy(&entry.key),
                    entry.count,
                    entry.key.len(),
                    entry.hash
                );
            }
        }
    }
}

impl CountSink for Table {
    #[inline]
    fn record(&self, word: &[u8]) -> Result<(), CountError> {
        self.increment_or_insert(word)
    }
}
