//! In-memory key-value store with expiration support.

use crate::error::StoreError;
use crate::kv::{KvStore, TTL_MISSING, TTL_NO_EXPIRY, WriteBatch, WriteOp};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use globset::Glob;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A stored value and its optional expiration deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-memory [`KvStore`] with lazy expiration.
///
/// Expired entries are invisible to every read path and are physically
/// dropped when overwritten, deleted, or re-armed. Clones share the
/// underlying map, so one store can back several record handles.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let entries = self.entries.read();
        let now = Utc::now();
        Ok(entries.get(key).is_some_and(|entry| !entry.is_expired(now)))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.read();
        let now = Utc::now();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut entries = self.entries.write();
        let now = Utc::now();
        let removed = match entries.remove(key) {
            Some(entry) if !entry.is_expired(now) => 1,
            _ => 0,
        };
        debug!("deleted key (key={}, removed={})", key, removed);
        Ok(removed)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let matcher = Glob::new(pattern)
            .map_err(|err| StoreError::InvalidPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?
            .compile_matcher();
        let entries = self.entries.read();
        let now = Utc::now();
        let mut matches: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && matcher.is_match(key))
            .map(|(key, _)| key.clone())
            .collect();
        // Map iteration order is arbitrary; keep scans stable.
        matches.sort();
        Ok(matches)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError> {
        let mut entries = self.entries.write();
        let now = Utc::now();
        let Some(mut entry) = entries.remove(key) else {
            return Ok(false);
        };
        if entry.is_expired(now) {
            return Ok(false);
        }
        entry.expires_at = Some(now + Duration::seconds(seconds as i64));
        entries.insert(key.to_string(), entry);
        Ok(true)
    }

    async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        let entries = self.entries.read();
        let now = Utc::now();
        let Some(entry) = entries.get(key) else {
            return Ok(TTL_MISSING);
        };
        if entry.is_expired(now) {
            return Ok(TTL_MISSING);
        }
        match entry.expires_at {
            Some(deadline) => {
                // Ceiling division; `i64::div_ceil` is unstable.
                let millis = (deadline - now).num_milliseconds();
                Ok(millis / 1000 + i64::from(millis % 1000 > 0))
            }
            None => Ok(TTL_NO_EXPIRY),
        }
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let ops = batch.into_ops();
        let count = ops.len();
        let mut entries = self.entries.write();
        let now = Utc::now();
        for op in ops {
            match op {
                WriteOp::Set { key, value } => {
                    entries.insert(
                        key,
                        Entry {
                            value,
                            expires_at: None,
                        },
                    );
                }
                WriteOp::Expire { key, seconds } => {
                    if let Some(entry) = entries.get_mut(&key) {
                        if !entry.is_expired(now) {
                            entry.expires_at = Some(now + Duration::seconds(seconds as i64));
                        }
                    }
                }
            }
        }
        debug!("committed write batch (ops={})", count);
        Ok(())
    }
}
