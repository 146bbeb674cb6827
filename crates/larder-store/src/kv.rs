//! Store contract shared by record persistence and its test doubles.

use crate::error::StoreError;
use async_trait::async_trait;

/// TTL report for a live key that carries no expiration.
pub const TTL_NO_EXPIRY: i64 = -1;
/// TTL report for a key that does not exist.
pub const TTL_MISSING: i64 = -2;

/// A single buffered write operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Replace the value at a key, clearing any existing expiration.
    Set { key: String, value: Vec<u8> },
    /// Arm or refresh a key's expiration.
    Expire { key: String, seconds: u64 },
}

/// Ordered write operations applied as one atomic unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a value replacement.
    pub fn set(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value,
        });
    }

    /// Queue an expiration.
    pub fn expire(&mut self, key: impl Into<String>, seconds: u64) {
        self.ops.push(WriteOp::Expire {
            key: key.into(),
            seconds,
        });
    }

    /// Queued operations in application order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consume the batch, yielding its operations.
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    /// Whether the batch holds no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

#[async_trait]
/// Key-value store abstraction used by record persistence.
pub trait KvStore: Send + Sync {
    /// Whether a live value exists at the key.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Fetch the value at a key, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove a key, returning how many keys were removed.
    async fn delete(&self, key: &str) -> Result<u64, StoreError>;

    /// Live keys matching a glob pattern, e.g. `"orders:*"`.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    /// Arm or refresh a key's expiration; `false` when the key is absent.
    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError>;

    /// Remaining seconds before a key expires.
    ///
    /// Reports [`TTL_NO_EXPIRY`] for a live key without an expiration and
    /// [`TTL_MISSING`] for an absent key.
    async fn ttl(&self, key: &str) -> Result<i64, StoreError>;

    /// Apply every operation in the batch as one atomic unit.
    ///
    /// No concurrent reader or writer may observe a partially applied
    /// batch on the keys it touches.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
