use async_trait::async_trait;
use larder_store::{KvStore, MemoryStore, StoreError, WriteBatch, WriteOp};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Exists { key: String },
    Get { key: String },
    Delete { key: String },
    Keys { pattern: String },
    Expire { key: String, seconds: u64 },
    Ttl { key: String },
    Commit { ops: Vec<WriteOp> },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl KvStore for RecordingStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.record(StoreCall::Exists {
            key: key.to_string(),
        });
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.record(StoreCall::Get {
            key: key.to_string(),
        });
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        self.record(StoreCall::Delete {
            key: key.to_string(),
        });
        self.inner.delete(key).await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        self.record(StoreCall::Keys {
            pattern: pattern.to_string(),
        });
        self.inner.keys(pattern).await
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError> {
        self.record(StoreCall::Expire {
            key: key.to_string(),
            seconds,
        });
        self.inner.expire(key, seconds).await
    }

    async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        self.record(StoreCall::Ttl {
            key: key.to_string(),
        });
        self.inner.ttl(key).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.record(StoreCall::Commit {
            ops: batch.ops().to_vec(),
        });
        self.inner.commit(batch).await
    }
}

#[derive(Debug, Clone)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn unavailable(&self) -> StoreError {
        StoreError::Unavailable(self.message.clone())
    }
}

#[async_trait]
impl KvStore for FailingStore {
    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        Err(self.unavailable())
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(self.unavailable())
    }

    async fn delete(&self, _key: &str) -> Result<u64, StoreError> {
        Err(self.unavailable())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, StoreError> {
        Err(self.unavailable())
    }

    async fn expire(&self, _key: &str, _seconds: u64) -> Result<bool, StoreError> {
        Err(self.unavailable())
    }

    async fn ttl(&self, _key: &str) -> Result<i64, StoreError> {
        Err(self.unavailable())
    }

    async fn commit(&self, _batch: WriteBatch) -> Result<(), StoreError> {
        Err(self.unavailable())
    }
}
