//! Persistence front end binding record kinds to a key-value store.

use crate::error::RecordError;
use crate::given::TimeInput;
use crate::kind::{FIELD_CREATED_AT, FIELD_IDENTIFIER, FIELD_UPDATED_AT, FieldMap, RecordKind};
use crate::meta::{MetaFields, RecordMeta, parse_time};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use larder_store::{KvStore, WriteBatch};
use log::{debug, info};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

#[async_trait]
/// Save and destroy seam shared by the store-backed core and its fake.
pub trait RecordStore<K: RecordKind>: Send + Sync {
    /// Validate and persist a record, assigning save-time identity.
    async fn save(&self, record: &mut K) -> Result<(), RecordError>;

    /// Remove a record's key; a quiet no-op for records never saved.
    async fn destroy(&self, record: &K) -> Result<(), RecordError>;
}

/// Record persistence over a [`KvStore`].
///
/// Holds no state beyond the store handle; every operation is one or two
/// store calls, and writes go through a single atomic batch.
pub struct KvRecordStore<K> {
    store: Arc<dyn KvStore>,
    _kind: PhantomData<K>,
}

impl<K> Clone for KvRecordStore<K> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: RecordKind> KvRecordStore<K> {
    /// Create a persistence handle over the given store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        info!("initialized record store (namespace={})", K::KEY_NAMESPACE);
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// Remaining TTL in seconds for a record's key.
    ///
    /// Reports the store's Redis-style sentinels and is meaningful only for
    /// saved records; an unsaved record derives a key with the empty
    /// identifier and reports [`larder_store::TTL_MISSING`].
    pub async fn ttl(&self, record: &K) -> Result<i64, RecordError> {
        let identifier = record.meta().identifier().unwrap_or_default();
        Ok(self.store.ttl(&K::derive_key(identifier)).await?)
    }

    /// Load the record stored under an identifier.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<K, RecordError> {
        self.find_by_key(&K::derive_key(identifier)).await
    }

    /// Load the record stored under a full key.
    pub async fn find_by_key(&self, key: &str) -> Result<K, RecordError> {
        if !self.store.exists(key).await? {
            debug!("record not found (key={})", key);
            return Err(RecordError::NotFound {
                key: key.to_string(),
            });
        }
        // The key can expire between the existence check and the fetch.
        let Some(blob) = self.store.get(key).await? else {
            return Err(RecordError::NotFound {
                key: key.to_string(),
            });
        };
        decode_record(&blob)
    }

    /// Diagnostic scan view over this kind's namespace.
    pub fn diagnostics(&self) -> Diagnostics<'_, K> {
        Diagnostics { inner: self }
    }
}

#[async_trait]
impl<K: RecordKind> RecordStore<K> for KvRecordStore<K> {
    /// Persist a record as one atomic set-and-expire batch.
    ///
    /// An invalid record returns [`RecordError::Invalid`] with the full
    /// message map before any store call. A stored key always carries the
    /// kind's expiration policy: the batch re-arms the TTL on every save.
    async fn save(&self, record: &mut K) -> Result<(), RecordError> {
        if !record.is_valid() {
            return Err(RecordError::Invalid(
                record.meta().validation_errors().clone(),
            ));
        }
        let identifier = record.meta_mut().prepare_save(Utc::now());
        let key = K::derive_key(&identifier);
        let blob = serde_json::to_vec(&record.to_document())?;

        let mut batch = WriteBatch::new();
        batch.set(&key, blob);
        if let Some(seconds) = K::TTL_SECS {
            batch.expire(&key, seconds);
        }
        self.store.commit(batch).await?;
        debug!("saved record (key={}, ttl_secs={:?})", key, K::TTL_SECS);
        Ok(())
    }

    /// Remove a record's key; success does not require prior existence.
    async fn destroy(&self, record: &K) -> Result<(), RecordError> {
        let Some(identifier) = record.meta().identifier() else {
            return Ok(());
        };
        let key = K::derive_key(identifier);
        let removed = self.store.delete(&key).await?;
        debug!("destroyed record (key={}, removed={})", key, removed);
        Ok(())
    }
}

/// Diagnostic scans over a kind's whole namespace.
///
/// Both scans walk every key in the namespace and resolve records one
/// fetch at a time. Intended for low-volume debugging, not for production
/// call paths.
pub struct Diagnostics<'a, K> {
    inner: &'a KvRecordStore<K>,
}

impl<K: RecordKind> Diagnostics<'_, K> {
    /// Every live key in the kind's namespace.
    pub async fn find_all_keys(&self) -> Result<Vec<String>, RecordError> {
        let pattern = format!("{}:*", K::KEY_NAMESPACE);
        Ok(self.inner.store.keys(&pattern).await?)
    }

    /// Every live record in the kind's namespace.
    pub async fn find_all(&self) -> Result<Vec<K>, RecordError> {
        let keys = self.find_all_keys().await?;
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            match self.inner.find_by_key(&key).await {
                Ok(record) => records.push(record),
                // Keys can expire between the scan and the fetch.
                Err(RecordError::NotFound { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(records)
    }
}

/// Rebuild a record from a stored blob, splitting identity from payload.
fn decode_record<K: RecordKind>(blob: &[u8]) -> Result<K, RecordError> {
    let mut fields: FieldMap = serde_json::from_slice(blob)?;
    let identifier = take_string(&mut fields, FIELD_IDENTIFIER)?;
    let created_at = take_time(&mut fields, FIELD_CREATED_AT)?;
    let updated_at = take_time(&mut fields, FIELD_UPDATED_AT)?;
    let meta = RecordMeta::from_fields(MetaFields {
        identifier: identifier.into(),
        created_at: created_at.map(TimeInput::At).into(),
        updated_at: updated_at.map(TimeInput::At).into(),
    })?;
    K::from_fields(meta, fields)
}

fn take_string(fields: &mut FieldMap, field: &str) -> Result<Option<String>, RecordError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(RecordError::Field {
            field: field.to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}

fn take_time(fields: &mut FieldMap, field: &str) -> Result<Option<DateTime<Utc>>, RecordError> {
    Ok(match take_string(fields, field)? {
        Some(value) => Some(parse_time(&value)?),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{KvRecordStore, RecordStore};
    use crate::error::RecordError;
    use crate::kind::{FieldMap, RecordKind};
    use crate::meta::RecordMeta;
    use crate::validation::ValidationErrors;
    use larder_store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Task {
        meta: RecordMeta,
        title: String,
    }

    impl Task {
        fn new(title: &str) -> Self {
            Self {
                meta: RecordMeta::new(),
                title: title.to_string(),
            }
        }
    }

    impl RecordKind for Task {
        const KEY_NAMESPACE: &'static str = "tasks";
        const TTL_SECS: Option<u64> = Some(90);

        fn meta(&self) -> &RecordMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut RecordMeta {
            &mut self.meta
        }

        fn to_fields(&self) -> FieldMap {
            let mut fields = FieldMap::new();
            fields.insert("title".to_string(), Value::from(self.title.clone()));
            fields
        }

        fn from_fields(meta: RecordMeta, fields: FieldMap) -> Result<Self, RecordError> {
            let title = fields
                .get("title")
                .and_then(Value::as_str)
                .ok_or_else(|| RecordError::Field {
                    field: "title".to_string(),
                    message: "expected a string".to_string(),
                })?
                .to_string();
            Ok(Self { meta, title })
        }

        fn validate(&self, errors: &mut ValidationErrors) {
            if self.title.is_empty() {
                errors.add("title", "can't be empty");
            }
        }
    }

    fn task_store() -> KvRecordStore<Task> {
        KvRecordStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn save_then_find_round_trips_the_record() {
        let records = task_store();
        let mut task = Task::new("write tests");
        records.save(&mut task).await.expect("save");

        let identifier = task.meta().identifier().expect("identifier").to_string();
        let found = records.find_by_identifier(&identifier).await.expect("find");
        assert_eq!(found.title, "write tests");
        assert!(found.record_eq(&task));
        assert_eq!(found.to_document(), task.to_document());
    }

    #[tokio::test]
    async fn save_arms_the_kind_expiration() {
        let records = task_store();
        let mut task = Task::new("expiring");
        records.save(&mut task).await.expect("save");

        assert_eq!(records.ttl(&task).await.expect("ttl"), 90);
    }

    #[tokio::test]
    async fn ttl_of_an_unsaved_record_reports_missing() {
        let records = task_store();
        let task = Task::new("unsaved");
        assert_eq!(
            records.ttl(&task).await.expect("ttl"),
            larder_store::TTL_MISSING
        );
    }

    #[tokio::test]
    async fn find_on_a_missing_key_reports_not_found() {
        let records = task_store();
        let err = records
            .find_by_identifier("nope")
            .await
            .expect_err("missing");
        match err {
            RecordError::NotFound { key } => assert_eq!(key, "tasks:nope"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn destroy_without_identifier_is_a_quiet_noop() {
        let records = task_store();
        let task = Task::new("never saved");
        records.destroy(&task).await.expect("destroy");
    }

    #[tokio::test]
    async fn destroy_then_find_reports_not_found() {
        let records = task_store();
        let mut task = Task::new("done soon");
        records.save(&mut task).await.expect("save");
        records.destroy(&task).await.expect("destroy");

        let identifier = task.meta().identifier().expect("identifier");
        let err = records
            .find_by_identifier(identifier)
            .await
            .expect_err("destroyed");
        assert!(matches!(err, RecordError::NotFound { .. }));

        // Destroying again stays successful.
        records.destroy(&task).await.expect("destroy again");
    }

    #[tokio::test]
    async fn diagnostics_scan_the_namespace() {
        let records = task_store();
        let mut first = Task::new("one");
        let mut second = Task::new("two");
        records.save(&mut first).await.expect("save one");
        records.save(&mut second).await.expect("save two");

        let keys = records.diagnostics().find_all_keys().await.expect("keys");
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|key| key.starts_with("tasks:")));

        let mut titles: Vec<String> = records
            .diagnostics()
            .find_all()
            .await
            .expect("records")
            .into_iter()
            .map(|task| task.title)
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["one".to_string(), "two".to_string()]);
    }
}
