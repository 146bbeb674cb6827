use crate::factory;
use async_trait::async_trait;
use larder_record::{
    FieldMap, MetaFields, RecordError, RecordKind, RecordMeta, RecordStore, TimeInput,
    ValidationErrors,
};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn fake_meta(mut fields: MetaFields) -> Result<RecordMeta, RecordError> {
    if fields.identifier.is_unset() {
        fields.identifier = factory::uuid().into();
    }
    if fields.created_at.is_unset() {
        fields.created_at = TimeInput::At(factory::timestamp()).into();
    }
    if fields.updated_at.is_unset() {
        fields.updated_at = TimeInput::At(factory::timestamp()).into();
    }
    RecordMeta::from_fields(fields)
}

#[derive(Debug)]
pub struct FakeRecordStore<K> {
    save_called: AtomicBool,
    destroy_called: AtomicBool,
    _kind: PhantomData<K>,
}

impl<K> FakeRecordStore<K> {
    pub fn new() -> Self {
        Self {
            save_called: AtomicBool::new(false),
            destroy_called: AtomicBool::new(false),
            _kind: PhantomData,
        }
    }

    pub fn save_called(&self) -> bool {
        self.save_called.load(Ordering::SeqCst)
    }

    pub fn destroy_called(&self) -> bool {
        self.destroy_called.load(Ordering::SeqCst)
    }
}

impl<K> Default for FakeRecordStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K: RecordKind> RecordStore<K> for FakeRecordStore<K> {
    async fn save(&self, record: &mut K) -> Result<(), RecordError> {
        if !record.is_valid() {
            return Err(RecordError::Invalid(
                record.meta().validation_errors().clone(),
            ));
        }
        record.meta_mut().prepare_save(factory::timestamp());
        self.save_called.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn destroy(&self, record: &K) -> Result<(), RecordError> {
        if record.meta().identifier().is_some() {
            self.destroy_called.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DummyRecord {
    pub meta: RecordMeta,
    pub label: String,
}

impl DummyRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            meta: RecordMeta::new(),
            label: label.into(),
        }
    }
}

impl RecordKind for DummyRecord {
    const KEY_NAMESPACE: &'static str = "dummies";
    const TTL_SECS: Option<u64> = None;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("label".to_string(), Value::from(self.label.clone()));
        fields
    }

    fn from_fields(meta: RecordMeta, fields: FieldMap) -> Result<Self, RecordError> {
        let label = fields
            .get("label")
            .and_then(Value::as_str)
            .ok_or_else(|| RecordError::Field {
                field: "label".to_string(),
                message: "expected a string".to_string(),
            })?
            .to_string();
        Ok(Self { meta, label })
    }

    fn validate(&self, errors: &mut ValidationErrors) {
        if self.label.is_empty() {
            errors.add("label", "can't be empty");
        }
    }
}
