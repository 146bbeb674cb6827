//! Test helpers shared across larder crates.

pub mod factory;
pub mod record;
pub mod store;

pub use record::{DummyRecord, FakeRecordStore, fake_meta};
pub use store::{FailingStore, RecordingStore, StoreCall};
