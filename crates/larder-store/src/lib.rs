//! Key-value store contract for larder record persistence.

pub mod error;
pub mod kv;
pub mod memory;

/// Store error type.
pub use error::StoreError;
/// Store contract, write batch, and TTL report constants.
pub use kv::{KvStore, TTL_MISSING, TTL_NO_EXPIRY, WriteBatch, WriteOp};
/// In-memory store with expiration support.
pub use memory::MemoryStore;
