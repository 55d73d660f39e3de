//! # Caching Module
//!
//! Time-bounded caching of upstream responses. The cache is a pure TTL cache:
//! entries expire a fixed duration after insertion and expiry is observed
//! lazily at read time. There is no LRU or size bound.
//!
//! Key derivation lives in [`keys`]; the store itself has no knowledge of
//! domain semantics.

pub mod keys;
pub mod store;

pub use store::{CacheStats, ResponseCache};
