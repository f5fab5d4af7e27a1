//! Cache module for storing PLA quarter payloads to disk
//!
//! This module provides a cache store that keeps one JSON file per site and
//! calendar quarter. Payloads are validated before they are written, so the
//! cache never holds data that fails the table schema.

mod key;
mod store;

pub use key::CacheKey;
pub use store::CacheStore;
