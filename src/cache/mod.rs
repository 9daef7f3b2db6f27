//! Cache module for memoizing API responses in memory
//!
//! This module provides a time-bounded cache keyed by request URL. Entries
//! are raw response bodies stamped with their insertion time; a background
//! reaper removes entries once they are older than the configured interval.
//! Nothing is persisted across runs.

mod ttl;

pub use ttl::{Cache, CacheError};
