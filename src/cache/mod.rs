//! Expiring file-backed cache with fetch-on-miss and stale fallback
//!
//! This module provides a generic cache that persists fetched payloads to a
//! single JSON file with a freshness timestamp. Lookups return the cached
//! payload while it is within its TTL, invoke a caller-supplied fetch function
//! when it is missing or expired, and fall back to the stale copy when the
//! fetch fails, allowing the application to keep working with old data when
//! the API is unavailable.

mod store;

pub use store::ExpiringCache;
