//! Generic expiring cache persisted as a single JSON document
//!
//! Each cache instance owns one JSON file shaped as a key-to-payload mapping
//! with a single freshness timestamp. Freshness is a property of the store as
//! a whole: any successful fetch rewrites the document and renews the
//! timestamp for every entry in it.

use std::collections::HashMap;
use std::fs;
use std::future::Future;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Reserved entry key used when the cached unit is a whole collection
/// rather than an individual item.
const COLLECTION_KEY: &str = "__collection__";

/// The persisted cache document
#[derive(Debug, Serialize, Deserialize)]
struct CacheStore<V> {
    /// When the store was last rewritten by a successful fetch
    updated_at: DateTime<Utc>,
    /// Cached payloads by key
    entries: HashMap<String, V>,
}

/// A file-backed cache that fetches on miss and serves stale data on fetch
/// failure
///
/// The store file lives inside a caller-supplied directory (created on first
/// write, including parents). A missing, unreadable, or malformed store file
/// is treated as an empty cache, never as an error.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    /// Location of the persisted JSON document
    store_path: PathBuf,
    /// Maximum age at which entries are still considered fresh
    ttl: Duration,
    _payload: PhantomData<fn() -> V>,
}

impl<V> ExpiringCache<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    /// Creates a cache backed by `<dir>/<file_name>` with the given TTL
    ///
    /// # Arguments
    /// * `dir` - Directory that holds the store file (e.g., the cache dir)
    /// * `file_name` - Store file name, including extension (e.g., "licenses.json")
    /// * `ttl_seconds` - How long cached entries are considered fresh
    pub fn new(dir: &Path, file_name: &str, ttl_seconds: u64) -> Self {
        Self {
            store_path: dir.join(file_name),
            ttl: Duration::seconds(ttl_seconds as i64),
            _payload: PhantomData,
        }
    }

    /// Returns the cached payload for `key`, fetching when missing or expired
    ///
    /// Resolution order:
    /// 1. A fresh cached entry is returned without invoking `fetch`.
    /// 2. Otherwise `fetch` is called; on success the payload is merged into
    ///    the store (other keys preserved), persisted, and returned.
    /// 3. If `fetch` fails and a stale entry exists for `key`, the stale
    ///    payload is returned instead of the error.
    /// 4. If `fetch` fails and there is no cached entry, the fetch error is
    ///    returned to the caller.
    pub async fn get<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let store = self.load();

        if let Some(ref store) = store {
            if self.is_fresh(store) {
                if let Some(payload) = store.entries.get(key) {
                    return Ok(payload.clone());
                }
            }
        }

        match fetch().await {
            Ok(payload) => {
                let mut entries = store.map(|s| s.entries).unwrap_or_default();
                entries.insert(key.to_string(), payload.clone());
                let updated = CacheStore {
                    updated_at: Utc::now(),
                    entries,
                };
                if let Err(e) = self.persist(&updated) {
                    tracing::warn!(path = %self.store_path.display(), error = %e, "failed to persist cache store");
                }
                Ok(payload)
            }
            Err(e) => {
                // Stale fallback: an expired entry beats no answer at all
                if let Some(payload) = store.and_then(|mut s| s.entries.remove(key)) {
                    tracing::debug!(key, "fetch failed, returning stale cache entry");
                    return Ok(payload);
                }
                Err(e)
            }
        }
    }

    /// Like [`get`](Self::get), but keyed by the whole collection
    ///
    /// Used for caches whose unit of freshness is an entire bulk listing
    /// rather than an individual item.
    pub async fn get_all<F, Fut, E>(&self, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.get(COLLECTION_KEY, fetch).await
    }

    /// Reads the persisted store, treating missing or malformed files as empty
    fn load(&self) -> Option<CacheStore<V>> {
        let content = fs::read_to_string(&self.store_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::debug!(path = %self.store_path.display(), error = %e, "discarding malformed cache store");
                None
            }
        }
    }

    /// Whether the store's last update is within the TTL
    fn is_fresh(&self, store: &CacheStore<V>) -> bool {
        Utc::now().signed_duration_since(store.updated_at) <= self.ttl
    }

    /// Writes the store atomically via a temp file in the same directory
    fn persist(&self, store: &CacheStore<V>) -> std::io::Result<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(store)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let tmp_path = self.store_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.store_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        body: String,
    }

    #[derive(Debug, PartialEq)]
    struct FetchFailed;

    fn payload(name: &str) -> Payload {
        Payload {
            name: name.to_string(),
            body: format!("{} body", name),
        }
    }

    fn create_test_cache(ttl_seconds: u64) -> (ExpiringCache<Payload>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = ExpiringCache::new(temp_dir.path(), "store.json", ttl_seconds);
        (cache, temp_dir)
    }

    /// Writes a store file whose timestamp lies `age_seconds` in the past
    fn write_store_with_age(dir: &Path, entries: &[(&str, Payload)], age_seconds: i64) {
        let entries: HashMap<String, Payload> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let store = CacheStore {
            updated_at: Utc::now() - Duration::seconds(age_seconds),
            entries,
        };
        let json = serde_json::to_string(&store).expect("Should serialize store");
        fs::write(dir.join("store.json"), json).expect("Should write store file");
    }

    #[tokio::test]
    async fn test_cold_start_fetches_once_and_creates_store() {
        let (cache, temp_dir) = create_test_cache(86400);
        let calls = AtomicUsize::new(0);

        let result = cache
            .get("mit", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, FetchFailed>(payload("mit"))
            })
            .await;

        assert_eq!(result, Ok(payload("mit")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let store_path = temp_dir.path().join("store.json");
        assert!(store_path.exists(), "Store file should be created");
        let content = fs::read_to_string(store_path).expect("Should read store");
        assert!(content.contains("\"mit\""));
        assert!(content.contains("updated_at"));
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_fetch() {
        let (cache, _temp_dir) = create_test_cache(86400);

        cache
            .get("mit", || async { Ok::<_, FetchFailed>(payload("mit")) })
            .await
            .expect("First get should succeed");

        let calls = AtomicUsize::new(0);
        let result = cache
            .get("mit", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, FetchFailed>(payload("other"))
            })
            .await;

        assert_eq!(result, Ok(payload("mit")), "Should return cached payload");
        assert_eq!(calls.load(Ordering::SeqCst), 0, "Fetch should not be invoked");
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_refetch() {
        let (cache, temp_dir) = create_test_cache(86400);
        write_store_with_age(temp_dir.path(), &[("mit", payload("old"))], 2 * 86400);

        let result = cache
            .get("mit", || async { Ok::<_, FetchFailed>(payload("fresh")) })
            .await;

        assert_eq!(result, Ok(payload("fresh")), "Expired entry should be refetched");

        // The refreshed payload is now served without fetching
        let result = cache
            .get("mit", || async { Err::<Payload, _>(FetchFailed) })
            .await;
        assert_eq!(result, Ok(payload("fresh")));
    }

    #[tokio::test]
    async fn test_stale_fallback_when_fetch_fails() {
        // 400-day-old entry with a 365-day TTL
        let (cache, temp_dir) = create_test_cache(365 * 86400);
        write_store_with_age(temp_dir.path(), &[("mit", payload("stale"))], 400 * 86400);

        let result = cache
            .get("mit", || async { Err::<Payload, _>(FetchFailed) })
            .await;

        assert_eq!(
            result,
            Ok(payload("stale")),
            "Fetch failure should fall back to the stale entry"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_without_fallback_propagates() {
        let (cache, _temp_dir) = create_test_cache(86400);

        let result = cache
            .get("mit", || async { Err::<Payload, _>(FetchFailed) })
            .await;

        assert_eq!(result, Err(FetchFailed));
    }

    #[tokio::test]
    async fn test_corrupt_store_behaves_like_cold_start() {
        let (cache, temp_dir) = create_test_cache(86400);
        fs::write(temp_dir.path().join("store.json"), "{ not valid json")
            .expect("Should write corrupt file");

        let calls = AtomicUsize::new(0);
        let result = cache
            .get("mit", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, FetchFailed>(payload("mit"))
            })
            .await;

        assert_eq!(result, Ok(payload("mit")));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "Corrupt store should trigger fetch");
    }

    #[tokio::test]
    async fn test_wrong_shape_store_behaves_like_cold_start() {
        let (cache, temp_dir) = create_test_cache(86400);
        // Valid JSON, wrong shape
        fs::write(temp_dir.path().join("store.json"), r#"["mit", "apache-2.0"]"#)
            .expect("Should write wrong-shape file");

        let result = cache
            .get("mit", || async { Ok::<_, FetchFailed>(payload("mit")) })
            .await;

        assert_eq!(result, Ok(payload("mit")));
    }

    #[tokio::test]
    async fn test_partial_overwrite_preserves_other_entries() {
        let (cache, _temp_dir) = create_test_cache(86400);

        cache
            .get("mit", || async { Ok::<_, FetchFailed>(payload("mit")) })
            .await
            .expect("Should cache mit");
        cache
            .get("apache-2.0", || async { Ok::<_, FetchFailed>(payload("apache")) })
            .await
            .expect("Should cache apache-2.0");

        // mit must survive the apache write, served without fetching
        let result = cache
            .get("mit", || async { Err::<Payload, _>(FetchFailed) })
            .await;
        assert_eq!(result, Ok(payload("mit")));
    }

    #[tokio::test]
    async fn test_collection_cache_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache: ExpiringCache<Vec<String>> =
            ExpiringCache::new(temp_dir.path(), "list.json", 86400);

        let list = vec!["mit".to_string(), "apache-2.0".to_string()];
        let fetched = list.clone();
        let result = cache
            .get_all(|| async { Ok::<_, FetchFailed>(fetched) })
            .await;
        assert_eq!(result, Ok(list.clone()));

        // Second read comes from the store
        let result = cache
            .get_all(|| async { Err::<Vec<String>, _>(FetchFailed) })
            .await;
        assert_eq!(result, Ok(list));
    }

    #[tokio::test]
    async fn test_store_directory_created_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let cache: ExpiringCache<Payload> = ExpiringCache::new(&nested, "store.json", 86400);

        cache
            .get("mit", || async { Ok::<_, FetchFailed>(payload("mit")) })
            .await
            .expect("Should cache into nested directory");

        assert!(nested.join("store.json").exists());
    }
}
