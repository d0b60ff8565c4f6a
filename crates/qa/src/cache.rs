//! Response cache with fingerprint keys and TTL expiry.
//!
//! The cache sits in front of the whole pipeline: a hit returns the stored
//! response without touching any backend. Keys are deterministic
//! fingerprints of the normalized query plus parameters, namespaced by a
//! configurable prefix so unrelated deployments can share a store.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::types::QAResponse;

/// Length of the hex digest kept in the key.
const DIGEST_CHARS: usize = 32;

/// Compute the cache key for a query and its parameters.
///
/// The query is normalized (lowercase + trim) and the parameters are
/// serialized in stable key order before hashing, so logically identical
/// requests always land on the same key.
pub fn fingerprint(prefix: &str, query: &str, top_k: usize) -> String {
    // BTreeMap serializes in key order
    let mut params = std::collections::BTreeMap::new();
    params.insert("query", serde_json::json!(query.trim().to_lowercase()));
    params.insert("top_k", serde_json::json!(top_k));

    let payload = serde_json::to_string(&params).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    let digest = hasher.finalize();

    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}:{}", prefix, &hex[..DIGEST_CHARS])
}

/// Key-value store for computed responses.
pub trait ResponseCache: Send + Sync {
    /// Look up a response; absent or expired entries return `None`.
    fn get(&self, key: &str) -> Option<QAResponse>;

    /// Store a response with a time-to-live.
    fn set(&self, key: &str, value: QAResponse, ttl: Duration);

    /// Remove one entry.
    fn delete(&self, key: &str);

    /// Check whether a live entry exists.
    fn exists(&self, key: &str) -> bool;

    /// Remove all entries.
    fn clear(&self);
}

struct Entry {
    value: QAResponse,
    expires_at: Instant,
}

/// In-process cache implementation.
///
/// The store itself is the authority for per-key atomicity; callers do no
/// locking of their own.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<QAResponse> {
        let mut entries = self.entries.lock().ok()?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: QAResponse, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            let now = Instant::now();
            entries.retain(|_, entry| entry.expires_at > now);
            entries.insert(
                key.to_string(),
                Entry {
                    value,
                    expires_at: now + ttl,
                },
            );
        }
    }

    fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}
