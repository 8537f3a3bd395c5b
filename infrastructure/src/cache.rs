//! Response cache
//!
//! Bounded map keyed on (provider id, truncated prompt prefix). Entries
//! expire after a fixed TTL, evicted lazily on lookup; when an insert
//! would exceed capacity, the oldest-inserted entry goes first (insertion
//! order, not last access). The cache is an explicit injectable object so
//! tests never share state through process globals.

use roundtable_domain::ProviderId;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default capacity before insertion-order eviction kicks in.
pub const CACHE_CAPACITY: usize = 100;
/// Default entry lifetime.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);
/// Prompt prefix length used in keys; prompts identical this far share.
const KEY_PREFIX_LEN: usize = 100;

/// Cache key: provider plus the leading slice of the prompt
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    provider: ProviderId,
    prompt_prefix: String,
}

impl CacheKey {
    pub fn new(provider: ProviderId, prompt: &str) -> Self {
        Self {
            provider,
            prompt_prefix: prompt.chars().take(KEY_PREFIX_LEN).collect(),
        }
    }
}

struct Entry {
    content: String,
    inserted_at: Instant,
}

struct Inner {
    entries: HashMap<CacheKey, Entry>,
    /// Keys in insertion order; front is oldest
    order: VecDeque<CacheKey>,
}

/// Bounded, TTL'd response cache shared by all fallback chains
pub struct ResponseCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_limits(CACHE_CAPACITY, CACHE_TTL)
    }

    /// Custom limits, for tests and tuning.
    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            ttl,
        }
    }

    /// Look up a cached response. An entry past its TTL is treated as
    /// absent and removed.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }

        inner.entries.get(key).map(|entry| entry.content.clone())
    }

    /// Insert or replace a response. At capacity, the oldest-inserted
    /// entry is evicted first.
    pub fn insert(&self, key: CacheKey, content: String) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        if inner.entries.contains_key(&key) {
            // Replacement keeps the original insertion position.
            inner.entries.insert(
                key,
                Entry {
                    content,
                    inserted_at: Instant::now(),
                },
            );
            return;
        }

        while inner.entries.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            Entry {
                content,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.clear();
        inner.order.clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
