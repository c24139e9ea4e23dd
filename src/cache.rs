use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Response bodies memoized by url, each valid for `ttl` after insertion.
///
/// The cache is an ordinary value: whoever wants sharing wraps it in an `Arc`
/// and hands it to each scheduler explicitly.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, url: &str) -> Option<String> {
        self.get_at(url, Instant::now())
    }

    pub fn insert(&self, url: &str, body: String) {
        self.insert_at(url, body, Instant::now());
    }

    pub fn invalidate(&self, url: &str) -> bool {
        self.lock().remove(url).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get_at(&self, url: &str, now: Instant) -> Option<String> {
        let mut entries = self.lock();
        match entries.get(url) {
            Some(entry) if entry.expires_at > now => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(url);
                None
            }
            None => None,
        }
    }

    /// Expired entries for any url are dropped before the new body goes in.
    pub(crate) fn insert_at(&self, url: &str, body: String, now: Instant) {
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            url.to_string(),
            CacheEntry {
                body,
                expires_at: now + self.ttl,
            },
        );
    }

    // A panic while holding the lock cannot leave a half-written entry behind.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
