//! Bounded in-memory response cache.
//!
//! Deliberately dumb: a FIFO keyed by request path, capped at a fixed number
//! of entries, with admission gated purely on body size. No TTL, no LRU
//! touch-on-read, no persistence. The cache exists so that the second
//! request for the same static asset doesn't hit the filesystem, nothing
//! more.
//!
//! Shared across every in-flight request; all access goes through one
//! `Mutex` so a lookup racing a put sees either the old entry or the new
//! one, never a torn write.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::response::Response;

/// Entries hold at most this many bytes of body. An asset of exactly this
/// size is not admitted.
pub const MAX_CACHEABLE_BYTES: usize = 10 * 1024 * 1024;

/// Default number of entries retained before FIFO eviction kicks in.
pub const DEFAULT_CAPACITY: usize = 20;

/// A snapshot of a response as stored in the cache.
///
/// Owned exclusively by the cache; [`ResponseCache::lookup`] hands out
/// copies, so callers may mutate headers on what they get back without
/// corrupting the stored entry.
#[derive(Clone, Debug)]
pub struct CachedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    /// Body length at insertion time; never recomputed.
    size_bytes: usize,
}

impl CachedResponse {
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Rehydrates an independent [`Response`] from this snapshot.
    pub fn to_response(&self) -> Response {
        Response {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CachedResponse>,
    /// Insertion order, oldest first. Keys here are always present in
    /// `entries` and vice versa.
    order: VecDeque<String>,
}

/// Bounded key → snapshot store with FIFO eviction and size-gated admission.
pub struct ResponseCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl ResponseCache {
    /// A cache with the default capacity of [`DEFAULT_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, inner: Mutex::new(Inner::default()) }
    }

    /// Returns an independent copy of the entry stored under `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<CachedResponse> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.get(key).cloned()
    }

    /// Stores a snapshot of `response` under `key`.
    ///
    /// Bodies of [`MAX_CACHEABLE_BYTES`] or more are silently not admitted.
    /// Re-inserting an existing key counts as a fresh insertion: the entry
    /// is replaced and its eviction order reset to newest.
    pub fn put(&self, key: &str, response: &Response) {
        let size_bytes = response.body().len();
        if size_bytes >= MAX_CACHEABLE_BYTES {
            return;
        }

        let snapshot = CachedResponse {
            status: response.status_code(),
            headers: response.headers().clone(),
            body: response.body().clone(),
            size_bytes,
        };

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.insert(key.to_owned(), snapshot).is_some() {
            // Replacement: drop the stale order slot so the key re-enters
            // the queue as newest.
            inner.order.retain(|k| k != key);
        }
        inner.order.push_back(key.to_owned());

        while inner.entries.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }

    /// Current number of stored entries.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
