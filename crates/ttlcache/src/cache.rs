//! # Cache Core
//!
//! One `HashMap` holds the entries. Two ordered indexes sit beside it:
//!
//! - `recency`: access tick to key. The first entry is the least recently used.
//! - `by_insertion`: `(inserted_at, tick)` to key. The first entry expires next.
//!
//! Every entry appears exactly once in each index. Replacing a key removes all
//! three records and inserts fresh ones; entries are never edited in place.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;

use crate::CacheConfig;
use crate::Error;
use crate::Result;

struct Entry<V> {
    value: V,
    expires_at: Instant,
    inserted: (Instant, u64),
    tick: u64,
}

struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    recency: BTreeMap<u64, K>,
    by_insertion: BTreeMap<(Instant, u64), K>,
    next_tick: u64,
    capacity: usize,
    ttl: Duration,
    closed: bool,
}

impl<K: Eq + Hash + Clone, V> Inner<K, V> {
    fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            by_insertion: BTreeMap::new(),
            next_tick: 0,
            capacity: config.capacity,
            ttl: config.ttl,
            closed: false,
        }
    }

    fn tick(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn insert(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        let previous = self.take(&key);

        let tick = self.tick();
        let inserted = (now, tick);
        self.recency.insert(tick, key.clone());
        self.by_insertion.insert(inserted, key.clone());
        self.entries.insert(key, Entry {
            value,
            expires_at: now + self.ttl,
            inserted,
            tick,
        });

        while self.entries.len() > self.capacity {
            let Some((_, lru)) = self.recency.first_key_value() else {
                break;
            };
            let lru = lru.clone();
            self.take(&lru);
            tracing::trace!("evicted least recently used entry");
        }

        previous
    }

    /// Looks up a live entry and marks it most recently used.
    fn touch(&mut self, key: &K, now: Instant) -> Option<&mut Entry<V>> {
        let live = self.entries.get(key).is_some_and(|e| e.expires_at > now);
        if !live {
            return None;
        }

        let tick = self.tick();
        let entry = self.entries.get_mut(key)?;
        self.recency.remove(&entry.tick);
        self.recency.insert(tick, key.clone());
        entry.tick = tick;
        Some(entry)
    }

    /// Removes an entry and its index records.
    fn take(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.tick);
        self.by_insertion.remove(&entry.inserted);
        Some(entry.value)
    }

    /// Removes expired entries oldest first, stopping at the first live one.
    fn sweep(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some((_, key)) = self.by_insertion.first_key_value() {
            let expired = self.entries.get(key).is_none_or(|e| e.expires_at <= now);
            if !expired {
                break;
            }
            let key = key.clone();
            self.take(&key);
            removed += 1;
        }
        removed
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.by_insertion.clear();
        self.closed = true;
    }
}

/// A concurrent LRU map with per-cache TTL and a background sweep task.
///
/// The sweep runs on the tokio runtime that was current at construction and
/// stops when the cache is cleared or dropped.
pub struct TtlCache<K, V> {
    inner: Arc<Mutex<Inner<K, V>>>,
    shutdown: watch::Sender<bool>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Creates a cache and spawns its sweep task.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` for a zero capacity or sweep interval.
    /// - `Error::NoRuntime` when called outside a tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let inner = Arc::new(Mutex::new(Inner::new(&config)));
        let (shutdown, shutdown_rx) = watch::channel(false);
        spawn_sweeper(&handle, Arc::downgrade(&inner), config.sweep_interval, shutdown_rx);

        tracing::debug!(
            capacity = config.capacity,
            ttl_ms = config.ttl.as_millis() as u64,
            "cache created"
        );
        Ok(Self { inner, shutdown })
    }

    /// Inserts or replaces `key`, returning the replaced value.
    ///
    /// The least recently used entry is evicted if the cache is over capacity.
    ///
    /// # Errors
    /// Returns `Error::Closed` after [`TtlCache::clear`].
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return Err(Error::Closed);
        }
        Ok(inner.insert(key, value, Instant::now()))
    }

    /// Returns a copy of a live value and promotes it to most recently used.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut inner = lock(&self.inner);
        inner.touch(key, Instant::now()).map(|e| e.value.clone())
    }

    /// Runs `f` on a live value in place and promotes it.
    pub fn with_value<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        let mut inner = lock(&self.inner);
        inner.touch(key, Instant::now()).map(|e| f(&mut e.value))
    }

    /// Removes `key` and returns its value if it had not yet expired.
    pub fn remove(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut inner = lock(&self.inner);
        let live = inner.entries.get(key).is_some_and(|e| e.expires_at > now);
        let value = inner.take(key);
        if live { value } else { None }
    }

    /// True if `key` is present and live. Does not change recency.
    pub fn contains_key(&self, key: &K) -> bool {
        let now = Instant::now();
        lock(&self.inner).entries.get(key).is_some_and(|e| e.expires_at > now)
    }

    /// Number of stored entries, including expired ones the sweep has not reached.
    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        lock(&self.inner).capacity
    }

    pub fn ttl(&self) -> Duration {
        lock(&self.inner).ttl
    }

    /// Runs one sweep immediately. Returns the number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        lock(&self.inner).sweep(Instant::now())
    }

    /// Drops every entry and stops the sweep task. The cache is unusable afterwards.
    pub fn clear(&self) {
        lock(&self.inner).clear();
        let _ = self.shutdown.send(true);
        tracing::debug!("cache cleared");
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }
}

impl<K, V> Drop for TtlCache<K, V> {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_sweeper<K, V>(
    handle: &Handle,
    inner: Weak<Mutex<Inner<K, V>>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    handle.spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else {
                        break;
                    };
                    let removed = lock(&inner).sweep(Instant::now());
                    if removed > 0 {
                        tracing::debug!(removed, "swept expired entries");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::trace!("sweep task stopped");
    });
}
