//! Pool of reusable `HashMap` scratch buffers

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::metrics::PoolMetrics;
use crate::pool::ObjectPool;
use crate::recycle::Recycler;
use crate::shared::shared;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;
use std::cell::Cell;
use std::rc::Rc;

/// Empties a `HashMap` and releases its allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearMap;

impl<K: Eq + Hash, V> Recycler<HashMap<K, V>> for ClearMap {
    fn reset(&self, item: &mut HashMap<K, V>) {
        item.clear();
        item.shrink_to(0);
    }

    fn destroy(&self, mut item: HashMap<K, V>) {
        item.clear();
    }
}

/// Pool of `HashMap<K, V>` instances
///
/// # Examples
///
/// ```
/// use scratch_pool::MapPool;
///
/// let pool = MapPool::new();
/// let counts = pool.rent_from([("slot", 1), ("stack", 64)]).unwrap();
/// assert_eq!(counts["stack"], 64);
///
/// pool.give_back(counts);
/// assert_eq!(pool.idle_count(), 1);
/// ```
#[derive(Debug)]
pub struct MapPool<K: Eq + Hash, V> {
    inner: ObjectPool<HashMap<K, V>, ClearMap>,
    default_capacity: Cell<usize>,
}

impl<K: Eq + Hash + 'static, V: 'static> MapPool<K, V> {
    /// Create an unbounded pool with default settings
    pub fn new() -> Self {
        Self::with_config(PoolConfiguration::default())
    }

    /// Create a pool from a configuration
    pub fn with_config(config: PoolConfiguration) -> Self {
        let default_capacity = config.default_capacity;
        Self {
            inner: ObjectPool::with_recycler(move || HashMap::with_capacity(default_capacity), ClearMap, config),
            default_capacity: Cell::new(default_capacity),
        }
    }

    /// Take a map, creating one with `default_capacity` if none is idle
    pub fn rent(&self) -> HashMap<K, V> {
        self.inner.rent_with(|| self.fresh(), |_| {})
    }

    /// Take a map able to hold at least `capacity` entries
    pub fn rent_with_capacity(&self, capacity: usize) -> PoolResult<HashMap<K, V>> {
        self.inner.try_rent_with(
            || self.fresh(),
            |map| {
                map.try_reserve(capacity.saturating_sub(map.len()))
                    .map_err(|err| PoolError::capacity_overflow(capacity, err))
            },
        )
    }

    /// Take a map filled with the pairs of `source`.
    ///
    /// Pairs are inserted in iteration order; a key seen twice fails with
    /// [`PoolError::DuplicateKey`] and the partly filled map goes back to the pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::{MapPool, PoolError};
    ///
    /// let pool = MapPool::new();
    /// let err = pool.rent_from([("a", 1), ("a", 2)]).unwrap_err();
    /// assert_eq!(err, PoolError::DuplicateKey("\"a\"".to_string()));
    /// ```
    pub fn rent_from<I>(&self, source: I) -> PoolResult<HashMap<K, V>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Debug,
    {
        self.inner.try_rent_with(
            || self.fresh(),
            |map| {
                for (key, value) in source {
                    match map.entry(key) {
                        Entry::Occupied(entry) => {
                            return Err(PoolError::DuplicateKey(format!("{:?}", entry.key())));
                        }
                        Entry::Vacant(entry) => {
                            entry.insert(value);
                        }
                    }
                }
                Ok(())
            },
        )
    }

    /// Clear a map and return it to the pool
    pub fn give_back(&self, map: HashMap<K, V>) {
        self.inner.give_back(map);
    }

    /// Capacity reserved by maps created on a rent miss
    pub fn default_capacity(&self) -> usize {
        self.default_capacity.get()
    }

    /// Change the capacity reserved by maps created from now on
    pub fn set_default_capacity(&self, capacity: usize) {
        self.default_capacity.set(capacity);
    }

    /// Number of idle maps
    pub fn idle_count(&self) -> usize {
        self.inner.idle_count()
    }

    /// Destroy every idle map
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Tear the pool down
    pub fn release(self) {
        self.inner.release();
    }

    /// Get pool metrics
    pub fn metrics(&self) -> PoolMetrics {
        self.inner.metrics()
    }

    /// The lazily created pool shared by the current thread
    pub fn shared() -> Rc<Self> {
        shared::<Self>()
    }

    fn fresh(&self) -> HashMap<K, V> {
        HashMap::with_capacity(self.default_capacity.get())
    }
}

impl<K: Eq + Hash + 'static, V: 'static> Default for MapPool<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
