//! Pool of reusable `Vec` scratch buffers

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::metrics::PoolMetrics;
use crate::pool::ObjectPool;
use crate::recycle::Recycler;
use crate::shared::shared;

use std::cell::Cell;
use std::rc::Rc;

/// Empties a `Vec` and releases its allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearList;

impl<T> Recycler<Vec<T>> for ClearList {
    fn reset(&self, item: &mut Vec<T>) {
        item.clear();
        item.shrink_to(0);
    }

    fn destroy(&self, mut item: Vec<T>) {
        item.clear();
    }
}

/// Pool of `Vec<T>` instances
///
/// # Examples
///
/// ```
/// use scratch_pool::ListPool;
///
/// let pool = ListPool::new();
/// let mut ids = pool.rent();
/// ids.extend([3, 1, 2]);
/// pool.give_back(ids);
///
/// let ids = pool.rent();
/// assert!(ids.is_empty());
/// ```
#[derive(Debug)]
pub struct ListPool<T> {
    inner: ObjectPool<Vec<T>, ClearList>,
    default_capacity: Cell<usize>,
}

impl<T: 'static> ListPool<T> {
    /// Create an unbounded pool with default settings
    pub fn new() -> Self {
        Self::with_config(PoolConfiguration::default())
    }

    /// Create a pool from a configuration
    pub fn with_config(config: PoolConfiguration) -> Self {
        let default_capacity = config.default_capacity;
        Self {
            inner: ObjectPool::with_recycler(move || Vec::with_capacity(default_capacity), ClearList, config),
            default_capacity: Cell::new(default_capacity),
        }
    }

    /// Take a list, creating one with `default_capacity` if none is idle
    pub fn rent(&self) -> Vec<T> {
        self.inner.rent_with(|| self.fresh(), |_| {})
    }

    /// Take a list able to hold at least `capacity` elements
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::ListPool;
    ///
    /// let pool = ListPool::<u64>::new();
    /// let list = pool.rent_with_capacity(1024).unwrap();
    /// assert!(list.capacity() >= 1024);
    /// ```
    pub fn rent_with_capacity(&self, capacity: usize) -> PoolResult<Vec<T>> {
        self.inner.try_rent_with(
            || self.fresh(),
            |list| {
                list.try_reserve(capacity.saturating_sub(list.len()))
                    .map_err(|err| PoolError::capacity_overflow(capacity, err))
            },
        )
    }

    /// Take a list filled with `source`, in iteration order
    pub fn rent_from<I>(&self, source: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.rent_with(|| self.fresh(), |list| list.extend(source))
    }

    /// Clear a list and return it to the pool
    pub fn give_back(&self, list: Vec<T>) {
        self.inner.give_back(list);
    }

    /// Capacity reserved by lists created on a rent miss
    pub fn default_capacity(&self) -> usize {
        self.default_capacity.get()
    }

    /// Change the capacity reserved by lists created from now on
    pub fn set_default_capacity(&self, capacity: usize) {
        self.default_capacity.set(capacity);
    }

    /// Number of idle lists
    pub fn idle_count(&self) -> usize {
        self.inner.idle_count()
    }

    /// Destroy every idle list
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

    fn fresh(&self) -> Vec<T> {
        Vec::with_capacity(self.default_capacity.get())
    }
}

impl<T: 'static> Default for ListPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_list_uses_default_capacity() {
        let pool = ListPool::<u8>::new();
        assert!(pool.rent().capacity() >= 128);
    }

    #[test]
    fn test_set_default_capacity() {
        let pool = ListPool::<u8>::with_config(PoolConfiguration::new().with_default_capacity(4));
        assert_eq!(pool.default_capacity(), 4);

        pool.set_default_capacity(300);
        assert!(pool.rent().capacity() >= 300);
    }

    #[test]
    fn test_give_back_clears_and_shrinks() {
        let pool = ListPool::new();
        let mut list = pool.rent();
        list.extend([1, 2, 3]);
        pool.give_back(list);

        let list = pool.rent();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), 0);
    }

    #[test]
    fn test_rent_from_preserves_order() {
        let pool = ListPool::new();
        let list = pool.rent_from(["b", "a", "c"]);
        assert_eq!(list, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_capacity_hint_on_reused_list() {
        let pool = ListPool::<u32>::new();
        pool.give_back(pool.rent());

        let list = pool.rent_with_capacity(10).unwrap();
        assert!(list.capacity() >= 10);
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_capacity_overflow_is_reported() {
        let pool = ListPool::<u64>::new();
        let err = pool.rent_with_capacity(usize::MAX).unwrap_err();

        assert!(matches!(err, PoolError::CapacityOverflow { requested: usize::MAX, .. }));
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_shared_pool_default_capacity_is_settable() {
        let pool = ListPool::<i64>::shared();
        pool.set_default_capacity(512);

        assert_eq!(ListPool::<i64>::shared().default_capacity(), 512);
        assert!(ListPool::<i64>::shared().rent().capacity() >= 512);
    }
}
