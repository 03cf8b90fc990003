//! Core object pool implementation

use crate::config::PoolConfiguration;
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::recycle::{Plain, Recycler};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

/// A bounded cache of reusable instances of `T`.
///
/// Idle instances are handed out in FIFO order. When the idle queue is empty
/// the pool's factory builds a fresh instance. Returned instances are reset by
/// the pool's [`Recycler`] and queued again, unless the pool already holds
/// `capacity_limit` idle instances, in which case the instance is destroyed.
///
/// The pool is not `Sync`; share it only within one thread.
///
/// # Caller obligations
///
/// The pool does not track instances on loan. Giving back an instance that
/// this pool never issued is accepted as if it had been.
pub struct ObjectPool<T, R: Recycler<T> = Plain> {
    idle: RefCell<VecDeque<T>>,
    factory: Box<dyn Fn() -> T>,
    recycler: R,
    capacity_limit: Option<usize>,
    metrics: MetricsTracker,
}

impl<T> ObjectPool<T, Plain> {
    /// Create a pool whose instances are reused without any reset.
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::{ObjectPool, PoolConfiguration};
    ///
    /// let pool = ObjectPool::new(|| 42, PoolConfiguration::default());
    /// assert_eq!(pool.rent(), 42);
    /// ```
    pub fn new<F>(factory: F, config: PoolConfiguration) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self::with_recycler(factory, Plain, config)
    }
}

impl<T, R: Recycler<T>> ObjectPool<T, R> {
    /// Create a pool that resets and destroys instances through `recycler`
    pub fn with_recycler<F>(factory: F, recycler: R, config: PoolConfiguration) -> Self
    where
        F: Fn() -> T + 'static,
    {
        let pool = Self {
            idle: RefCell::new(VecDeque::new()),
            factory: Box::new(factory),
            recycler,
            capacity_limit: config.capacity_limit.filter(|limit| *limit > 0),
            metrics: MetricsTracker::new(),
        };

        if let Some(count) = config.warmup_size {
            pool.warmup(count);
        }

        pool
    }

    /// Take an idle instance, or build one with the pool's factory
    pub fn rent(&self) -> T {
        self.rent_with(&self.factory, |_| {})
    }

    /// Take an idle instance, or build one with `factory`, then apply `finish` to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::{ObjectPool, PoolConfiguration};
    ///
    /// let pool = ObjectPool::new(Vec::<u8>::new, PoolConfiguration::default());
    /// let buf = pool.rent_with(|| Vec::with_capacity(16), |v| v.push(1));
    ///
    /// assert_eq!(buf, vec![1]);
    /// assert!(buf.capacity() >= 16);
    /// ```
    pub fn rent_with<F, P>(&self, factory: F, finish: P) -> T
    where
        F: FnOnce() -> T,
        P: FnOnce(&mut T),
    {
        let mut item = self.take_or_create(factory);
        finish(&mut item);
        item
    }

    /// Like [`rent_with`](Self::rent_with), with a finishing step that can fail.
    ///
    /// When `finish` fails the instance is given back to the pool and the error
    /// is returned unchanged.
    pub fn try_rent_with<F, P, E>(&self, factory: F, finish: P) -> Result<T, E>
    where
        F: FnOnce() -> T,
        P: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut item = self.take_or_create(factory);
        match finish(&mut item) {
            Ok(()) => Ok(item),
            Err(err) => {
                self.give_back(item);
                Err(err)
            }
        }
    }

    /// Rent an instance wrapped in a guard that gives it back when dropped
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::{ObjectPool, PoolConfiguration};
    ///
    /// let pool = ObjectPool::new(String::new, PoolConfiguration::default());
    /// {
    ///     let mut text = pool.rent_scoped();
    ///     text.push_str("scratch");
    /// }
    /// assert_eq!(pool.idle_count(), 1);
    /// ```
    pub fn rent_scoped(&self) -> Pooled<'_, T, R> {
        Pooled {
            value: Some(self.rent()),
            pool: self,
        }
    }

    /// Return an instance to the pool.
    ///
    /// The instance is reset and queued at the tail, or destroyed when the pool
    /// already holds `capacity_limit` idle instances.
    pub fn give_back(&self, mut item: T) {
        if let Some(limit) = self.capacity_limit {
            if self.idle_count() >= limit {
                debug!(limit, "pool full, destroying returned instance");
                self.destroy_instance(item);
                return;
            }
        }

        self.reset_instance(&mut item);
        self.idle.borrow_mut().push_back(item);
        self.metrics.record_returned();
        trace!(idle = self.idle_count(), "instance returned to pool");
    }

    /// Dispose of an instance through the pool's recycler
    pub fn destroy_instance(&self, item: T) {
        self.recycler.destroy(item);
        self.metrics.record_destroyed();
    }

    pub(crate) fn reset_instance(&self, item: &mut T) {
        self.recycler.reset(item);
    }

    /// Pre-create up to `count` idle instances, bounded by the capacity limit
    pub fn warmup(&self, count: usize) {
        let room = self
            .capacity_limit
            .map_or(count, |limit| limit.saturating_sub(self.idle_count()).min(count));

        // Factories run before the queue is borrowed.
        let created: Vec<T> = (0..room).map(|_| (self.factory)()).collect();
        self.idle.borrow_mut().extend(created);
        debug!(created = room, "pool warmed up");
    }

    /// Destroy every idle instance. Instances on loan are unaffected.
    pub fn clear(&self) {
        let drained: Vec<T> = self.idle.borrow_mut().drain(..).collect();
        if drained.is_empty() {
            return;
        }

        debug!(count = drained.len(), "clearing idle instances");
        for item in drained {
            self.destroy_instance(item);
        }
    }

    /// Tear the pool down, destroying its idle instances.
    ///
    /// Dropping the pool has the same effect.
    pub fn release(self) {
        self.clear();
    }

    /// Number of idle instances
    pub fn idle_count(&self) -> usize {
        self.idle.borrow().len()
    }

    /// Whether the idle queue is empty
    pub fn is_empty(&self) -> bool {
        self.idle.borrow().is_empty()
    }

    /// Idle capacity limit, if any
    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }

    /// Get pool metrics
    pub fn metrics(&self) -> PoolMetrics {
        self.metrics.get_metrics(self.idle_count(), self.capacity_limit)
    }

    fn take_or_create<F>(&self, factory: F) -> T
    where
        F: FnOnce() -> T,
    {
        // Bind first so the queue borrow ends before the factory runs.
        let reused = self.idle.borrow_mut().pop_front();
        match reused {
            Some(item) => {
                self.metrics.record_rented(false);
                item
            }
            None => {
                trace!("idle queue empty, creating instance");
                let item = factory();
                self.metrics.record_rented(true);
                item
            }
        }
    }
}

impl<T, R: Recycler<T>> Drop for ObjectPool<T, R> {
    fn drop(&mut self) {
        let idle = std::mem::take(self.idle.get_mut());
        if idle.is_empty() {
            return;
        }

        debug!(count = idle.len(), "releasing pool");
        for item in idle {
            self.recycler.destroy(item);
        }
    }
}

impl<T, R: Recycler<T> + fmt::Debug> fmt::Debug for ObjectPool<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.idle.borrow().len())
            .field("capacity_limit", &self.capacity_limit)
            .field("recycler", &self.recycler)
            .finish_non_exhaustive()
    }
}

/// A rented instance that returns to its pool when dropped
pub struct Pooled<'a, T, R: Recycler<T> = Plain> {
    value: Option<T>,
    pool: &'a ObjectPool<T, R>,
}

impl<T, R: Recycler<T>> Pooled<'_, T, R> {
    /// Detach the value so it is not given back
    pub fn into_inner(mut self) -> T {
        match self.value.take() {
            Some(value) => value,
            None => unreachable!("pooled value is only taken on drop or detach"),
        }
    }
}

impl<T, R: Recycler<T>> Deref for Pooled<'_, T, R> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match &self.value {
            Some(value) => value,
            None => unreachable!("pooled value is only taken on drop or detach"),
        }
    }
}

impl<T, R: Recycler<T>> DerefMut for Pooled<'_, T, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("pooled value is only taken on drop or detach"),
        }
    }
}

impl<T, R: Recycler<T>> Drop for Pooled<'_, T, R> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.give_back(value);
        }
    }
}

impl<T: fmt::Debug, R: Recycler<T>> fmt::Debug for Pooled<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recycle::{FnRecycler, Resettable, Resetting};
    use std::cell::Cell;
    use std::rc::{Rc, Weak};

    #[test]
    fn test_rent_creates_when_empty() {
        let pool = ObjectPool::new(|| 7, PoolConfiguration::default());
        assert_eq!(pool.rent(), 7);
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.metrics().total_created, 1);
    }

    #[test]
    fn test_fifo_order() {
        let pool = ObjectPool::new(|| 0, PoolConfiguration::default());
        pool.give_back(1);
        pool.give_back(2);

        assert_eq!(pool.rent(), 1);
        assert_eq!(pool.rent(), 2);
        assert_eq!(pool.rent(), 0);
    }

    #[test]
    fn test_limit_is_exact() {
        let pool = ObjectPool::new(|| 0, PoolConfiguration::new().with_capacity_limit(2));
        for n in 0..5 {
            pool.give_back(n);
        }

        assert_eq!(pool.idle_count(), 2);
        assert_eq!(pool.metrics().total_destroyed, 3);
        assert_eq!(pool.rent(), 0);
        assert_eq!(pool.rent(), 1);
    }

    #[test]
    fn test_overflow_destroys_instead_of_resetting() {
        let resets = Rc::new(Cell::new(0));
        let destroyed = Rc::new(Cell::new(Vec::new()));
        let (r, d) = (Rc::clone(&resets), Rc::clone(&destroyed));
        let recycler = FnRecycler::new(
            move |_: &mut u32| r.set(r.get() + 1),
            move |n: u32| {
                let mut seen = d.take();
                seen.push(n);
                d.set(seen);
            },
        );
        let pool = ObjectPool::with_recycler(|| 0, recycler, PoolConfiguration::new().with_capacity_limit(1));

        pool.give_back(10);
        pool.give_back(20);

        assert_eq!(resets.get(), 1);
        assert_eq!(destroyed.take(), vec![20]);
    }

    #[test]
    fn test_rent_with_reuses_idle_instance() {
        let pool = ObjectPool::new(Vec::<u8>::new, PoolConfiguration::default());
        pool.give_back(vec![9]);

        let factory_called = Cell::new(false);
        let value = pool.rent_with(
            || {
                factory_called.set(true);
                Vec::new()
            },
            |v| v.push(1),
        );

        assert!(!factory_called.get());
        assert_eq!(value, vec![9, 1]);
    }

    #[test]
    fn test_try_rent_with_gives_back_on_error() {
        let pool = ObjectPool::new(|| 3, PoolConfiguration::default());
        let result: Result<i32, &str> = pool.try_rent_with(|| 3, |_| Err("nope"));

        assert_eq!(result, Err("nope"));
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_resetting_pool() {
        struct Tally(u32);
        impl Resettable for Tally {
            fn reset(&mut self) {
                self.0 = 0;
            }
        }

        let pool = ObjectPool::with_recycler(|| Tally(0), Resetting, PoolConfiguration::default());
        let mut tally = pool.rent();
        tally.0 = 12;
        pool.give_back(tally);

        assert_eq!(pool.rent().0, 0);
    }

    #[test]
    fn test_scoped_rent_returns_on_drop() {
        let pool = ObjectPool::new(String::new, PoolConfiguration::default());
        {
            let mut text = pool.rent_scoped();
            text.push('x');
            assert_eq!(pool.idle_count(), 0);
        }
        assert_eq!(pool.idle_count(), 1);

        let kept = pool.rent_scoped().into_inner();
        assert_eq!(kept, "x");
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_warmup_respects_limit() {
        let pool = ObjectPool::new(|| 1, PoolConfiguration::new().with_capacity_limit(3).with_warmup(10));
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(pool.metrics().total_created, 0);
    }

    #[test]
    fn test_clear_destroys_idle() {
        let pool = ObjectPool::new(|| 1, PoolConfiguration::default());
        pool.give_back(1);
        pool.give_back(2);
        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.metrics().total_destroyed, 2);
    }

    #[test]
    fn test_release_drops_idle_instances() {
        let alive = Rc::new(());
        let pool = ObjectPool::new(
            {
                let alive = Rc::clone(&alive);
                move || Rc::clone(&alive)
            },
            PoolConfiguration::default(),
        );
        let on_loan = pool.rent();
        pool.give_back(pool.rent());
        assert_eq!(Rc::strong_count(&alive), 4);

        pool.release();
        // The factory closure and the idle instance are gone; the loaned one survives.
        assert_eq!(Rc::strong_count(&alive), 2);
        drop(on_loan);
        assert_eq!(Rc::strong_count(&alive), 1);
    }
    struct Handle {
        destroyed: Rc<Cell<usize>>,
    }

    impl Resettable for Handle {
        fn reset(&mut self) {}

        fn destroy(&mut self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    fn handle_pool(destroyed: &Rc<Cell<usize>>) -> ObjectPool<Handle, Resetting> {
        let destroyed = Rc::clone(destroyed);
        ObjectPool::with_recycler(
            move || Handle { destroyed: Rc::clone(&destroyed) },
            Resetting,
            PoolConfiguration::default(),
        )
    }

    fn fill(pool: &ObjectPool<Handle, Resetting>, count: usize) {
        let rented: Vec<Handle> = (0..count).map(|_| pool.rent()).collect();
        for handle in rented {
            pool.give_back(handle);
        }
    }

    #[test]
    fn test_drop_runs_destroy_hook() {
        let destroyed = Rc::new(Cell::new(0));
        let pool = handle_pool(&destroyed);
        fill(&pool, 2);

        drop(pool);
        assert_eq!(destroyed.get(), 2);
    }

    #[test]
    fn test_clear_runs_destroy_hook() {
        let destroyed = Rc::new(Cell::new(0));
        let pool = handle_pool(&destroyed);
        fill(&pool, 3);

        pool.clear();
        assert_eq!(destroyed.get(), 3);

        drop(pool);
        assert_eq!(destroyed.get(), 3);
    }

    #[test]
    fn test_release_runs_destroy_hook_once() {
        let destroyed = Rc::new(Cell::new(0));
        let pool = handle_pool(&destroyed);
        fill(&pool, 2);
        let on_loan = pool.rent();

        pool.release();
        assert_eq!(destroyed.get(), 1);
        drop(on_loan);
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_drop_runs_fn_recycler_destroy() {
        let destroyed = Rc::new(Cell::new(0));
        let seen = Rc::clone(&destroyed);
        let recycler = FnRecycler::new(|_: &mut u8| {}, move |_: u8| seen.set(seen.get() + 1));
        let pool = ObjectPool::with_recycler(|| 0u8, recycler, PoolConfiguration::default());
        pool.give_back(1);
        pool.give_back(2);

        drop(pool);
        assert_eq!(destroyed.get(), 2);
    }

    #[test]
    fn test_warmup_factory_may_read_pool() {
        let slot: Rc<RefCell<Weak<ObjectPool<usize>>>> = Rc::new(RefCell::new(Weak::new()));
        let factory_slot = Rc::clone(&slot);
        let pool = Rc::new(ObjectPool::new(
            move || factory_slot.borrow().upgrade().map_or(0, |pool| pool.idle_count()),
            PoolConfiguration::default(),
        ));
        *slot.borrow_mut() = Rc::downgrade(&pool);

        pool.warmup(3);
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(pool.rent(), 0);
    }
}
