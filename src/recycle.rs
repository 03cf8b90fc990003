//! Reset and destroy hooks applied to instances re-entering or leaving a pool

use std::fmt;

/// Optional capability for pooled types that know how to blank themselves.
///
/// Pools built with the [`Resetting`] recycler call `reset` whenever an
/// instance comes back and `destroy` when one is discarded for lack of room.
/// `reset` must be safe to apply to an instance that is already blank.
///
/// # Examples
///
/// ```
/// use scratch_pool::{ObjectPool, PoolConfiguration, Resettable, Resetting};
///
/// #[derive(Default)]
/// struct Scratch {
///     hits: u32,
/// }
///
/// impl Resettable for Scratch {
///     fn reset(&mut self) {
///         self.hits = 0;
///     }
/// }
///
/// let pool = ObjectPool::with_recycler(Scratch::default, Resetting, PoolConfiguration::default());
/// let mut scratch = pool.rent();
/// scratch.hits = 7;
/// pool.give_back(scratch);
///
/// assert_eq!(pool.rent().hits, 0);
/// ```
pub trait Resettable {
    /// Restore the instance to a blank state.
    fn reset(&mut self);

    /// Release anything the instance holds before it is dropped.
    fn destroy(&mut self) {}
}

/// Strategy a pool uses to reset returned instances and dispose of evicted ones.
pub trait Recycler<T> {
    /// Applied to every instance before it re-enters the idle queue.
    fn reset(&self, item: &mut T);

    /// Applied to an instance the pool will not retain.
    fn destroy(&self, item: T) {
        drop(item);
    }
}

/// No reset; evicted instances are simply dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl<T> Recycler<T> for Plain {
    fn reset(&self, _item: &mut T) {}
}

/// Delegates to the instance's own [`Resettable`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resetting;

impl<T: Resettable> Recycler<T> for Resetting {
    fn reset(&self, item: &mut T) {
        item.reset();
    }

    fn destroy(&self, mut item: T) {
        item.destroy();
    }
}

/// Recycler built from a pair of closures.
///
/// # Examples
///
/// ```
/// use scratch_pool::{FnRecycler, ObjectPool, PoolConfiguration};
///
/// let recycler = FnRecycler::new(|v: &mut Vec<u8>| v.clear(), drop);
/// let pool = ObjectPool::with_recycler(Vec::new, recycler, PoolConfiguration::default());
///
/// pool.give_back(vec![1, 2, 3]);
/// assert!(pool.rent().is_empty());
/// ```
pub struct FnRecycler<T> {
    reset: Box<dyn Fn(&mut T)>,
    destroy: Box<dyn Fn(T)>,
}

impl<T> FnRecycler<T> {
    /// Create a recycler from reset and destroy closures
    pub fn new<R, D>(reset: R, destroy: D) -> Self
    where
        R: Fn(&mut T) + 'static,
        D: Fn(T) + 'static,
    {
        Self {
            reset: Box::new(reset),
            destroy: Box::new(destroy),
        }
    }
}

impl<T> Recycler<T> for FnRecycler<T> {
    fn reset(&self, item: &mut T) {
        (self.reset)(item);
    }

    fn destroy(&self, item: T) {
        (self.destroy)(item);
    }
}

impl<T> fmt::Debug for FnRecycler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRecycler").finish_non_exhaustive()
    }
}
