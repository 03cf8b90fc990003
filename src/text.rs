//! Pool of reusable `String` builders

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::metrics::PoolMetrics;
use crate::pool::ObjectPool;
use crate::recycle::Recycler;
use crate::shared::shared;

use std::cell::Cell;
use std::rc::Rc;

/// Truncates a `String` and releases its allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearText;

impl Recycler<String> for ClearText {
    fn reset(&self, item: &mut String) {
        item.clear();
        item.shrink_to(0);
    }

    fn destroy(&self, mut item: String) {
        item.clear();
    }
}

/// Pool of growable text buffers
///
/// # Examples
///
/// ```
/// use std::fmt::Write;
/// use scratch_pool::TextPool;
///
/// let pool = TextPool::new();
/// let mut line = pool.rent();
/// write!(line, "{} x {}", 3, "arrows").unwrap();
///
/// assert_eq!(pool.rent_and_release(line), "3 x arrows");
/// assert_eq!(pool.idle_count(), 1);
/// ```
#[derive(Debug)]
pub struct TextPool {
    inner: ObjectPool<String, ClearText>,
    default_capacity: Cell<usize>,
}

impl TextPool {
    /// Create an unbounded pool with default settings
    pub fn new() -> Self {
        Self::with_config(PoolConfiguration::default())
    }

    /// Create a pool from a configuration
    pub fn with_config(config: PoolConfiguration) -> Self {
        let default_capacity = config.default_capacity;
        Self {
            inner: ObjectPool::with_recycler(move || String::with_capacity(default_capacity), ClearText, config),
            default_capacity: Cell::new(default_capacity),
        }
    }

    /// Take a buffer, creating one with `default_capacity` if none is idle
    pub fn rent(&self) -> String {
        self.inner.rent_with(|| self.fresh(), |_| {})
    }

    /// Take a buffer able to hold at least `capacity` bytes
    pub fn rent_with_capacity(&self, capacity: usize) -> PoolResult<String> {
        self.inner.try_rent_with(
            || self.fresh(),
            |text| {
                text.try_reserve(capacity.saturating_sub(text.len()))
                    .map_err(|err| PoolError::capacity_overflow(capacity, err))
            },
        )
    }

    /// Take a buffer holding a copy of `source`
    pub fn rent_from(&self, source: &str) -> String {
        self.inner.rent_with(|| self.fresh(), |text| text.push_str(source))
    }

    /// Copy out the buffer's text, return the buffer to the pool and hand back the text
    pub fn rent_and_release(&self, text: String) -> String {
        let content = text.as_str().to_owned();
        self.inner.give_back(text);
        content
    }

    /// Clear a buffer and return it to the pool
    pub fn give_back(&self, text: String) {
        self.inner.give_back(text);
    }

    /// Capacity reserved by buffers created on a rent miss
    pub fn default_capacity(&self) -> usize {
        self.default_capacity.get()
    }

    /// Change the capacity reserved by buffers created from now on
    pub fn set_default_capacity(&self, capacity: usize) {
        self.default_capacity.set(capacity);
    }

    /// Number of idle buffers
    pub fn idle_count(&self) -> usize {
        self.inner.idle_count()
    }

    /// Destroy every idle buffer
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

    fn fresh(&self) -> String {
        String::with_capacity(self.default_capacity.get())
    }
}

impl Default for TextPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_from_copies_source() {
        let pool = TextPool::new();
        assert_eq!(pool.rent_from("hello"), "hello");
    }

    #[test]
    fn test_rent_and_release() {
        let pool = TextPool::new();
        let text = pool.rent_from("hello");

        assert_eq!(pool.rent_and_release(text), "hello");
        assert_eq!(pool.idle_count(), 1);

        let reused = pool.rent();
        assert!(reused.is_empty());
        assert_eq!(reused.capacity(), 0);
    }

    #[test]
    fn test_capacity_hint() {
        let pool = TextPool::with_config(PoolConfiguration::new().with_default_capacity(0));
        assert!(pool.rent_with_capacity(64).unwrap().capacity() >= 64);
    }

    #[test]
    fn test_bounded_text_pool() {
        let pool = TextPool::with_config(PoolConfiguration::new().with_capacity_limit(1));
        pool.give_back(String::from("a"));
        pool.give_back(String::from("b"));

        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.metrics().total_destroyed, 1);
    }
}
