//! Pool configuration options

/// Default reserved capacity for freshly created containers.
pub const DEFAULT_CONTAINER_CAPACITY: usize = 128;

/// Configuration for object pool behavior
///
/// # Examples
///
/// ```
/// use scratch_pool::PoolConfiguration;
///
/// let config = PoolConfiguration::new()
///     .with_capacity_limit(16)
///     .with_default_capacity(64)
///     .with_warmup(4);
///
/// assert_eq!(config.capacity_limit, Some(16));
/// assert_eq!(config.default_capacity, 64);
/// assert_eq!(config.warmup_size, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfiguration {
    /// Maximum number of idle instances retained by the pool (`None` = unbounded)
    pub capacity_limit: Option<usize>,

    /// Reserved capacity of containers created fresh by the container pools
    pub default_capacity: usize,

    /// Number of instances to pre-create when the pool is constructed
    pub warmup_size: Option<usize>,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            capacity_limit: None,
            default_capacity: DEFAULT_CONTAINER_CAPACITY,
            warmup_size: None,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of idle instances.
    ///
    /// A limit of zero means unbounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::PoolConfiguration;
    ///
    /// assert_eq!(PoolConfiguration::new().with_capacity_limit(8).capacity_limit, Some(8));
    /// assert_eq!(PoolConfiguration::new().with_capacity_limit(0).capacity_limit, None);
    /// ```
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.capacity_limit = (limit > 0).then_some(limit);
        self
    }

    /// Set the reserved capacity used for fresh containers
    pub fn with_default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// Set warm-up size
    pub fn with_warmup(mut self, size: usize) -> Self {
        self.warmup_size = Some(size);
        self
    }
}
