//! # scratch_pool
//!
//! Bounded object pool for reusing scratch values on a single thread, with
//! pluggable reset and destroy hooks and ready-made pools for `Vec`, `HashMap`
//! and `String` buffers.
//!
//! ## Features
//!
//! - FIFO reuse of idle instances, lazy creation on a rent miss
//! - Optional cap on retained idle instances, enforced when instances come back
//! - Reset-on-return and destroy-on-overflow hooks via [`Recycler`]
//! - List, map and text pools with capacity hints and source population
//! - RAII guards via [`ObjectPool::rent_scoped`]
//! - Per-thread shared pools
//! - Metrics and Prometheus export
//!
//! ## Quick Start
//!
//! ```rust
//! use scratch_pool::ListPool;
//!
//! let pool = ListPool::new();
//! let mut items = pool.rent();
//! items.extend(["sword", "shield", "potion"]);
//! // ... use the scratch list ...
//! pool.give_back(items);
//!
//! assert_eq!(pool.idle_count(), 1);
//! ```
//!
//! ## Caller obligations
//!
//! Pools do not remember which instances they lent out. Giving back a value
//! the pool never issued is accepted silently.

mod pool;
mod config;
mod metrics;
mod recycle;
mod list;
mod map;
mod text;
mod shared;
mod errors;

pub use pool::{ObjectPool, Pooled};
pub use config::{PoolConfiguration, DEFAULT_CONTAINER_CAPACITY};
pub use metrics::{PoolMetrics, MetricsExporter};
pub use recycle::{FnRecycler, Plain, Recycler, Resettable, Resetting};
pub use list::{ClearList, ListPool};
pub use map::{ClearMap, MapPool};
pub use text::{ClearText, TextPool};
pub use shared::shared;
pub use errors::{PoolError, PoolResult};
