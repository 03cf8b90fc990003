//! Metrics collection and export for object pools

use std::cell::Cell;
use std::collections::HashMap;

#[cfg(feature = "metrics")]
use serde::Serialize;

/// Point-in-time counters for a pool
///
/// # Examples
///
/// ```
/// use scratch_pool::{ObjectPool, PoolConfiguration};
///
/// let pool = ObjectPool::new(String::new, PoolConfiguration::default());
///
/// let text = pool.rent();
/// pool.give_back(text);
/// let _again = pool.rent();
///
/// let metrics = pool.metrics();
/// assert_eq!(metrics.total_rented, 2);
/// assert_eq!(metrics.total_created, 1);
/// assert_eq!(metrics.idle_objects, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "metrics", derive(Serialize))]
pub struct PoolMetrics {
    /// Total instances handed out
    pub total_rented: usize,

    /// Instances built by a factory because the idle queue was empty
    pub total_created: usize,

    /// Instances given back and retained
    pub total_returned: usize,

    /// Instances discarded because the pool was full, or drained on clear
    pub total_destroyed: usize,

    /// Current idle instances
    pub idle_objects: usize,

    /// Idle capacity limit, if any
    pub capacity_limit: Option<usize>,

    /// Share of rents served from the idle queue (0.0 to 1.0)
    pub hit_rate: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_rented".to_string(), self.total_rented.to_string());
        metrics.insert("total_created".to_string(), self.total_created.to_string());
        metrics.insert("total_returned".to_string(), self.total_returned.to_string());
        metrics.insert("total_destroyed".to_string(), self.total_destroyed.to_string());
        metrics.insert("idle_objects".to_string(), self.idle_objects.to_string());
        metrics.insert(
            "capacity_limit".to_string(),
            self.capacity_limit.map_or_else(|| "unbounded".to_string(), |l| l.to_string()),
        );
        metrics.insert("hit_rate".to_string(), format!("{:.2}", self.hit_rate));
        metrics
    }
}

/// Metrics exporter for Prometheus format
#[derive(Debug)]
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use scratch_pool::{ListPool, MetricsExporter};
    /// use std::collections::HashMap;
    ///
    /// let pool = ListPool::<u32>::new();
    /// pool.give_back(pool.rent());
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("owner".to_string(), "inventory".to_string());
    ///
    /// let output = MetricsExporter::export_prometheus(&pool.metrics(), "scratch", Some(&tags));
    /// assert!(output.contains("scratchpool_objects_idle{pool=\"scratch\",owner=\"inventory\"} 1"));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        Self::push_metric(&mut output, "scratchpool_objects_idle", "gauge", "Current idle objects", &labels, metrics.idle_objects);
        Self::push_metric(&mut output, "scratchpool_objects_rented_total", "counter", "Total objects rented", &labels, metrics.total_rented);
        Self::push_metric(&mut output, "scratchpool_objects_created_total", "counter", "Objects created on a rent miss", &labels, metrics.total_created);
        Self::push_metric(&mut output, "scratchpool_objects_returned_total", "counter", "Objects returned and retained", &labels, metrics.total_returned);
        Self::push_metric(&mut output, "scratchpool_objects_destroyed_total", "counter", "Objects destroyed", &labels, metrics.total_destroyed);

        output.push_str("# HELP scratchpool_hit_rate Share of rents served from the idle queue\n");
        output.push_str("# TYPE scratchpool_hit_rate gauge\n");
        output.push_str(&format!("scratchpool_hit_rate{{{}}} {:.2}\n", labels, metrics.hit_rate));

        output
    }

    fn push_metric(output: &mut String, name: &str, kind: &str, help: &str, labels: &str, value: usize) {
        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} {}\n", name, kind));
        output.push_str(&format!("{}{{{}}} {}\n", name, labels, value));
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
#[derive(Debug, Default)]
pub(crate) struct MetricsTracker {
    total_rented: Cell<usize>,
    total_created: Cell<usize>,
    total_returned: Cell<usize>,
    total_destroyed: Cell<usize>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_rented(&self, created: bool) {
        bump(&self.total_rented);
        if created {
            bump(&self.total_created);
        }
    }

    pub fn record_returned(&self) {
        bump(&self.total_returned);
    }

    pub fn record_destroyed(&self) {
        bump(&self.total_destroyed);
    }

    pub fn get_metrics(&self, idle: usize, capacity_limit: Option<usize>) -> PoolMetrics {
        let rented = self.total_rented.get();
        let hits = rented.saturating_sub(self.total_created.get());
        let hit_rate = if rented > 0 {
            hits as f64 / rented as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_rented: rented,
            total_created: self.total_created.get(),
            total_returned: self.total_returned.get(),
            total_destroyed: self.total_destroyed.get(),
            idle_objects: idle,
            capacity_limit,
            hit_rate,
        }
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get().wrapping_add(1));
}
