//! Metrics collection and reporting

use crate::actions::ActionKind;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of the addon's action metrics
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Total action invocations
    pub total_actions: u64,

    /// Invocations that ended with code 200
    pub total_ok: u64,

    /// Invocations that ended with code 409
    pub total_conflicts: u64,

    /// Invocations that ended with any other code
    pub total_errors: u64,

    /// Average action latency (ms)
    pub avg_latency_ms: f64,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Latency histogram buckets (in milliseconds)
const LATENCY_BUCKETS: &[f64] = &[1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0];

/// Histogram for tracking latency distribution
#[derive(Debug, Clone)]
pub struct Histogram {
    buckets: Vec<(f64, Arc<AtomicU64>)>,
    /// Sum of observations in microseconds
    sum_micros: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    fn new(buckets: &[f64]) -> Self {
        let bucket_counters = buckets
            .iter()
            .map(|&b| (b, Arc::new(AtomicU64::new(0))))
            .collect();

        Self {
            buckets: bucket_counters,
            sum_micros: Arc::new(AtomicU64::new(0)),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    fn observe(&self, value: f64) {
        self.sum_micros.fetch_add((value * 1000.0).round() as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        // Cumulative buckets
        for (bucket, counter) in &self.buckets {
            if value <= *bucket {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn export_prometheus(&self, name: &str, help: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} histogram\n", name));

        for (bucket, counter) in &self.buckets {
            let count = counter.load(Ordering::Relaxed);
            output.push_str(&format!("{}_bucket{{le=\"{}\"}} {}\n", name, bucket, count));
        }

        let total_count = self.count.load(Ordering::Relaxed);
        output.push_str(&format!("{}_bucket{{le=\"+Inf\"}} {}\n", name, total_count));

        let sum = self.sum_micros.load(Ordering::Relaxed) as f64 / 1000.0;
        output.push_str(&format!("{}_sum {:.3}\n", name, sum));
        output.push_str(&format!("{}_count {}\n", name, total_count));

        output
    }
}

/// Per-action outcome counters
#[derive(Debug, Default)]
struct ActionCounters {
    ok: AtomicU64,
    conflict: AtomicU64,
    error: AtomicU64,
}

/// Metrics collector
pub struct MetricsCollector {
    start_time: Instant,
    actions: HashMap<ActionKind, ActionCounters>,
    total_latency_micros: AtomicU64,
    action_latency: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            actions: ActionKind::ALL
                .into_iter()
                .map(|kind| (kind, ActionCounters::default()))
                .collect(),
            total_latency_micros: AtomicU64::new(0),
            action_latency: Histogram::new(LATENCY_BUCKETS),
        }
    }

    /// Record one finished action invocation
    pub fn record_action(&self, kind: ActionKind, code: u16, latency: Duration) {
        if let Some(counters) = self.actions.get(&kind) {
            let counter = match code {
                200 => &counters.ok,
                409 => &counters.conflict,
                _ => &counters.error,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_micros
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
        self.action_latency.observe(latency.as_secs_f64() * 1000.0);
    }

    /// Get current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let (mut ok, mut conflicts, mut errors) = (0, 0, 0);
        for counters in self.actions.values() {
            ok += counters.ok.load(Ordering::Relaxed);
            conflicts += counters.conflict.load(Ordering::Relaxed);
            errors += counters.error.load(Ordering::Relaxed);
        }

        let total = ok + conflicts + errors;
        let avg_latency_ms = if total > 0 {
            self.total_latency_micros.load(Ordering::Relaxed) as f64 / 1000.0 / total as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_actions: total,
            total_ok: ok,
            total_conflicts: conflicts,
            total_errors: errors,
            avg_latency_ms,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP qdrant_addon_actions_total Action invocations by outcome\n");
        output.push_str("# TYPE qdrant_addon_actions_total counter\n");
        for kind in ActionKind::ALL {
            if let Some(counters) = self.actions.get(&kind) {
                for (status, counter) in [
                    ("ok", &counters.ok),
                    ("conflict", &counters.conflict),
                    ("error", &counters.error),
                ] {
                    output.push_str(&format!(
                        "qdrant_addon_actions_total{{action=\"{}\",status=\"{}\"}} {}\n",
                        kind,
                        status,
                        counter.load(Ordering::Relaxed)
                    ));
                }
            }
        }

        output.push('\n');
        output.push_str(&self.action_latency.export_prometheus(
            "qdrant_addon_action_latency_ms",
            "Action latency in milliseconds",
        ));

        output.push('\n');
        output.push_str("# HELP qdrant_addon_uptime_seconds Uptime in seconds\n");
        output.push_str("# TYPE qdrant_addon_uptime_seconds gauge\n");
        output.push_str(&format!(
            "qdrant_addon_uptime_seconds {}\n",
            self.start_time.elapsed().as_secs()
        ));

        output
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
