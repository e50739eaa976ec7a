//! Statistics tracking for the query cache

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of cache statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub fetches_started: u64,
    pub fetches_failed: u64,
    pub invalidations: u64,
    pub latency_p50_ms: f64,
    pub latency_p99_ms: f64,
}

/// Thread-safe statistics collector
#[derive(Clone, Default)]
pub struct StatsCollector {
    fetches_started: Arc<AtomicU64>,
    fetches_failed: Arc<AtomicU64>,
    invalidations: Arc<AtomicU64>,
    latencies: Arc<Mutex<Vec<f64>>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.fetches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_error(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record fetch latency (in milliseconds)
    pub fn record_latency(&self, latency_ms: f64) {
        let mut latencies = self.latencies.lock();
        latencies.push(latency_ms);
        // Keep only the most recent samples
        if latencies.len() > 1000 {
            latencies.drain(0..500);
        }
    }

    pub fn snapshot(&self) -> CacheStats {
        let (p50, p99) = {
            let mut latencies = self.latencies.lock();
            if latencies.is_empty() {
                (0.0, 0.0)
            } else {
                latencies.sort_by(f64::total_cmp);
                let last = latencies.len() - 1;
                let p50_idx = (latencies.len() as f64 * 0.50) as usize;
                let p99_idx = (latencies.len() as f64 * 0.99) as usize;
                (latencies[p50_idx.min(last)], latencies[p99_idx.min(last)])
            }
        };

        CacheStats {
            fetches_started: self.fetches_started.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            latency_p50_ms: p50,
            latency_p99_ms: p99,
        }
    }

    pub fn reset(&self) {
        self.fetches_started.store(0, Ordering::Relaxed);
        self.fetches_failed.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
        self.latencies.lock().clear();
    }
}
