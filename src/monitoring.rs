//! Prediction latency and error tracking
//!
//! A rolling latency window plus lock-free counters. Mutable state sits
//! under a single `RwLock` so the hot path acquires one lock per record.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

/// Performance metrics collector
pub struct PerformanceMetrics {
    window_size: usize,
    latencies: RwLock<VecDeque<f64>>,
    total_requests: AtomicU64,
    total_errors: AtomicU64,
    start_time: Instant,
}

impl PerformanceMetrics {
    /// Create a new collector with the given rolling window size
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            latencies: RwLock::new(VecDeque::with_capacity(window_size)),
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a latency observation
    pub fn record_latency(&self, latency_ms: f64) {
        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push_back(latency_ms);
            if latencies.len() > self.window_size {
                latencies.pop_front();
            }
        }
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an error
    pub fn record_error(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Average latency over the rolling window
    pub fn avg_latency(&self) -> f64 {
        match self.latencies.read() {
            Ok(latencies) if !latencies.is_empty() => {
                latencies.iter().sum::<f64>() / latencies.len() as f64
            }
            _ => 0.0,
        }
    }

    /// Latency percentile over the rolling window
    pub fn percentile_latency(&self, percentile: f64) -> f64 {
        match self.latencies.read() {
            Ok(latencies) if !latencies.is_empty() => {
                let mut sorted: Vec<f64> = latencies.iter().copied().collect();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let rank = (percentile / 100.0 * (sorted.len() - 1) as f64).round() as usize;
                sorted[rank.min(sorted.len() - 1)]
            }
            _ => 0.0,
        }
    }

    pub fn p50_latency(&self) -> f64 {
        self.percentile_latency(50.0)
    }

    pub fn p95_latency(&self) -> f64 {
        self.percentile_latency(95.0)
    }

    pub fn p99_latency(&self) -> f64 {
        self.percentile_latency(99.0)
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }

    pub fn error_rate(&self) -> f64 {
        let requests = self.total_requests();
        if requests == 0 {
            0.0
        } else {
            self.total_errors() as f64 / requests as f64
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = PerformanceMetrics::new(10);
        metrics.record_latency(5.0);
        metrics.record_latency(15.0);
        metrics.record_error();

        assert_eq!(metrics.total_requests(), 2);
        assert_eq!(metrics.total_errors(), 1);
        assert_eq!(metrics.error_rate(), 0.5);
        assert!((metrics.avg_latency() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_is_bounded() {
        let metrics = PerformanceMetrics::new(3);
        for i in 0..10 {
            metrics.record_latency(i as f64);
        }
        // Only the last three observations remain
        assert_eq!(metrics.p50_latency(), 8.0);
    }

    #[test]
    fn test_empty_window() {
        let metrics = PerformanceMetrics::new(10);
        assert_eq!(metrics.avg_latency(), 0.0);
        assert_eq!(metrics.p99_latency(), 0.0);
    }
}
