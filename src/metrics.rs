//! Poll health metrics collection and reporting
//!
//! Tracks latency and outcome statistics for the poll loop.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for latency percentiles
const MAX_SAMPLES: usize = 100;

/// Snapshot of poll metrics for one source
#[derive(Debug, Clone)]
pub struct PollMetrics {
    /// Name of the source being polled
    pub source_name: String,
    /// 50th percentile poll latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile poll latency in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of polls (lifetime)
    pub total_polls: u64,
    /// Number of failed polls (lifetime)
    pub failed_polls: u64,
    /// Number of polls rejected with HTTP 429 (lifetime)
    pub rate_limited_polls: u64,
}

impl PollMetrics {
    /// Creates metrics with no data
    pub fn empty(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_polls: 0,
            failed_polls: 0,
            rate_limited_polls: 0,
        }
    }
}

/// Internal sample for latency tracking
#[derive(Debug, Clone)]
struct PollSample {
    duration_ms: f64,
    success: bool,
}

/// Lifetime counters, updated on every poll
#[derive(Debug, Default)]
struct PollCounters {
    total: u64,
    failed: u64,
    rate_limited: u64,
}

/// Collects and computes poll metrics for a source
pub struct PollMetricsCollector {
    source_name: String,
    samples: RwLock<VecDeque<PollSample>>,
    counters: RwLock<PollCounters>,
}

impl PollMetricsCollector {
    /// Creates a new collector for a source
    pub fn new(source_name: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            samples: RwLock::new(VecDeque::with_capacity(MAX_SAMPLES)),
            counters: RwLock::new(PollCounters::default()),
        }
    }

    /// Records one completed poll
    pub async fn record_poll(&self, duration: Duration, success: bool, rate_limited: bool) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        {
            let mut counters = self.counters.write().await;
            counters.total += 1;
            if !success {
                counters.failed += 1;
            }
            if rate_limited {
                counters.rate_limited += 1;
            }
        }

        let mut samples = self.samples.write().await;
        if samples.len() >= MAX_SAMPLES {
            samples.pop_front();
        }
        samples.push_back(PollSample {
            duration_ms,
            success,
        });
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> PollMetrics {
        let samples = self.samples.read().await;
        let counters = self.counters.read().await;

        if samples.is_empty() {
            return PollMetrics::empty(&self.source_name);
        }

        // Percentiles are computed from successful polls only.
        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let success_rate = if counters.total > 0 {
            (counters.total - counters.failed) as f64 / counters.total as f64
        } else {
            1.0
        };

        PollMetrics {
            source_name: self.source_name.clone(),
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_polls: counters.total,
            failed_polls: counters.failed,
            rate_limited_polls: counters.rate_limited,
        }
    }
}

/// Calculate a nearest-rank percentile from sorted values
///
/// Uses the ceil(p/100 * n) rank, so the p50 of an even-sized window is the
/// lower median.
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let rank = (p / 100.0 * sorted_values.len() as f64).ceil() as usize;
    let idx = rank.saturating_sub(1);
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_poll_outcomes() {
        let collector = PollMetricsCollector::new("test");

        collector.record_poll(Duration::from_millis(100), true, false).await;
        collector.record_poll(Duration::from_millis(200), true, false).await;
        collector.record_poll(Duration::from_millis(150), false, true).await;

        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.source_name, "test");
        assert_eq!(metrics.total_polls, 3);
        assert_eq!(metrics.failed_polls, 1);
        assert_eq!(metrics.rate_limited_polls, 1);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
    }

    #[tokio::test]
    async fn empty_collector_reports_no_data() {
        let collector = PollMetricsCollector::new("test");
        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.total_polls, 0);
        assert_eq!(metrics.success_rate, 1.0);
    }

    #[test]
    fn percentile_of_sorted_values() {
        // Even-sized window: p50 is the lower median under nearest-rank.
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 10.0);

        let odd = vec![1.0, 2.0, 3.0];
        assert_eq!(percentile(&odd, 50.0), 2.0);

        assert_eq!(percentile(&[42.0], 50.0), 42.0);
        assert_eq!(percentile(&[42.0], 99.0), 42.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
