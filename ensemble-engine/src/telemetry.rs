//! Engine telemetry
//!
//! Aggregate counters and a fixed-bucket latency histogram, updated with
//! relaxed atomics so recording never blocks the generation hot path.
//! Per-request details are logged at `debug!` only; this module is what
//! dashboards poll instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use ensemble_common::GenerationTier;

/// Upper bounds of the latency histogram buckets, in milliseconds
///
/// One extra overflow bucket catches everything above the last bound.
const BUCKET_BOUNDS_MS: [u64; 12] = [1, 2, 5, 10, 25, 50, 100, 250, 500, 1000, 2500, 5000];

const BUCKET_COUNT: usize = BUCKET_BOUNDS_MS.len() + 1;

// ============================================================================
// Recorder
// ============================================================================

/// Thread-safe aggregate telemetry for one engine instance
///
/// All methods take `&self`; concurrent generation threads record freely.
#[derive(Debug, Default)]
pub struct EngineTelemetry {
    requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    tier_strict: AtomicU64,
    tier_relaxed: AtomicU64,
    tier_rule_based: AtomicU64,
    tier_minimal_fallback: AtomicU64,
    deadline_aborts: AtomicU64,
    scoring_errors: AtomicU64,
    harmony_skips: AtomicU64,
    dropped_tags: AtomicU64,
    latency_buckets: [AtomicU64; BUCKET_COUNT],
    latency_total_ms: AtomicU64,
    latency_max_ms: AtomicU64,
}

impl EngineTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed generation that produced an outfit
    pub fn record_success(&self, tier: GenerationTier, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
        let counter = match tier {
            GenerationTier::Strict => &self.tier_strict,
            GenerationTier::Relaxed => &self.tier_relaxed,
            GenerationTier::RuleBased => &self.tier_rule_based,
            GenerationTier::MinimalFallback => &self.tier_minimal_fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }

    /// Record a generation that returned a hard error
    pub fn record_failure(&self, latency: Duration) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }

    /// Record a deadline expiry that skipped ahead to cheap tiers
    pub fn record_deadline_abort(&self) {
        self.deadline_aborts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a scoring-stage error treated as zero candidates
    pub fn record_scoring_error(&self) {
        self.scoring_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a skipped pairwise harmony pass
    pub fn record_harmony_skip(&self) {
        self.harmony_skips.fetch_add(1, Ordering::Relaxed);
    }

    /// Add tags dropped during normalization
    pub fn add_dropped_tags(&self, count: usize) {
        if count > 0 {
            self.dropped_tags.fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    fn record_latency(&self, latency: Duration) {
        let ms = latency.as_millis().min(u64::MAX as u128) as u64;
        let bucket = BUCKET_BOUNDS_MS
            .iter()
            .position(|bound| ms <= *bound)
            .unwrap_or(BUCKET_COUNT - 1);
        self.latency_buckets[bucket].fetch_add(1, Ordering::Relaxed);
        self.latency_total_ms.fetch_add(ms, Ordering::Relaxed);
        self.latency_max_ms.fetch_max(ms, Ordering::Relaxed);
    }

    /// Read a consistent-enough snapshot of all counters
    ///
    /// Individual loads are relaxed; a snapshot taken mid-request may be
    /// off by one in-flight request, which is fine for dashboards.
    pub fn snapshot(&self) -> AggregateMetrics {
        let requests = self.requests.load(Ordering::Relaxed);
        let successes = self.successes.load(Ordering::Relaxed);
        let buckets: Vec<u64> = self
            .latency_buckets
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect();
        let samples: u64 = buckets.iter().sum();
        let total_ms = self.latency_total_ms.load(Ordering::Relaxed);

        AggregateMetrics {
            requests,
            successes,
            failures: self.failures.load(Ordering::Relaxed),
            success_rate: if requests > 0 {
                successes as f64 / requests as f64
            } else {
                0.0
            },
            tiers: TierCounts {
                strict: self.tier_strict.load(Ordering::Relaxed),
                relaxed: self.tier_relaxed.load(Ordering::Relaxed),
                rule_based: self.tier_rule_based.load(Ordering::Relaxed),
                minimal_fallback: self.tier_minimal_fallback.load(Ordering::Relaxed),
            },
            latency: LatencyStats {
                p50_ms: percentile_ms(&buckets, samples, 0.50),
                p95_ms: percentile_ms(&buckets, samples, 0.95),
                p99_ms: percentile_ms(&buckets, samples, 0.99),
                mean_ms: if samples > 0 {
                    total_ms as f64 / samples as f64
                } else {
                    0.0
                },
                max_ms: self.latency_max_ms.load(Ordering::Relaxed),
            },
            deadline_aborts: self.deadline_aborts.load(Ordering::Relaxed),
            scoring_errors: self.scoring_errors.load(Ordering::Relaxed),
            harmony_skips: self.harmony_skips.load(Ordering::Relaxed),
            dropped_tags: self.dropped_tags.load(Ordering::Relaxed),
        }
    }
}

/// Bucket-upper-bound percentile estimate
///
/// Reports the upper bound of the bucket containing the q-th sample, so
/// estimates err on the pessimistic side. The overflow bucket reports the
/// last finite bound.
fn percentile_ms(buckets: &[u64], samples: u64, q: f64) -> u64 {
    if samples == 0 {
        return 0;
    }
    let rank = ((samples as f64) * q).ceil().max(1.0) as u64;
    let mut cumulative = 0u64;
    for (i, count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= rank {
            return BUCKET_BOUNDS_MS
                .get(i)
                .copied()
                .unwrap_or(BUCKET_BOUNDS_MS[BUCKET_BOUNDS_MS.len() - 1]);
        }
    }
    BUCKET_BOUNDS_MS[BUCKET_BOUNDS_MS.len() - 1]
}

// ============================================================================
// Snapshot Types
// ============================================================================

/// Outfits served per degradation tier
#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub strict: u64,
    pub relaxed: u64,
    pub rule_based: u64,
    pub minimal_fallback: u64,
}

/// Latency distribution estimates in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct LatencyStats {
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
    pub mean_ms: f64,
    pub max_ms: u64,
}

/// Read-only metrics snapshot for dashboards
#[derive(Debug, Clone, Serialize)]
pub struct AggregateMetrics {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    /// successes / requests, 0.0 before any request
    pub success_rate: f64,
    pub tiers: TierCounts,
    pub latency: LatencyStats,
    pub deadline_aborts: u64,
    pub scoring_errors: u64,
    pub harmony_skips: u64,
    pub dropped_tags: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let telemetry = EngineTelemetry::new();
        let metrics = telemetry.snapshot();
        assert_eq!(metrics.requests, 0);
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(metrics.latency.p95_ms, 0);
    }

    #[test]
    fn test_success_counts_by_tier() {
        let telemetry = EngineTelemetry::new();
        telemetry.record_success(GenerationTier::Strict, Duration::from_millis(3));
        telemetry.record_success(GenerationTier::Strict, Duration::from_millis(4));
        telemetry.record_success(GenerationTier::MinimalFallback, Duration::from_millis(1));
        telemetry.record_failure(Duration::from_millis(1));

        let metrics = telemetry.snapshot();
        assert_eq!(metrics.requests, 4);
        assert_eq!(metrics.successes, 3);
        assert_eq!(metrics.failures, 1);
        assert_eq!(metrics.tiers.strict, 2);
        assert_eq!(metrics.tiers.minimal_fallback, 1);
        assert_eq!(metrics.tiers.relaxed, 0);
        assert!((metrics.success_rate - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_percentiles_report_bucket_upper_bounds() {
        let telemetry = EngineTelemetry::new();
        // 99 fast requests and one slow one
        for _ in 0..99 {
            telemetry.record_success(GenerationTier::Strict, Duration::from_millis(3));
        }
        telemetry.record_success(GenerationTier::Strict, Duration::from_millis(400));

        let metrics = telemetry.snapshot();
        assert_eq!(metrics.latency.p50_ms, 5);
        assert_eq!(metrics.latency.p95_ms, 5);
        assert_eq!(metrics.latency.p99_ms, 5);
        assert_eq!(metrics.latency.max_ms, 400);
    }

    #[test]
    fn test_overflow_bucket() {
        let telemetry = EngineTelemetry::new();
        telemetry.record_success(GenerationTier::Strict, Duration::from_secs(30));
        let metrics = telemetry.snapshot();
        // Over-bound samples land in the overflow bucket; the estimate
        // saturates at the last finite bound while max keeps the truth
        assert_eq!(metrics.latency.p50_ms, 5000);
        assert_eq!(metrics.latency.max_ms, 30_000);
    }

    #[test]
    fn test_auxiliary_counters() {
        let telemetry = EngineTelemetry::new();
        telemetry.record_deadline_abort();
        telemetry.record_scoring_error();
        telemetry.record_harmony_skip();
        telemetry.record_harmony_skip();
        telemetry.add_dropped_tags(7);
        telemetry.add_dropped_tags(0);

        let metrics = telemetry.snapshot();
        assert_eq!(metrics.deadline_aborts, 1);
        assert_eq!(metrics.scoring_errors, 1);
        assert_eq!(metrics.harmony_skips, 2);
        assert_eq!(metrics.dropped_tags, 7);
    }

    #[test]
    fn test_snapshot_serializes() {
        let telemetry = EngineTelemetry::new();
        telemetry.record_success(GenerationTier::Relaxed, Duration::from_millis(12));
        let json = serde_json::to_string(&telemetry.snapshot()).unwrap();
        assert!(json.contains("\"success_rate\":1.0"), "got {json}");
        assert!(json.contains("\"relaxed\":1"), "got {json}");
    }
}
