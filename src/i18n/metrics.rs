//! Translation metrics and observability module.
//!
//! Translation failures never reach the caller, so these counters are the
//! only place a provider outage shows up besides the logs.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Global translation metrics singleton.
pub struct TranslationMetrics {
    /// Number of calls made to the translation provider
    api_calls: AtomicUsize,

    /// Number of calls that fell back to the untranslated source text
    fallbacks: AtomicUsize,

    /// Number of fields skipped because the source text was blank
    skipped: AtomicUsize,
}

static METRICS: OnceLock<TranslationMetrics> = OnceLock::new();

impl TranslationMetrics {
    /// Get the global translation metrics instance.
    pub fn global() -> &'static TranslationMetrics {
        METRICS.get_or_init(|| TranslationMetrics {
            api_calls: AtomicUsize::new(0),
            fallbacks: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
        })
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let calls = self.api_calls();
        let fallbacks = self.fallbacks();
        let api_success_rate = if calls > 0 {
            (calls.saturating_sub(fallbacks) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            api_calls: calls,
            fallbacks,
            skipped: self.skipped(),
            api_success_rate,
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.api_calls.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
    }
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Number of provider calls made
    pub api_calls: usize,

    /// Number of provider calls that fell back to the source text
    pub fallbacks: usize,

    /// Number of blank source fields that needed no call
    pub skipped: usize,

    /// Provider success rate as a percentage (0-100)
    pub api_success_rate: f64,
}
