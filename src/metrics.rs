//! Prometheus metrics for the console session core
//!
//! # Exported metrics
//! - `dao_console_batch_duration_seconds` (histogram): refresh batch duration labeled by batch.
//! - `dao_console_batch_failures_total` (counter): failed refresh batches labeled by batch and error kind.
//! - `dao_console_uploads_total` (counter): finished uploads labeled by outcome.

use std::sync::atomic::AtomicU64;

use once_cell::sync::Lazy;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct BatchLabels {
    /// Batch name, e.g. "assets" or "overview_stats"
    pub batch: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct BatchErrorLabels {
    pub batch: String,
    /// Error kind, e.g. "source", "not_found"
    pub kind: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct UploadLabels {
    /// "success" or "failure"
    pub outcome: String,
}

pub static BATCH_DURATION_SECONDS: Lazy<Family<BatchLabels, Histogram>> = Lazy::new(|| {
    fn batch_histogram() -> Histogram {
        // 1ms .. ~32s across 16 buckets.
        Histogram::new(exponential_buckets(0.001, 2.0, 16))
    }

    Family::new_with_constructor(batch_histogram)
});

pub static BATCH_FAILURES_TOTAL: Lazy<Family<BatchErrorLabels, Counter<u64, AtomicU64>>> =
    Lazy::new(Family::default);

pub static UPLOADS_TOTAL: Lazy<Family<UploadLabels, Counter<u64, AtomicU64>>> =
    Lazy::new(Family::default);

pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::default();

    registry.register(
        "dao_console_batch_duration_seconds",
        "Duration of refresh batches in seconds",
        BATCH_DURATION_SECONDS.clone(),
    );
    registry.register(
        "dao_console_batch_failures",
        "Total number of failed refresh batches",
        BATCH_FAILURES_TOTAL.clone(),
    );
    registry.register(
        "dao_console_uploads",
        "Total number of finished uploads",
        UPLOADS_TOTAL.clone(),
    );
    // Counters get their `_total` suffix from the encoder.
    registry
});

pub fn observe_batch_duration_seconds(batch: &str, seconds: f64) {
    let labels = BatchLabels {
        batch: batch.to_string(),
    };
    BATCH_DURATION_SECONDS.get_or_create(&labels).observe(seconds);
}

pub fn inc_batch_failure(batch: &str, kind: &str) {
    let labels = BatchErrorLabels {
        batch: batch.to_string(),
        kind: kind.to_string(),
    };
    BATCH_FAILURES_TOTAL.get_or_create(&labels).inc();
}

pub fn inc_upload(success: bool) {
    let labels = UploadLabels {
        outcome: if success { "success" } else { "failure" }.to_string(),
    };
    UPLOADS_TOTAL.get_or_create(&labels).inc();
}

/// Render the registry in the Prometheus text exposition format.
pub fn encode() -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    prometheus_client::encoding::text::encode(&mut out, &REGISTRY)?;
    Ok(out)
}
