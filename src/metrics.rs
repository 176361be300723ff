//! Prometheus metrics for index loading and query execution.
//!
//! # Example
//! ```no_run
//! use djadb_catalog::metrics::{init_metrics, gather_metrics};
//!
//! init_metrics().expect("metrics registry");
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "djadb_catalog";

lazy_static! {
    /// Registry holding every metric of this crate
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Index document loads
    ///
    /// Labels: outcome (success, failure)
    pub static ref INDEX_LOADS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("index_loads_total", "Index document loads by outcome").namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create INDEX_LOADS_TOTAL metric");

    /// Records available after the last load
    pub static ref INDEX_RECORDS: Gauge = Gauge::with_opts(
        Opts::new("index_records", "Records available after the last load").namespace(NAMESPACE)
    ).expect("Failed to create INDEX_RECORDS metric");

    /// Records dropped while decoding index documents
    pub static ref INDEX_RECORDS_DROPPED_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("index_records_dropped_total", "Malformed or duplicate records dropped")
            .namespace(NAMESPACE)
    ).expect("Failed to create INDEX_RECORDS_DROPPED_TOTAL metric");

    /// Index load duration in seconds
    pub static ref INDEX_LOAD_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("index_load_duration_seconds", "Index load duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0])
    ).expect("Failed to create INDEX_LOAD_DURATION_SECONDS metric");

    /// Executed queries
    ///
    /// Labels: sort
    pub static ref SEARCH_QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("search_queries_total", "Executed queries by sort strategy").namespace(NAMESPACE),
        &["sort"]
    ).expect("Failed to create SEARCH_QUERIES_TOTAL metric");

    /// Query pipeline duration in seconds
    pub static ref SEARCH_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("search_duration_seconds", "Query pipeline duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25])
    ).expect("Failed to create SEARCH_DURATION_SECONDS metric");
}

/// Register all metrics with [`PROMETHEUS_REGISTRY`]
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(INDEX_LOADS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(INDEX_RECORDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(INDEX_RECORDS_DROPPED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(INDEX_LOAD_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_QUERIES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_DURATION_SECONDS.clone()))?;
    Ok(())
}

/// Text exposition of the registry
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&PROMETHEUS_REGISTRY.gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
