//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::metrics::Histogram;

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    let duration = start.elapsed().as_secs_f64();
    histogram.record(duration, attributes);
}

// Router metric names
pub const ROUTER_REQUEST_DURATION: &str = "router.request.duration";
pub const ROUTER_REQUEST_COUNT: &str = "router.request.count";
