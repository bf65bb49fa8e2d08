//! Prometheus metrics for monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total requests processed
    pub requests_total: AtomicU64,
    /// Failed requests
    pub requests_failed: AtomicU64,
    /// Tool calls
    pub tool_calls: AtomicU64,
    /// Total search queries
    pub searches_total: AtomicU64,
    /// Matches returned across all searches
    pub matches_returned: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_tool_calls(&self) {
        self.tool_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_searches(&self) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_matches(&self, count: u64) {
        self.matches_returned.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            tool_calls: self.tool_calls.load(Ordering::Relaxed),
            searches_total: self.searches_total.load(Ordering::Relaxed),
            matches_returned: self.matches_returned.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"# HELP rails_api_search_requests_total Total number of requests
# TYPE rails_api_search_requests_total counter
rails_api_search_requests_total {}

# HELP rails_api_search_requests_failed Failed requests
# TYPE rails_api_search_requests_failed counter
rails_api_search_requests_failed {}

# HELP rails_api_search_tool_calls Tool calls count
# TYPE rails_api_search_tool_calls counter
rails_api_search_tool_calls {}

# HELP rails_api_search_searches_total Total search queries
# TYPE rails_api_search_searches_total counter
rails_api_search_searches_total {}

# HELP rails_api_search_matches_returned Matches returned by searches
# TYPE rails_api_search_matches_returned counter
rails_api_search_matches_returned {}
"#,
            s.requests_total, s.requests_failed, s.tool_calls, s.searches_total, s.matches_returned
        )
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_failed: u64,
    pub tool_calls: u64,
    pub searches_total: u64,
    pub matches_returned: u64,
}

/// Timer for measuring durations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
