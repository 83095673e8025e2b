use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Request counters shared by every clone of a client.
#[derive(Debug, Clone)]
pub struct RequestStats {
    start_time: Instant,
    request_count: Arc<AtomicUsize>,
    failure_count: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub requests: usize,
    pub failures: usize,
    pub elapsed_secs: f32,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            request_count: Arc::new(AtomicUsize::new(0)),
            failure_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn increment_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failure(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.request_count.load(Ordering::Relaxed),
            failures: self.failure_count.load(Ordering::Relaxed),
            elapsed_secs: self.start_time.elapsed().as_secs_f32(),
        }
    }
}
