//! Process-wide operational counters
//!
//! One global [`MetricsCollector`] tracks request outcomes, which resolution
//! strategy answered, and a rolling latency window. The `/metrics` route
//! serializes a [`MetricsSnapshot`] of it. Counters are atomics; only the
//! latency window and the lifecycle state sit behind mutexes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use serde::Serialize;

/// Only the most recent latencies feed the percentile figures
const LATENCY_WINDOW: usize = 1000;

pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// The global collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

pub struct MetricsCollector {
    requests_received: AtomicU64,
    requests_in_flight: AtomicU64,
    requests_answered: AtomicU64,
    requests_failed: AtomicU64,
    requests_rejected: AtomicU64,

    answers_from_intent: AtomicU64,
    answers_from_contact: AtomicU64,
    answers_from_content: AtomicU64,
    answers_from_model: AtomicU64,
    content_lookup_errors: AtomicU64,

    response_times_ms: Mutex<VecDeque<u64>>,

    service_state: Mutex<String>,
    uptime_start: AtomicU64,
    state_transitions: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests_received: AtomicU64::new(0),
            requests_in_flight: AtomicU64::new(0),
            requests_answered: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            answers_from_intent: AtomicU64::new(0),
            answers_from_contact: AtomicU64::new(0),
            answers_from_content: AtomicU64::new(0),
            answers_from_model: AtomicU64::new(0),
            content_lookup_errors: AtomicU64::new(0),
            response_times_ms: Mutex::new(VecDeque::with_capacity(LATENCY_WINDOW)),
            service_state: Mutex::new("initializing".to_string()),
            uptime_start: AtomicU64::new(unix_now()),
            state_transitions: AtomicU64::new(0),
        }
    }

    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
        self.requests_in_flight.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_answered(&self, elapsed: Duration) {
        self.requests_answered.fetch_add(1, Ordering::Relaxed);
        self.requests_in_flight.fetch_sub(1, Ordering::Relaxed);
        self.push_latency(elapsed);
    }

    /// Failures count toward latency too; a slow failure is still slow
    pub fn request_failed(&self, elapsed: Duration) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
        self.requests_in_flight.fetch_sub(1, Ordering::Relaxed);
        self.push_latency(elapsed);
    }

    /// Input validation rejections (empty message)
    pub fn request_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
        self.requests_in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    fn push_latency(&self, elapsed: Duration) {
        if let Ok(mut window) = self.response_times_ms.lock() {
            if window.len() == LATENCY_WINDOW {
                window.pop_front();
            }
            window.push_back(elapsed.as_millis() as u64);
        }
    }

    /// Record which strategy produced an answer
    pub fn answer_resolved(&self, source: &str) {
        match source {
            "intent" => &self.answers_from_intent,
            "contact" => &self.answers_from_contact,
            "content" => &self.answers_from_content,
            "model" => &self.answers_from_model,
            _ => return,
        }
        .fetch_add(1, Ordering::Relaxed);
    }

    pub fn content_lookup_failed(&self) {
        self.content_lookup_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_service_state(&self, state: &str) {
        if let Ok(mut current) = self.service_state.lock() {
            if *current != state {
                self.state_transitions.fetch_add(1, Ordering::Relaxed);
                *current = state.to_string();
            }
        }
    }

    /// Zero everything; used between tests
    pub fn reset(&self) {
        for counter in [
            &self.requests_received,
            &self.requests_in_flight,
            &self.requests_answered,
            &self.requests_failed,
            &self.requests_rejected,
            &self.answers_from_intent,
            &self.answers_from_contact,
            &self.answers_from_content,
            &self.answers_from_model,
            &self.content_lookup_errors,
            &self.state_transitions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.uptime_start.store(unix_now(), Ordering::Relaxed);

        if let Ok(mut window) = self.response_times_ms.lock() {
            window.clear();
        }
        if let Ok(mut state) = self.service_state.lock() {
            *state = "initializing".to_string();
        }
    }

    fn latency_stats(&self) -> (f64, f64, f64, f64) {
        let window = match self.response_times_ms.lock() {
            Ok(window) if !window.is_empty() => window,
            _ => return (0.0, 0.0, 0.0, 0.0),
        };

        let mut sorted: Vec<u64> = window.iter().copied().collect();
        sorted.sort_unstable();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        (
            avg,
            percentile(&sorted, 50.0),
            percentile(&sorted, 95.0),
            percentile(&sorted, 99.0),
        )
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        let now = unix_now();
        let (avg, p50, p95, p99) = self.latency_stats();

        MetricsSnapshot {
            requests: RequestMetrics {
                received: self.requests_received.load(Ordering::Relaxed),
                in_flight: self.requests_in_flight.load(Ordering::Relaxed),
                answered: self.requests_answered.load(Ordering::Relaxed),
                failed: self.requests_failed.load(Ordering::Relaxed),
                rejected: self.requests_rejected.load(Ordering::Relaxed),
                avg_response_time_ms: avg,
                response_time_p50_ms: p50,
                response_time_p95_ms: p95,
                response_time_p99_ms: p99,
            },
            resolution: ResolutionMetrics {
                from_intent: self.answers_from_intent.load(Ordering::Relaxed),
                from_contact: self.answers_from_contact.load(Ordering::Relaxed),
                from_content: self.answers_from_content.load(Ordering::Relaxed),
                from_model: self.answers_from_model.load(Ordering::Relaxed),
                content_lookup_errors: self.content_lookup_errors.load(Ordering::Relaxed),
            },
            lifecycle: LifecycleMetrics {
                current_state: self
                    .service_state
                    .lock()
                    .map(|s| s.clone())
                    .unwrap_or_else(|_| "unknown".to_string()),
                uptime_seconds: now.saturating_sub(self.uptime_start.load(Ordering::Relaxed)),
                state_transitions: self.state_transitions.load(Ordering::Relaxed),
            },
            timestamp: now,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything `/metrics` reports
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub requests: RequestMetrics,
    pub resolution: ResolutionMetrics,
    pub lifecycle: LifecycleMetrics,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct RequestMetrics {
    pub received: u64,
    pub in_flight: u64,
    pub answered: u64,
    pub failed: u64,
    pub rejected: u64,
    pub avg_response_time_ms: f64,
    pub response_time_p50_ms: f64,
    pub response_time_p95_ms: f64,
    pub response_time_p99_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct ResolutionMetrics {
    pub from_intent: u64,
    pub from_contact: u64,
    pub from_content: u64,
    pub from_model: u64,
    pub content_lookup_errors: u64,
}

#[derive(Debug, Serialize)]
pub struct LifecycleMetrics {
    pub current_state: String,
    pub uptime_seconds: u64,
    pub state_transitions: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Linear interpolation between the two samples straddling the rank
fn percentile(sorted: &[u64], pct: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only as f64,
        _ => {
            let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
            let below = sorted[rank.floor() as usize] as f64;
            let above = sorted[rank.ceil() as usize] as f64;
            below + (above - below) * rank.fract()
        }
    }
}
