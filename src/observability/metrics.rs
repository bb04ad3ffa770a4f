//! Metrics collection.
//!
//! # Metrics
//! - `gate_verifications_total` (counter): verifications by outcome
//! - `gate_rejections_total` (counter): rejections by reason
//! - `gate_cache_lookups_total` (counter): memoization hits and misses
//! - `gate_cache_entries` (gauge): memoized outcomes held
//! - `gate_sources_blocked_total` (counter): sources locked out, by policy
//! - `gate_orders_total` (counter): order lifecycle events by status

use ::metrics::{counter, gauge};

use crate::pipeline::Verdict;

/// Record the final outcome of a verification.
pub fn record_verification(verdict: &Verdict) {
    match verdict {
        Ok(()) => {
            counter!("gate_verifications_total", "outcome" => "accepted").increment(1);
        }
        Err(rejection) => {
            counter!("gate_verifications_total", "outcome" => "rejected").increment(1);
            counter!("gate_rejections_total", "reason" => rejection.label()).increment(1);
        }
    }
}

/// Record a memoization lookup.
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("gate_cache_lookups_total", "result" => result).increment(1);
}

/// Record the number of memoized outcomes.
pub fn record_cache_size(entries: usize) {
    gauge!("gate_cache_entries").set(entries as f64);
}

/// Record a source being locked out.
pub fn record_source_blocked(policy: &'static str) {
    counter!("gate_sources_blocked_total", "policy" => policy).increment(1);
}

/// Record an order event.
pub fn record_order(status: &'static str) {
    counter!("gate_orders_total", "status" => status).increment(1);
}
