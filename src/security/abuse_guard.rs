//! Abuse guard: failure tracking and permanent source lockout.
//!
//! # State Transitions
//! ```text
//! Open → Blocked: failures >= threshold (counter chosen by policy)
//! Blocked → (terminal, never cleared within the process)
//! ```
//!
//! # Design Decisions
//! - Only failures observed downstream of this stage are counted
//! - Blocked sources are rejected before the rest of the chain runs
//! - Transient rejections (deadline exceeded) are not counted
//! - The lock is never held while the rest of the chain runs

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::observability::metrics;
use crate::pipeline::{fields, Next, Rejection, Request, Stage, Verdict};

/// Which counter decides when a source is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockoutPolicy {
    /// Each source has its own failure counter.
    #[default]
    PerSource,
    /// One counter for the whole stage; the source on the request that
    /// reaches the threshold is blocked, whichever sources caused the
    /// earlier failures.
    Global,
}

impl LockoutPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockoutPolicy::PerSource => "per_source",
            LockoutPolicy::Global => "global",
        }
    }
}

#[derive(Debug, Default)]
struct GuardState {
    total_failures: u64,
    failures: HashMap<String, u64>,
    blocked: HashSet<String>,
}

/// Tracks failures per source and blocks abusive callers.
#[derive(Debug)]
pub struct AbuseGuard {
    threshold: u64,
    policy: LockoutPolicy,
    state: Mutex<GuardState>,
}

impl AbuseGuard {
    pub fn new(threshold: u32, policy: LockoutPolicy) -> Self {
        Self {
            threshold: u64::from(threshold),
            policy,
            state: Mutex::new(GuardState::default()),
        }
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    pub fn is_blocked(&self, source: &str) -> bool {
        self.lock().blocked.contains(source)
    }

    /// All failures this stage has observed.
    pub fn total_failures(&self) -> u64 {
        self.lock().total_failures
    }

    /// Failures observed for a single source.
    pub fn failures_for(&self, source: &str) -> u64 {
        self.lock().failures.get(source).copied().unwrap_or(0)
    }

    /// Blocked sources, sorted.
    pub fn blocked_sources(&self) -> Vec<String> {
        let mut blocked: Vec<String> = self.lock().blocked.iter().cloned().collect();
        blocked.sort();
        blocked
    }

    fn record_failure(&self, source: &str) {
        let mut state = self.lock();
        state.total_failures += 1;
        let source_failures = {
            let count = state.failures.entry(source.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let counted = match self.policy {
            LockoutPolicy::PerSource => source_failures,
            LockoutPolicy::Global => state.total_failures,
        };

        if counted >= self.threshold && state.blocked.insert(source.to_string()) {
            tracing::warn!(
                source = %source,
                failures = counted,
                policy = self.policy.as_str(),
                "Source blocked after repeated failures"
            );
            metrics::record_source_blocked(self.policy.as_str());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GuardState> {
        self.state.lock().expect("abuse guard mutex poisoned")
    }
}

impl Default for AbuseGuard {
    fn default() -> Self {
        Self::new(3, LockoutPolicy::default())
    }
}

impl Stage for AbuseGuard {
    fn name(&self) -> &'static str {
        "abuse_guard"
    }

    fn check(&self, request: &mut Request, next: Next<'_>) -> Verdict {
        let source = match request.text(fields::SOURCE) {
            Some(source) => source.to_string(),
            None => return Err(Rejection::MissingField(fields::SOURCE.to_string())),
        };

        if self.is_blocked(&source) {
            tracing::warn!(source = %source, "Request from blocked source");
            return Err(Rejection::SourceBlocked { source_id: source });
        }

        let verdict = next.run(request);
        if let Err(rejection) = &verdict {
            if !rejection.is_transient() {
                self.record_failure(&source);
            }
        }
        verdict
    }

    fn stats(&self) -> Option<serde_json::Value> {
        let state = self.lock();
        let mut blocked: Vec<&String> = state.blocked.iter().collect();
        blocked.sort();
        Some(serde_json::json!({
            "policy": self.policy.as_str(),
            "threshold": self.threshold,
            "total_failures": state.total_failures,
            "failures": state.failures,
            "blocked": blocked,
        }))
    }
}
