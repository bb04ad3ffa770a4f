//! Stage contract and chain traversal.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::pipeline::request::Request;
use crate::pipeline::verdict::{Rejection, Verdict};

/// A unit of verification in the chain.
///
/// Implementations either reject the request without touching `next`, or call
/// `next.run(request)` exactly once and return (or observe, then return) its
/// verdict.
pub trait Stage: Send + Sync {
    /// Short identifier used in logs and statistics.
    fn name(&self) -> &'static str;

    fn check(&self, request: &mut Request, next: Next<'_>) -> Verdict;

    /// Stage-specific counters for introspection.
    fn stats(&self) -> Option<serde_json::Value> {
        None
    }
}

/// The remainder of the chain after the current stage.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Stage>],
    started: Instant,
    budget: Option<Duration>,
}

impl<'a> Next<'a> {
    /// Start a traversal over `stages`, optionally bounded by `budget`.
    pub fn new(stages: &'a [Arc<dyn Stage>], budget: Option<Duration>) -> Self {
        Self {
            rest: stages,
            started: Instant::now(),
            budget,
        }
    }

    /// True when no stage remains.
    pub fn is_end(&self) -> bool {
        self.rest.is_empty()
    }

    /// Run the remaining stages. An exhausted chain passes.
    pub fn run(self, request: &mut Request) -> Verdict {
        if let Some(budget) = self.budget {
            if self.started.elapsed() > budget {
                let budget_ms = budget.as_millis() as u64;
                tracing::warn!(budget_ms, "Verification deadline exceeded");
                return Err(Rejection::DeadlineExceeded { budget_ms });
            }
        }

        match self.rest.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    rest,
                    started: self.started,
                    budget: self.budget,
                };
                stage.check(request, next)
            }
            None => Ok(()),
        }
    }
}
