//! Memoization stage.
//!
//! Caches the outcome of the rest of the chain keyed by the request's input
//! fields. A hit short-circuits without invoking any later stage, so their
//! side effects (failure counting included) do not happen again.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::credentials::Principal;
use crate::observability::metrics;
use crate::pipeline::{Next, Rejection, Request, Stage, Verdict};

/// A stored outcome.
#[derive(Debug, Clone)]
struct CachedOutcome {
    verdict: Verdict,
    /// Principal resolved by the chain when it passed.
    principal: Option<Arc<Principal>>,
}

/// Caches chain outcomes for identical requests. Entries never expire.
#[derive(Debug, Default)]
pub struct Memoizer {
    entries: DashMap<String, CachedOutcome>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Memoizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cached verdict for a request, if one exists.
    pub fn lookup(&self, request: &Request) -> Option<Verdict> {
        self.entries
            .get(&request.canonical_key())
            .map(|entry| entry.value().verdict.clone())
    }
}

impl Stage for Memoizer {
    fn name(&self) -> &'static str {
        "memoization"
    }

    fn check(&self, request: &mut Request, next: Next<'_>) -> Verdict {
        let key = request.canonical_key();

        // Clone out so no shard lock is held while the chain runs.
        let cached = self.entries.get(&key).map(|entry| entry.value().clone());
        if let Some(outcome) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            metrics::record_cache_lookup(true);
            tracing::debug!("Outcome served from cache");

            return match outcome.verdict {
                Ok(()) => {
                    if let Some(principal) = outcome.principal {
                        request.annotate_principal(principal);
                    }
                    Ok(())
                }
                Err(rejection) => Err(Rejection::CachedFailure(Box::new(rejection))),
            };
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::record_cache_lookup(false);
        tracing::debug!("No cached outcome");

        let verdict = next.run(request);
        if matches!(&verdict, Err(rejection) if rejection.is_transient()) {
            return verdict;
        }

        let principal = match verdict {
            Ok(()) => request.principal().cloned(),
            Err(_) => None,
        };
        self.entries.insert(
            key,
            CachedOutcome {
                verdict: verdict.clone(),
                principal,
            },
        );
        metrics::record_cache_size(self.entries.len());

        verdict
    }

    fn stats(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "entries": self.len(),
            "hits": self.hits(),
            "misses": self.misses(),
        }))
    }
}
