//! Shared utilities for integration tests.

use std::sync::Arc;

use order_gate::cache::Memoizer;
use order_gate::credentials::{CredentialStore, Principal, Role};
use order_gate::security::{AbuseGuard, Authentication, LockoutPolicy, Sanitizer};
use order_gate::OrderGate;

/// Stage handles kept by tests to observe side effects.
#[allow(dead_code)]
pub struct Harness {
    pub gate: OrderGate,
    pub guard: Arc<AbuseGuard>,
    pub memo: Arc<Memoizer>,
}

/// The two principals registered in every test gate.
pub fn credential_store() -> Arc<CredentialStore> {
    let store = CredentialStore::from_principals([
        Principal::new("admin", "admin123", Role::Admin),
        Principal::new("user1", "pass1", Role::Customer),
    ])
    .unwrap();
    Arc::new(store)
}

/// Gate with the default order: memoization, sanitization, abuse guard, authentication.
pub fn default_harness(policy: LockoutPolicy) -> Harness {
    let guard = Arc::new(AbuseGuard::new(3, policy));
    let memo = Arc::new(Memoizer::new());
    let gate = OrderGate::builder()
        .stage(memo.clone())
        .stage(Arc::new(Sanitizer::default()))
        .stage(guard.clone())
        .stage(Arc::new(Authentication::new(credential_store())))
        .build();
    Harness { gate, guard, memo }
}

/// Gate with the stages in the order authentication, sanitization, abuse guard, memoization.
#[allow(dead_code)]
pub fn authentication_first_harness(policy: LockoutPolicy) -> Harness {
    let guard = Arc::new(AbuseGuard::new(3, policy));
    let memo = Arc::new(Memoizer::new());
    let gate = OrderGate::builder()
        .stage(Arc::new(Authentication::new(credential_store())))
        .stage(Arc::new(Sanitizer::default()))
        .stage(guard.clone())
        .stage(memo.clone())
        .build();
    Harness { gate, guard, memo }
}
