//! End-to-end behavior of the validation pipeline.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use order_gate::config::parse_config;
use order_gate::orders::{OrderId, OrderStatus};
use order_gate::pipeline::{Next, Verdict};
use order_gate::security::LockoutPolicy;
use order_gate::{OrderGate, Rejection, Request, Stage};

mod common;

#[test]
fn test_valid_request_is_annotated() {
    let h = common::default_harness(LockoutPolicy::PerSource);

    let verified = h
        .gate
        .verify(Request::order("admin", "admin123", "purchase", "10.0.0.1"))
        .expect("valid request rejected");

    assert_eq!(verified.principal().identifier(), "admin");
    assert_eq!(verified.request().text("kind"), Some("purchase"));
}

#[test]
fn test_wrong_secret_rejected() {
    let h = common::default_harness(LockoutPolicy::PerSource);

    let err = h
        .gate
        .verify(Request::order("user1", "incorrect", "purchase", "192.168.1.2"))
        .unwrap_err();
    assert_eq!(err, Rejection::InvalidCredentials);
}

#[test]
fn test_unsafe_content_rejected_despite_valid_credentials() {
    let h = common::default_harness(LockoutPolicy::PerSource);

    for kind in ["purchase<script>", "purchase; drop", "purchase --"] {
        let err = h
            .gate
            .verify(Request::order("admin", "admin123", kind, "192.168.1.3"))
            .unwrap_err();
        assert!(matches!(err, Rejection::UnsafeContent { .. }), "{kind}: {err}");
    }
}

#[test]
fn test_repeated_unsafe_request_served_from_cache() {
    let h = common::default_harness(LockoutPolicy::PerSource);
    let request = Request::order("admin", "admin123", "purchase<script>", "S1");
    let failures_before = h.guard.total_failures();

    let first = h.gate.verify(request.clone()).unwrap_err();
    assert!(matches!(first, Rejection::UnsafeContent { .. }));

    let second = h.gate.verify(request).unwrap_err();
    assert_eq!(second, Rejection::CachedFailure(Box::new(first)));

    assert_eq!(h.guard.total_failures(), failures_before);
    assert_eq!(h.guard.failures_for("S1"), 0);
    assert!(!h.guard.is_blocked("S1"));
    assert_eq!(h.memo.hits(), 1);
    assert_eq!(h.memo.misses(), 1);
}

#[test]
fn test_unsafe_content_never_counts_toward_lockout() {
    let h = common::default_harness(LockoutPolicy::PerSource);

    for kind in ["a<script>", "b;", "c--", "d<script>"] {
        h.gate
            .verify(Request::order("admin", "admin123", kind, "S9"))
            .unwrap_err();
    }

    assert_eq!(h.guard.total_failures(), 0);
    assert!(h.gate.verify(Request::order("admin", "admin123", "purchase", "S9")).is_ok());
}

#[test]
fn test_source_locked_out_after_three_failures() {
    for policy in [LockoutPolicy::PerSource, LockoutPolicy::Global] {
        let h = common::default_harness(policy);

        // Distinct payloads, so each one reaches the guard.
        for secret in ["wrong-1", "wrong-2", "wrong-3"] {
            let err = h
                .gate
                .verify(Request::order("user1", secret, "purchase", "S2"))
                .unwrap_err();
            assert_eq!(err, Rejection::InvalidCredentials);
        }
        assert!(h.guard.is_blocked("S2"));

        let err = h
            .gate
            .verify(Request::order("user1", "pass1", "purchase", "S2"))
            .unwrap_err();
        assert_eq!(err, Rejection::SourceBlocked { source_id: "S2".into() });

        // Other sources are unaffected.
        assert!(h
            .gate
            .verify(Request::order("user1", "pass1", "purchase", "S7"))
            .is_ok());
    }
}

#[test]
fn test_global_policy_blocks_unrelated_source() {
    let h = common::default_harness(LockoutPolicy::Global);

    h.gate.verify(Request::order("user1", "x", "purchase", "A")).unwrap_err();
    h.gate.verify(Request::order("user1", "y", "purchase", "B")).unwrap_err();
    h.gate.verify(Request::order("user1", "z", "purchase", "C")).unwrap_err();

    assert_eq!(h.guard.blocked_sources(), vec!["C".to_string()]);
    assert!(h.gate.verify(Request::order("user1", "pass1", "sale", "A")).is_ok());
    assert!(h.gate.verify(Request::order("user1", "pass1", "sale", "C")).is_err());
}

#[test]
fn test_identical_failures_counted_once() {
    let h = common::default_harness(LockoutPolicy::PerSource);
    let request = Request::order("user1", "incorrect", "purchase", "192.168.1.100");

    for _ in 0..3 {
        h.gate.verify(request.clone()).unwrap_err();
    }

    assert_eq!(h.guard.failures_for("192.168.1.100"), 1);
    assert!(!h.guard.is_blocked("192.168.1.100"));
}

#[test]
fn test_sale_orders_numbered_across_cache_hits() {
    let h = common::default_harness(LockoutPolicy::PerSource);
    let request = Request::order("user1", "pass1", "sale", "S3");

    let verified = h.gate.verify(request.clone()).unwrap();
    let first = h.gate.register_order(verified).unwrap();
    assert_eq!(first.id, OrderId(1));
    assert_eq!(first.kind, "sale");
    assert_eq!(first.status, OrderStatus::Pending);
    assert_eq!(first.owner.identifier(), "user1");

    let verified = h.gate.verify(request).unwrap();
    assert_eq!(h.memo.hits(), 1);
    assert_eq!(verified.principal().identifier(), "user1");

    let second = h.gate.register_order(verified).unwrap();
    assert_eq!(second.id, OrderId(2));
    assert_eq!(second.status, OrderStatus::Pending);

    let ids: Vec<u64> = h.gate.orders().iter().map(|o| o.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_order_confirmation_lifecycle() {
    let h = common::default_harness(LockoutPolicy::PerSource);

    let verified = h
        .gate
        .verify(Request::order("admin", "admin123", "purchase", "S4"))
        .unwrap();
    let order = h.gate.register_order(verified).unwrap();

    let confirmed = h.gate.confirm_order(order.id).unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert!(h.gate.confirm_order(order.id).is_err());
    assert!(h.gate.confirm_order(OrderId(42)).is_err());
}

#[test]
fn test_authentication_first_order_skips_guard_on_bad_credentials() {
    let h = common::authentication_first_harness(LockoutPolicy::PerSource);

    for _ in 0..4 {
        h.gate
            .verify(Request::order("user1", "incorrect", "purchase", "S2"))
            .unwrap_err();
    }
    assert_eq!(h.guard.total_failures(), 0);
    assert!(h.gate.verify(Request::order("user1", "pass1", "purchase", "S2")).is_ok());
}

#[test]
fn test_cached_success_survives_later_block() {
    let h = common::default_harness(LockoutPolicy::PerSource);
    let good = Request::order("user1", "pass1", "sale", "S5");

    h.gate.verify(good.clone()).unwrap();
    for secret in ["a", "b", "c"] {
        h.gate
            .verify(Request::order("user1", secret, "sale", "S5"))
            .unwrap_err();
    }
    assert!(h.guard.is_blocked("S5"));

    // The memoized payload is answered before the guard sees it.
    assert!(h.gate.verify(good).is_ok());
    assert!(h.gate.verify(Request::order("user1", "pass1", "rent", "S5")).is_err());
}

/// Stage that burns time before handing over.
struct Slow(Duration);

impl Stage for Slow {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn check(&self, request: &mut Request, next: Next<'_>) -> Verdict {
        thread::sleep(self.0);
        next.run(request)
    }
}

#[test]
fn test_deadline_is_not_cached_or_counted() {
    let h = common::default_harness(LockoutPolicy::PerSource);
    let memo = h.memo.clone();
    let guard = h.guard.clone();

    let gate = OrderGate::builder()
        .stage(memo.clone())
        .stage(guard.clone())
        .stage(Arc::new(Slow(Duration::from_millis(30))))
        .verify_timeout(Some(Duration::from_millis(5)))
        .build();

    let request = Request::order("user1", "pass1", "sale", "S6");
    for _ in 0..2 {
        let err = gate.verify(request.clone()).unwrap_err();
        assert_eq!(err, Rejection::DeadlineExceeded { budget_ms: 5 });
    }

    assert!(memo.is_empty());
    assert_eq!(guard.total_failures(), 0);
}

#[test]
fn test_gate_from_config_runs_scenarios() {
    let config = parse_config(
        r#"
        [[principals]]
        identifier = "admin"
        secret = "admin123"
        role = "admin"

        [[principals]]
        identifier = "user1"
        secret = "pass1"
        "#,
    )
    .unwrap();
    let gate = OrderGate::from_config(&config).unwrap();

    assert!(gate
        .verify(Request::order("admin", "admin123", "purchase<script>", "S1"))
        .is_err());
    let verified = gate
        .verify(Request::order("user1", "pass1", "sale", "S3"))
        .unwrap();
    assert_eq!(gate.register_order(verified).unwrap().id, OrderId(1));

    let stats = gate.stage_stats();
    assert_eq!(stats["memoization"]["entries"], 2);
}
