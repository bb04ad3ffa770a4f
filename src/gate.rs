//! Pipeline orchestration and order registration.
//!
//! # Responsibilities
//! - Own the ordered stage chain
//! - Run verifications and hand out `Verified` tokens
//! - Register and confirm orders for verified requests
//!
//! # Design Decisions
//! - Registering requires a `Verified` token, so an order can never be
//!   created for a request that did not pass the chain
//! - Stages are built once per gate and shared through `Arc`

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::Memoizer;
use crate::config::{ConfigError, GateConfig, StageKind};
use crate::credentials::{CredentialStore, Principal};
use crate::observability::metrics;
use crate::orders::{Order, OrderBook, OrderError, OrderId};
use crate::pipeline::{fields, Next, Rejection, Request, Stage};
use crate::security::{AbuseGuard, Authentication, Sanitizer};

/// Proof that a request passed the whole chain with a resolved principal.
#[derive(Debug)]
pub struct Verified {
    request_id: Uuid,
    request: Request,
    principal: Arc<Principal>,
}

impl Verified {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn principal(&self) -> &Arc<Principal> {
        &self.principal
    }
}

/// The validation pipeline plus the orders it admits.
pub struct OrderGate {
    stages: Vec<Arc<dyn Stage>>,
    verify_timeout: Option<Duration>,
    orders: OrderBook,
}

impl OrderGate {
    pub fn builder() -> OrderGateBuilder {
        OrderGateBuilder::default()
    }

    /// Build a gate from a validated configuration.
    pub fn from_config(config: &GateConfig) -> Result<Self, ConfigError> {
        let store = Arc::new(CredentialStore::from_principals(
            config.principals.iter().map(Principal::from),
        )?);

        let mut builder = Self::builder().verify_timeout(config.pipeline.verify_timeout());
        for kind in &config.pipeline.stages {
            let stage: Arc<dyn Stage> = match kind {
                StageKind::Authentication => Arc::new(Authentication::new(store.clone())),
                StageKind::Sanitization => {
                    Arc::new(Sanitizer::new(config.sanitization.deny_patterns.clone()))
                }
                StageKind::AbuseGuard => Arc::new(AbuseGuard::new(
                    config.abuse_guard.failure_threshold,
                    config.abuse_guard.policy,
                )),
                StageKind::Memoization => Arc::new(Memoizer::new()),
            };
            builder = builder.stage(stage);
        }

        tracing::info!(
            stages = ?config.pipeline.stages,
            principals = store.len(),
            "Order gate configured"
        );
        Ok(builder.build())
    }

    /// Run a request through the chain.
    pub fn verify(&self, mut request: Request) -> Result<Verified, Rejection> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("verify", request_id = %request_id);
        let _enter = span.enter();

        // Only stages may resolve a principal.
        request.clear_annotations();
        let verdict = Next::new(&self.stages, self.verify_timeout).run(&mut request);
        metrics::record_verification(&verdict);

        let principal = match verdict {
            Ok(()) => request.principal().cloned(),
            Err(rejection) => {
                tracing::info!(reason = %rejection, "Request rejected");
                return Err(rejection);
            }
        };

        match principal {
            Some(principal) => {
                tracing::info!(principal = %principal.identifier(), "Request verified");
                Ok(Verified {
                    request_id,
                    request,
                    principal,
                })
            }
            None => {
                tracing::warn!("Chain passed without resolving a principal");
                Err(Rejection::Unauthenticated)
            }
        }
    }

    /// Create a pending order for a verified request.
    pub fn register_order(&self, verified: Verified) -> Result<Order, OrderError> {
        let kind = verified
            .request
            .text(fields::KIND)
            .ok_or(OrderError::MissingKind)?;

        let order = self.orders.create(kind, verified.principal.clone());
        tracing::info!(
            request_id = %verified.request_id,
            order_id = %order.id,
            kind = %order.kind,
            owner = %order.owner.identifier(),
            "Order registered"
        );
        Ok(order)
    }

    /// Move a pending order to confirmed.
    pub fn confirm_order(&self, id: OrderId) -> Result<Order, OrderError> {
        let order = self.orders.confirm(id)?;
        tracing::info!(order_id = %id, "Order confirmed");
        Ok(order)
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.orders.get(id)
    }

    /// All orders in ascending id order.
    pub fn orders(&self) -> Vec<Order> {
        self.orders.all()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Per-stage counters keyed by stage name.
    pub fn stage_stats(&self) -> serde_json::Value {
        let stats: serde_json::Map<String, serde_json::Value> = self
            .stages
            .iter()
            .filter_map(|s| s.stats().map(|v| (s.name().to_string(), v)))
            .collect();
        serde_json::Value::Object(stats)
    }
}

/// Assembles a gate from explicitly constructed stages.
#[derive(Default)]
pub struct OrderGateBuilder {
    stages: Vec<Arc<dyn Stage>>,
    verify_timeout: Option<Duration>,
}

impl OrderGateBuilder {
    /// Append a stage to the end of the chain.
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn verify_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.verify_timeout = timeout;
        self
    }

    pub fn build(self) -> OrderGate {
        OrderGate {
            stages: self.stages,
            verify_timeout: self.verify_timeout,
            orders: OrderBook::new(),
        }
    }
}
