//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::credentials::{Principal, Role};
use crate::security::sanitization::DEFAULT_DENY_PATTERNS;
use crate::security::LockoutPolicy;

/// Root configuration for the order gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Stage order and per-verification budget.
    pub pipeline: PipelineConfig,

    /// Disallowed content.
    pub sanitization: SanitizationConfig,

    /// Failure tracking and lockout.
    pub abuse_guard: AbuseGuardConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Registered principals, in lookup order.
    pub principals: Vec<PrincipalConfig>,
}

/// A pipeline stage selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Authentication,
    Sanitization,
    AbuseGuard,
    Memoization,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stages in execution order.
    pub stages: Vec<StageKind>,

    /// Optional time budget for a single verification, in milliseconds.
    pub verify_timeout_ms: Option<u64>,
}

impl PipelineConfig {
    pub fn verify_timeout(&self) -> Option<Duration> {
        self.verify_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: vec![
                StageKind::Memoization,
                StageKind::Sanitization,
                StageKind::AbuseGuard,
                StageKind::Authentication,
            ],
            verify_timeout_ms: None,
        }
    }
}

/// Sanitization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SanitizationConfig {
    /// Literal, case-sensitive substrings rejected in any text field.
    pub deny_patterns: Vec<String>,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            deny_patterns: DEFAULT_DENY_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Abuse guard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AbuseGuardConfig {
    /// Failures before a source is blocked.
    pub failure_threshold: u32,

    /// Per-source or stage-wide counting.
    pub policy: LockoutPolicy,
}

impl Default for AbuseGuardConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            policy: LockoutPolicy::PerSource,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for development, JSON for machine consumption.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// A principal definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrincipalConfig {
    pub identifier: String,
    pub secret: String,
    #[serde(default)]
    pub role: Role,
}

impl From<&PrincipalConfig> for Principal {
    fn from(config: &PrincipalConfig) -> Self {
        Principal::new(config.identifier.clone(), config.secret.clone(), config.role)
    }
}
