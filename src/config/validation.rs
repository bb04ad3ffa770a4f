//! Configuration validation.
//!
//! Checks value ranges (threshold, timeout), the log level, empty deny
//! patterns, and duplicate stages or principals. Every problem is reported, not only the
//! first one.

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::{GateConfig, StageKind};

/// Levels accepted for `observability.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pipeline.stages must not be empty")]
    NoStages,

    #[error("stage {0:?} appears more than once")]
    DuplicateStage(StageKind),

    #[error("pipeline.verify_timeout_ms must be greater than 0")]
    ZeroTimeout,

    #[error("abuse_guard.failure_threshold must be at least 1")]
    ZeroThreshold,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("sanitization.deny_patterns contains an empty pattern")]
    EmptyPattern,

    #[error("principal #{0} has an empty identifier")]
    EmptyIdentifier(usize),

    #[error("principal '{0}' has an empty secret")]
    EmptySecret(String),

    #[error("principal '{0}' is defined more than once")]
    DuplicatePrincipal(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.pipeline.stages.is_empty() {
        errors.push(ValidationError::NoStages);
    }
    let mut seen_stages = HashSet::new();
    for stage in &config.pipeline.stages {
        if !seen_stages.insert(*stage) {
            errors.push(ValidationError::DuplicateStage(*stage));
        }
    }

    if config.pipeline.verify_timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.abuse_guard.failure_threshold == 0 {
        errors.push(ValidationError::ZeroThreshold);
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    if config.sanitization.deny_patterns.iter().any(|p| p.is_empty()) {
        errors.push(ValidationError::EmptyPattern);
    }

    let mut seen_principals = HashSet::new();
    for (index, principal) in config.principals.iter().enumerate() {
        if principal.identifier.is_empty() {
            errors.push(ValidationError::EmptyIdentifier(index));
            continue;
        }
        if principal.secret.is_empty() {
            errors.push(ValidationError::EmptySecret(principal.identifier.clone()));
        }
        if !seen_principals.insert(principal.identifier.as_str()) {
            errors.push(ValidationError::DuplicatePrincipal(principal.identifier.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
