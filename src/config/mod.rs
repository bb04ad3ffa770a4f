//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → OrderGate::from_config builds the stage chain
//! ```
//!
//! # Design Decisions
//! - An empty file yields the default pipeline with no principals
//! - Stages are instantiated once per gate; the config is not consulted again
//! - serde rejects unknown stage names, validation.rs everything else

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::GateConfig;
pub use schema::{
    AbuseGuardConfig, LogFormat, ObservabilityConfig, PipelineConfig, PrincipalConfig,
    SanitizationConfig, StageKind,
};
pub use validation::{validate_config, ValidationError, LOG_LEVELS};
