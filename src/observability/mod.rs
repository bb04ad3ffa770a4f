//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → whatever recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Every verification runs inside a span carrying a request ID
//! - Metrics are no-ops until a recorder is installed
//! - Secrets are never logged

pub mod logging;
pub mod metrics;
