//! Stage outcomes and rejection reasons.

use thiserror::Error;

/// Why a request was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No registered principal matches the identifier/secret pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A field a stage depends on is absent or not text.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A text field contains a disallowed pattern.
    #[error("unsafe content in field '{field}' (matched '{pattern}')")]
    UnsafeContent { field: String, pattern: String },

    /// The source identifier is permanently blocked.
    #[error("source '{source_id}' is blocked")]
    SourceBlocked { source_id: String },

    /// Replayed from the memoization cache.
    #[error("cached failure: {0}")]
    CachedFailure(Box<Rejection>),

    /// The verification budget ran out before the chain finished.
    #[error("verification exceeded its {budget_ms}ms budget")]
    DeadlineExceeded { budget_ms: u64 },

    /// The chain passed without any stage resolving a principal.
    #[error("no principal resolved for request")]
    Unauthenticated,
}

impl Rejection {
    /// Transient rejections say nothing about the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, Rejection::DeadlineExceeded { .. })
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::InvalidCredentials => "invalid_credentials",
            Rejection::MissingField(_) => "missing_field",
            Rejection::UnsafeContent { .. } => "unsafe_content",
            Rejection::SourceBlocked { .. } => "source_blocked",
            Rejection::CachedFailure(_) => "cached_failure",
            Rejection::DeadlineExceeded { .. } => "deadline_exceeded",
            Rejection::Unauthenticated => "unauthenticated",
        }
    }
}

/// Outcome of a stage, or of the whole chain.
pub type Verdict = Result<(), Rejection>;
