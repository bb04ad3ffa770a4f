//! Input sanitization stage.

use crate::pipeline::{Next, Rejection, Request, Stage, Verdict};

/// Patterns rejected when no configuration overrides them.
pub const DEFAULT_DENY_PATTERNS: &[&str] = &["<script>", ";", "--"];

/// Rejects requests whose text fields contain a disallowed substring.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    patterns: Vec<String>,
}

impl Sanitizer {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// First (field, pattern) pair that matches, if any.
    ///
    /// Only text fields are inspected; matching is a case-sensitive literal
    /// substring search.
    pub fn find_violation<'r>(&self, request: &'r Request) -> Option<(&'r str, &str)> {
        request.fields().find_map(|(name, value)| {
            let text = value.as_text()?;
            self.patterns
                .iter()
                .find(|pattern| text.contains(pattern.as_str()))
                .map(|pattern| (name, pattern.as_str()))
        })
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_DENY_PATTERNS.iter().map(|p| p.to_string()).collect())
    }
}

impl Stage for Sanitizer {
    fn name(&self) -> &'static str {
        "sanitization"
    }

    fn check(&self, request: &mut Request, next: Next<'_>) -> Verdict {
        if let Some((field, pattern)) = self.find_violation(request) {
            tracing::warn!(field = %field, pattern = %pattern, "Request contains unsafe content");
            return Err(Rejection::UnsafeContent {
                field: field.to_string(),
                pattern: pattern.to_string(),
            });
        }

        tracing::debug!("Request content clean");
        next.run(request)
    }
}
