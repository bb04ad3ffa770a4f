//! Authentication stage.
//! Resolves the request's principal from the credential store.

use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::pipeline::{fields, Next, Rejection, Request, Stage, Verdict};

/// Matches request credentials against registered principals.
pub struct Authentication {
    store: Arc<CredentialStore>,
}

impl Authentication {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }
}

impl Stage for Authentication {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn check(&self, request: &mut Request, next: Next<'_>) -> Verdict {
        let identifier = request.text(fields::IDENTIFIER).unwrap_or_default();
        let secret = request.text(fields::SECRET).unwrap_or_default();

        match self.store.authenticate(identifier, secret) {
            Some(principal) => {
                tracing::debug!(
                    principal = %principal.identifier(),
                    role = %principal.role(),
                    "Principal authenticated"
                );
                request.annotate_principal(principal);
                next.run(request)
            }
            None => {
                tracing::warn!(identifier = %identifier, "Authentication failed");
                Err(Rejection::InvalidCredentials)
            }
        }
    }
}
