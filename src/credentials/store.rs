//! Principal registry used by the authentication stage.

use std::sync::Arc;
use thiserror::Error;

use crate::credentials::principal::Principal;

/// Errors raised while registering principals.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A principal with this identifier is already registered.
    #[error("principal '{0}' is already registered")]
    DuplicateIdentifier(String),

    /// Identifiers must not be empty.
    #[error("principal identifier must not be empty")]
    EmptyIdentifier,
}

/// Holds registered principals in registration order.
#[derive(Debug, Default)]
pub struct CredentialStore {
    principals: Vec<Arc<Principal>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a set of principals, rejecting duplicates.
    pub fn from_principals(
        principals: impl IntoIterator<Item = Principal>,
    ) -> Result<Self, CredentialError> {
        let mut store = Self::new();
        for principal in principals {
            store.register(principal)?;
        }
        Ok(store)
    }

    /// Register a principal.
    pub fn register(&mut self, principal: Principal) -> Result<Arc<Principal>, CredentialError> {
        if principal.identifier().is_empty() {
            return Err(CredentialError::EmptyIdentifier);
        }
        if self.find(principal.identifier()).is_some() {
            return Err(CredentialError::DuplicateIdentifier(
                principal.identifier().to_string(),
            ));
        }

        let principal = Arc::new(principal);
        self.principals.push(principal.clone());
        Ok(principal)
    }

    /// Resolve the first principal matching both identifier and secret.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Option<Arc<Principal>> {
        self.principals
            .iter()
            .find(|p| p.matches(identifier, secret))
            .cloned()
    }

    /// Look up a principal by identifier only.
    pub fn find(&self, identifier: &str) -> Option<Arc<Principal>> {
        self.principals
            .iter()
            .find(|p| p.identifier() == identifier)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}
