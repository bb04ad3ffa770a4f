//! Registered identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a principal acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

/// A registered identity that can authenticate with identifier and secret.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    identifier: String,
    #[serde(skip_serializing)]
    secret: String,
    role: Role,
}

impl Principal {
    /// Create a new principal.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>, role: Role) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            role,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Exact, case-sensitive match of both fields.
    pub fn matches(&self, identifier: &str, secret: &str) -> bool {
        self.identifier == identifier && self.secret == secret
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
