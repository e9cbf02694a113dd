//! Identity provider boundary.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// An authenticated account as issued by the identity provider.
///
/// Immutable for the lifetime of the session; the uid is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
        }
    }

    /// Email normalized for comparisons (trimmed, lower-cased).
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Credential-based identity provider (external collaborator).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in to an existing account.
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError>;

    /// Create a new account.
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_email_lowercases_and_trims() {
        let identity = Identity::new("u1", "  Admin@Gmail.COM ");
        assert_eq!(identity.normalized_email(), "admin@gmail.com");
    }
}
