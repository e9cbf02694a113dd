//! REST client for the identity provider.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentityError;
use crate::identity::provider::{Identity, IdentityProvider};

/// HTTP client for the hosted identity service.
pub struct RestIdentityProvider {
    base_url: String,
    client: reqwest::Client,
}

impl RestIdentityProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn submit(
        &self,
        path: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        let request = CredentialRequest {
            email,
            password: password.expose_secret(),
        };

        let response = self
            .client
            .post(self.endpoint(path))
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(&request)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let account: AccountResponse = response
                .json()
                .await
                .map_err(|e| IdentityError::Network(format!("invalid account payload: {e}")))?;
            return Ok(Identity {
                uid: account.uid,
                email: account.email,
                display_name: account.display_name,
            });
        }

        // The provider reports failures as { "error": { "code": "..." } }.
        let code = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error.code)
            .unwrap_or_else(|_| status.to_string());
        Err(error_from_code(&code))
    }
}

#[derive(Debug, Serialize)]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    uid: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
}

/// Map a provider wire code to a structured error.
fn error_from_code(code: &str) -> IdentityError {
    match code {
        "user-not-found" => IdentityError::UserNotFound,
        "wrong-password" => IdentityError::WrongPassword,
        "invalid-email" => IdentityError::InvalidEmail,
        "too-many-requests" => IdentityError::TooManyRequests,
        "email-already-in-use" => IdentityError::EmailAlreadyInUse,
        "weak-password" => IdentityError::WeakPassword,
        other => IdentityError::Unexpected {
            code: other.to_string(),
        },
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        self.submit("/auth/sign-in", email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        self.submit("/auth/sign-up", email, password).await
    }
}
