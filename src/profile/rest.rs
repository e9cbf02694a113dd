//! REST client for the profile service.

use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::error::ProfileError;
use crate::profile::model::{NewProfile, ProfileRecord};
use crate::profile::store::ProfileStore;

/// HTTP client for the marketplace backend's `/users` endpoints.
pub struct RestProfileStore {
    base_url: String,
    client: reqwest::Client,
}

impl RestProfileStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn decode(response: reqwest::Response) -> Result<ProfileRecord, ProfileError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<ProfileRecord>().await.map_err(|e| {
                ProfileError::Unexpected {
                    status: status.as_u16(),
                    reason: format!("invalid profile payload: {e}"),
                }
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }
}

/// Map a non-success HTTP status to a discriminated failure kind.
fn classify_status(status: StatusCode, body: &str) -> ProfileError {
    if status == StatusCode::NOT_FOUND {
        return ProfileError::NotFound;
    }
    ProfileError::Unexpected {
        status: status.as_u16(),
        reason: if body.is_empty() {
            status.to_string()
        } else {
            body.to_string()
        },
    }
}

/// Map a reqwest transport failure. Everything that never produced a status
/// line counts as a connectivity problem.
fn transport_error(err: reqwest::Error) -> ProfileError {
    ProfileError::Network {
        reason: err.to_string(),
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn fetch(&self, uid: &str) -> Result<ProfileRecord, ProfileError> {
        let response = self
            .client
            .get(self.endpoint("/users/profile"))
            .header("x-account-id", uid)
            .header("x-request-id", Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn register(&self, profile: &NewProfile) -> Result<ProfileRecord, ProfileError> {
        let response = self
            .client
            .post(self.endpoint("/users/register"))
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(profile)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }

    async fn update(
        &self,
        uid: &str,
        patch: &serde_json::Value,
    ) -> Result<ProfileRecord, ProfileError> {
        let response = self
            .client
            .put(self.endpoint("/users/profile"))
            .header("x-account-id", uid)
            .header("x-request-id", Uuid::new_v4().to_string())
            .json(patch)
            .send()
            .await
            .map_err(transport_error)?;
        Self::decode(response).await
    }
}
