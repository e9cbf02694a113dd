//! Profile store boundary.

use async_trait::async_trait;

use crate::error::ProfileError;
use crate::profile::model::{NewProfile, ProfileRecord};

/// The external profile service, keyed by the identity provider's uid.
///
/// `fetch` returning [`ProfileError::NotFound`] is the expected outcome for
/// brand-new accounts, not a failure: routing treats it as "no record yet".
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for an account.
    async fn fetch(&self, uid: &str) -> Result<ProfileRecord, ProfileError>;

    /// Create the profile written at registration time.
    async fn register(&self, profile: &NewProfile) -> Result<ProfileRecord, ProfileError>;

    /// Patch fields on an existing profile.
    async fn update(
        &self,
        uid: &str,
        patch: &serde_json::Value,
    ) -> Result<ProfileRecord, ProfileError>;
}
