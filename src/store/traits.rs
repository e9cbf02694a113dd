//! Role-hint cache boundary.

use async_trait::async_trait;

use crate::error::CacheError;

/// Keys used in the session cache.
pub mod cache_keys {
    /// Role chosen at registration, kept until the profile write is confirmed.
    pub const USER_ROLE: &str = "user_role";
    /// Whether the initial profile write reached the backend.
    pub const REGISTRATION_COMPLETE: &str = "registration_complete";
}

/// Durable client-side cache for registration-time session state.
///
/// Written at registration, read during bootstrap while the profile record
/// is still absent, cleared once a real profile is confirmed. Everything in
/// here is a best-effort tiebreaker; losing it costs an extra redirect hop,
/// never correctness.
#[async_trait]
pub trait RoleHintCache: Send + Sync {
    /// The cached role hint, if any.
    async fn role_hint(&self) -> Result<Option<String>, CacheError>;

    /// Store the role chosen at registration.
    async fn set_role_hint(&self, role: &str) -> Result<(), CacheError>;

    /// Whether the initial profile write was confirmed.
    async fn registration_complete(&self) -> Result<bool, CacheError>;

    /// Record whether the initial profile write was confirmed.
    async fn set_registration_complete(&self, complete: bool) -> Result<(), CacheError>;

    /// Drop all registration-time state.
    async fn clear(&self) -> Result<(), CacheError>;
}
