//! Configuration types.

use std::time::Duration;

use crate::profile::UserRole;

/// Session router configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Designated bootstrap administrator email (case-insensitive match).
    pub admin_email: String,
    /// How long to wait for the profile record before treating it as absent.
    pub profile_wait: Duration,
    /// Extended wait applied when the cached role hint names a provider
    /// role. Provider registration writes a larger profile document and is
    /// slower to land.
    pub provider_profile_wait: Duration,
    /// Base interval between profile re-fetch attempts while waiting.
    pub poll_interval: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@gmail.com".to_string(),
            profile_wait: Duration::from_secs(3),
            provider_profile_wait: Duration::from_secs(8),
            poll_interval: Duration::from_millis(400),
        }
    }
}

impl RouterConfig {
    /// Deadline for the bounded profile wait given the current role hint.
    pub fn wait_for_hint(&self, hint: Option<UserRole>) -> Duration {
        match hint {
            Some(role) if role.is_provider() => self.provider_profile_wait,
            _ => self.profile_wait,
        }
    }
}
