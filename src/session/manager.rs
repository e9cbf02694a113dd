//! Session manager: coordinates sign-in, profile bootstrap, and the
//! role-hint cache.
//!
//! The manager is the "calling layer" around the pure router: it owns the
//! signed-in identity slot, reads and clears the cached role hint, and runs
//! the bounded profile wait. Every page that needs post-auth navigation
//! consumes decisions from here.

use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use secrecy::SecretString;
use tokio::sync::watch;

use crate::config::RouterConfig;
use crate::error::{Error, IdentityError, Result};
use crate::identity::{Identity, IdentityProvider};
use crate::profile::{NewProfile, ProfileRecord, ProfileStore, UserRole};
use crate::router::{ProfileOutcome, RoutingDecision};
use crate::session::bootstrap::bootstrap_session;
use crate::store::RoleHintCache;

/// Input to [`SessionManager::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: SecretString,
    pub name: String,
    pub role: UserRole,
    pub picture: Option<String>,
    /// Free-form business fields collected by the registration form.
    pub profile_data: serde_json::Value,
}

/// Coordinates the identity provider, profile store, hint cache, and router.
pub struct SessionManager {
    identities: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    cache: Arc<dyn RoleHintCache>,
    config: RouterConfig,
    identity_tx: watch::Sender<Option<Identity>>,
}

impl SessionManager {
    pub fn new(
        identities: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn RoleHintCache>,
        config: RouterConfig,
    ) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            identities,
            profiles,
            cache,
            config,
            identity_tx,
        }
    }

    /// Currently signed-in identity, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }

    /// Subscribe to identity changes. The bootstrap wait watches this to
    /// cancel on logout.
    pub fn identity_watch(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }

    /// Sign in and compute the post-login destination.
    ///
    /// Identity-provider failures (bad credentials, throttling) propagate
    /// verbatim; they are the only errors shown to the user as rejections of
    /// the attempt itself.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<RoutingDecision> {
        validate_email_shape(email)?;
        let identity = self.identities.sign_in(email, password).await?;
        tracing::info!(email = %identity.normalized_email(), "signed in");
        self.identity_tx.send_replace(Some(identity));
        self.bootstrap().await
    }

    /// Create an account, stash the role hint, and submit the initial
    /// profile.
    pub async fn register(&self, registration: Registration) -> Result<RoutingDecision> {
        validate_email_shape(&registration.email)?;
        let identity = self
            .identities
            .sign_up(&registration.email, &registration.password)
            .await?;
        tracing::info!(
            email = %identity.normalized_email(),
            role = %registration.role,
            "account created"
        );

        // The hint must be durable before the profile write: a navigation
        // arriving ahead of the (eventually consistent) write still routes
        // the new account to the right view. Losing the hint costs an extra
        // redirect hop, so a cache failure is not fatal here.
        if let Err(err) = self.stash_hint(registration.role).await {
            tracing::warn!(error = %err, "failed to stash role hint");
        }

        self.identity_tx.send_replace(Some(identity.clone()));

        let new_profile = NewProfile {
            uid: identity.uid.clone(),
            email: identity.normalized_email(),
            name: registration.name,
            role: registration.role,
            picture: registration.picture,
            profile_data: registration.profile_data,
        };
        match self.profiles.register(&new_profile).await {
            Ok(_) => {
                if let Err(err) = self.cache.set_registration_complete(true).await {
                    tracing::warn!(error = %err, "failed to mark registration complete");
                }
            }
            Err(err) => {
                // Keep the hint: bootstrap still routes the new account to
                // the right view, and the profile write can be retried from
                // the onboarding page.
                tracing::warn!(error = %err, "initial profile write failed");
            }
        }

        self.bootstrap().await
    }

    /// Compute the destination for the current identity.
    ///
    /// This is the one operation every post-auth page consumes. Never fails
    /// on routing concerns: store outages degrade, missing identities route
    /// to login.
    pub async fn bootstrap(&self) -> Result<RoutingDecision> {
        let hint = match self.cache.role_hint().await {
            Ok(hint) => hint,
            Err(err) => {
                tracing::warn!(error = %err, "role hint unavailable, continuing without it");
                None
            }
        };

        let outcome = bootstrap_session(
            self.identity_tx.subscribe(),
            Arc::clone(&self.profiles),
            hint,
            self.config.clone(),
        )
        .await;

        if matches!(outcome.profile, ProfileOutcome::Loaded(_)) {
            // The hint has served its purpose once a real record exists.
            if let Err(err) = self.cache.clear().await {
                tracing::warn!(error = %err, "failed to clear role hint cache");
            }
        }

        Ok(outcome.decision)
    }

    async fn stash_hint(&self, role: UserRole) -> std::result::Result<(), crate::error::CacheError> {
        self.cache.set_role_hint(role.as_str()).await?;
        self.cache.set_registration_complete(false).await
    }

    /// Patch the current account's profile (used by onboarding forms).
    pub async fn update_profile(&self, patch: &serde_json::Value) -> Result<ProfileRecord> {
        let identity = self.current_identity().ok_or(Error::NotSignedIn)?;
        Ok(self.profiles.update(&identity.uid, patch).await?)
    }

    /// Clear the signed-in identity. An in-flight bootstrap observes the
    /// cleared slot and routes to login.
    pub fn logout(&self) {
        tracing::info!("signed out");
        self.identity_tx.send_replace(None);
    }
}

static EMAIL_SHAPE: OnceLock<Regex> = OnceLock::new();

/// Cheap local check so obviously malformed addresses fail fast without a
/// provider round-trip. The provider stays authoritative.
fn validate_email_shape(email: &str) -> std::result::Result<(), IdentityError> {
    let shape = EMAIL_SHAPE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"));
    if shape.is_match(email.trim()) {
        Ok(())
    } else {
        Err(IdentityError::InvalidEmail)
    }
}
