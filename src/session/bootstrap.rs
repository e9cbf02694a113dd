//! Bounded wait for the post-auth profile fetch.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;

use crate::config::RouterConfig;
use crate::error::ProfileError;
use crate::identity::Identity;
use crate::profile::{ProfileStore, UserRole};
use crate::router::{
    Destination, ProfileOutcome, RoutingDecision, is_bootstrap_admin, resolve_destination,
};

/// Result of a bootstrap: the decision plus the profile state it was derived
/// from. The caller uses the profile state to manage the hint lifecycle
/// (clear it once a real record exists); the router itself has no side
/// effects.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub decision: RoutingDecision,
    pub profile: ProfileOutcome,
}

impl BootstrapOutcome {
    fn settled(decision: RoutingDecision, profile: ProfileOutcome) -> Self {
        Self { decision, profile }
    }

    fn unfetched(decision: RoutingDecision) -> Self {
        Self {
            decision,
            profile: ProfileOutcome::Absent,
        }
    }
}

/// Wait for the profile fetch to settle, then produce the routing decision.
///
/// The wait is bounded: store NotFound is retried on a jittered interval
/// until the deadline (new-account profile writes are eventually
/// consistent), after which the record is treated as absent. The deadline is
/// extended when the cached hint names a provider role. A logout while
/// waiting abandons the fetch and routes to login immediately.
pub async fn bootstrap_session(
    mut identity_rx: watch::Receiver<Option<Identity>>,
    store: Arc<dyn ProfileStore>,
    role_hint: Option<String>,
    config: RouterConfig,
) -> BootstrapOutcome {
    let identity = identity_rx.borrow().clone();
    let Some(identity) = identity else {
        return BootstrapOutcome::unfetched(RoutingDecision::to(Destination::Login));
    };

    // Evaluated before the fetch, so the override also covers fetch failure.
    if is_bootstrap_admin(&identity.email, &config.admin_email) {
        tracing::debug!(email = %identity.normalized_email(), "bootstrap admin signed in");
        return BootstrapOutcome::unfetched(RoutingDecision::to(Destination::AdminPanel));
    }

    let hint_role = role_hint.as_deref().and_then(UserRole::parse_hint);
    let deadline = config.wait_for_hint(hint_role);

    let settled = tokio::select! {
        settled = wait_for_profile(store, &identity.uid, deadline, config.poll_interval) => settled,
        _ = identity_cleared(&mut identity_rx) => {
            tracing::debug!("identity cleared mid-wait, abandoning bootstrap");
            return BootstrapOutcome::unfetched(RoutingDecision::to(Destination::Login));
        }
    };

    match settled {
        Ok(profile) => {
            let decision = resolve_destination(
                Some(&identity),
                &profile,
                role_hint.as_deref(),
                &config.admin_email,
            );
            BootstrapOutcome::settled(decision, profile)
        }
        Err(err) => {
            // Degraded routing: a store outage must not strand the user on an
            // error page. Worst case is an extra redirect hop once the store
            // is reachable again.
            tracing::warn!(error = %err, "profile fetch failed, routing to customer home");
            BootstrapOutcome::unfetched(RoutingDecision::to(Destination::CustomerHome))
        }
    }
}

/// Poll the store until it yields a record, fails hard, or the deadline
/// passes. NotFound before the deadline means "keep waiting"; NotFound at
/// the deadline means the record is genuinely absent.
async fn wait_for_profile(
    store: Arc<dyn ProfileStore>,
    uid: &str,
    deadline: Duration,
    poll_interval: Duration,
) -> Result<ProfileOutcome, ProfileError> {
    let settle = async {
        loop {
            match store.fetch(uid).await {
                Ok(record) => return Ok(ProfileOutcome::Loaded(record)),
                Err(ProfileError::NotFound) => {
                    tokio::time::sleep(jittered(poll_interval)).await;
                }
                Err(err) => return Err(err),
            }
        }
    };

    match tokio::time::timeout(deadline, settle).await {
        Ok(settled) => settled,
        Err(_) => Ok(ProfileOutcome::Absent),
    }
}

/// Spread polls out a little so tabs bootstrapping in lockstep do not hammer
/// the store.
fn jittered(base: Duration) -> Duration {
    base.mul_f64(rand::thread_rng().gen_range(0.8..1.25))
}

/// Resolves once the identity slot is cleared (logout) or the sender side of
/// the session is gone.
async fn identity_cleared(rx: &mut watch::Receiver<Option<Identity>>) {
    while rx.changed().await.is_ok() {
        if rx.borrow().is_none() {
            return;
        }
    }
}
