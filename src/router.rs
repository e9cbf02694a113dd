//! Post-auth routing: decides where a session lands after sign-in.
//!
//! The decision is a pure function over the identity, the settled profile
//! state, and the best-effort role hint cached at registration. The async
//! work of settling the profile fetch lives in [`crate::session::bootstrap`];
//! by the time this module runs, the fetch is done.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::profile::{ProfileRecord, UserRole};

/// Navigation targets the presentation layer knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Login,
    CustomerHome,
    FreelancerHome,
    JobSeekerHome,
    AdminPanel,
    ProviderOnboarding,
    ProviderDashboard,
}

impl Destination {
    /// Route path understood by the frontend shell.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::CustomerHome => "/customer/home",
            Self::FreelancerHome => "/freelancer/home",
            Self::JobSeekerHome => "/jobseeker/home",
            Self::AdminPanel => "/admin",
            Self::ProviderOnboarding => "/provider/onboarding",
            Self::ProviderDashboard => "/provider/dashboard",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Settled result of the profile fetch.
///
/// The in-flight state has no representation here: the caller must wait (or
/// time out) before asking for a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutcome {
    /// The store confirmed no record exists, or the bounded wait expired.
    Absent,
    Loaded(ProfileRecord),
}

/// The single routing decision produced per bootstrap. Derived, never
/// persisted; recomputed on every bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingDecision {
    pub destination: Destination,
    pub requires_onboarding: bool,
}

impl RoutingDecision {
    pub fn to(destination: Destination) -> Self {
        Self {
            destination,
            requires_onboarding: false,
        }
    }

    pub fn onboarding() -> Self {
        Self {
            destination: Destination::ProviderOnboarding,
            requires_onboarding: true,
        }
    }
}

/// Whether this email belongs to the designated bootstrap administrator.
///
/// Kept as a named policy so the hard-coded email match can later be swapped
/// for a role-based check without touching the decision table.
pub fn is_bootstrap_admin(email: &str, admin_email: &str) -> bool {
    email.trim().eq_ignore_ascii_case(admin_email.trim())
}

/// Compute the routing decision for a settled session state.
///
/// Total over its inputs: no identity falls back to login, an unrecognized
/// or missing role falls back to customer home. The role hint is only
/// consulted while the profile record is absent (the new-account window
/// where the registration write has not landed yet).
pub fn resolve_destination(
    identity: Option<&Identity>,
    profile: &ProfileOutcome,
    role_hint: Option<&str>,
    admin_email: &str,
) -> RoutingDecision {
    let Some(identity) = identity else {
        return RoutingDecision::to(Destination::Login);
    };

    // Evaluated before any profile state, including fetch failures.
    if is_bootstrap_admin(&identity.email, admin_email) {
        return RoutingDecision::to(Destination::AdminPanel);
    }

    match profile {
        ProfileOutcome::Absent => match role_hint.and_then(UserRole::parse_hint) {
            Some(role) if role.is_provider() => RoutingDecision::onboarding(),
            hinted => RoutingDecision::to(home_for_role(hinted.unwrap_or(UserRole::Customer))),
        },
        ProfileOutcome::Loaded(record) => {
            if !record.role.is_provider() {
                RoutingDecision::to(home_for_role(record.role))
            } else if record.is_complete() {
                RoutingDecision::to(Destination::ProviderDashboard)
            } else {
                RoutingDecision::onboarding()
            }
        }
    }
}

/// Home view for a non-provider role. Provider roles never reach this
/// mapping; anything unrecognized lands on the customer home.
fn home_for_role(role: UserRole) -> Destination {
    match role {
        UserRole::Freelancer => Destination::FreelancerHome,
        UserRole::JobSeeker => Destination::JobSeekerHome,
        UserRole::Admin => Destination::AdminPanel,
        _ => Destination::CustomerHome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "admin@gmail.com";

    fn identity(email: &str) -> Identity {
        Identity::new("uid-1", email)
    }

    fn provider_record(role: UserRole, profile_complete: bool, completed: bool) -> ProfileRecord {
        ProfileRecord {
            profile_complete,
            completed,
            ..ProfileRecord::new(role)
        }
    }

    // ── Step 1: no identity ─────────────────────────────────────────

    #[test]
    fn no_identity_always_routes_to_login() {
        let loaded = ProfileOutcome::Loaded(provider_record(UserRole::Caterer, true, true));
        for profile in [ProfileOutcome::Absent, loaded] {
            for hint in [None, Some("photographer"), Some("admin"), Some("garbage")] {
                let decision = resolve_destination(None, &profile, hint, ADMIN);
                assert_eq!(decision.destination, Destination::Login);
                assert!(!decision.requires_onboarding);
            }
        }
    }

    // ── Admin override ──────────────────────────────────────────────

    #[test]
    fn admin_email_short_circuits_everything() {
        let id = identity("Admin@Gmail.Com");
        let incomplete = ProfileOutcome::Loaded(provider_record(UserRole::Caterer, false, false));
        for profile in [ProfileOutcome::Absent, incomplete] {
            let decision = resolve_destination(Some(&id), &profile, Some("photographer"), ADMIN);
            assert_eq!(decision.destination, Destination::AdminPanel);
            assert!(!decision.requires_onboarding);
        }
    }

    #[test]
    fn admin_policy_is_case_insensitive() {
        assert!(is_bootstrap_admin("ADMIN@GMAIL.COM", ADMIN));
        assert!(is_bootstrap_admin(" admin@gmail.com ", ADMIN));
        assert!(!is_bootstrap_admin("admin@gmail.co", ADMIN));
        assert!(!is_bootstrap_admin("not-admin@gmail.com", ADMIN));
    }

    // ── Steps 3–4: absent profile, routed by hint ───────────────────

    #[test]
    fn absent_profile_with_provider_hint_routes_to_onboarding() {
        let id = identity("new@x.com");
        for hint in ["event_company", "caterer", "transport", "photographer"] {
            let decision =
                resolve_destination(Some(&id), &ProfileOutcome::Absent, Some(hint), ADMIN);
            assert_eq!(decision.destination, Destination::ProviderOnboarding, "hint {hint}");
            assert!(decision.requires_onboarding);
        }
    }

    #[test]
    fn absent_profile_with_non_provider_hint_routes_home() {
        let id = identity("new@x.com");
        let cases = [
            ("customer", Destination::CustomerHome),
            ("freelancer", Destination::FreelancerHome),
            ("jobseeker", Destination::JobSeekerHome),
            ("admin", Destination::AdminPanel),
        ];
        for (hint, expected) in cases {
            let decision =
                resolve_destination(Some(&id), &ProfileOutcome::Absent, Some(hint), ADMIN);
            assert_eq!(decision.destination, expected, "hint {hint}");
            assert!(!decision.requires_onboarding);
        }
    }

    #[test]
    fn absent_profile_with_missing_or_garbled_hint_defaults_to_customer() {
        let id = identity("new@x.com");
        for hint in [None, Some(""), Some("wizard"), Some("provider")] {
            let decision = resolve_destination(Some(&id), &ProfileOutcome::Absent, hint, ADMIN);
            assert_eq!(decision.destination, Destination::CustomerHome);
            assert!(!decision.requires_onboarding);
        }
    }

    // ── Step 5: loaded non-provider roles ───────────────────────────

    #[test]
    fn non_provider_roles_ignore_completion_flags() {
        let id = identity("u@x.com");
        let cases = [
            (UserRole::Customer, Destination::CustomerHome),
            (UserRole::Freelancer, Destination::FreelancerHome),
            (UserRole::JobSeeker, Destination::JobSeekerHome),
            (UserRole::Admin, Destination::AdminPanel),
        ];
        for (role, expected) in cases {
            for (pc, c) in [(false, false), (true, false), (false, true), (true, true)] {
                let profile = ProfileOutcome::Loaded(provider_record(role, pc, c));
                let decision = resolve_destination(Some(&id), &profile, None, ADMIN);
                assert_eq!(decision.destination, expected, "role {role}, flags {pc}/{c}");
                assert!(!decision.requires_onboarding);
            }
        }
    }

    // ── Steps 6–7: loaded provider roles ────────────────────────────

    #[test]
    fn incomplete_provider_profile_routes_to_onboarding() {
        let id = identity("p@x.com");
        for role in [
            UserRole::EventCompany,
            UserRole::Caterer,
            UserRole::Transport,
            UserRole::Photographer,
        ] {
            let profile = ProfileOutcome::Loaded(provider_record(role, false, false));
            let decision = resolve_destination(Some(&id), &profile, None, ADMIN);
            assert_eq!(decision.destination, Destination::ProviderOnboarding);
            assert!(decision.requires_onboarding);
        }
    }

    #[test]
    fn either_completion_flag_unlocks_the_dashboard() {
        let id = identity("p@x.com");
        for (pc, c) in [(true, false), (false, true), (true, true)] {
            let profile = ProfileOutcome::Loaded(provider_record(UserRole::Photographer, pc, c));
            let decision = resolve_destination(Some(&id), &profile, None, ADMIN);
            assert_eq!(decision.destination, Destination::ProviderDashboard, "flags {pc}/{c}");
            assert!(!decision.requires_onboarding);
        }
    }

    #[test]
    fn hint_is_ignored_once_a_record_exists() {
        let id = identity("u@x.com");
        let profile = ProfileOutcome::Loaded(provider_record(UserRole::Customer, false, false));
        let decision = resolve_destination(Some(&id), &profile, Some("photographer"), ADMIN);
        assert_eq!(decision.destination, Destination::CustomerHome);
    }

    // ── Properties ──────────────────────────────────────────────────

    #[test]
    fn decision_is_idempotent() {
        let id = identity("p@x.com");
        let profile = ProfileOutcome::Loaded(provider_record(UserRole::Transport, false, false));
        let first = resolve_destination(Some(&id), &profile, Some("transport"), ADMIN);
        let second = resolve_destination(Some(&id), &profile, Some("transport"), ADMIN);
        assert_eq!(first, second);
    }

    #[test]
    fn new_photographer_scenario() {
        // Registration wrote the hint; the profile write has not landed yet.
        let id = identity("new@x.com");
        let decision =
            resolve_destination(Some(&id), &ProfileOutcome::Absent, Some("photographer"), ADMIN);
        assert_eq!(decision.destination, Destination::ProviderOnboarding);
        assert!(decision.requires_onboarding);
    }

    #[test]
    fn destination_paths_are_stable() {
        assert_eq!(Destination::Login.path(), "/login");
        assert_eq!(Destination::CustomerHome.path(), "/customer/home");
        assert_eq!(Destination::FreelancerHome.path(), "/freelancer/home");
        assert_eq!(Destination::JobSeekerHome.path(), "/jobseeker/home");
        assert_eq!(Destination::AdminPanel.path(), "/admin");
        assert_eq!(Destination::ProviderOnboarding.path(), "/provider/onboarding");
        assert_eq!(Destination::ProviderDashboard.path(), "/provider/dashboard");
    }
}
